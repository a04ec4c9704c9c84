//! Project configuration for API check runs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validate::ValidationMode;

/// Project configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the HTML/JSON reports are written to
    pub report_dir: PathBuf,

    /// Operating system label shown in report headers
    pub os: String,

    /// Tester label shown in report headers
    pub tester: String,

    /// Stop at the first failed structural check, or record all of them
    pub mode: ValidationMode,

    /// HTTP client timeout in seconds
    pub timeout_secs: u64,

    pub dog: DogConfig,

    pub petstore: PetstoreConfig,
}

/// dog.ceo suite settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DogConfig {
    pub base_url: String,
    /// Breed for the random image search
    pub random_breed: String,
    /// Breed that must appear in the full breed list
    pub listed_breed: String,
    /// Breed whose sub-breeds and images are retrieved
    pub sub_breed_parent: String,
}

/// Swagger Petstore suite settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetstoreConfig {
    pub base_url: String,
    /// Status used for `findByStatus`
    pub search_status: String,
    /// Pet that must be on the list for `search_status`
    pub pet_name: String,
    /// Category id the listed pet must carry
    pub category_id: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("./test_reports"),
            os: std::env::consts::OS.to_string(),
            tester: "unknown".to_string(),
            mode: ValidationMode::default(),
            timeout_secs: 30,
            dog: DogConfig::default(),
            petstore: PetstoreConfig::default(),
        }
    }
}

impl Default for DogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dog.ceo/api".to_string(),
            random_breed: "hound".to_string(),
            listed_breed: "bulldog".to_string(),
            sub_breed_parent: "bulldog".to_string(),
        }
    }
}

impl Default for PetstoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://petstore.swagger.io/v2".to_string(),
            search_status: "available".to_string(),
            pet_name: "doggie".to_string(),
            category_id: 12,
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.restcheck.toml)
    ///
    /// # Errors
    ///
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."))
    }

    /// Look for a config file in `dir`; defaults if none exists.
    ///
    /// # Errors
    ///
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let candidates = [".restcheck.toml", ".restcheck.json", "restcheck.toml"];

        for name in candidates {
            let path = dir.join(name);
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# restcheck configuration

# Where HTML/JSON reports are written
report_dir = "./test_reports"

# Labels shown in the report header
os = "linux"
tester = "your-name"

# "exhaustive" records every structural check, "fail_fast" stops at the first failure
mode = "exhaustive"

# HTTP client timeout in seconds
timeout_secs = 30

[dog]
base_url = "https://dog.ceo/api"
random_breed = "hound"
listed_breed = "bulldog"
sub_breed_parent = "bulldog"

[petstore]
base_url = "https://petstore.swagger.io/v2"
search_status = "available"
pet_name = "doggie"
# One historical fixture used 120 here
category_id = 12
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}

//! Serializable report contents

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of a single log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    /// Context line, neither pass nor fail
    Info,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogLine {
    pub outcome: Outcome,
    pub message: String,
}

/// One test case: name, description and its ordered log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub lines: Vec<LogLine>,
}

impl ReportEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            lines: Vec::new(),
        }
    }

    /// `Fail` if any line failed, `Pass` if any passed, otherwise `Info`.
    #[must_use]
    pub fn status(&self) -> Outcome {
        if self.failed_count() > 0 {
            Outcome::Fail
        } else if self.passed_count() > 0 {
            Outcome::Pass
        } else {
            Outcome::Info
        }
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(Outcome::Pass)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(Outcome::Fail)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.lines.iter().filter(|l| l.outcome == outcome).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SystemInfo {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    /// Entries with neither a pass nor a fail line
    #[serde(default)]
    pub info: u64,
}

impl ReportSummary {
    fn of(entries: &[ReportEntry]) -> Self {
        let mut summary = Self {
            total: entries.len() as u64,
            ..Self::default()
        };
        for entry in entries {
            match entry.status() {
                Outcome::Pass => summary.passed += 1,
                Outcome::Fail => summary.failed += 1,
                Outcome::Info => summary.info += 1,
            }
        }
        summary
    }
}

/// Everything written to the report artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportDocument {
    pub title: String,
    /// ISO 8601 UTC
    pub generated_at: String,
    #[serde(default)]
    pub system_info: Vec<SystemInfo>,
    pub summary: ReportSummary,
    #[serde(default)]
    pub entries: Vec<ReportEntry>,
}

impl ReportDocument {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        generated_at: impl Into<String>,
        system_info: Vec<SystemInfo>,
        entries: Vec<ReportEntry>,
    ) -> Self {
        Self {
            title: title.into(),
            generated_at: generated_at.into(),
            system_info,
            summary: ReportSummary::of(&entries),
            entries,
        }
    }
}

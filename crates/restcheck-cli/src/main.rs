//! restcheck CLI - REST API checks with HTML test reports

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use restcheck_core::{Config, SuiteSummary, ValidationMode, VerdictStatus, verdict};
use restcheck_runner::{ApiClient, SuiteKind, run_suite};

#[derive(Parser)]
#[command(name = "restcheck")]
#[command(about = "Check the dog.ceo and Swagger Petstore APIs and write HTML test reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run check suites
    Run {
        /// Suite to run
        #[arg(short, long, default_value = "all")]
        suite: SuiteArg,

        /// Config file (default: .restcheck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report directory (overrides config)
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Structural check mode (overrides config)
        #[arg(short, long)]
        mode: Option<ModeArg>,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema of the JSON report
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SuiteArg {
    Dog,
    Petstore,
    All,
}

impl SuiteArg {
    fn kinds(self) -> Vec<SuiteKind> {
        match self {
            Self::Dog => vec![SuiteKind::Dog],
            Self::Petstore => vec![SuiteKind::Petstore],
            Self::All => SuiteKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    FailFast,
    Exhaustive,
}

impl From<ModeArg> for ValidationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::FailFast => ValidationMode::FailFast,
            ModeArg::Exhaustive => ValidationMode::Exhaustive,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            suite,
            config,
            report_dir,
            mode,
        } => {
            let mut cfg = match config {
                Some(path) => Config::load(&path)?,
                None => Config::load_default()?,
            };
            if let Some(dir) = report_dir {
                cfg.report_dir = dir;
            }
            if let Some(mode) = mode {
                cfg.mode = mode.into();
            }
            tracing::debug!(?suite, mode = ?cfg.mode, timeout_secs = cfg.timeout_secs, "starting run");

            if cli.output == OutputFormat::Terminal {
                eprintln!("Config:");
                eprintln!("  report_dir: {}", cfg.report_dir.display());
                eprintln!("  mode:       {:?}", cfg.mode);
                eprintln!("  tester:     {}", cfg.tester);
                eprintln!();
            }

            let client = ApiClient::new(Duration::from_secs(cfg.timeout_secs))?;
            let mut summaries = Vec::new();
            for kind in suite.kinds() {
                let summary = run_suite(kind, &client, &cfg)
                    .with_context(|| format!("suite {} could not write its report", kind.name()))?;
                if cli.output == OutputFormat::Terminal {
                    print_suite(&summary);
                }
                summaries.push(summary);
            }

            let result = verdict(&summaries);
            match cli.output {
                OutputFormat::Terminal => {
                    println!("\n{}: {}", result.status, result.reason);
                    println!("  Exit code: {}", result.exit_code);
                }
                OutputFormat::Json => {
                    let json_output = serde_json::json!({
                        "verdict": {
                            "status": result.status.to_string(),
                            "exit_code": result.exit_code,
                            "reason": result.reason,
                        },
                        "suites": summaries,
                    });
                    println!("{}", serde_json::to_string_pretty(&json_output)?);
                }
                OutputFormat::Silent => {}
            }

            if result.status == VerdictStatus::Fail && result.exit_code == 3 {
                eprintln!("Error: No test cases were run. Check the selected suites.");
            }
            Ok(result.exit_code)
        }

        Commands::Init => {
            let config_path = Path::new(".restcheck.toml");
            if config_path.exists() {
                eprintln!("{} already exists", config_path.display());
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {}", config_path.display());
            println!("\nEdit the file to configure:");
            println!("  - report_dir: where HTML/JSON reports go");
            println!("  - os, tester: labels in the report header");
            println!("  - [dog], [petstore]: base URLs and fixture data");
            Ok(0)
        }

        Commands::Schema => {
            let schema = restcheck_core::schema::generate_schema();
            println!("{schema}");
            Ok(0)
        }
    }
}

fn print_suite(summary: &SuiteSummary) {
    println!(
        "\n{}: {} passed, {} failed",
        summary.suite,
        summary.passed(),
        summary.failed()
    );
    for case in &summary.cases {
        let mark = if case.passed { "PASS" } else { "FAIL" };
        println!("  [{mark}] {} ({} ms)", case.name, case.duration_ms);
        if let Some(msg) = &case.message {
            println!("         {msg}");
        }
    }
    if let Some(report) = &summary.report {
        println!("  Report: {report}");
    }
}

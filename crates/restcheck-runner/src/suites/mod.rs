//! Check suites and the sequential case runner
//!
//! Each suite owns one [`Report`]. Cases run one after another; a failing
//! case is recorded and the next case still runs. The report is closed after
//! the last case whatever the outcomes were.

pub mod dog;
pub mod petstore;

use std::time::Instant;

use serde_json::Value;

use restcheck_core::{
    ApiResponse, AssertionFailure, CaseLog, CaseResult, Config, Expectation, Report,
    ReportError, ReportMeta, SuiteSummary, ValidationMode, validate,
};

use crate::client::{ApiClient, ClientError};

/// The services under test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    /// dog.ceo breed image API
    Dog,
    /// Swagger Petstore demo API
    Petstore,
}

impl SuiteKind {
    pub const ALL: [Self; 2] = [Self::Dog, Self::Petstore];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Petstore => "petstore",
        }
    }

    /// Report document title, also the artifact file stem.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dog => "TestDogApi",
            Self::Petstore => "TestPetStoreSwaggerApi",
        }
    }
}

/// Why a case failed
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    /// Already written to the case log where it was detected
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
    #[error(transparent)]
    Transport(#[from] ClientError),
    #[error("Missing prerequisite: {0}")]
    Prerequisite(String),
    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Runs cases against one report and collects their results.
pub struct CaseRunner<'r> {
    report: &'r mut Report,
    mode: ValidationMode,
    results: Vec<CaseResult>,
}

impl<'r> CaseRunner<'r> {
    pub fn new(report: &'r mut Report, mode: ValidationMode) -> Self {
        Self {
            report,
            mode,
            results: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Run one case. Returns `true` if it passed.
    pub fn case<F>(&mut self, name: &str, description: &str, body: F) -> bool
    where
        F: FnOnce(&mut CaseLog<'_>) -> Result<(), CaseError>,
    {
        let start = Instant::now();
        let outcome = {
            let mut log = self.report.begin_case(name, description);
            let outcome = body(&mut log);
            if let Err(e) = &outcome {
                if !matches!(e, CaseError::Assertion(_)) {
                    log.fail(e.to_string());
                }
            }
            outcome
        };
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = match outcome {
            Ok(()) => {
                tracing::info!(case = name, duration_ms, "case passed");
                CaseResult {
                    name: name.to_string(),
                    passed: true,
                    message: None,
                    duration_ms,
                }
            }
            Err(e) => {
                tracing::warn!(case = name, duration_ms, "case failed: {e}");
                CaseResult {
                    name: name.to_string(),
                    passed: false,
                    message: Some(e.to_string()),
                    duration_ms,
                }
            }
        };
        let passed = result.passed;
        self.results.push(result);
        passed
    }

    #[must_use]
    pub fn finish(self) -> Vec<CaseResult> {
        self.results
    }
}

/// Client, expectation and mode shared by every case of a suite.
pub(crate) struct CaseContext<'a> {
    pub(crate) client: &'a ApiClient,
    pub(crate) expectation: Expectation,
    pub(crate) mode: ValidationMode,
}

impl CaseContext<'_> {
    /// GET `url` and run the structural checks on the response.
    pub(crate) fn get(&self, log: &mut CaseLog<'_>, url: &str) -> Result<ApiResponse, CaseError> {
        log.info(format!("GET {url}"));
        let response = self.client.get(url)?;
        self.check(log, &response)?;
        Ok(response)
    }

    pub(crate) fn get_query(
        &self,
        log: &mut CaseLog<'_>,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, CaseError> {
        let shown = query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        log.info(format!("GET {url}?{shown}"));
        let response = self.client.get_query(url, query)?;
        self.check(log, &response)?;
        Ok(response)
    }

    pub(crate) fn post_json(
        &self,
        log: &mut CaseLog<'_>,
        url: &str,
        body: &Value,
    ) -> Result<ApiResponse, CaseError> {
        log.info(format!("POST {url} {body}"));
        let response = self.client.post_json(url, body)?;
        self.check(log, &response)?;
        Ok(response)
    }

    fn check(&self, log: &mut CaseLog<'_>, response: &ApiResponse) -> Result<(), CaseError> {
        let validation = validate(response, &self.expectation, self.mode);
        validation.log_to(log);
        validation.into_result()?;
        Ok(())
    }
}

/// Log a business assertion and turn a false condition into a case failure.
pub(crate) fn ensure(
    log: &mut CaseLog<'_>,
    condition: bool,
    label: &str,
    pass_message: String,
    fail_message: String,
) -> Result<(), CaseError> {
    if condition {
        log.pass(pass_message);
        Ok(())
    } else {
        Err(fail(log, label, fail_message))
    }
}

/// Log a failed business assertion and return it as a case error.
pub(crate) fn fail(log: &mut CaseLog<'_>, label: &str, message: String) -> CaseError {
    log.fail(message.clone());
    AssertionFailure::business(label, message).into()
}

/// `("https://dog.ceo/api/", "/breeds/list/all")` → `"https://dog.ceo/api/breeds/list/all"`
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Run one suite end to end and write its report.
///
/// # Errors
///
/// Returns error only if the report cannot be written; case failures are
/// part of the returned summary.
pub fn run_suite(
    kind: SuiteKind,
    client: &ApiClient,
    config: &Config,
) -> Result<SuiteSummary, ReportError> {
    tracing::info!(suite = kind.name(), "running suite");
    let meta = ReportMeta::new(&config.os, &config.tester, kind.title());
    let mut report = Report::open(meta, &config.report_dir);

    let cases = {
        let mut runner = CaseRunner::new(&mut report, config.mode);
        match kind {
            SuiteKind::Dog => dog::run(&mut runner, client, &config.dog),
            SuiteKind::Petstore => petstore::run(&mut runner, client, &config.petstore),
        }
        runner.finish()
    };

    let artifacts = report.close()?;
    Ok(SuiteSummary {
        suite: kind.name().to_string(),
        cases,
        report: Some(artifacts.html.display().to_string()),
    })
}

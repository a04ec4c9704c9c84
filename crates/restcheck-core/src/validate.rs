//! Response validation (status code, status line, content type, body keys, status field)
//!
//! No I/O. `validate` turns a response and an expectation into an ordered
//! outcome list; logging and failure propagation are left to the caller.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expectation::{ContentTypeMatch, Expectation};
use crate::report::CaseLog;
use crate::response::{ApiResponse, media_type};

/// One structural check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "check", content = "key", rename_all = "snake_case")]
pub enum CheckKind {
    StatusCode,
    StatusLine,
    ContentType,
    /// Top-level key the body must contain
    RequiredKey(String),
    /// Designated key whose value must equal a literal
    FieldValue(String),
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StatusCode => f.write_str("status code"),
            Self::StatusLine => f.write_str("status line"),
            Self::ContentType => f.write_str("content type"),
            Self::RequiredKey(key) => write!(f, "required key '{key}'"),
            Self::FieldValue(key) => write!(f, "field '{key}'"),
        }
    }
}

/// What an [`AssertionFailure`] was checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailedCheck {
    Structural(CheckKind),
    /// Endpoint-specific assertion, labelled by the caller
    Business(String),
}

impl From<CheckKind> for FailedCheck {
    fn from(check: CheckKind) -> Self {
        Self::Structural(check)
    }
}

impl PartialEq<CheckKind> for FailedCheck {
    fn eq(&self, other: &CheckKind) -> bool {
        matches!(self, Self::Structural(check) if check == other)
    }
}

impl std::fmt::Display for FailedCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural(check) => write!(f, "{check}"),
            Self::Business(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    /// Not evaluated because an earlier failure already covers it
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckOutcome {
    pub check: CheckKind,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckOutcome {
    fn passed(check: CheckKind, message: String) -> Self {
        Self {
            check,
            status: CheckStatus::Passed,
            message,
        }
    }

    fn failed(check: CheckKind, message: String) -> Self {
        Self {
            check,
            status: CheckStatus::Failed,
            message,
        }
    }

    fn skipped(check: CheckKind, message: String) -> Self {
        Self {
            check,
            status: CheckStatus::Skipped,
            message,
        }
    }

    /// The failure this outcome represents, if any.
    #[must_use]
    pub fn failure(&self) -> Option<AssertionFailure> {
        (self.status == CheckStatus::Failed).then(|| AssertionFailure {
            check: self.check.clone().into(),
            message: self.message.clone(),
        })
    }
}

/// An expected-vs-actual mismatch. Fails the current case only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub check: FailedCheck,
    pub message: String,
}

impl AssertionFailure {
    #[must_use]
    pub fn business(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: FailedCheck::Business(label.into()),
            message: message.into(),
        }
    }
}

/// How to proceed after a failed check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop at the first failed check
    FailFast,
    /// Evaluate and record every check
    #[default]
    Exhaustive,
}

/// Ordered outcomes of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Validation {
    pub outcomes: Vec<CheckOutcome>,
}

impl Validation {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status != CheckStatus::Failed)
    }

    #[must_use]
    pub fn failures(&self) -> Vec<AssertionFailure> {
        self.outcomes
            .iter()
            .filter_map(CheckOutcome::failure)
            .collect()
    }

    /// Write one pass/fail line per outcome. Skipped checks are logged as info.
    pub fn log_to(&self, log: &mut CaseLog<'_>) {
        for outcome in &self.outcomes {
            match outcome.status {
                CheckStatus::Passed => log.pass(outcome.message.clone()),
                CheckStatus::Failed => log.fail(outcome.message.clone()),
                CheckStatus::Skipped => log.info(outcome.message.clone()),
            }
        }
    }

    /// First failure, if any.
    ///
    /// # Errors
    ///
    /// Returns the first failed check in evaluation order.
    pub fn into_result(self) -> Result<(), AssertionFailure> {
        match self.outcomes.iter().find_map(CheckOutcome::failure) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

/// Run every check of `expectation` against `response`.
#[must_use]
pub fn validate(
    response: &ApiResponse,
    expectation: &Expectation,
    mode: ValidationMode,
) -> Validation {
    let mut outcomes = Vec::new();
    for check in expectation.checks() {
        let outcome = evaluate(&check, response, expectation);
        let failed = outcome.status == CheckStatus::Failed;
        outcomes.push(outcome);
        if failed && mode == ValidationMode::FailFast {
            break;
        }
    }
    Validation { outcomes }
}

fn evaluate(check: &CheckKind, response: &ApiResponse, expectation: &Expectation) -> CheckOutcome {
    match check {
        CheckKind::StatusCode => {
            let expected = expectation.status_code;
            let actual = response.status_code;
            if actual == expected {
                CheckOutcome::passed(check.clone(), format!("status code is {actual}"))
            } else {
                CheckOutcome::failed(
                    check.clone(),
                    format!("expected status code {expected}, got {actual}"),
                )
            }
        }
        CheckKind::StatusLine => {
            let expected = &expectation.status_line;
            let actual = &response.status_line;
            if actual == expected {
                CheckOutcome::passed(check.clone(), format!("status line is '{actual}'"))
            } else {
                CheckOutcome::failed(
                    check.clone(),
                    format!("expected status line '{expected}', got '{actual}'"),
                )
            }
        }
        CheckKind::ContentType => {
            let (expected, actual) = match expectation.content_type_match {
                ContentTypeMatch::Exact => (
                    expectation.content_type.clone(),
                    response.content_type.clone(),
                ),
                ContentTypeMatch::MediaType => (
                    media_type(&expectation.content_type),
                    response.media_type(),
                ),
            };
            match actual {
                Some(actual) if actual == expected => {
                    CheckOutcome::passed(check.clone(), format!("content type is '{actual}'"))
                }
                Some(actual) => CheckOutcome::failed(
                    check.clone(),
                    format!("expected content type '{expected}', got '{actual}'"),
                ),
                None => CheckOutcome::failed(
                    check.clone(),
                    format!("expected content type '{expected}', got no Content-Type header"),
                ),
            }
        }
        CheckKind::RequiredKey(key) => match response.body.as_ref().and_then(Value::as_object) {
            Some(obj) if obj.contains_key(key) => {
                let message = format!("body has key '{key}'");
                CheckOutcome::passed(check.clone(), message)
            }
            Some(_) => {
                let message = format!("body is missing key '{key}'");
                CheckOutcome::failed(check.clone(), message)
            }
            None => {
                let message = format!("body is not a JSON object, key '{key}' not found");
                CheckOutcome::failed(check.clone(), message)
            }
        },
        CheckKind::FieldValue(key) => evaluate_field(check.clone(), key, response, expectation),
    }
}

fn evaluate_field(
    check: CheckKind,
    key: &str,
    response: &ApiResponse,
    expectation: &Expectation,
) -> CheckOutcome {
    let Some(field) = expectation.field.as_ref() else {
        return CheckOutcome::skipped(check, format!("no expected value for '{key}'"));
    };
    // A missing required key has already been reported by its own check
    let covered = expectation.requires_key(key);

    match response.body.as_ref().and_then(Value::as_object) {
        Some(obj) => match obj.get(key) {
            Some(actual) if *actual == field.value => {
                CheckOutcome::passed(check, format!("'{key}' is {actual}"))
            }
            Some(actual) => CheckOutcome::failed(
                check,
                format!("expected '{key}' to be {}, got {actual}", field.value),
            ),
            None if covered => {
                CheckOutcome::skipped(check, format!("'{key}' not compared: key is missing"))
            }
            None => CheckOutcome::failed(
                check,
                format!("expected '{key}' to be {}, key is missing", field.value),
            ),
        },
        None if covered => CheckOutcome::skipped(
            check,
            format!("'{key}' not compared: body is not a JSON object"),
        ),
        None => CheckOutcome::failed(
            check,
            format!(
                "expected '{key}' to be {}, body is not a JSON object",
                field.value
            ),
        ),
    }
}

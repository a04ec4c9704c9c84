//! restcheck-core: response validation and test reporting for REST API checks
//!
//! This crate holds the pieces every check suite shares: the structural
//! [`Expectation`] a response must meet, the pure [`validate`] function, and
//! the [`Report`] recorder that turns test cases into HTML/JSON artifacts.

pub mod config;
pub mod expectation;
pub mod report;
pub mod response;
pub mod schema;
pub mod validate;
pub mod verdict;

pub use config::{Config, ConfigError, DogConfig, PetstoreConfig};
pub use expectation::{ContentTypeMatch, ExpectedField, Expectation, MESSAGE_KEY, STATUS_KEY, SUCCESS};
pub use report::{CaseLog, Outcome, Report, ReportArtifacts, ReportDocument, ReportError, ReportMeta};
pub use response::ApiResponse;
pub use validate::{
    AssertionFailure, CheckKind, CheckOutcome, CheckStatus, FailedCheck, Validation,
    ValidationMode, validate,
};
pub use verdict::{CaseResult, SuiteSummary, Verdict, VerdictStatus, verdict};

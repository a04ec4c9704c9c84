//! restcheck-runner: HTTP client and check suites for dog.ceo and Swagger Petstore

pub mod client;
pub mod pets;
pub mod suites;

pub use client::{ApiClient, ClientError};
pub use pets::Pet;
pub use suites::{CaseError, CaseRunner, SuiteKind, run_suite};

//! Run summaries and the final pass/fail verdict

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of one test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaseResult {
    pub name: String,
    pub passed: bool,
    /// Failure message when `passed` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

/// Results of one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuiteSummary {
    pub suite: String,
    pub cases: Vec<CaseResult>,
    /// HTML report path, if it was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl SuiteSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    #[must_use]
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.passed)
    }
}

/// Final verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub exit_code: i32,
    pub reason: String,
}

/// Pass or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// PASS iff at least one case ran and every case passed.
///
/// Exit codes: 0 pass, 1 case failures, 3 nothing ran.
#[must_use]
pub fn verdict(suites: &[SuiteSummary]) -> Verdict {
    let total: usize = suites.iter().map(SuiteSummary::total).sum();
    let failed: usize = suites.iter().map(SuiteSummary::failed).sum();

    if total == 0 {
        return Verdict {
            status: VerdictStatus::Fail,
            exit_code: 3,
            reason: "No test cases were run".to_string(),
        };
    }

    if failed == 0 {
        return Verdict {
            status: VerdictStatus::Pass,
            exit_code: 0,
            reason: format!("All {total} test cases passed"),
        };
    }

    let per_suite = suites
        .iter()
        .filter(|s| s.failed() > 0)
        .map(|s| format!("{}: {}/{}", s.suite, s.failed(), s.total()))
        .collect::<Vec<_>>()
        .join(", ");
    Verdict {
        status: VerdictStatus::Fail,
        exit_code: 1,
        reason: format!("{failed} of {total} test cases failed ({per_suite})"),
    }
}

use serde::Serialize;

/// Where a failing invocation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A configured `[[scope.checks]]` step
    #[default]
    Check,
    /// A unit test run by the scope's test-impact policy
    UnitTest,
}

/// The check that aborted the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    pub scope: String,
    pub check_label: String,
    pub kind: FailureKind,

    /// Exit code of the failing program; `-1` when it was killed by a signal
    pub exit_code: i32,
}

/// A changed source file with no test file next to it (non-fatal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingTestWarning {
    pub scope: String,
    pub source: String,
    pub expected_test: String,
}

/// Outcome of one dispatch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    /// Triggered scope names, in declaration order
    pub scopes_triggered: Vec<String>,

    pub first_failure: Option<CheckFailure>,

    pub warnings: Vec<MissingTestWarning>,

    /// Number of check and test invocations that ran to completion
    pub checks_run: usize,
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        self.first_failure.is_none()
    }

    /// Process exit status for the hook: 0 allows the commit.
    ///
    /// A failure always maps to a non-zero code; signal deaths and
    /// out-of-range codes become 1.
    pub fn exit_code(&self) -> i32 {
        match &self.first_failure {
            None => 0,
            Some(f) if (1..=255).contains(&f.exit_code) => f.exit_code,
            Some(_) => 1,
        }
    }
}

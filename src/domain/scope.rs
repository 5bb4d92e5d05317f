use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::PathMatcher;
use crate::DispatchError;

/// An external program with a fixed argument list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// One linter or test invocation in a scope's pipeline
#[derive(Debug, Clone)]
pub struct CheckStep {
    /// Label shown in progress output and failure reports
    pub label: String,

    pub invoke: Invocation,

    /// Directory to run in, relative to the repository root
    pub working_dir: Option<PathBuf>,

    /// Run once when `invoke.program` cannot be resolved, then retry resolution
    pub bootstrap: Option<Invocation>,

    /// Report a failing status but keep going (auto-fix passes)
    pub ignore_failure: bool,
}

impl CheckStep {
    pub fn new(label: impl Into<String>, invoke: Invocation) -> Self {
        Self {
            label: label.into(),
            invoke,
            working_dir: None,
            bootstrap: None,
            ignore_failure: false,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: Invocation) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn ignoring_failure(mut self) -> Self {
        self.ignore_failure = true;
        self
    }
}

/// Runs the matching unit test for every changed source file.
///
/// `web/utils/format.ts` with suffix `.spec.ts` maps to
/// `web/utils/format.spec.ts`.
#[derive(Debug, Clone)]
pub struct TestImpact {
    pub sources: Vec<PathMatcher>,
    pub test_suffix: String,

    /// The test file path is appended as the last argument
    pub runner: Invocation,

    pub working_dir: Option<PathBuf>,
}

impl TestImpact {
    pub fn new(
        sources: Vec<PathMatcher>,
        test_suffix: impl Into<String>,
        runner: Invocation,
    ) -> Result<Self, DispatchError> {
        let test_suffix = test_suffix.into();
        if sources.is_empty() {
            return Err(DispatchError::Configuration(
                "test impact needs at least one source pattern".to_string(),
            ));
        }
        if test_suffix.is_empty() {
            return Err(DispatchError::Configuration(
                "test impact suffix must not be empty".to_string(),
            ));
        }
        Ok(Self {
            sources,
            test_suffix,
            runner,
            working_dir: None,
        })
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Whether a changed path is a source file this policy covers
    pub fn covers(&self, path: &str) -> bool {
        !path.ends_with(&self.test_suffix) && self.sources.iter().any(|m| m.matches(path))
    }

    /// Expected test path for a source file: its extension replaced by the suffix
    pub fn expected_test_path(&self, source: &str) -> String {
        let file_start = source.rfind('/').map(|i| i + 1).unwrap_or(0);
        let stem_end = match source[file_start..].rfind('.') {
            Some(dot) if dot > 0 => file_start + dot,
            _ => source.len(),
        };
        format!("{}{}", &source[..stem_end], self.test_suffix)
    }
}

/// A named group of paths sharing one check pipeline
#[derive(Debug, Clone)]
pub struct ScopeRule {
    pub name: String,
    path_matchers: Vec<PathMatcher>,
    checks: Vec<CheckStep>,

    /// Printed when the scope aborts the commit
    pub fix_hint: Option<String>,

    pub test_impact: Option<TestImpact>,
}

impl ScopeRule {
    /// Create a rule; both `path_matchers` and `checks` must be non-empty
    pub fn new(
        name: impl Into<String>,
        path_matchers: Vec<PathMatcher>,
        checks: Vec<CheckStep>,
    ) -> Result<Self, DispatchError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DispatchError::Configuration(
                "scope name must not be empty".to_string(),
            ));
        }
        if path_matchers.is_empty() {
            return Err(DispatchError::Configuration(format!(
                "scope '{}' has no path patterns",
                name
            )));
        }
        if checks.is_empty() {
            return Err(DispatchError::Configuration(format!(
                "scope '{}' has no checks",
                name
            )));
        }
        if let Some(step) = checks.iter().find(|c| c.invoke.program.trim().is_empty()) {
            return Err(DispatchError::Configuration(format!(
                "check '{}' in scope '{}' has no program",
                step.label, name
            )));
        }

        Ok(Self {
            name,
            path_matchers,
            checks,
            fix_hint: None,
            test_impact: None,
        })
    }

    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    pub fn with_test_impact(mut self, impact: TestImpact) -> Self {
        self.test_impact = Some(impact);
        self
    }

    pub fn path_matchers(&self) -> &[PathMatcher] {
        &self.path_matchers
    }

    pub fn checks(&self) -> &[CheckStep] {
        &self.checks
    }

    /// True if any matcher matches this path
    pub fn matches(&self, path: &str) -> bool {
        self.path_matchers.iter().any(|m| m.matches(path))
    }
}

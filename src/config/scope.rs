//! Scope configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{CheckStep, DispatchError, Invocation, PathMatcher, ScopeRule, TestImpact};

/// Scope configuration - a `[[scope]]` table
///
/// Scopes define WHICH staged paths trigger WHICH checks. Declaration order
/// is execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub name: String,

    /// Globs (`api/*.py`) or path prefixes (`web/`)
    #[serde(default)]
    pub paths: Vec<String>,

    /// Shown when a check in this scope aborts the commit
    pub fix_hint: Option<String>,

    #[serde(default)]
    pub checks: Vec<CheckConfig>,

    pub test_impact: Option<TestImpactConfig>,
}

/// A single `[[scope.checks]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Defaults to the program name
    pub label: Option<String>,

    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Relative to the repository root
    pub working_dir: Option<PathBuf>,

    /// Run when `program` is not installed (e.g. `poetry install --only lint`)
    pub bootstrap: Option<Invocation>,

    #[serde(default)]
    pub ignore_failure: bool,
}

/// `[scope.test_impact]` - run the unit test next to each changed source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestImpactConfig {
    pub sources: Vec<String>,

    /// Replaces the source file's extension, e.g. `.spec.ts`
    pub test_suffix: String,

    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    pub working_dir: Option<PathBuf>,
}

impl CheckConfig {
    fn to_step(&self) -> CheckStep {
        CheckStep {
            label: self.label.clone().unwrap_or_else(|| self.program.clone()),
            invoke: Invocation::new(self.program.clone(), self.args.clone()),
            working_dir: self.working_dir.clone(),
            bootstrap: self.bootstrap.clone(),
            ignore_failure: self.ignore_failure,
        }
    }
}

impl TestImpactConfig {
    fn to_impact(&self) -> Result<TestImpact, DispatchError> {
        let mut impact = TestImpact::new(
            PathMatcher::parse_all(self.sources.as_slice())?,
            self.test_suffix.clone(),
            Invocation::new(self.program.clone(), self.args.clone()),
        )?;
        impact.working_dir = self.working_dir.clone();
        Ok(impact)
    }
}

impl ScopeConfig {
    /// Validate and convert into a dispatchable rule
    pub fn to_rule(&self) -> Result<ScopeRule, DispatchError> {
        let matchers =
            PathMatcher::parse_all(self.paths.as_slice()).map_err(|e| in_scope(&self.name, e))?;
        let checks = self.checks.iter().map(CheckConfig::to_step).collect();

        let mut rule = ScopeRule::new(self.name.clone(), matchers, checks)?;
        rule.fix_hint = self.fix_hint.clone();
        if let Some(impact) = &self.test_impact {
            rule.test_impact = Some(impact.to_impact().map_err(|e| in_scope(&self.name, e))?);
        }
        Ok(rule)
    }
}

fn in_scope(name: &str, err: DispatchError) -> DispatchError {
    match err {
        DispatchError::Configuration(msg) => {
            DispatchError::Configuration(format!("scope '{}': {}", name, msg))
        }
        other => other,
    }
}

//! Change-scoped dispatch: classify staged files into scopes, then run
//! each triggered scope's checks in order, stopping at the first failure.

mod runner;

pub use runner::{CheckRunner, ProcessRunner, StepStatus};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{
    CheckFailure, CheckStep, CommitChangeSet, DispatchError, DispatchResult, FailureKind,
    Invocation, MissingTestWarning, ScopeRule, TestImpact,
};

/// Progress notifications emitted while a dispatch runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    ScopeEntered { scope: String },
    StepStarted { scope: String, label: String },
    /// A step marked `ignore_failure` exited non-zero
    StepFailureIgnored { scope: String, label: String, exit_code: i32 },
    BootstrapStarted { scope: String, label: String },
    MissingTest(MissingTestWarning),
    TestsPassed { scope: String, count: usize },
}

type EventSink = Box<dyn Fn(&DispatchEvent) + Send + Sync>;

/// Names of the rules with at least one matching path, in declaration order.
///
/// Pure: the same inputs always give the same output.
pub fn classify(change_set: &CommitChangeSet, rules: &[ScopeRule]) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| change_set.iter().any(|path| rule.matches(path)))
        .map(|rule| rule.name.clone())
        .collect()
}

enum StepOutcome {
    Passed,
    Failed(i32),
}

/// Runs scope checks against a repository checkout
pub struct Dispatcher<R: CheckRunner> {
    root: PathBuf,
    rules: Vec<ScopeRule>,
    runner: R,
    on_event: Option<EventSink>,
}

impl<R: CheckRunner> Dispatcher<R> {
    /// Create a dispatcher rooted at `root` (working directories resolve against it).
    ///
    /// A relative root is made absolute against the current directory, so
    /// test file arguments stay valid whatever directory a step runs in.
    pub fn new(root: impl Into<PathBuf>, rules: Vec<ScopeRule>, runner: R) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root,
            rules,
            runner,
            on_event: None,
        }
    }

    /// Receive progress events (used by the CLI for console output)
    pub fn on_event(mut self, sink: impl Fn(&DispatchEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(sink));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &[ScopeRule] {
        &self.rules
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn classify(&self, change_set: &CommitChangeSet) -> Vec<String> {
        classify(change_set, &self.rules)
    }

    /// Classify then run in one call
    pub async fn dispatch(
        &self,
        change_set: &CommitChangeSet,
    ) -> Result<DispatchResult, DispatchError> {
        let triggered = self.classify(change_set);
        self.run(&triggered, change_set).await
    }

    /// Run the checks of every triggered scope, in rule declaration order.
    ///
    /// Returns as soon as a check fails; the failure is recorded in the
    /// result rather than returned as an error. `change_set` feeds the
    /// test-impact policy of scopes that have one.
    pub async fn run(
        &self,
        triggered: &[String],
        change_set: &CommitChangeSet,
    ) -> Result<DispatchResult, DispatchError> {
        let mut result = DispatchResult::default();

        for rule in self.rules.iter().filter(|r| triggered.contains(&r.name)) {
            result.scopes_triggered.push(rule.name.clone());
        }

        for rule in self.rules.iter().filter(|r| triggered.contains(&r.name)) {
            info!("Entering scope {}", rule.name);
            self.emit(DispatchEvent::ScopeEntered {
                scope: rule.name.clone(),
            });

            for step in rule.checks() {
                match self.run_step(rule, step).await? {
                    StepOutcome::Passed => result.checks_run += 1,
                    StepOutcome::Failed(code) if step.ignore_failure => {
                        result.checks_run += 1;
                        debug!("Ignoring failure of {} ({})", step.label, code);
                        self.emit(DispatchEvent::StepFailureIgnored {
                            scope: rule.name.clone(),
                            label: step.label.clone(),
                            exit_code: code,
                        });
                    }
                    StepOutcome::Failed(code) => {
                        result.checks_run += 1;
                        result.first_failure = Some(CheckFailure {
                            scope: rule.name.clone(),
                            check_label: step.label.clone(),
                            kind: FailureKind::Check,
                            exit_code: code,
                        });
                        return Ok(result);
                    }
                }
            }

            if let Some(impact) = &rule.test_impact {
                self.run_test_impact(rule, impact, change_set, &mut result)
                    .await?;
                if result.first_failure.is_some() {
                    return Ok(result);
                }
            }
        }

        Ok(result)
    }

    async fn run_test_impact(
        &self,
        rule: &ScopeRule,
        impact: &TestImpact,
        change_set: &CommitChangeSet,
        result: &mut DispatchResult,
    ) -> Result<(), DispatchError> {
        let mut passed = 0;

        // Deleted sources are mapped too: a test left behind must still pass
        for source in change_set.iter().filter(|p| impact.covers(p)) {
            let test_path = impact.expected_test_path(source);
            let test_file = self.root.join(&test_path);
            debug!("Checking for test file: {}", test_path);

            if !test_file.is_file() {
                let warning = MissingTestWarning {
                    scope: rule.name.clone(),
                    source: source.to_string(),
                    expected_test: test_path,
                };
                info!("{} does not have a corresponding test file", source);
                self.emit(DispatchEvent::MissingTest(warning.clone()));
                result.warnings.push(warning);
                continue;
            }

            let mut args = impact.runner.args.clone();
            args.push(test_file.to_string_lossy().into_owned());
            let step = CheckStep {
                label: format!("test {}", test_path),
                invoke: Invocation::new(impact.runner.program.clone(), args),
                working_dir: impact.working_dir.clone(),
                bootstrap: None,
                ignore_failure: false,
            };

            result.checks_run += 1;
            if let StepOutcome::Failed(code) = self.run_step(rule, &step).await? {
                result.first_failure = Some(CheckFailure {
                    scope: rule.name.clone(),
                    check_label: step.label,
                    kind: FailureKind::UnitTest,
                    exit_code: code,
                });
                return Ok(());
            }
            passed += 1;
        }

        if passed > 0 {
            self.emit(DispatchEvent::TestsPassed {
                scope: rule.name.clone(),
                count: passed,
            });
        }
        Ok(())
    }

    async fn run_step(
        &self,
        rule: &ScopeRule,
        step: &CheckStep,
    ) -> Result<StepOutcome, DispatchError> {
        let cwd = self.working_dir(step)?;
        let program = self.resolve_or_bootstrap(rule, step, &cwd).await?;

        self.emit(DispatchEvent::StepStarted {
            scope: rule.name.clone(),
            label: step.label.clone(),
        });

        let status = self
            .runner
            .execute(&program, &step.invoke.args, &cwd)
            .await?;

        if status.success() {
            Ok(StepOutcome::Passed)
        } else {
            Ok(StepOutcome::Failed(status.reported_code()))
        }
    }

    fn working_dir(&self, step: &CheckStep) -> Result<PathBuf, DispatchError> {
        let dir = match &step.working_dir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        };
        if !dir.is_dir() {
            return Err(DispatchError::MissingWorkingDir {
                label: step.label.clone(),
                path: dir,
            });
        }
        Ok(dir)
    }

    async fn resolve_or_bootstrap(
        &self,
        rule: &ScopeRule,
        step: &CheckStep,
        cwd: &Path,
    ) -> Result<PathBuf, DispatchError> {
        if let Some(path) = self.runner.resolve(&step.invoke.program, cwd) {
            return Ok(path);
        }

        let unresolved = || DispatchError::UnresolvedProgram {
            label: step.label.clone(),
            program: step.invoke.program.clone(),
        };

        let Some(bootstrap) = &step.bootstrap else {
            return Err(unresolved());
        };

        info!("{} not found, running bootstrap: {}", step.invoke.program, bootstrap);
        self.emit(DispatchEvent::BootstrapStarted {
            scope: rule.name.clone(),
            label: step.label.clone(),
        });

        let installer = self
            .runner
            .resolve(&bootstrap.program, cwd)
            .ok_or_else(|| DispatchError::UnresolvedProgram {
                label: format!("{} (bootstrap)", step.label),
                program: bootstrap.program.clone(),
            })?;

        let status = self.runner.execute(&installer, &bootstrap.args, cwd).await?;
        if !status.success() {
            return Err(DispatchError::Configuration(format!(
                "bootstrap for check '{}' failed with exit code {}",
                step.label,
                status.reported_code()
            )));
        }

        self.runner
            .resolve(&step.invoke.program, cwd)
            .ok_or_else(unresolved)
    }

    fn emit(&self, event: DispatchEvent) {
        if let Some(sink) = &self.on_event {
            sink(&event);
        }
    }
}

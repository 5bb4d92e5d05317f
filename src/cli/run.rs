//! Run command implementation (what the pre-commit hook calls)

use anyhow::Result;
use std::path::Path;

use scopegate::FailureKind;
use scopegate::config::Config;
use scopegate::dispatch::{DispatchEvent, Dispatcher, ProcessRunner};

/// Printed instead of the scope's lint hint when a unit test fails
const UNIT_TEST_HINT: &str = "Unit tests failed. Please fix the errors before committing.";

/// Dispatch the change set and return the exit status for the hook
pub async fn run_command(
    work_dir: &Path,
    config_path: Option<&Path>,
    files: Option<Vec<String>>,
) -> Result<i32> {
    let root = super::repo_root(work_dir, files.is_some())?;
    let config = Config::load(&root, config_path)?;
    let rules = config.rules()?;
    let change_set = super::change_set(&root, files)?;

    if change_set.is_empty() {
        println!("No staged files, nothing to check.");
        return Ok(0);
    }

    let runner = ProcessRunner::new(config.settings.show_output);
    let dispatcher = Dispatcher::new(&root, rules, runner).on_event(print_event);
    let result = dispatcher.dispatch(&change_set).await?;

    if result.scopes_triggered.is_empty() {
        println!(
            "No scopes triggered by {} staged file(s).",
            change_set.len()
        );
        return Ok(0);
    }

    match &result.first_failure {
        Some(failure) => {
            println!();
            println!(
                "Check '{}' in scope '{}' failed, exit code: {}",
                failure.check_label, failure.scope, failure.exit_code
            );
            match failure.kind {
                FailureKind::UnitTest => {
                    println!("{}", UNIT_TEST_HINT);
                }
                FailureKind::Check => {
                    let hint = dispatcher
                        .rules()
                        .iter()
                        .find(|r| r.name == failure.scope)
                        .and_then(|r| r.fix_hint.as_deref());
                    if let Some(hint) = hint {
                        println!("{}", hint);
                    }
                }
            }
            println!("Commit aborted.");
        }
        None => {
            println!(
                "All checks passed ({} check(s) in {} scope(s)).",
                result.checks_run,
                result.scopes_triggered.len()
            );
        }
    }

    Ok(result.exit_code())
}

fn print_event(event: &DispatchEvent) {
    match event {
        DispatchEvent::ScopeEntered { scope } => println!("==> scope {}", scope),
        DispatchEvent::StepStarted { label, .. } => println!("  -> {}", label),
        DispatchEvent::BootstrapStarted { label, .. } => {
            println!("  -> {}: program not found, installing", label)
        }
        DispatchEvent::StepFailureIgnored { label, exit_code, .. } => {
            println!("  -> {} exited with {} (ignored)", label, exit_code)
        }
        DispatchEvent::MissingTest(warning) => println!(
            "Warning: {} does not have a corresponding test file ({}).",
            warning.source, warning.expected_test
        ),
        DispatchEvent::TestsPassed { scope, count } => {
            println!("  {} unit test file(s) for scope '{}' passed.", count, scope)
        }
    }
}

//! Exit-status contract of the scopegate binary
#![cfg(unix)]

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::{create_test_repo, record_check, recorded, stage_file, write_file};

fn scopegate(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scopegate"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run scopegate")
}

fn write_config(root: &Path, body: &str) {
    write_file(root, ".scopegate/config.toml", body);
}

#[test]
fn failing_check_aborts_with_its_exit_code_and_hint() {
    let repo = create_test_repo();
    let root = repo.path();
    write_config(
        root,
        &format!(
            "[settings]\nshow_output = false\n\n[[scope]]\nname = \"api\"\npaths = [\"api/*.py\"]\nfix_hint = \"Run dev/reformat\"\n{}",
            record_check("ruff", 3)
        ),
    );
    stage_file(root, "api/app.py", "x = 1\n");

    let output = scopegate(root, &["run"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(3), "stdout:\n{stdout}");
    assert!(stdout.contains("==> scope api"));
    assert!(stdout.contains("Check 'ruff' in scope 'api' failed"));
    assert!(stdout.contains("Run dev/reformat"));
    assert_eq!(recorded(root), ["ruff"]);
}

#[test]
fn untouched_scopes_exit_zero() {
    let repo = create_test_repo();
    let root = repo.path();
    write_config(
        root,
        &format!(
            "[[scope]]\nname = \"api\"\npaths = [\"api/*.py\"]\n{}",
            record_check("ruff", 1)
        ),
    );
    stage_file(root, "README", "edited\n");

    let output = scopegate(root, &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(recorded(root).is_empty());
}

#[test]
fn invalid_config_exits_two() {
    let repo = create_test_repo();
    let root = repo.path();
    write_config(root, "[[scope]]\nname = \"api\"\npaths = [\"api/\"]\n");
    stage_file(root, "api/app.py", "x = 1\n");

    let output = scopegate(root, &["run"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("has no checks"));
}

#[test]
fn classify_with_explicit_files_prints_json() {
    let repo = create_test_repo();
    let root = repo.path();
    write_config(
        root,
        &format!(
            "[[scope]]\nname = \"api\"\npaths = [\"api/*.py\"]\n{}\n[[scope]]\nname = \"web\"\npaths = [\"web/\"]\n{}",
            record_check("ruff", 0),
            record_check("eslint", 0)
        ),
    );

    let output = scopegate(root, &["classify", "--json", "--files", "web/a.ts", "docs/x.md"]);
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["scopes"], serde_json::json!(["web"]));
    assert!(recorded(root).is_empty());
}

#[test]
fn install_then_commit_runs_the_hook() {
    let repo = create_test_repo();
    let root = repo.path();
    let binary = env!("CARGO_BIN_EXE_scopegate");
    write_config(
        root,
        &format!(
            "[settings]\nhook_program = \"{binary}\"\n\n[[scope]]\nname = \"api\"\npaths = [\"api/\"]\n{}",
            record_check("lint", 5)
        ),
    );

    let output = scopegate(root, &["install"]);
    assert_eq!(output.status.code(), Some(0));

    stage_file(root, "api/app.py", "x = 1\n");
    let commit = Command::new("git")
        .args(["commit", "-m", "blocked"])
        .current_dir(root)
        .output()
        .expect("git commit");
    assert!(!commit.status.success(), "hook should block the commit");
    assert_eq!(recorded(root), ["lint"]);
}

#[test]
fn failing_unit_test_prints_test_hint_not_lint_hint() {
    let repo = create_test_repo();
    let root = repo.path();
    write_config(
        root,
        &format!(
            "[settings]\nshow_output = false\n\n[[scope]]\nname = \"web\"\npaths = [\"web/\"]\n\
             fix_hint = \"Run npm run lint:fix\"\n{}\n[scope.test_impact]\n\
             sources = [\"web/utils/\"]\ntest_suffix = \".spec.ts\"\nprogram = \"sh\"\n\
             args = [\"-c\", \"echo unit >> ran.log; exit 4\"]\n",
            record_check("lint", 0)
        ),
    );
    write_file(root, "web/utils/format.spec.ts", "test()\n");
    stage_file(root, "web/utils/format.ts", "export {}\n");

    let output = scopegate(root, &["run"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(4), "stdout:\n{stdout}");
    assert!(stdout.contains("Unit tests failed. Please fix the errors before committing."));
    assert!(!stdout.contains("Run npm run lint:fix"));
    assert_eq!(recorded(root), ["lint", "unit"]);
}

#[test]
fn check_killed_by_signal_exits_one() {
    let repo = create_test_repo();
    let root = repo.path();
    write_config(
        root,
        "[settings]\nshow_output = false\n\n[[scope]]\nname = \"api\"\npaths = [\"api/\"]\n\n\
         [[scope.checks]]\nlabel = \"crash\"\nprogram = \"sh\"\nargs = [\"-c\", \"kill -9 $$\"]\n",
    );
    stage_file(root, "api/app.py", "x = 1\n");

    let output = scopegate(root, &["run"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{stdout}");
    assert!(stdout.contains("Check 'crash' in scope 'api' failed, exit code: -1"));
}

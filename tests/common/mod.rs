//! Shared test utilities for git and dispatch integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run a git command in `dir`, panicking with its output on failure
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed:\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Creates a temporary git repository with one initial commit
pub fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    git(repo_path, &["init"]);
    git(repo_path, &["config", "user.email", "test@test.com"]);
    git(repo_path, &["config", "user.name", "Test User"]);

    fs::write(repo_path.join("README"), "initial content\n").expect("Failed to write README");
    git(repo_path, &["add", "."]);
    git(repo_path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// Write a file (creating parent directories) and stage it
pub fn stage_file(repo: &Path, rel: &str, content: &str) {
    write_file(repo, rel, content);
    git(repo, &["add", rel]);
}

pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Lines appended by `record` checks, in execution order
pub fn recorded(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join("ran.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// A `[[scope.checks]]` entry that appends `name` to ran.log and exits with `code`
pub fn record_check(name: &str, code: i32) -> String {
    format!(
        "[[scope.checks]]\nlabel = \"{name}\"\nprogram = \"sh\"\nargs = [\"-c\", \"echo {name} >> ran.log; exit {code}\"]\n"
    )
}

//! Init command implementation

use anyhow::{Result, bail};
use std::path::Path;

/// Default configuration content for scopegate init
pub const DEFAULT_CONFIG: &str = r#"# scopegate configuration
# =======================
#
# The pre-commit hook reads the staged files, triggers every scope whose
# `paths` match at least one of them, and runs that scope's checks in order.
# The first failing check aborts the commit.

# ============================================================================
# SETTINGS
# ============================================================================
#
#   show_output   - Stream check output to the terminal (default: true)
#   hook_program  - Program the installed pre-commit hook runs (default: "scopegate")

[settings]
show_output = true
hook_program = "scopegate"

# ============================================================================
# SCOPES - executed in the order they are declared
# ============================================================================
#
#   name         - Scope name shown in progress and failure output
#   paths        - Globs ("api/*.py", `*` also matches `/`) or path prefixes ("web/")
#   fix_hint     - Printed when a check in this scope aborts the commit
#
# [[scope.checks]]
#   label           - Defaults to the program name
#   program, args   - The command to run; a non-zero exit fails the commit
#   working_dir     - Relative to the repository root
#   bootstrap       - Run when `program` is not installed, e.g. to install it
#   ignore_failure  - Keep going when this check fails (auto-fix passes)
#
# [scope.test_impact]
#   For every changed file matching `sources`, the file with its extension
#   replaced by `test_suffix` is passed to the test runner. A missing test
#   file only prints a warning.

[[scope]]
name = "api"
paths = ["api/*.py"]
fix_hint = "Please run 'dev/reformat' to fix the fixable linting errors."

[[scope.checks]]
label = "ruff fix"
program = "ruff"
args = ["check", "--fix", "./api"]
bootstrap = { program = "poetry", args = ["install", "-C", "api", "--only", "lint"] }
ignore_failure = true

[[scope.checks]]
label = "ruff"
program = "ruff"
args = ["check", "--preview", "./api"]
bootstrap = { program = "poetry", args = ["install", "-C", "api", "--only", "lint"] }

[[scope]]
name = "web"
paths = ["web/"]
fix_hint = "Please run 'npm run lint -- --fix' in web/ to fix the fixable linting errors."

[[scope.checks]]
label = "lint-staged"
program = "npx"
args = ["lint-staged"]
working_dir = "web"

[scope.test_impact]
sources = ["web/utils/"]
test_suffix = ".spec.ts"
program = "npm"
args = ["run", "test"]
working_dir = "web"
"#;

/// Write the default config to `.scopegate/config.toml` under the repository root
pub fn init_command(work_dir: &Path, force: bool) -> Result<()> {
    let root = scopegate::git::find_git_root(work_dir).unwrap_or_else(|| work_dir.to_path_buf());
    let config_path = root.join(".scopegate").join("config.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    // Create parent directory (if any)
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}

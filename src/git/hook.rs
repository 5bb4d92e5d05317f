use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Line written into installed hooks so reinstalls can recognize them
pub const HOOK_MARKER: &str = "# installed by scopegate";

/// Contents of the pre-commit hook script
pub fn hook_script(program: &str) -> String {
    format!(
        "#!/bin/sh\n{}\n# Runs the checks for every scope touched by the staged files.\n\
         exec {} run\n",
        HOOK_MARKER,
        shell_quote(program)
    )
}

/// Single-quote for `sh`, so paths with spaces or quotes survive
fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Resolve the hooks directory (honours `core.hooksPath` and worktrees)
fn hooks_dir(root: &Path) -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--git-path", "hooks"])
        .current_dir(root)
        .output()
        .context("Failed to run git rev-parse --git-path")?;

    if !output.status.success() {
        bail!(
            "Not a git repository: {}\n{}",
            root.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    Ok(if dir.is_absolute() { dir } else { root.join(dir) })
}

/// Write an executable `pre-commit` hook that runs `program run`.
///
/// An existing hook is only replaced when it was installed by scopegate
/// or `force` is set.
pub fn install_hook(root: &Path, program: &str, force: bool) -> Result<PathBuf> {
    let dir = hooks_dir(root)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create hooks directory: {}", dir.display()))?;

    let hook_path = dir.join("pre-commit");
    if hook_path.exists() && !force {
        let existing = std::fs::read_to_string(&hook_path).unwrap_or_default();
        if !existing.contains(HOOK_MARKER) {
            bail!(
                "A pre-commit hook already exists: {}\nUse --force to overwrite.",
                hook_path.display()
            );
        }
    }

    std::fs::write(&hook_path, hook_script(program))
        .with_context(|| format!("Failed to write hook: {}", hook_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&hook_path, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make hook executable: {}", hook_path.display()))?;
    }

    tracing::debug!("Installed hook at {}", hook_path.display());
    Ok(hook_path)
}

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{CommitChangeSet, DispatchError};

/// Top-level directory of the checkout containing `path` (file or directory).
/// `None` outside a repository or when git is unavailable.
pub fn find_git_root(path: &Path) -> Option<PathBuf> {
    let dir = match path.is_file() {
        true => path.parent()?,
        false => path,
    };

    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let toplevel = String::from_utf8_lossy(&output.stdout);
    Some(toplevel.trim())
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

/// Read the paths staged in the index, relative to the repository root
pub fn staged_files(root: &Path) -> Result<CommitChangeSet, DispatchError> {
    let output = Command::new("git")
        .args(["diff", "--cached", "--name-only", "-z"])
        .current_dir(root)
        .output()
        .map_err(|e| DispatchError::Classification(format!("failed to run git: {}", e)))?;

    if !output.status.success() {
        return Err(DispatchError::Classification(format!(
            "git diff --cached failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let paths = parse_null_delimited(&output.stdout);
    tracing::debug!("{} staged file(s)", paths.len());
    Ok(CommitChangeSet::from_paths(paths))
}

/// Parse NUL-delimited output from git commands
fn parse_null_delimited(output: &[u8]) -> Vec<String> {
    output
        .split(|&b| b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_null_delimited_skips_empty_entries() {
        let parsed = parse_null_delimited(b"api/app.py\0web/a b.ts\0\0");
        assert_eq!(parsed, ["api/app.py", "web/a b.ts"]);
    }

    #[test]
    fn parse_null_delimited_empty() {
        assert!(parse_null_delimited(b"").is_empty());
    }
}

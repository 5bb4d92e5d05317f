//! CLI command implementations

pub mod classify;
pub mod init;
pub mod install;
pub mod run;

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use scopegate::CommitChangeSet;
use scopegate::git::{find_git_root, staged_files};

/// Repository root for `work_dir`. Explicit file lists work outside git.
fn repo_root(work_dir: &Path, explicit_files: bool) -> Result<PathBuf> {
    if let Some(root) = find_git_root(work_dir) {
        return Ok(root);
    }
    if explicit_files {
        return Ok(std::path::absolute(work_dir)?);
    }
    bail!("Not a git repository: {}", work_dir.display())
}

/// The explicit `--files` list, or the staged files
fn change_set(root: &Path, files: Option<Vec<String>>) -> Result<CommitChangeSet> {
    match files {
        Some(files) => Ok(CommitChangeSet::from_paths(files)),
        None => Ok(staged_files(root)?),
    }
}

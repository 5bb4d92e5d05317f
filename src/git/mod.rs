//! Git operations: staged files and hook installation

mod hook;
mod staged;

pub use hook::{HOOK_MARKER, hook_script, install_hook};
pub use staged::{find_git_root, staged_files};

//! Install command implementation

use anyhow::{Result, bail};
use std::path::Path;

use scopegate::config::Config;
use scopegate::git::{find_git_root, install_hook};

/// Install the pre-commit hook into the repository containing `work_dir`
pub fn install_command(work_dir: &Path, config_path: Option<&Path>, force: bool) -> Result<()> {
    let Some(root) = find_git_root(work_dir) else {
        bail!("Not a git repository: {}", work_dir.display());
    };

    let config = Config::load(&root, config_path)?;
    // Refuse to install a hook that would fail on every commit
    config.rules()?;

    let hook = install_hook(&root, &config.settings.hook_program, force)?;
    println!("Installed: {}", hook.display());

    Ok(())
}

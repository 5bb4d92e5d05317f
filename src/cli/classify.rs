//! Classify command implementation

use anyhow::Result;
use std::path::Path;

use scopegate::config::Config;
use scopegate::dispatch::classify;

/// Print the scopes the change set triggers, without running any check
pub fn classify_command(
    work_dir: &Path,
    config_path: Option<&Path>,
    files: Option<Vec<String>>,
    json: bool,
) -> Result<()> {
    let root = super::repo_root(work_dir, files.is_some())?;
    let config = Config::load(&root, config_path)?;
    let rules = config.rules()?;
    let change_set = super::change_set(&root, files)?;

    let triggered = classify(&change_set, &rules);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "files": change_set.paths(),
                "scopes": triggered,
            }))?
        );
        return Ok(());
    }

    if triggered.is_empty() {
        println!("No scopes triggered by {} file(s).", change_set.len());
        return Ok(());
    }

    for name in &triggered {
        println!("{}", name);
    }

    Ok(())
}

//! Settings configuration types

use serde::{Deserialize, Serialize};

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Stream check output to the terminal (disable for quiet hooks)
    #[serde(default = "default_show_output")]
    pub show_output: bool,

    /// Program the installed pre-commit hook execs
    #[serde(default = "default_hook_program")]
    pub hook_program: String,
}

fn default_show_output() -> bool {
    true
}

fn default_hook_program() -> String {
    "scopegate".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_output: default_show_output(),
            hook_program: default_hook_program(),
        }
    }
}

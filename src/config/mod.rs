//! Configuration loading and management

mod scope;
mod settings;

pub use scope::{CheckConfig, ScopeConfig, TestImpactConfig};
pub use settings::Settings;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{DispatchError, Invocation, ScopeRule};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,

    /// Scope rules, in execution order
    #[serde(default)]
    pub scope: Vec<ScopeConfig>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Project config locations, most specific first
    pub fn project_paths(root: &Path) -> [PathBuf; 2] {
        [root.join(".scopegate/config.toml"), root.join("scopegate.toml")]
    }

    /// Global config at ~/.scopegate/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".scopegate").join("config.toml"))
    }

    /// Load configuration for a repository
    /// Looks for: .scopegate/config.toml, scopegate.toml, ~/.scopegate/config.toml,
    /// then falls back to the built-in defaults
    pub fn from_dir(root: &Path) -> Result<Self> {
        for path in Self::project_paths(root) {
            if path.exists() {
                tracing::debug!("Using config {}", path.display());
                return Self::from_file(&path);
            }
        }

        if let Some(global) = Self::global_config_path().filter(|p| p.exists()) {
            tracing::debug!("Using global config {}", global.display());
            return Self::from_file(&global);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::with_defaults())
    }

    /// Explicit path wins, otherwise look up from the repository root
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::from_dir(root),
        }
    }

    /// Validate every scope and build the rule table
    pub fn rules(&self) -> Result<Vec<ScopeRule>, DispatchError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(self.scope.len());

        for scope in &self.scope {
            if !seen.insert(scope.name.as_str()) {
                return Err(DispatchError::Configuration(format!(
                    "duplicate scope name '{}'",
                    scope.name
                )));
            }
            rules.push(scope.to_rule()?);
        }

        Ok(rules)
    }

    /// Create a config with sensible defaults: a Python `api/` module linted
    /// with Ruff and a `web/` frontend linted with lint-staged, whose
    /// `web/utils` files must pass their `.spec.ts` unit tests
    pub fn with_defaults() -> Self {
        let api = ScopeConfig {
            name: "api".to_string(),
            paths: vec!["api/*.py".to_string()],
            fix_hint: Some(
                "Please run 'dev/reformat' to fix the fixable linting errors.".to_string(),
            ),
            checks: vec![
                CheckConfig {
                    label: Some("ruff fix".to_string()),
                    program: "ruff".to_string(),
                    args: vec!["check".to_string(), "--fix".to_string(), "./api".to_string()],
                    working_dir: None,
                    bootstrap: Some(ruff_bootstrap()),
                    ignore_failure: true,
                },
                CheckConfig {
                    label: Some("ruff".to_string()),
                    program: "ruff".to_string(),
                    args: vec!["check".to_string(), "--preview".to_string(), "./api".to_string()],
                    working_dir: None,
                    bootstrap: Some(ruff_bootstrap()),
                    ignore_failure: false,
                },
            ],
            test_impact: None,
        };

        let web = ScopeConfig {
            name: "web".to_string(),
            paths: vec!["web/".to_string()],
            fix_hint: Some(
                "Please run 'npm run lint -- --fix' in web/ to fix the fixable linting errors.".to_string(),
            ),
            checks: vec![CheckConfig {
                label: Some("lint-staged".to_string()),
                program: "npx".to_string(),
                args: vec!["lint-staged".to_string()],
                working_dir: Some(PathBuf::from("web")),
                bootstrap: None,
                ignore_failure: false,
            }],
            test_impact: Some(TestImpactConfig {
                sources: vec!["web/utils/".to_string()],
                test_suffix: ".spec.ts".to_string(),
                program: "npm".to_string(),
                args: vec!["run".to_string(), "test".to_string()],
                working_dir: Some(PathBuf::from("web")),
            }),
        };

        Self {
            settings: Settings::default(),
            scope: vec![api, web],
        }
    }
}

fn ruff_bootstrap() -> Invocation {
    Invocation::new("poetry", ["install", "-C", "api", "--only", "lint"])
}

//! Error types for classification and dispatch

use std::path::PathBuf;

/// Fatal errors that stop a dispatch run before or between checks.
///
/// A check that runs and exits non-zero is not an error: it is reported
/// through [`crate::DispatchResult::first_failure`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The change set could not be read (e.g. git failed)
    #[error("Failed to read staged changes: {0}")]
    Classification(String),

    /// The rule table is invalid or a check cannot be started
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A check program could not be found on PATH or relative to its directory
    #[error("Configuration error: check '{label}' cannot resolve program '{program}'")]
    UnresolvedProgram { label: String, program: String },

    /// A check's working directory does not exist
    #[error("Configuration error: check '{label}' working directory not found: {}", .path.display())]
    MissingWorkingDir { label: String, path: PathBuf },

    /// The program resolved but could not be spawned
    #[error("Configuration error: failed to start '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DispatchError {
    /// True for every variant except [`DispatchError::Classification`]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, DispatchError::Classification(_))
    }
}

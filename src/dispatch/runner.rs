//! Check runner trait and the process-backed implementation

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::DispatchError;

/// Exit status of a finished check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl StepStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code for reporting; signal deaths are `-1`
    pub fn reported_code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }
}

/// Trait for anything that can resolve and run check programs
#[async_trait]
pub trait CheckRunner: Send + Sync {
    /// Locate `program` on PATH, or relative to `cwd` when it contains a separator
    fn resolve(&self, program: &str, cwd: &Path) -> Option<PathBuf>;

    /// Run a resolved program to completion
    ///
    /// # Arguments
    /// * `program` - Path returned by [`CheckRunner::resolve`]
    /// * `args` - Argument list, passed verbatim
    /// * `cwd` - Working directory of the child process only
    async fn execute(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> Result<StepStatus, DispatchError>;
}

/// Runs checks as child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Inherit the child's stdout/stderr (otherwise discarded)
    show_output: bool,
}

impl ProcessRunner {
    pub fn new(show_output: bool) -> Self {
        Self { show_output }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl CheckRunner for ProcessRunner {
    fn resolve(&self, program: &str, cwd: &Path) -> Option<PathBuf> {
        match which::which_in(program, std::env::var_os("PATH"), cwd) {
            Ok(path) => {
                tracing::debug!("Resolved {} -> {}", program, path.display());
                Some(path)
            }
            Err(e) => {
                tracing::debug!("Cannot resolve {}: {}", program, e);
                None
            }
        }
    }

    async fn execute(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> Result<StepStatus, DispatchError> {
        let (stdout, stderr) = if self.show_output {
            (Stdio::inherit(), Stdio::inherit())
        } else {
            (Stdio::null(), Stdio::null())
        };

        tracing::debug!(
            "Running {} {:?} in {}",
            program.display(),
            args,
            cwd.display()
        );

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .await
            .map_err(|source| DispatchError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        Ok(StepStatus {
            code: status.code(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_reports_exit_code() {
        let runner = ProcessRunner::new(false);
        let cwd = std::env::temp_dir();
        let sh = runner.resolve("sh", &cwd).expect("sh on PATH");

        let ok = runner
            .execute(&sh, &["-c".to_string(), "exit 0".to_string()], &cwd)
            .await
            .unwrap();
        assert!(ok.success());

        let failed = runner
            .execute(&sh, &["-c".to_string(), "exit 7".to_string()], &cwd)
            .await
            .unwrap();
        assert!(!failed.success());
        assert_eq!(failed.reported_code(), 7);
    }

    #[tokio::test]
    async fn execute_killed_by_signal_has_no_code() {
        let runner = ProcessRunner::new(false);
        let cwd = std::env::temp_dir();
        let sh = runner.resolve("sh", &cwd).expect("sh on PATH");

        let killed = runner
            .execute(&sh, &["-c".to_string(), "kill -9 $$".to_string()], &cwd)
            .await
            .unwrap();
        assert_eq!(killed.code, None);
        assert!(!killed.success());
        assert_eq!(killed.reported_code(), -1);
    }

    #[test]
    fn resolve_missing_program() {
        let runner = ProcessRunner::default();
        assert!(
            runner
                .resolve("scopegate-no-such-tool-xyz", &std::env::temp_dir())
                .is_none()
        );
    }

    #[tokio::test]
    async fn execute_missing_binary_is_spawn_error() {
        let runner = ProcessRunner::new(false);
        let err = runner
            .execute(
                Path::new("/nonexistent/scopegate-tool"),
                &[],
                &std::env::temp_dir(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Spawn { .. }));
        assert!(err.is_configuration());
    }
}

//! Shell execution inside the sandbox directory.
//!
//! Commands run through the platform interpreter. Failures never
//! propagate: a command that cannot be started yields an `Error: ...`
//! payload that is fed back to the model like any other output.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tracing::{debug, warn};

/// Capability to run one command line and capture its text output.
#[async_trait]
pub(crate) trait ShellExecutor: Send + Sync {
    /// Runs `command` and returns stdout followed by stderr.
    async fn execute(&self, command: &str) -> String;
}

/// Runs commands via `sh -c` (or `cmd /C`) in a fixed working directory.
#[derive(Debug, Clone)]
pub(crate) struct SandboxShell {
    dir: PathBuf,
}

impl SandboxShell {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn command(&self, command: &str) -> tokio::process::Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = tokio::process::Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = tokio::process::Command::new("sh");
            cmd.arg("-c");
            cmd
        };
        cmd.arg(command)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl ShellExecutor for SandboxShell {
    async fn execute(&self, command: &str) -> String {
        debug!("Running in {}: {}", self.dir.display(), command);

        match self.command(command).output().await {
            Ok(output) => {
                debug!(exit_code = ?output.status.code(), "Command finished");
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                text
            }
            Err(e) => {
                warn!("Failed to run command: {}", e);
                format!("Error: {e}")
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_stdout_is_captured() {
        let dir = tempdir().unwrap();
        let shell = SandboxShell::new(dir.path());
        assert_eq!(shell.execute("echo hello").await, "hello\n");
    }

    #[tokio::test]
    async fn test_stderr_follows_stdout_on_failure() {
        let dir = tempdir().unwrap();
        let shell = SandboxShell::new(dir.path());
        let output = shell
            .execute("printf 'partial'; printf 'boom' >&2; exit 3")
            .await;
        assert_eq!(output, "partialboom");
    }

    #[tokio::test]
    async fn test_nonzero_exit_without_output_is_empty() {
        let dir = tempdir().unwrap();
        let shell = SandboxShell::new(dir.path());
        assert_eq!(shell.execute("false").await, "");
    }

    #[tokio::test]
    async fn test_runs_in_sandbox_directory() {
        let dir = tempdir().unwrap();
        let shell = SandboxShell::new(dir.path());

        let output = shell.execute("echo \"hi\" > x.txt").await;

        assert_eq!(output, "");
        let content = std::fs::read_to_string(dir.path().join("x.txt")).unwrap();
        assert_eq!(content, "hi\n");
    }

    #[tokio::test]
    async fn test_missing_working_directory_becomes_error_text() {
        let dir = tempdir().unwrap();
        let shell = SandboxShell::new(dir.path().join("does-not-exist"));
        let output = shell.execute("echo hello").await;
        assert!(output.starts_with("Error: "), "got {output:?}");
    }

    #[tokio::test]
    async fn test_unknown_program_reports_through_stderr() {
        let dir = tempdir().unwrap();
        let shell = SandboxShell::new(dir.path());
        let output = shell.execute("definitely-not-a-real-binary-xyz").await;
        assert!(!output.is_empty());
        assert!(!output.starts_with("Error: "));
    }
}

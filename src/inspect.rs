//! Directory tree listing for the prompt.
//!
//! Prefers `tree`, falls back to `ls -R` when `tree` is missing or fails.

use std::path::Path;
use tracing::debug;

/// Errors from listing the sandbox directory.
#[derive(Debug, thiserror::Error)]
pub(crate) enum InspectError {
    /// The listing program could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The listing program ran but reported failure.
    #[error("'{program}' exited with code {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// One listing strategy: a program and the arguments placed before the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListingTool {
    program: String,
    args: Vec<String>,
}

impl ListingTool {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    async fn list(&self, dir: &Path) -> Result<String, InspectError> {
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(dir)
            .output()
            .await
            .map_err(|source| InspectError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InspectError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Lists a directory with a preferred tool and a fallback.
#[derive(Debug, Clone)]
pub(crate) struct TreeInspector {
    primary: ListingTool,
    fallback: ListingTool,
}

impl Default for TreeInspector {
    fn default() -> Self {
        Self::new(ListingTool::new("tree", &[]), ListingTool::new("ls", &["-R"]))
    }
}

impl TreeInspector {
    pub fn new(primary: ListingTool, fallback: ListingTool) -> Self {
        Self { primary, fallback }
    }

    /// Returns the listing text, or the fallback's error if both tools fail.
    pub async fn folder_tree(&self, dir: &Path) -> Result<String, InspectError> {
        match self.primary.list(dir).await {
            Ok(tree) => Ok(tree),
            Err(e) => {
                debug!("Primary listing failed ({}), falling back", e);
                self.fallback.list(dir).await
            }
        }
    }
}

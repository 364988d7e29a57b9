//! Shell Command Adapter
//!
//! Implements the `CommandRunner` port by running commands through `sh -c`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::domain::ports::CommandRunner;
use crate::error::{Error, Result};

/// Runs commands in a shell, killing them when the timeout expires.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    #[instrument(skip(self))]
    async fn run(&self, command: &str, timeout: Duration) -> Result<()> {
        debug!("Running command: {}", command);

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::MountFailed {
                command: command.to_string(),
                code: None,
                output: format!("failed to spawn {}: {}", self.shell, e),
            })?;

        // Dropping the wait future on expiry drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!("Command timed out after {:?}: {}", timeout, command);
                return Err(Error::MountTimeout {
                    command: command.to_string(),
                    timeout,
                });
            }
        };

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };

        Err(Error::MountFailed {
            command: command.to_string(),
            code: output.status.code(),
            output: detail,
        })
    }
}

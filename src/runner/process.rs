use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{DashboardError, Result};
use crate::runner::CommandRunner;

/// Runs commands as local child processes, capturing stdout and stderr.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn process_output(
        program: &str,
        result: std::result::Result<std::process::Output, std::io::Error>,
    ) -> Result<String> {
        match result {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if output.status.success() {
                    return Ok(stdout);
                }

                let message = match output.status.code() {
                    Some(code) => format!("'{}' returned non-zero exit status {}", program, code),
                    None => format!("'{}' was terminated by a signal", program),
                };
                tracing::warn!(program, exit_code = ?output.status.code(), "Command failed");
                Err(DashboardError::retrieval(message, Some(stderr)))
            }
            Err(e) => {
                tracing::error!(program, error = %e, "Failed to spawn command");
                Err(DashboardError::retrieval(
                    format!("Failed to run '{}': {}", program, e),
                    None,
                ))
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        tracing::debug!(program, ?args, "Running command");

        let result = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        Self::process_output(program, result)
    }
}

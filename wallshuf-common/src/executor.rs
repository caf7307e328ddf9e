use std::process::Command;

use crate::error::StoreError;
use crate::Result;

/// Captured output of a store tool invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Runs `cmd` once. Failing to start it or a non-zero exit both mean the
    /// store could not be reached.
    pub fn run(tool: &str, cmd: &mut Command) -> Result<CommandOutput> {
        log::debug!("Executing store command: {:?}", cmd);

        let output = cmd.output().map_err(|e| StoreError::Unavailable {
            tool: tool.to_string(),
            reason: format!("failed to run {:?}: {}", cmd.get_program(), e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            log::error!(
                "{} failed with exit code {}: {}",
                tool,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            );

            let reason = if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(StoreError::Unavailable {
                tool: tool.to_string(),
                reason,
            }
            .into());
        }

        if !stderr.is_empty() {
            log::debug!("{} stderr: {}", tool, stderr.trim());
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

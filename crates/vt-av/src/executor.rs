//! The [`Executor`] trait and its process-spawning implementation.

use std::process::{Command, Stdio};

use crate::command::{ToolCommand, ToolOutput};

/// Runs [`ToolCommand`]s and captures their exit status and output.
///
/// A non-zero exit is not an error: callers inspect
/// [`ToolOutput::exit_code`] themselves. Only a process that cannot be
/// started at all produces an `Err`.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
pub trait Executor: Send + Sync {
    /// Human-readable name identifying this executor implementation.
    fn name(&self) -> &'static str;

    /// Run `command` to completion, blocking the caller.
    fn run(&self, command: &ToolCommand) -> vt_core::Result<ToolOutput>;
}

/// Spawns real child processes via [`std::process::Command`].
///
/// Arguments are passed straight to the child as argv entries; no shell is
/// involved. Stdin is closed so the engine can never block on a prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SystemExecutor {
    fn name(&self) -> &'static str {
        "system"
    }

    fn run(&self, command: &ToolCommand) -> vt_core::Result<ToolOutput> {
        let program_name = command.program_name();
        tracing::debug!(command = %command.render(), "spawning");

        let output = Command::new(command.program())
            .args(command.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| vt_core::Error::tool(program_name.clone(), format!("failed to spawn: {e}")))?;

        let tool_output = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        tracing::debug!(
            tool = %program_name,
            exit_code = ?tool_output.exit_code,
            "process exited"
        );

        Ok(tool_output)
    }
}

//! Builder describing one external tool invocation.
//!
//! A [`ToolCommand`] is plain data: a program plus discrete arguments. It is
//! handed to an [`Executor`](crate::Executor) to run, and rendered with
//! [`ToolCommand::render`] (every word shell-quoted) when it is logged.

use std::path::{Path, PathBuf};

use crate::escape::shell_quote;

/// Output captured from a tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Process exit code; `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Combined diagnostic text: stderr first (ffmpeg logs there), then
    /// stdout, trimmed.
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        match (stderr.is_empty(), stdout.is_empty()) {
            (false, false) => format!("{stderr}\n{stdout}"),
            (false, true) => stderr.to_string(),
            (true, false) => stdout.to_string(),
            (true, true) => String::new(),
        }
    }
}

/// A builder for constructing external tool invocations.
///
/// # Example
///
/// ```
/// use vt_av::ToolCommand;
/// use std::path::PathBuf;
///
/// let mut cmd = ToolCommand::new(PathBuf::from("ffmpeg"));
/// cmd.args(["-y", "-i"]).path("/media/my clip.mp4");
/// assert_eq!(cmd.render(), "ffmpeg -y -i '/media/my clip.mp4'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Append a filesystem path as a single argument.
    pub fn path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.args
            .push(path.as_ref().to_string_lossy().into_owned());
        self
    }

    /// The program to run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Short program name used in logs and errors.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// The arguments, in order.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Whether `flag` is immediately followed by `value` in the arguments.
    pub fn has_pair(&self, flag: &str, value: &str) -> bool {
        self.args
            .windows(2)
            .any(|w| w[0] == flag && w[1] == value)
    }

    /// The argument following the first occurrence of `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Render the command as a copy-pasteable shell line.
    pub fn render(&self) -> String {
        let program = self.program.to_string_lossy();
        std::iter::once(shell_quote(&program))
            .chain(self.args.iter().map(|a| shell_quote(a)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

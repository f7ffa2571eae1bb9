//! Media operations: trim, thumbnail, audio extraction, merge, watermark,
//! and resize.
//!
//! Every operation is a method on [`MediaTools`], which holds the injected
//! [`Executor`], the resolved ffmpeg path, the encoding profile, and the temp
//! root. Operations block until the engine exits and report a single
//! [`OperationResult`]; engine failures never surface as `Err`.

mod audio;
mod merge;
mod resize;
mod thumbnail;
mod trim;
mod watermark;

pub use watermark::WatermarkOptions;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use vt_core::config::{Config, EncodingConfig};

use crate::command::{ToolCommand, ToolOutput};
use crate::executor::{Executor, SystemExecutor};
use crate::tools::ToolRegistry;

/// Outcome of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    /// Operation name, e.g. `"trim"`.
    pub operation: &'static str,
    pub success: bool,
    /// The caller-supplied output path.
    pub output: PathBuf,
    /// Exit code of the last engine run, if one ran to completion.
    pub exit_code: Option<i32>,
    /// Captured engine output or a precondition message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl OperationResult {
    pub(crate) fn succeeded(operation: &'static str, output: &Path, exit_code: Option<i32>) -> Self {
        Self {
            operation,
            success: true,
            output: output.to_path_buf(),
            exit_code,
            diagnostics: None,
        }
    }

    pub(crate) fn failed(
        operation: &'static str,
        output: &Path,
        exit_code: Option<i32>,
        diagnostics: impl Into<String>,
    ) -> Self {
        let diagnostics = diagnostics.into();
        Self {
            operation,
            success: false,
            output: output.to_path_buf(),
            exit_code,
            diagnostics: (!diagnostics.is_empty()).then_some(diagnostics),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// What an operation requires of its output file beyond a zero exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputCheck {
    ExitStatus,
    NonEmpty,
}

impl OutputCheck {
    fn satisfied(self, path: &Path) -> bool {
        match self {
            OutputCheck::ExitStatus => true,
            OutputCheck::NonEmpty => std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false),
        }
    }
}

/// Remembers whether an output path existed before the engine ran, so a
/// failed run only removes files it created itself.
#[derive(Debug)]
pub(crate) struct OutputGuard<'a> {
    path: &'a Path,
    existed: bool,
}

impl<'a> OutputGuard<'a> {
    pub(crate) fn new(path: &'a Path) -> Self {
        Self {
            path,
            existed: path.exists(),
        }
    }

    pub(crate) fn discard_partial(&self) {
        if self.existed || !self.path.exists() {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed partial output"),
            Err(e) => tracing::warn!("failed to remove partial output {}: {e}", self.path.display()),
        }
    }
}

/// Entry point for all media operations.
#[derive(Clone)]
pub struct MediaTools {
    executor: Arc<dyn Executor>,
    ffmpeg: PathBuf,
    encoding: EncodingConfig,
    temp_root: PathBuf,
}

impl std::fmt::Debug for MediaTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaTools")
            .field("executor", &self.executor.name())
            .field("ffmpeg", &self.ffmpeg)
            .field("encoding", &self.encoding)
            .field("temp_root", &self.temp_root)
            .finish()
    }
}

impl MediaTools {
    /// Create operations running `ffmpeg` through `executor`, with the
    /// default encoding profile and the platform temp directory.
    pub fn new(executor: Arc<dyn Executor>, ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            ffmpeg: ffmpeg.into(),
            encoding: EncodingConfig::default(),
            temp_root: std::env::temp_dir(),
        }
    }

    /// Build from configuration, resolving ffmpeg through `tools` and
    /// spawning real processes.
    pub fn from_config(config: &Config, tools: &ToolRegistry) -> vt_core::Result<Self> {
        let ffmpeg = tools.require("ffmpeg")?;
        Ok(Self::new(Arc::new(SystemExecutor::new()), ffmpeg.path.clone())
            .with_encoding(config.encoding.clone())
            .with_temp_root(config.workspace.temp_root()))
    }

    pub fn with_encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    pub fn encoding(&self) -> &EncodingConfig {
        &self.encoding
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    /// A new ffmpeg invocation that overwrites its output without asking.
    fn ffmpeg_command(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffmpeg.clone());
        cmd.args(["-hide_banner", "-y"]);
        cmd
    }

    /// `-c:v <codec> -crf <n> -preset <p>` from the encoding profile.
    fn video_profile(&self, cmd: &mut ToolCommand) {
        let e = &self.encoding;
        cmd.args(["-c:v", e.video_codec.as_str()])
            .args(["-crf", e.crf.to_string().as_str()])
            .args(["-preset", e.preset.as_str()]);
    }

    fn run_engine(&self, operation: &'static str, cmd: &ToolCommand) -> vt_core::Result<ToolOutput> {
        tracing::debug!(operation, command = %cmd.render(), "running engine");
        self.executor.run(cmd)
    }

    /// Run `cmd` and turn its outcome into an [`OperationResult`], removing
    /// partial output on failure.
    fn execute(
        &self,
        operation: &'static str,
        cmd: &ToolCommand,
        output: &Path,
        check: OutputCheck,
    ) -> OperationResult {
        let guard = OutputGuard::new(output);
        let run = self.run_engine(operation, cmd);
        let result = conclude(operation, output, run, check);
        if !result.success {
            guard.discard_partial();
        }
        result
    }
}

/// Interpret an engine run against the operation's output check.
fn conclude(
    operation: &'static str,
    output: &Path,
    run: vt_core::Result<ToolOutput>,
    check: OutputCheck,
) -> OperationResult {
    let out = match run {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(operation, "engine could not be started: {e}");
            return OperationResult::failed(operation, output, None, e.to_string());
        }
    };

    if !out.success() {
        tracing::warn!(
            operation,
            exit_code = ?out.exit_code,
            "engine failed: {}",
            out.diagnostics()
        );
        return OperationResult::failed(operation, output, out.exit_code, out.diagnostics());
    }

    if !check.satisfied(output) {
        tracing::warn!(operation, output = %output.display(), "engine exited 0 but output is missing or empty");
        let message = format!("output {} is missing or empty", output.display());
        return OperationResult::failed(operation, output, out.exit_code, message);
    }

    tracing::info!(operation, output = %output.display(), "operation complete");
    OperationResult::succeeded(operation, output, out.exit_code)
}

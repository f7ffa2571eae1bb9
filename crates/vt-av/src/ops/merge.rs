//! Concatenation of heterogeneous clips.
//!
//! Inputs are first transcoded one by one to the shared encoding profile,
//! then joined with the concat demuxer using stream copy. All intermediate
//! files live in a [`Workspace`] and are removed on every exit path.

use std::io::Write;
use std::path::{Path, PathBuf};

use vt_core::{Error, Result};

use crate::escape::concat_entry;
use crate::workspace::Workspace;

use super::{conclude, MediaTools, OperationResult, OutputCheck, OutputGuard};

const OPERATION: &str = "merge";

impl MediaTools {
    /// Join `inputs` in order into `output`.
    ///
    /// - No inputs: a failed result, nothing touched.
    /// - One input: copied byte for byte.
    /// - Otherwise: normalize each input, then concatenate.
    ///
    /// Every input is checked before any work starts; a missing one is the
    /// only condition reported as `Err` ([`Error::FileNotFound`]). Engine or
    /// filesystem failures yield a failed result.
    pub fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<OperationResult> {
        if inputs.is_empty() {
            tracing::warn!("merge called without inputs");
            return Ok(OperationResult::failed(OPERATION, output, None, "no inputs to merge"));
        }

        if let Some(missing) = inputs.iter().find(|p| !p.exists()) {
            return Err(Error::file_not_found(missing));
        }

        if let [single] = inputs {
            return Ok(copy_single(single, output));
        }

        tracing::info!(inputs = inputs.len(), output = %output.display(), "merge");

        let guard = OutputGuard::new(output);
        let mut workspace = Workspace::new(&self.temp_root);
        let result = self
            .normalize_and_join(&mut workspace, inputs, output)
            .unwrap_or_else(|e| {
                tracing::warn!("merge staging failed: {e}");
                OperationResult::failed(OPERATION, output, None, e.to_string())
            });

        if let Err(e) = workspace.release_all() {
            tracing::warn!("merge cleanup incomplete: {e}");
        }
        if !result.success {
            guard.discard_partial();
        }
        Ok(result)
    }

    fn normalize_and_join(
        &self,
        workspace: &mut Workspace,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<OperationResult> {
        let mut normalized = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            let target = workspace.create_temp("normalized_", ".mp4")?;
            tracing::debug!(index, input = %input.display(), "normalizing");

            let cmd = self.normalize_command(input, &target);
            let run = self.run_engine(OPERATION, &cmd);
            let staged = conclude(OPERATION, &target, run, OutputCheck::NonEmpty);
            if !staged.success {
                return Ok(OperationResult {
                    output: output.to_path_buf(),
                    ..staged
                });
            }
            normalized.push(target);
        }

        let list = workspace.create_temp("ffmpeg_merge_", ".txt")?;
        write_concat_list(&list, &normalized)?;

        let mut cmd = self.ffmpeg_command();
        cmd.args(["-f", "concat", "-safe", "0", "-i"])
            .path(&list)
            .args(["-c", "copy"])
            .path(output);

        let run = self.run_engine(OPERATION, &cmd);
        Ok(conclude(OPERATION, output, run, OutputCheck::NonEmpty))
    }

    /// Transcode one input to the canonical profile so the join can
    /// stream-copy.
    fn normalize_command(&self, input: &Path, target: &Path) -> crate::ToolCommand {
        let e = &self.encoding;
        let mut cmd = self.ffmpeg_command();
        cmd.arg("-i").path(input);
        cmd.args(["-c:v", e.video_codec.as_str()])
            .args(["-r", e.frame_rate.to_string().as_str()])
            .args(["-crf", e.crf.to_string().as_str()])
            .args(["-preset", e.preset.as_str()])
            .args(["-c:a", e.audio_codec.as_str()])
            .args(["-b:a", e.audio_bitrate.as_str()])
            .args(["-ar", e.sample_rate.to_string().as_str()])
            .args(["-ac", e.channels.to_string().as_str()])
            .args(["-avoid_negative_ts", "make_zero"])
            .path(target);
        cmd
    }
}

fn write_concat_list(list: &Path, entries: &[PathBuf]) -> Result<()> {
    let mut file = std::fs::File::create(list)?;
    for entry in entries {
        writeln!(file, "{}", concat_entry(entry)?)?;
    }
    file.sync_all()?;
    Ok(())
}

fn copy_single(input: &Path, output: &Path) -> OperationResult {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return OperationResult::succeeded(OPERATION, output, None);
    }

    match std::fs::copy(input, output) {
        Ok(bytes) => {
            tracing::info!(bytes, output = %output.display(), "single input copied");
            OperationResult::succeeded(OPERATION, output, None)
        }
        Err(e) => {
            tracing::warn!("copy of {} failed: {e}", input.display());
            OperationResult::failed(OPERATION, output, None, e.to_string())
        }
    }
}

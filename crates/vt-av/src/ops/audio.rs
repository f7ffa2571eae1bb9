//! Audio track extraction.

use std::path::Path;

use vt_core::AudioFormat;

use super::{MediaTools, OperationResult, OutputCheck};

impl MediaTools {
    /// Write the audio of `input` to `output` encoded as `format`, dropping
    /// the video.
    ///
    /// Succeeds when ffmpeg exits 0 and `output` is non-empty.
    pub fn extract_audio(&self, input: &Path, output: &Path, format: AudioFormat) -> OperationResult {
        tracing::info!(input = %input.display(), %format, "extract audio");

        let mut cmd = self.ffmpeg_command();
        cmd.arg("-i")
            .path(input)
            .arg("-vn")
            .args(["-c:a", format.codec()])
            .path(output);

        self.execute("extract_audio", &cmd, output, OutputCheck::NonEmpty)
    }
}

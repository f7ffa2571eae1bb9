//! Single-frame extraction.

use std::path::{Path, PathBuf};

use vt_core::parse_duration;

use super::MediaTools;

impl MediaTools {
    /// Save the frame at `time` (default `"1"`) of `input` as an image.
    ///
    /// Returns `output` whether or not the engine produced it; callers that
    /// care check the file themselves. Failures are logged.
    pub fn thumbnail(&self, input: &Path, output: &Path, time: Option<&str>) -> PathBuf {
        let seconds = parse_duration(time.unwrap_or("1"));
        tracing::info!(input = %input.display(), seconds, "thumbnail");

        let mut cmd = self.ffmpeg_command();
        cmd.args(["-ss", seconds.to_string().as_str()])
            .arg("-i")
            .path(input)
            .args(["-frames:v", "1"])
            .path(output);

        match self.run_engine("thumbnail", &cmd) {
            Ok(out) if out.success() => {
                tracing::info!(output = %output.display(), "thumbnail written");
            }
            Ok(out) => {
                tracing::warn!(exit_code = ?out.exit_code, "thumbnail failed: {}", out.diagnostics());
            }
            Err(e) => tracing::warn!("thumbnail failed: {e}"),
        }

        output.to_path_buf()
    }
}

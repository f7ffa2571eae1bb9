//! Cut a clip out of a video and re-encode it.

use std::path::Path;

use vt_core::parse_duration;

use super::{MediaTools, OperationResult, OutputCheck};

impl MediaTools {
    /// Save the `[start, start + duration)` window of `input` to `output`.
    ///
    /// Both times accept `ss`, `mm:ss` or `hh:mm:ss` and are parsed
    /// leniently. The clip is re-encoded with the configured video and audio
    /// codecs. Succeeds when ffmpeg exits 0 and `output` is non-empty.
    pub fn trim(&self, input: &Path, output: &Path, start: &str, duration: &str) -> OperationResult {
        let start_s = parse_duration(start);
        let duration_s = parse_duration(duration);
        tracing::info!(
            input = %input.display(),
            start = start_s,
            duration = duration_s,
            "trim"
        );

        let mut cmd = self.ffmpeg_command();
        cmd.args(["-ss", start_s.to_string().as_str()])
            .arg("-i")
            .path(input)
            .args(["-t", duration_s.to_string().as_str()]);
        self.video_profile(&mut cmd);
        cmd.args(["-c:a", self.encoding.audio_codec.as_str()])
            .path(output);

        self.execute("trim", &cmd, output, OutputCheck::NonEmpty)
    }
}

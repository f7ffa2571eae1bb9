//! ffprobe-backed inspection of media files.
//!
//! Runs `ffprobe -v quiet -print_format json -show_format -show_streams`
//! through an [`Executor`] and maps the JSON into [`MediaInfo`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vt_core::{Error, Result};

use crate::command::ToolCommand;
use crate::executor::Executor;

/// Summary of a probed media file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaInfo {
    pub file_path: PathBuf,
    pub container: Option<String>,
    /// Duration in seconds, if the container reports one.
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub has_audio: bool,
}

impl MediaInfo {
    pub fn has_video(&self) -> bool {
        self.video_codec.is_some()
    }
}

/// A prober backed by the `ffprobe` CLI.
#[derive(Clone)]
pub struct FfprobeProber {
    executor: Arc<dyn Executor>,
    ffprobe_path: PathBuf,
}

impl std::fmt::Debug for FfprobeProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfprobeProber")
            .field("executor", &self.executor.name())
            .field("ffprobe_path", &self.ffprobe_path)
            .finish()
    }
}

impl FfprobeProber {
    pub fn new(executor: Arc<dyn Executor>, ffprobe_path: PathBuf) -> Self {
        Self {
            executor,
            ffprobe_path,
        }
    }

    /// Inspect `path`. Fails if the file is missing, ffprobe exits non-zero,
    /// or its output is not the expected JSON.
    pub fn probe(&self, path: &Path) -> Result<MediaInfo> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        let mut cmd = ToolCommand::new(self.ffprobe_path.clone());
        cmd.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ]);
        cmd.path(path);

        let output = self.executor.run(&cmd)?;
        if !output.success() {
            return Err(Error::tool(
                "ffprobe",
                format!(
                    "exited with {:?} for {}: {}",
                    output.exit_code,
                    path.display(),
                    output.diagnostics()
                ),
            ));
        }

        parse_ffprobe_json(path, &output.stdout)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

fn parse_ffprobe_json(path: &Path, json: &str) -> Result<MediaInfo> {
    let ff: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| Error::tool("ffprobe", format!("JSON parse error: {e}")))?;

    let video = ff
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let audio = ff
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(MediaInfo {
        file_path: path.to_path_buf(),
        container: ff.format.format_name,
        duration: ff.format.duration.and_then(|d| d.parse().ok()),
        width: video.and_then(|v| v.width),
        height: video.and_then(|v| v.height),
        video_codec: video.and_then(|v| v.codec_name.clone()),
        audio_codec: audio.and_then(|a| a.codec_name.clone()),
        has_audio: audio.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ToolOutput;

    const SAMPLE: &str = r#"{
        "streams": [
            {"codec_type": "video", "codec_name": "h264", "width": 320, "height": 240},
            {"codec_type": "audio", "codec_name": "aac", "channels": 2}
        ],
        "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "2.000000"}
    }"#;

    struct CannedExecutor(ToolOutput);

    impl Executor for CannedExecutor {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn run(&self, _command: &ToolCommand) -> Result<ToolOutput> {
            Ok(self.0.clone())
        }
    }

    fn prober(output: ToolOutput) -> FfprobeProber {
        FfprobeProber::new(Arc::new(CannedExecutor(output)), PathBuf::from("ffprobe"))
    }

    #[test]
    fn parses_streams_and_format() {
        let info = parse_ffprobe_json(Path::new("/media/a.mp4"), SAMPLE).unwrap();
        assert_eq!(info.width, Some(320));
        assert_eq!(info.height, Some(240));
        assert_eq!(info.duration, Some(2.0));
        assert_eq!(info.video_codec.as_deref(), Some("h264"));
        assert_eq!(info.audio_codec.as_deref(), Some("aac"));
        assert!(info.has_audio);
        assert!(info.has_video());
    }

    #[test]
    fn audio_only_file() {
        let json = r#"{"streams":[{"codec_type":"audio","codec_name":"mp3"}],
                      "format":{"format_name":"mp3","duration":"1.5"}}"#;
        let info = parse_ffprobe_json(Path::new("a.mp3"), json).unwrap();
        assert!(!info.has_video());
        assert!(info.has_audio);
        assert_eq!(info.width, None);
    }

    #[test]
    fn malformed_json_is_a_tool_error() {
        let err = parse_ffprobe_json(Path::new("a.mp4"), "not json").unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
    }

    #[test]
    fn probe_missing_file() {
        let err = prober(ToolOutput::default())
            .probe(Path::new("/nonexistent/clip.mp4"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn probe_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        std::fs::write(&input, b"garbage").unwrap();

        let err = prober(ToolOutput {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "Invalid data found when processing input".into(),
        })
        .probe(&input)
        .unwrap_err();
        assert!(err.to_string().contains("Invalid data"), "{err}");
    }

    #[test]
    fn probe_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        std::fs::write(&input, b"stub").unwrap();

        let info = prober(ToolOutput {
            exit_code: Some(0),
            stdout: SAMPLE.into(),
            stderr: String::new(),
        })
        .probe(&input)
        .unwrap();
        assert_eq!(info.file_path, input);
        assert_eq!(info.duration, Some(2.0));
    }
}

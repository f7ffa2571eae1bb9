//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML and carries the
//! tool paths, the fixed encoding profile used by the operations, and the
//! temp-artifact location. Every section defaults sensibly so an empty file
//! is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub encoding: EncodingConfig,
    pub workspace: WorkspaceConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    ///
    /// This is string-based so the caller can read the file however it sees
    /// fit.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("config parse error: {e}")))
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (key, path) in [
            ("tools.ffmpeg_path", &self.tools.ffmpeg_path),
            ("tools.ffprobe_path", &self.tools.ffprobe_path),
        ] {
            if let Some(p) = path {
                if !p.exists() {
                    warnings.push(format!(
                        "{key} '{}' does not exist; falling back to PATH",
                        p.display()
                    ));
                }
            }
        }

        let enc = &self.encoding;
        if enc.crf > 51 {
            warnings.push(format!("encoding.crf {} is outside 0-51", enc.crf));
        }
        if !X264_PRESETS.contains(&enc.preset.as_str()) {
            warnings.push(format!(
                "encoding.preset '{}' is not a recognized preset (valid: {})",
                enc.preset,
                X264_PRESETS.join(", ")
            ));
        }
        if enc.frame_rate == 0 {
            warnings.push("encoding.frame_rate is 0".into());
        }
        if enc.sample_rate == 0 {
            warnings.push("encoding.sample_rate is 0".into());
        }
        if enc.channels == 0 {
            warnings.push("encoding.channels is 0".into());
        }

        if let Some(ref dir) = self.workspace.temp_dir {
            if !dir.is_dir() {
                warnings.push(format!(
                    "workspace.temp_dir '{}' is not a directory",
                    dir.display()
                ));
            }
        }

        warnings
    }
}

const X264_PRESETS: &[&str] = &[
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
    "placebo",
];

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

/// The fixed encoding profile shared by every re-encoding operation.
///
/// Merge normalizes each input to exactly this profile so the final join
/// can stream-copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub video_codec: String,
    pub crf: u32,
    pub preset: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub sample_rate: u32,
    pub channels: u32,
    pub frame_rate: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".into(),
            crf: 23,
            preset: "fast".into(),
            audio_codec: "aac".into(),
            audio_bitrate: "128k".into(),
            sample_rate: 44_100,
            channels: 2,
            frame_rate: 30,
        }
    }
}

/// Where temp artifacts are created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory for intermediate files; the platform temp dir when unset.
    pub temp_dir: Option<PathBuf>,
}

impl WorkspaceConfig {
    /// The effective temp root.
    pub fn temp_root(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = Config::default();
        assert!(cfg.tools.ffmpeg_path.is_none());
        assert_eq!(cfg.encoding.video_codec, "libx264");
        assert_eq!(cfg.encoding.crf, 23);
        assert_eq!(cfg.encoding.preset, "fast");
        assert_eq!(cfg.encoding.audio_codec, "aac");
        assert_eq!(cfg.encoding.audio_bitrate, "128k");
        assert_eq!(cfg.encoding.sample_rate, 44_100);
        assert_eq!(cfg.encoding.channels, 2);
        assert_eq!(cfg.encoding.frame_rate, 30);
        assert_eq!(cfg.workspace.temp_root(), std::env::temp_dir());
    }

    #[test]
    fn default_config_no_warnings() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn parse_toml_config() {
        let toml = r#"
            [encoding]
            crf = 18
            preset = "slow"

            [tools]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
        "#;
        let cfg = Config::from_toml(toml).unwrap();
        assert_eq!(cfg.encoding.crf, 18);
        assert_eq!(cfg.encoding.preset, "slow");
        // Untouched fields keep their defaults.
        assert_eq!(cfg.encoding.frame_rate, 30);
        assert_eq!(
            cfg.tools.ffmpeg_path,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.encoding, EncodingConfig::default());
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = Config::from_toml("[encoding\ncrf = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn out_of_range_encoding_warns() {
        let mut cfg = Config::default();
        cfg.encoding.crf = 60;
        cfg.encoding.preset = "warp".into();
        cfg.encoding.channels = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("crf")));
        assert!(warnings.iter().any(|w| w.contains("preset")));
        assert!(warnings.iter().any(|w| w.contains("channels")));
    }

    #[test]
    fn missing_tool_path_warns() {
        let mut cfg = Config::default();
        cfg.tools.ffmpeg_path = Some(PathBuf::from("/nonexistent/ffmpeg"));
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("tools.ffmpeg_path")));
    }

    #[test]
    fn configured_temp_dir_is_used() {
        let cfg = WorkspaceConfig {
            temp_dir: Some(PathBuf::from("/scratch")),
        };
        assert_eq!(cfg.temp_root(), PathBuf::from("/scratch"));
    }
}

//! Operation integration tests
//!
//! These run the real ffmpeg against small generated clips. Each test
//! returns early when ffmpeg (built with libx264 and lavfi) is not
//! installed.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::tempdir;
use vt_av::{FfprobeProber, MediaInfo, MediaTools, SystemExecutor, ToolRegistry, WatermarkOptions};
use vt_core::config::ToolsConfig;
use vt_core::{AudioFormat, Position};

struct Engine {
    ffmpeg: PathBuf,
    prober: Option<FfprobeProber>,
}

impl Engine {
    /// Locate a usable ffmpeg, or `None` to skip.
    fn find() -> Option<Self> {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        let ffmpeg = registry.require("ffmpeg").ok()?.path.clone();

        let encoders = Command::new(&ffmpeg)
            .args(["-hide_banner", "-encoders"])
            .output()
            .ok()?;
        if !String::from_utf8_lossy(&encoders.stdout).contains("libx264") {
            eprintln!("Skipping: ffmpeg lacks libx264");
            return None;
        }

        let prober = registry
            .require("ffprobe")
            .ok()
            .map(|t| FfprobeProber::new(Arc::new(SystemExecutor::new()), t.path.clone()));
        Some(Self { ffmpeg, prober })
    }

    fn tools(&self, temp_root: &Path) -> MediaTools {
        MediaTools::new(Arc::new(SystemExecutor::new()), self.ffmpeg.clone()).with_temp_root(temp_root)
    }

    /// Generate a clip of solid `color` with a sine tone.
    fn clip(&self, path: &Path, color: &str, size: &str, seconds: u32, rate: u32) {
        let status = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
            .arg(format!("color=c={color}:s={size}:d={seconds}:r={rate}"))
            .args(["-f", "lavfi", "-i"])
            .arg(format!("sine=frequency=440:duration={seconds}"))
            .args(["-shortest", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac"])
            .arg(path)
            .status()
            .unwrap();
        assert!(status.success(), "failed to generate {}", path.display());
    }

    /// Generate a still image.
    fn image(&self, path: &Path, color: &str, size: &str) {
        let status = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
            .arg(format!("color=c={color}:s={size}"))
            .args(["-frames:v", "1"])
            .arg(path)
            .status()
            .unwrap();
        assert!(status.success(), "failed to generate {}", path.display());
    }

    /// Decode the first frame of `path`, `width` pixels wide, as packed RGB24.
    fn first_frame(&self, path: &Path, width: usize) -> Frame {
        let out = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-i"])
            .arg(path)
            .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .output()
            .unwrap();
        assert!(out.status.success(), "failed to decode {}", path.display());
        Frame {
            width,
            data: out.stdout,
        }
    }

    fn probe(&self, path: &Path) -> Option<MediaInfo> {
        self.prober.as_ref().map(|p| p.probe(path).unwrap())
    }
}

/// A decoded RGB24 frame of known width.
struct Frame {
    width: usize,
    data: Vec<u8>,
}

impl Frame {
    fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

fn is_white([r, g, b]: [u8; 3]) -> bool {
    r > 220 && g > 220 && b > 220
}

fn is_red([r, g, b]: [u8; 3]) -> bool {
    r > 200 && g < 50 && b < 50
}

fn leftovers(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with("normalized_") || n.starts_with("ffmpeg_merge_"))
        .collect()
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}±{tolerance}, got {actual}"
    );
}

#[test]
fn test_trim_duration() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 3, 25);
    let output = dir.path().join("trimmed.mp4");

    let result = engine.tools(dir.path()).trim(&input, &output, "0:01", "0:00:01");
    assert!(result.is_success(), "{result:?}");
    assert!(output.exists());

    if let Some(info) = engine.probe(&output) {
        assert_close(info.duration.unwrap(), 1.0, 0.3);
    }
}

#[test]
fn test_thumbnail() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 2, 25);
    let output = dir.path().join("thumbnail.jpg");

    let returned = engine.tools(dir.path()).thumbnail(&input, &output, None);
    assert_eq!(returned, output);
    assert!(output.exists());
}

#[test]
fn test_extract_audio_wav() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 1, 25);
    let output = dir.path().join("audio.wav");

    let result = engine
        .tools(dir.path())
        .extract_audio(&input, &output, AudioFormat::Wav);
    assert!(result.is_success(), "{result:?}");

    if let Some(info) = engine.probe(&output) {
        assert!(info.has_audio);
        assert!(!info.has_video());
        assert_eq!(info.audio_codec.as_deref(), Some("pcm_s16le"));
    }
}

#[test]
fn test_merge_heterogeneous_clips() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let temp_root = tempdir().unwrap();
    let a = dir.path().join("green.mp4");
    let b = dir.path().join("blue.mp4");
    engine.clip(&a, "green", "320x240", 1, 25);
    engine.clip(&b, "blue", "320x240", 1, 24);
    let output = dir.path().join("merged.mp4");

    let result = engine
        .tools(temp_root.path())
        .merge(&[a, b], &output)
        .unwrap();
    assert!(result.is_success(), "{result:?}");
    assert!(output.exists());
    assert!(leftovers(temp_root.path()).is_empty());

    if let Some(info) = engine.probe(&output) {
        assert_close(info.duration.unwrap(), 2.0, 0.5);
    }
}

#[test]
fn test_merge_failure_leaves_no_artifacts() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let temp_root = tempdir().unwrap();
    let good = dir.path().join("good.mp4");
    engine.clip(&good, "green", "320x240", 1, 25);
    let broken = dir.path().join("broken.mp4");
    std::fs::write(&broken, b"this is not a video").unwrap();
    let output = dir.path().join("merged.mp4");

    let result = engine
        .tools(temp_root.path())
        .merge(&[good, broken], &output)
        .unwrap();
    assert!(!result.is_success());
    assert!(result.diagnostics.is_some());
    assert!(!output.exists());
    assert!(leftovers(temp_root.path()).is_empty());
}

#[test]
fn test_watermark_centered_placement() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 1, 25);
    let logo = dir.path().join("logo.png");
    engine.image(&logo, "white", "40x40");
    let output = dir.path().join("watermarked.mp4");

    let options = WatermarkOptions::default().with_position(Position::Center);
    let result = engine
        .tools(dir.path())
        .add_watermark(&input, &output, &logo, &options);
    assert!(result.is_success(), "{result:?}");

    // The overlay spans (140,100)..(180,140).
    let frame = engine.first_frame(&output, 320);
    assert_eq!(frame.data.len(), 320 * 240 * 3);
    assert!(is_white(frame.pixel(160, 120)), "{:?}", frame.pixel(160, 120));
    assert!(is_white(frame.pixel(143, 103)), "{:?}", frame.pixel(143, 103));
    assert!(is_red(frame.pixel(130, 120)), "{:?}", frame.pixel(130, 120));
    assert!(is_red(frame.pixel(160, 90)), "{:?}", frame.pixel(160, 90));

    if let Some(info) = engine.probe(&output) {
        assert_eq!((info.width, info.height), (Some(320), Some(240)));
        assert!(info.has_audio, "audio should be copied through");
    }
}

#[test]
fn test_watermark_opacity_blends() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 1, 25);
    let logo = dir.path().join("logo.png");
    engine.image(&logo, "white", "40x40");
    let tools = engine.tools(dir.path());

    let center = WatermarkOptions::default().with_position(Position::Center);
    let opaque = dir.path().join("opaque.mp4");
    let blended = dir.path().join("blended.mp4");
    assert!(tools.add_watermark(&input, &opaque, &logo, &center).is_success());
    assert!(tools
        .add_watermark(&input, &blended, &logo, &center.clone().with_opacity(0.5))
        .is_success());

    let white = engine.first_frame(&opaque, 320).pixel(160, 120);
    let mixed = engine.first_frame(&blended, 320).pixel(160, 120);
    let red = engine.first_frame(&blended, 320).pixel(130, 120);
    assert!(is_white(white), "{white:?}");
    assert!(is_red(red), "{red:?}");

    // Red stays saturated; green and blue sit strictly between the two.
    assert!(mixed[0] > 200, "{mixed:?}");
    for channel in 1..3 {
        let (lo, mid, hi) = (
            u16::from(red[channel]),
            u16::from(mixed[channel]),
            u16::from(white[channel]),
        );
        assert!(
            mid > lo + 40 && mid + 40 < hi,
            "channel {channel}: {mixed:?} not between {red:?} and {white:?}"
        );
    }
}

#[test]
fn test_resize_never_upscales_with_keep_aspect() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 1, 25);
    let output = dir.path().join("resized.mp4");

    let result = engine
        .tools(dir.path())
        .resize(&input, &output, 1280, 720, true);
    assert!(result.is_success(), "{result:?}");

    if let Some(info) = engine.probe(&output) {
        assert_eq!((info.width, info.height), (Some(320), Some(240)));
    }
}

#[test]
fn test_resize_is_idempotent() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 1, 25);
    let first = dir.path().join("first.mp4");
    let second = dir.path().join("second.mp4");
    let tools = engine.tools(dir.path());

    assert!(tools.resize(&input, &first, 160, 120, true).is_success());
    assert!(tools.resize(&input, &second, 160, 120, true).is_success());

    let (a, b) = (engine.first_frame(&first, 160), engine.first_frame(&second, 160));
    assert_eq!(a.data.len(), 160 * 120 * 3);
    assert_eq!(a.data, b.data);

    if let (Some(a), Some(b)) = (engine.probe(&first), engine.probe(&second)) {
        assert_eq!((a.width, a.height), (Some(160), Some(120)));
        assert_eq!((a.width, a.height), (b.width, b.height));
        assert_eq!(a.duration, b.duration);
    }
}

#[test]
fn test_resize_exact_dimensions() {
    let Some(engine) = Engine::find() else { return };
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    engine.clip(&input, "red", "320x240", 1, 25);
    let output = dir.path().join("stretched.mp4");

    let result = engine
        .tools(dir.path())
        .resize(&input, &output, 200, 200, false);
    assert!(result.is_success(), "{result:?}");

    if let Some(info) = engine.probe(&output) {
        assert_eq!((info.width, info.height), (Some(200), Some(200)));
    }
}

//! Image overlay onto a video.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vt_core::Position;

use crate::filter::{Filter, FilterGraph};

use super::{MediaTools, OperationResult, OutputCheck};

const OPERATION: &str = "watermark";

/// Placement, size and opacity of a watermark.
///
/// ```
/// use vt_av::WatermarkOptions;
/// use vt_core::Position;
///
/// let opts = WatermarkOptions::default()
///     .with_position(Position::BottomRight)
///     .with_offset(20, 20)
///     .with_opacity(0.5);
/// let (x, y) = opts.overlay_coordinates();
/// assert_eq!(x, "main_w-overlay_w-20");
/// assert_eq!(y, "main_h-overlay_h-20");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkOptions {
    /// Anchor; `None` places the overlay at the raw offsets.
    pub position: Option<Position>,
    /// Offsets from the anchored edges; negative values push the overlay
    /// past them.
    pub x: i32,
    pub y: i32,
    /// Target watermark width; the other side keeps its aspect when unset.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            position: None,
            x: 10,
            y: 10,
            width: None,
            height: None,
            opacity: 1.0,
        }
    }
}

impl WatermarkOptions {
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Opacity clamped to `0.0..=1.0`; NaN counts as opaque.
    pub fn effective_opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        }
    }

    /// The overlay `x` and `y` expressions for the configured anchor.
    pub fn overlay_coordinates(&self) -> (String, String) {
        let (x, y) = (self.x, self.y);
        let right = || inset("main_w-overlay_w", x);
        let bottom = || inset("main_h-overlay_h", y);
        match self.position {
            None | Some(Position::TopLeft) => (x.to_string(), y.to_string()),
            Some(Position::TopRight) => (right(), y.to_string()),
            Some(Position::BottomLeft) => (x.to_string(), bottom()),
            Some(Position::BottomRight) => (right(), bottom()),
            Some(Position::Center) => (
                "(main_w-overlay_w)/2".to_string(),
                "(main_h-overlay_h)/2".to_string(),
            ),
        }
    }

    /// Build the overlay graph: optional scale, optional alpha, overlay.
    pub fn filter_graph(&self) -> FilterGraph {
        let mut graph = FilterGraph::new();
        let mut mark = "1:v";

        if self.width.is_some() || self.height.is_some() {
            let side = |v: Option<u32>| v.map_or_else(|| "-1".to_string(), |v| v.to_string());
            graph.stage(
                [mark],
                [Filter::new("scale").arg(side(self.width)).arg(side(self.height))],
                "scaled",
            );
            mark = "scaled";
        }

        let opacity = self.effective_opacity();
        if opacity < 1.0 {
            graph.stage(
                [mark],
                [
                    Filter::new("format").arg("rgba"),
                    Filter::new("colorchannelmixer").named("aa", opacity),
                ],
                "transparent",
            );
            mark = "transparent";
        }

        let (x, y) = self.overlay_coordinates();
        graph.stage(["0:v", mark], [Filter::new("overlay").arg(x).arg(y)], "out");
        graph
    }
}

/// `edge` moved inward by `offset` pixels.
fn inset(edge: &str, offset: i32) -> String {
    if offset < 0 {
        format!("{edge}+{}", offset.unsigned_abs())
    } else {
        format!("{edge}-{offset}")
    }
}

impl MediaTools {
    /// Overlay the image at `watermark` onto `input`, writing `output`.
    ///
    /// Never returns an error: missing files, an invalid graph, or an engine
    /// failure all produce a failed result. Succeeds when ffmpeg exits 0 and
    /// `output` is non-empty. Audio is copied when present.
    pub fn add_watermark(
        &self,
        input: &Path,
        output: &Path,
        watermark: &Path,
        options: &WatermarkOptions,
    ) -> OperationResult {
        for (what, path) in [("input video", input), ("watermark", watermark)] {
            if !path.exists() {
                tracing::warn!(path = %path.display(), "{what} does not exist");
                let message = format!("{what} does not exist: {}", path.display());
                return OperationResult::failed(OPERATION, output, None, message);
            }
        }

        let graph = options.filter_graph();
        let rendered = match graph.render() {
            Ok(g) => g,
            Err(e) => return OperationResult::failed(OPERATION, output, None, e.to_string()),
        };
        let terminal = graph.terminal_label().unwrap_or("out");

        tracing::info!(
            input = %input.display(),
            watermark = %watermark.display(),
            position = ?options.position,
            "watermark"
        );
        tracing::debug!(filter_complex = %rendered, "resolved filter graph");

        let mut cmd = self.ffmpeg_command();
        cmd.arg("-i")
            .path(input)
            .arg("-i")
            .path(watermark)
            .args(["-filter_complex", rendered.as_str()])
            .args(["-map", format!("[{terminal}]").as_str()])
            .args(["-map", "0:a?"]);
        self.video_profile(&mut cmd);
        cmd.args(["-c:a", "copy"]).path(output);

        self.execute(OPERATION, &cmd, output, OutputCheck::NonEmpty)
    }
}

//! Video scaling.

use std::path::Path;

use crate::filter::Filter;

use super::{MediaTools, OperationResult, OutputCheck};

/// The `scale` filter for a `width`x`height` target.
///
/// With `keep_aspect` the video is fitted inside the box, capped at its
/// source size so it is never enlarged, and rounded to even dimensions for
/// the encoder.
fn scale_filter(width: u32, height: u32, keep_aspect: bool) -> Filter {
    if keep_aspect {
        Filter::new("scale")
            .arg(format!("min({width},iw)"))
            .arg(format!("min({height},ih)"))
            .named("force_original_aspect_ratio", "decrease")
            .named("force_divisible_by", 2)
    } else {
        Filter::new("scale").arg(width).arg(height)
    }
}

impl MediaTools {
    /// Scale `input` to `width`x`height`.
    ///
    /// With `keep_aspect` the result fits inside the box without enlarging
    /// the source, and both sides are rounded down to even numbers. An
    /// odd-sized source therefore loses a pixel per odd side even when the
    /// box is larger (321x241 comes out as 320x240).
    ///
    /// Success is judged by ffmpeg's exit status alone.
    pub fn resize(
        &self,
        input: &Path,
        output: &Path,
        width: u32,
        height: u32,
        keep_aspect: bool,
    ) -> OperationResult {
        let filter = scale_filter(width, height, keep_aspect).to_string();
        tracing::info!(input = %input.display(), width, height, keep_aspect, "resize");
        tracing::debug!(filter = %filter, "scale filter");

        let mut cmd = self.ffmpeg_command();
        cmd.arg("-i").path(input).args(["-vf", filter.as_str()]).path(output);

        self.execute("resize", &cmd, output, OutputCheck::ExitStatus)
    }
}

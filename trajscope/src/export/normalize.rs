use crate::render::options::RenderOptions;

/// Accepted output width range in pixels.
pub const WIDTH_RANGE: (u32, u32) = (320, 7680);
/// Accepted output height range in pixels.
pub const HEIGHT_RANGE: (u32, u32) = (240, 4320);
/// Accepted frame-rate range.
pub const FPS_RANGE: (u32, u32) = (1, 120);
/// Accepted sequence duration range in seconds.
pub const DURATION_RANGE: (f64, f64) = (0.1, 120.0);

/// Render options clamped into supported ranges, plus the resulting frame count.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedOptions {
    /// Clamped options.
    pub options: RenderOptions,
    /// `round(fps * duration)`, at least 1 and at most the frame cap.
    pub total_frames: u64,
    /// Set when the requested duration had to be shortened.
    pub warning: Option<String>,
}

/// Clamp `opts` into the supported ranges and cap the frame count at `max_frames`.
///
/// Width, height and fps are clamped silently. A duration that yields more than `max_frames`
/// frames is reduced to `max_frames / fps`. Any shortening of the duration is reported in
/// [`NormalizedOptions::warning`], naming the frame cap or the maximum duration as the cause.
pub fn normalize_options(opts: &RenderOptions, max_frames: u64) -> NormalizedOptions {
    let mut options = opts.clone();
    options.width = opts.width.clamp(WIDTH_RANGE.0, WIDTH_RANGE.1);
    options.height = opts.height.clamp(HEIGHT_RANGE.0, HEIGHT_RANGE.1);
    options.fps = opts.fps.clamp(FPS_RANGE.0, FPS_RANGE.1);

    let fps = f64::from(options.fps);
    let max_frames = max_frames.max(1);
    let requested = if opts.duration_secs.is_nan() {
        DURATION_RANGE.0
    } else {
        opts.duration_secs.max(DURATION_RANGE.0)
    };

    let mut duration = requested.min(DURATION_RANGE.1);
    let over_frame_cap = (fps * requested).round() > max_frames as f64;
    if over_frame_cap {
        duration = duration.min(max_frames as f64 / fps);
    }
    options.duration_secs = duration;

    let total_frames = ((fps * duration).round() as u64).clamp(1, max_frames);
    let warning = (duration < requested).then(|| {
        let cause = if over_frame_cap {
            format!(
                "at {} fps exceeds the {max_frames}-frame limit",
                options.fps
            )
        } else {
            format!("exceeds the {} s maximum duration", DURATION_RANGE.1)
        };
        format!(
            "requested {requested} s {cause}; duration capped to {duration} s ({total_frames} frames)"
        )
    });
    if let Some(w) = &warning {
        tracing::warn!("{w}");
    }

    NormalizedOptions {
        options,
        total_frames,
        warning,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/normalize.rs"]
mod tests;

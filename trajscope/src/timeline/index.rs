//! Normalized playback time to per-series sample index.
//!
//! Every place that turns a playback position into a sample index goes through
//! [`sample_index`], so independently sized series (trajectory, eigen snapshots, scalars) stay
//! in lockstep and frame sequences are reproducible.

/// Clamp normalized time into `[0, 1]`.
///
/// Non-finite input maps to `0`. Idempotent: `clamp_time(clamp_time(x)) == clamp_time(x)`.
/// The guard-reporting variant is [`crate::InvariantGuard::clamp_time`].
pub fn clamp_time(t: f64) -> f64 {
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}

/// Sample index for normalized time `t` in a series of length `n`.
///
/// `index(t, n) = clamp(floor(t * (n - 1)), 0, n - 1)`. Returns `None` for an empty series,
/// which callers treat as "skip this layer".
pub fn sample_index(t: f64, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let last = n - 1;
    let raw = (clamp_time(t) * last as f64).floor();
    // `raw` is finite and within [0, last] after clamping, the min guards float slop.
    Some((raw.max(0.0) as usize).min(last))
}

/// Normalized time of frame `frame` in a sequence of `total_frames`.
///
/// `frame / (total_frames - 1)`, or `0` when the sequence has at most one frame.
pub fn frame_time(frame: u64, total_frames: u64) -> f64 {
    if total_frames <= 1 {
        return 0.0;
    }
    (frame as f64 / (total_frames - 1) as f64).min(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/index.rs"]
mod tests;

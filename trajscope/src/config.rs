//! Tunable limits and caller preferences.

use crate::foundation::error::{TrajError, TrajResult};
use crate::render::options::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MIB: u64 = 1024 * 1024;

/// Thresholds used by [`crate::Validator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Files above this size are rejected as `TooLarge`.
    pub max_file_bytes: u64,
    /// Files above this size load with a warning.
    pub large_file_bytes: u64,
    /// Trajectories longer than this load with a warning.
    pub max_timesteps: usize,
    /// Accepted file extension (without the dot, compared case-insensitively).
    pub extension: String,
    /// Supported schema major version.
    pub schema_major: u64,
    /// Cross-series length ratio tolerated before a consistency warning.
    pub length_tolerance: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 100 * MIB,
            large_file_bytes: 20 * MIB,
            max_timesteps: 50_000,
            extension: "json".to_owned(),
            schema_major: 1,
            length_tolerance: 2.0,
        }
    }
}

/// How sequence exports schedule frame rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceMode {
    /// One frame at a time on the calling thread.
    #[default]
    Sequential,
    /// Bounded rayon pool; at most `workers` frames in flight.
    Parallel {
        /// Worker thread count (values below 1 are treated as 1).
        workers: usize,
    },
}

/// Export controller configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Upper bound on frames per sequence; longer requests are shortened with a warning.
    pub max_frames: u64,
    /// Filename prefix of sequence frames.
    pub frame_prefix: String,
    /// Zero-padded digit count of sequence frame numbers.
    pub frame_digits: usize,
    /// Frame scheduling.
    pub sequence_mode: SequenceMode,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_frames: 3600,
            frame_prefix: "frame_".to_owned(),
            frame_digits: 5,
            sequence_mode: SequenceMode::Sequential,
        }
    }
}

impl ExportConfig {
    /// Defaults, with `TRAJSCOPE_EXPORT_WORKERS=<n>` (n >= 1) enabling parallel sequences.
    pub fn from_env() -> Self {
        let workers = std::env::var("TRAJSCOPE_EXPORT_WORKERS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0);
        Self {
            sequence_mode: match workers {
                Some(workers) => SequenceMode::Parallel { workers },
                None => SequenceMode::Sequential,
            },
            ..Self::default()
        }
    }

    /// File name of sequence frame `frame`, e.g. `frame_00007.png`.
    pub fn frame_file_name(&self, frame: u64) -> String {
        format!(
            "{}{:0width$}.png",
            self.frame_prefix,
            frame,
            width = self.frame_digits
        )
    }
}

/// Persisted user defaults applied on top of per-request options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Preferred output width.
    pub width: Option<u32>,
    /// Preferred output height.
    pub height: Option<u32>,
    /// Preferred frames per second.
    pub fps: Option<u32>,
    /// Preferred sequence duration in seconds.
    pub duration_secs: Option<f64>,
}

impl Preferences {
    /// Parse preferences from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> TrajResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TrajError::validation(format!("read preferences '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            TrajError::validation(format!("parse preferences '{}': {e}", path.display()))
        })
    }

    /// Copy of `opts` with every set preference overriding the corresponding field.
    pub fn apply(&self, opts: &RenderOptions) -> RenderOptions {
        let mut out = opts.clone();
        if let Some(w) = self.width {
            out.width = w;
        }
        if let Some(h) = self.height {
            out.height = h;
        }
        if let Some(fps) = self.fps {
            out.fps = fps;
        }
        if let Some(d) = self.duration_secs {
            out.duration_secs = d;
        }
        out
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

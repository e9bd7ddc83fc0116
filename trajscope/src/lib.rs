//! Trajscope renders recorded training-run trajectories to still images and frame sequences.
//!
//! A run file goes through three stages:
//!
//! 1. **Validate**: `bytes -> Run + warnings` or a diagnosed [`LoadFailure`] ([`Validator`])
//! 2. **Render**: `(Run, time, canvas, RenderOptions) -> pixels` ([`render_frame`])
//! 3. **Export**: stills, numbered PNG sequences and side-by-side comparisons
//!    ([`ExportController`])
//!
//! Normalized playback time maps to per-series sample indices through a single policy
//! ([`sample_index`]), so independently sized series stay aligned across frames.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic rendering**: the renderer is pure; identical inputs give identical pixels
//!   (see [`FrameRGBA::fingerprint`]).
//! - **No IO in renderers**: only the export controller touches the filesystem.
//! - **Explicit diagnostics**: numerically inconsistent data is reported through an
//!   [`InvariantGuard`] the caller owns and passes in, never a process-wide singleton.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod encode;
mod export;
mod foundation;
mod guard;
mod model;
mod render;
mod timeline;
mod validate;

pub use config::{ExportConfig, Preferences, SequenceMode, ValidationLimits};
pub use encode::png::encode_png;
pub use export::cancel::CancelToken;
pub use export::controller::ExportController;
pub use export::normalize::{
    DURATION_RANGE, FPS_RANGE, HEIGHT_RANGE, NormalizedOptions, WIDTH_RANGE, normalize_options,
};
pub use export::progress::{Progress, ProgressObserver};
pub use export::result::{ExportOutput, ExportResult, ExportState};
pub use foundation::color::Rgba8;
pub use foundation::core::{Affine, Canvas, Point, Rect, ScreenTransform, Vec2};
pub use foundation::error::{TrajError, TrajResult};
pub use guard::{
    EIGEN_EPSILON, InvariantGuard, Rule, Severity, SubscriptionId, VIOLATION_LOG_CAPACITY,
    Verdict, Violation,
};
pub use model::run::{EigenSnapshot, Professor, Run, RunMetadata, Timestep};
pub use render::compare::{ComparePanel, CompareReport, TITLE_BAR_HEIGHT, render_comparison};
pub use render::cpu::CpuSurface;
pub use render::frame::{FrameReport, render_frame};
pub use render::options::RenderOptions;
pub use render::surface::{DrawSurface, FrameRGBA};
pub use render::text::Font;
pub use timeline::index::{clamp_time, frame_time, sample_index};
pub use validate::failure::{FailureKind, LoadFailure};
pub use validate::pipeline::{LoadedRun, Validator};

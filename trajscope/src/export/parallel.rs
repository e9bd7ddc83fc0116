//! Bounded parallel rendering of sequence chunks.
//!
//! Frames of one chunk render concurrently on a dedicated rayon pool; results come back in
//! frame order so the controller writes files and reports progress sequentially.

use crate::export::cancel::{self, CancelToken};
use crate::export::controller::render_png;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TrajError, TrajResult};
use crate::guard::InvariantGuard;
use crate::model::run::Run;
use crate::render::cpu::CpuSurface;
use crate::render::options::RenderOptions;
use crate::render::text::Font;
use crate::timeline::index::frame_time;
use rayon::prelude::*;
use std::ops::Range;

/// Encoded frame, or the error message of a failed render.
pub(crate) type ChunkFrame = Result<Vec<u8>, String>;

/// Shared, read-only inputs of every frame in a sequence.
#[derive(Clone, Copy)]
pub(crate) struct FrameJob<'a> {
    pub(crate) run: &'a Run,
    pub(crate) opts: &'a RenderOptions,
    pub(crate) canvas: Canvas,
    pub(crate) guard: &'a InvariantGuard,
    pub(crate) font: Option<&'a Font>,
    pub(crate) total_frames: u64,
    pub(crate) cancel: Option<&'a CancelToken>,
}

impl FrameJob<'_> {
    pub(crate) fn surface(&self) -> TrajResult<CpuSurface> {
        CpuSurface::new(self.canvas)?.with_optional_font(self.font)
    }

    pub(crate) fn render(&self, surface: &mut CpuSurface, frame: u64) -> TrajResult<Vec<u8>> {
        let t = frame_time(frame, self.total_frames);
        render_png(surface, self.canvas, self.run, t, self.opts, self.guard)
    }
}

pub(crate) fn build_pool(workers: usize) -> TrajResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("trajscope-export-{i}"))
        .build()
        .map_err(|e| TrajError::render(format!("failed to build export thread pool: {e}")))
}

/// Render `frames` on `pool`, in frame order.
///
/// Cancellation is checked as each frame is picked up: frames not yet started when the token
/// trips come back as `None`, frames already in flight complete.
pub(crate) fn render_chunk(
    pool: &rayon::ThreadPool,
    job: &FrameJob<'_>,
    frames: Range<u64>,
) -> Vec<Option<ChunkFrame>> {
    pool.install(|| {
        frames
            .into_par_iter()
            .map_init(
                || job.surface().map_err(|e| e.to_string()),
                |surface, frame| {
                    if cancel::requested(job.cancel) {
                        return None;
                    }
                    Some(match surface {
                        Ok(s) => job.render(s, frame).map_err(|e| e.to_string()),
                        Err(e) => Err(e.clone()),
                    })
                },
            )
            .collect()
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/parallel.rs"]
mod tests;

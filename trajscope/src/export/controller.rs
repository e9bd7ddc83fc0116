use crate::config::{ExportConfig, SequenceMode};
use crate::encode::png::encode_png;
use crate::export::cancel::{self, CancelToken};
use crate::export::normalize::{NormalizedOptions, normalize_options};
use crate::export::output::{SequenceDir, StagedFile};
use crate::export::parallel::{self, ChunkFrame, FrameJob};
use crate::export::progress::{Progress, ProgressObserver};
use crate::export::result::{ExportOutput, ExportResult, ExportState};
use crate::foundation::core::Canvas;
use crate::foundation::error::TrajResult;
use crate::guard::InvariantGuard;
use crate::model::run::Run;
use crate::render::compare::{ComparePanel, render_comparison};
use crate::render::cpu::CpuSurface;
use crate::render::frame::render_frame;
use crate::render::options::RenderOptions;
use crate::render::text::Font;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Frames per parallel chunk, per worker.
const CHUNK_FRAMES_PER_WORKER: usize = 2;

/// Render one frame onto `surface` and encode it as PNG.
pub(crate) fn render_png(
    surface: &mut CpuSurface,
    canvas: Canvas,
    run: &Run,
    time: f64,
    opts: &RenderOptions,
    guard: &InvariantGuard,
) -> TrajResult<Vec<u8>> {
    surface.begin_frame();
    render_frame(surface, canvas, run, time, opts, guard)?;
    encode_png(&surface.finish())
}

/// Drives still, sequence and comparison exports.
///
/// The controller performs the only disk I/O in the crate. Every export returns an
/// [`ExportResult`] and never panics or returns `Err`; cancelled and failed exports leave no
/// partial output behind.
#[derive(Debug)]
pub struct ExportController {
    guard: Arc<InvariantGuard>,
    config: ExportConfig,
    font: Option<Font>,
    state: Mutex<ExportState>,
}

impl ExportController {
    /// Controller reporting violations to `guard`.
    pub fn new(guard: Arc<InvariantGuard>, config: ExportConfig) -> Self {
        Self {
            guard,
            config,
            font: None,
            state: Mutex::new(ExportState::Idle),
        }
    }

    /// Draw text overlays with `font`.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    /// Guard receiving this controller's violations.
    pub fn guard(&self) -> &InvariantGuard {
        &self.guard
    }

    /// Active configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Current lifecycle state; safe to poll from another thread during an export.
    pub fn state(&self) -> ExportState {
        *self.lock_state()
    }

    fn lock_state(&self) -> MutexGuard<'_, ExportState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, next: ExportState) {
        tracing::debug!(state = ?next, "export state");
        *self.lock_state() = next;
    }

    fn fail(&self, message: impl Into<String>) -> ExportResult {
        let message = message.into();
        tracing::error!(%message, "export failed");
        self.set_state(ExportState::Failed);
        ExportResult::failed(message)
    }

    fn cancelled(&self) -> ExportResult {
        tracing::info!("export cancelled");
        self.set_state(ExportState::Cancelled);
        ExportResult::Cancelled
    }

    fn succeeded(&self, output: ExportOutput, warning: Option<String>) -> ExportResult {
        tracing::info!(files = output.paths().len(), "export finished");
        self.set_state(ExportState::Succeeded);
        ExportResult::Succeeded { output, warning }
    }

    fn surface(&self, canvas: Canvas) -> TrajResult<CpuSurface> {
        CpuSurface::new(canvas)?.with_optional_font(self.font.as_ref())
    }

    fn prepare(
        &self,
        run: &Run,
        opts: Option<&RenderOptions>,
    ) -> Result<NormalizedOptions, ExportResult> {
        self.set_state(ExportState::Validating);
        let defaults = RenderOptions::default();
        let normalized = normalize_options(opts.unwrap_or(&defaults), self.config.max_frames);
        if let Err(e) = self.guard.check_renderable(run, "export").into_result() {
            return Err(self.fail(e.to_string()));
        }
        Ok(normalized)
    }

    /// Render `run` at `time` and write one PNG to `path`.
    ///
    /// The image is staged at `<path>.partial` and renamed on completion, so a cancelled or
    /// failed export never leaves a file at `path`.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), time = time))]
    pub fn export_still(
        &self,
        run: &Run,
        time: f64,
        path: impl AsRef<Path>,
        opts: Option<&RenderOptions>,
        cancel: Option<&CancelToken>,
    ) -> ExportResult {
        let path = path.as_ref();
        tracing::info!("still export started");
        let normalized = match self.prepare(run, opts) {
            Ok(n) => n,
            Err(result) => return result,
        };
        if cancel::requested(cancel) {
            return self.cancelled();
        }

        self.set_state(ExportState::Rendering(0));
        let canvas = normalized.options.canvas();
        let bytes = match self.surface(canvas).and_then(|mut surface| {
            render_png(
                &mut surface,
                canvas,
                run,
                time,
                &normalized.options,
                &self.guard,
            )
        }) {
            Ok(b) => b,
            Err(e) => return self.fail(e.to_string()),
        };
        if cancel::requested(cancel) {
            return self.cancelled();
        }

        self.commit_single(path, &bytes, cancel, normalized.warning)
    }

    fn commit_single(
        &self,
        path: &Path,
        bytes: &[u8],
        cancel: Option<&CancelToken>,
        warning: Option<String>,
    ) -> ExportResult {
        self.set_state(ExportState::Writing(0));
        let staged = match StagedFile::write(path, bytes) {
            Ok(s) => s,
            Err(e) => return self.fail(format!("write '{}': {e}", path.display())),
        };
        if cancel::requested(cancel) {
            drop(staged);
            return self.cancelled();
        }
        match staged.commit() {
            Ok(p) => self.succeeded(ExportOutput::Single(p), warning),
            Err(e) => self.fail(format!("write '{}': {e}", path.display())),
        }
    }

    /// Render every frame of `run` into numbered PNGs under `dir`.
    ///
    /// Frame `i` of `n` is rendered at `t = i / (n - 1)`. Progress is reported in frame order
    /// after each write. On cancellation or failure the frames written so far are removed (the
    /// whole directory, when this export created it).
    #[tracing::instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn export_sequence(
        &self,
        run: &Run,
        dir: impl AsRef<Path>,
        opts: Option<&RenderOptions>,
        mut observer: Option<&mut dyn ProgressObserver>,
        cancel: Option<&CancelToken>,
    ) -> ExportResult {
        let dir = dir.as_ref();
        let normalized = match self.prepare(run, opts) {
            Ok(n) => n,
            Err(result) => return result,
        };
        let total = normalized.total_frames;
        tracing::info!(
            total_frames = total,
            mode = ?self.config.sequence_mode,
            "sequence export started"
        );

        let mut out = match SequenceDir::create(dir) {
            Ok(d) => d,
            Err(e) => {
                return self.fail(format!("create output directory '{}': {e}", dir.display()));
            }
        };

        let job = FrameJob {
            run,
            opts: &normalized.options,
            canvas: normalized.options.canvas(),
            guard: &self.guard,
            font: self.font.as_ref(),
            total_frames: total,
            cancel,
        };
        let mut scheduler = match Scheduler::new(self.config.sequence_mode, &job) {
            Ok(s) => s,
            Err(e) => {
                out.discard();
                return self.fail(e.to_string());
            }
        };

        let mut next = 0u64;
        while next < total {
            if cancel::requested(cancel) {
                out.discard();
                return self.cancelled();
            }
            let end = (next + scheduler.chunk_len()).min(total);
            self.set_state(ExportState::Rendering(next));
            let frames = scheduler.render(&job, next..end);

            for (frame, rendered) in (next..end).zip(frames) {
                if cancel::requested(cancel) {
                    out.discard();
                    return self.cancelled();
                }
                let bytes = match rendered {
                    None => {
                        out.discard();
                        return self.cancelled();
                    }
                    Some(Err(message)) => {
                        out.discard();
                        return self.fail(message);
                    }
                    Some(Ok(bytes)) => bytes,
                };
                self.set_state(ExportState::Writing(frame));
                let name = self.config.frame_file_name(frame);
                if let Err(e) = out.write_frame(&name, &bytes) {
                    out.discard();
                    return self.fail(format!("write '{name}': {e}"));
                }
                if let Some(obs) = observer.as_deref_mut() {
                    obs.on_progress(&Progress::new(frame + 1, total, name));
                }
            }
            next = end;
        }

        let paths = out.finish();
        self.succeeded(ExportOutput::Sequence(paths), normalized.warning)
    }

    /// Render `left` and `right` side by side at the shared `time` into one PNG at `path`.
    ///
    /// Fails without writing anything when either run lacks trajectory data.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), time = time))]
    pub fn export_comparison(
        &self,
        left: &Run,
        right: &Run,
        time: f64,
        path: impl AsRef<Path>,
        opts: Option<&RenderOptions>,
    ) -> ExportResult {
        let path = path.as_ref();
        tracing::info!("comparison export started");
        self.set_state(ExportState::Validating);
        let defaults = RenderOptions::default();
        let normalized = normalize_options(opts.unwrap_or(&defaults), self.config.max_frames);
        let canvas = normalized.options.canvas();

        self.set_state(ExportState::Rendering(0));
        let rendered = self.surface(canvas).and_then(|mut surface| {
            surface.begin_frame();
            render_comparison(
                &mut surface,
                canvas,
                ComparePanel::new(left, time),
                ComparePanel::new(right, time),
                &normalized.options,
                &self.guard,
            )?;
            encode_png(&surface.finish())
        });
        let bytes = match rendered {
            Ok(b) => b,
            Err(e) => return self.fail(e.to_string()),
        };
        self.commit_single(path, &bytes, None, normalized.warning)
    }
}

/// Sequential or pooled frame production for one sequence export.
enum Scheduler {
    Sequential(CpuSurface),
    Parallel {
        pool: rayon::ThreadPool,
        chunk: u64,
    },
}

impl Scheduler {
    fn new(mode: SequenceMode, job: &FrameJob<'_>) -> TrajResult<Self> {
        Ok(match mode {
            SequenceMode::Sequential => Self::Sequential(job.surface()?),
            SequenceMode::Parallel { workers } => {
                let workers = workers.max(1);
                Self::Parallel {
                    pool: parallel::build_pool(workers)?,
                    chunk: (workers * CHUNK_FRAMES_PER_WORKER) as u64,
                }
            }
        })
    }

    fn chunk_len(&self) -> u64 {
        match self {
            Self::Sequential(_) => 1,
            Self::Parallel { chunk, .. } => *chunk,
        }
    }

    fn render(
        &mut self,
        job: &FrameJob<'_>,
        frames: std::ops::Range<u64>,
    ) -> Vec<Option<ChunkFrame>> {
        match self {
            Self::Sequential(surface) => frames
                .map(|f| Some(job.render(surface, f).map_err(|e| e.to_string())))
                .collect(),
            Self::Parallel { pool, .. } => parallel::render_chunk(pool, job, frames),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/controller.rs"]
mod tests;

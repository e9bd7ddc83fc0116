//! Side-by-side comparison of two runs on one surface.

use crate::foundation::core::{Canvas, Point, Rect, Vec2};
use crate::foundation::error::TrajResult;
use crate::guard::InvariantGuard;
use crate::model::run::Run;
use crate::render::frame::{FrameReport, render_frame};
use crate::render::options::RenderOptions;
use crate::render::palette;
use crate::render::surface::DrawSurface;

/// Height of the title bar above both panels.
pub const TITLE_BAR_HEIGHT: u32 = 36;
const DIVIDER_WIDTH: f64 = 2.0;

/// One half of a comparison: a run and the time driving it.
#[derive(Clone, Copy, Debug)]
pub struct ComparePanel<'a> {
    /// Run drawn in this half.
    pub run: &'a Run,
    /// Normalized time for this half; must match the other half.
    pub time: f64,
}

impl<'a> ComparePanel<'a> {
    /// Panel for `run` at `time`.
    pub fn new(run: &'a Run, time: f64) -> Self {
        Self { run, time }
    }
}

/// Per-panel reports from [`render_comparison`].
#[derive(Clone, Debug, PartialEq)]
pub struct CompareReport {
    /// Left panel.
    pub left: FrameReport,
    /// Right panel.
    pub right: FrameReport,
}

/// Label shown for one side: the condition when present, else the run id.
fn panel_name(run: &Run) -> &str {
    run.metadata()
        .condition
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| run.metadata().display_name())
}

/// Render `left` and `right` into the two halves of `canvas` below a shared title bar.
///
/// Both runs must be renderable and both panels must carry the same time; either breach is
/// an `Error` violation and nothing is drawn.
pub fn render_comparison<S: DrawSurface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    left: ComparePanel<'_>,
    right: ComparePanel<'_>,
    opts: &RenderOptions,
    guard: &InvariantGuard,
) -> TrajResult<CompareReport> {
    let ctx = "compare";
    guard
        .check_compare_runs_valid(left.run, right.run, ctx)
        .into_result()?;
    guard
        .check_compare_time_synced(left.time, right.time, ctx)
        .into_result()?;

    let w = f64::from(canvas.width);
    let title_h = TITLE_BAR_HEIGHT.min(canvas.height / 2);
    let panel_h = canvas.height.saturating_sub(title_h).max(1);
    let half = Canvas::new(canvas.width / 2, panel_h);
    let top = f64::from(title_h);

    surface.fill_rect(canvas.rect(), palette::BACKGROUND);

    let left_opts = opts
        .with_label(panel_name(left.run))
        .with_accent(palette::COMPARE_LEFT);
    let right_opts = opts
        .with_label(panel_name(right.run))
        .with_accent(palette::COMPARE_RIGHT);

    let left_report = draw_panel(surface, half, Vec2::new(0.0, top), left, &left_opts, guard)?;
    let right_origin = Vec2::new(w - f64::from(half.width), top);
    let right_report = draw_panel(surface, half, right_origin, right, &right_opts, guard)?;

    let mid = w / 2.0;
    surface.fill_rect(
        Rect::new(
            mid - DIVIDER_WIDTH / 2.0,
            top,
            mid + DIVIDER_WIDTH / 2.0,
            f64::from(canvas.height),
        ),
        palette::DIVIDER,
    );

    surface.fill_rect(Rect::new(0.0, 0.0, w, top), palette::PANEL);
    let title = format!(
        "{} vs {}  t = {:.1}%",
        panel_name(left.run),
        panel_name(right.run),
        left_report.time * 100.0
    );
    surface.draw_text(Point::new(16.0, 8.0), &title, 16.0, palette::TEXT);

    Ok(CompareReport {
        left: left_report,
        right: right_report,
    })
}

fn draw_panel<S: DrawSurface + ?Sized>(
    surface: &mut S,
    panel: Canvas,
    offset: Vec2,
    side: ComparePanel<'_>,
    opts: &RenderOptions,
    guard: &InvariantGuard,
) -> TrajResult<FrameReport> {
    surface.save();
    surface.translate(offset);
    surface.push_clip(panel.rect());
    let report = render_frame(surface, panel, side.run, side.time, opts, guard);
    surface.pop_clip();
    surface.restore();
    report
}

#[cfg(test)]
#[path = "../../tests/unit/render/compare.rs"]
mod tests;

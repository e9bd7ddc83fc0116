//! Pure frame renderer: `(run, time, canvas, options) -> pixels`.
//!
//! Nothing here performs I/O or keeps state between calls. Identical arguments issue an
//! identical draw-call sequence, so a deterministic surface yields identical pixels.

use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Point, Rect, ScreenTransform};
use crate::foundation::error::TrajResult;
use crate::foundation::math::gaussian_falloff;
use crate::guard::InvariantGuard;
use crate::model::run::{Run, Timestep};
use crate::render::options::RenderOptions;
use crate::render::palette;
use crate::render::surface::DrawSurface;
use crate::timeline::index::sample_index;
use smallvec::SmallVec;

const GRID_OFFSETS: [f64; 4] = [-1.0, -0.5, 0.5, 1.0];
const DASH_ON: f64 = 6.0;
const DASH_OFF: f64 = 4.0;

const ARROW_HALF_ANGLE: f64 = 0.5;
const ARROW_LENGTH: f64 = 10.0;

const TRAIL_ALPHA_FLOOR: f64 = 0.15;
const TRAIL_WIDTH: f64 = 2.5;

const GLOW_RADIUS: f64 = 18.0;
const MARKER_RADIUS: f64 = 8.0;
const GLOW_RINGS: usize = 6;

const MAX_EIGEN_BARS: usize = 5;
const EIGEN_BAR_WIDTH: f64 = 18.0;
const EIGEN_BAR_GAP: f64 = 6.0;
const EIGEN_BAR_MAX_HEIGHT: f64 = 100.0;

const MAX_SCALAR_READOUTS: usize = 3;
const MARGIN: f64 = 16.0;
const TEXT_SIZE: f32 = 14.0;
const LINE_HEIGHT: f64 = 18.0;
const LABEL_SIZE: f32 = 20.0;

/// What a render call selected and drew.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Normalized time after clamping.
    pub time: f64,
    /// Trajectory index of the current-position marker.
    pub trajectory_index: usize,
    /// Eigen snapshot index, when the run has geometry.
    pub eigen_index: Option<usize>,
    /// Number of evaluator arrows drawn.
    pub evaluators_drawn: usize,
    /// Number of eigen bars drawn.
    pub eigen_bars_drawn: usize,
    /// Whether the metrics overlay was drawn.
    pub metrics_drawn: bool,
}

/// Render one frame of `run` at normalized `time` into the `canvas`-sized region at the
/// surface's current transform.
///
/// Fails only on `Error`-severity preconditions (empty trajectory, no 2D point); `Warning`
/// checks degrade the affected layer and rendering continues.
pub fn render_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    run: &Run,
    time: f64,
    opts: &RenderOptions,
    guard: &InvariantGuard,
) -> TrajResult<FrameReport> {
    guard.check_renderable(run, "render").into_result()?;
    let t = guard.clamp_time(time, "render.time");
    let xf = ScreenTransform::for_canvas(canvas);
    let traj = run.trajectory();
    // `check_renderable` guarantees a non-empty trajectory.
    let idx = sample_index(t, traj.len()).unwrap_or(0);
    let idx = guard.clamp_index(idx, traj.len(), "render.trajectory");

    let mut report = FrameReport {
        time: t,
        trajectory_index: idx,
        ..FrameReport::default()
    };
    let accent = opts.accent.unwrap_or(palette::TRAJECTORY);

    draw_background(surface, canvas, xf);
    if opts.show_evaluators {
        report.evaluators_drawn = draw_evaluators(surface, run, xf);
    }
    draw_trail(surface, traj, idx, xf, accent);
    draw_marker(surface, traj, idx, xf, accent);
    if opts.show_annotations {
        draw_annotations(surface, traj, idx, xf);
    }
    if opts.show_metrics {
        draw_metrics(surface, canvas, run, t, &traj[idx]);
        report.metrics_drawn = true;
    }
    if opts.show_eigen {
        let (eigen_index, bars) = draw_eigen(surface, canvas, run, t, &traj[idx], guard);
        report.eigen_index = eigen_index;
        report.eigen_bars_drawn = bars;
    } else {
        report.eigen_index = sample_index(t, run.geometry().len());
    }
    if let Some(label) = opts.label.as_deref().filter(|l| !l.is_empty()) {
        let color = opts.accent.unwrap_or(palette::TEXT);
        surface.draw_text(Point::new(MARGIN, MARGIN), label, LABEL_SIZE, color);
    }

    Ok(report)
}

fn draw_background<S: DrawSurface + ?Sized>(surface: &mut S, canvas: Canvas, xf: ScreenTransform) {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    surface.fill_rect(canvas.rect(), palette::BACKGROUND);

    let c = xf.center;
    surface.stroke_line(
        Point::new(0.0, c.y),
        Point::new(w, c.y),
        1.0,
        palette::GRID_MAJOR,
    );
    surface.stroke_line(
        Point::new(c.x, 0.0),
        Point::new(c.x, h),
        1.0,
        palette::GRID_MAJOR,
    );

    for k in GRID_OFFSETS {
        let off = k * xf.scale;
        let (y, x) = (c.y + off, c.x + off);
        dashed_line(surface, Point::new(0.0, y), Point::new(w, y));
        dashed_line(surface, Point::new(x, 0.0), Point::new(x, h));
    }
}

fn dashed_line<S: DrawSurface + ?Sized>(surface: &mut S, from: Point, to: Point) {
    let d = to - from;
    let len = d.hypot();
    if len <= 0.0 {
        return;
    }
    let dir = d / len;
    let mut s = 0.0;
    while s < len {
        let e = (s + DASH_ON).min(len);
        surface.stroke_line(from + dir * s, from + dir * e, 1.0, palette::GRID_MINOR);
        s += DASH_ON + DASH_OFF;
    }
}

fn draw_evaluators<S: DrawSurface + ?Sized>(
    surface: &mut S,
    run: &Run,
    xf: ScreenTransform,
) -> usize {
    let mut drawn = 0;
    for prof in run.evaluators() {
        let Some(p) = prof.projection().filter(|p| p.is_finite()) else {
            continue;
        };
        let tip = xf.apply(p.x, p.y);
        let color = if prof.holdout {
            palette::EVALUATOR_HOLDOUT
        } else {
            palette::EVALUATOR
        };
        surface.stroke_line(xf.center, tip, 2.0, color);

        let d = tip - xf.center;
        if d.hypot() > 0.0 {
            let back = d.atan2() + std::f64::consts::PI;
            for side in [-ARROW_HALF_ANGLE, ARROW_HALF_ANGLE] {
                let a = back + side;
                let end = Point::new(
                    tip.x + ARROW_LENGTH * a.cos(),
                    tip.y + ARROW_LENGTH * a.sin(),
                );
                surface.stroke_line(tip, end, 2.0, color);
            }
        }
        drawn += 1;
    }
    drawn
}

fn draw_trail<S: DrawSurface + ?Sized>(
    surface: &mut S,
    traj: &[Timestep],
    idx: usize,
    xf: ScreenTransform,
    color: Rgba8,
) {
    if idx == 0 {
        return;
    }
    for i in 0..idx {
        let (a, b) = (traj[i].point, traj[i + 1].point);
        if !a.is_finite() || !b.is_finite() {
            continue;
        }
        let recency = (i + 1) as f64 / idx as f64;
        let alpha = TRAIL_ALPHA_FLOOR + (1.0 - TRAIL_ALPHA_FLOOR) * recency;
        surface.stroke_line(
            xf.apply(a.x, a.y),
            xf.apply(b.x, b.y),
            TRAIL_WIDTH,
            color.with_opacity(alpha),
        );
    }
}

/// Latest finite point at or before `idx`.
fn marker_point(traj: &[Timestep], idx: usize) -> Option<Point> {
    traj[..=idx]
        .iter()
        .rev()
        .map(|ts| ts.point)
        .find(|p| p.is_finite())
}

fn draw_marker<S: DrawSurface + ?Sized>(
    surface: &mut S,
    traj: &[Timestep],
    idx: usize,
    xf: ScreenTransform,
    glow: Rgba8,
) {
    let Some(p) = marker_point(traj, idx) else {
        return;
    };
    let c = xf.apply(p.x, p.y);
    // Stacked rings with Gaussian falloff approximate a blurred disc of radius GLOW_RADIUS.
    let weights = gaussian_falloff(GLOW_RINGS, GLOW_RINGS as f64 / 2.0);
    let step = (GLOW_RADIUS - MARKER_RADIUS) / GLOW_RINGS as f64;
    for (k, w) in weights.iter().enumerate().rev() {
        let r = MARKER_RADIUS + step * (k + 1) as f64;
        surface.fill_circle(c, r, glow.with_opacity(0.18 * w));
    }
    surface.fill_circle(c, MARKER_RADIUS, Rgba8::WHITE);
}

fn draw_annotations<S: DrawSurface + ?Sized>(
    surface: &mut S,
    traj: &[Timestep],
    idx: usize,
    xf: ScreenTransform,
) {
    let ring = |surface: &mut S, p: Point| {
        surface.fill_circle(p, 6.0, palette::TEXT);
        surface.fill_circle(p, 4.0, palette::BACKGROUND);
    };
    if let Some(start) = traj.first().map(|ts| ts.point).filter(|p| p.is_finite()) {
        let p = xf.apply(start.x, start.y);
        ring(surface, p);
        let at = Point::new(p.x + 10.0, p.y - 8.0);
        surface.draw_text(at, "start", 12.0, palette::TEXT);
    }
    if idx + 1 == traj.len()
        && idx > 0
        && let Some(end) = traj.last().map(|ts| ts.point).filter(|p| p.is_finite())
    {
        let p = xf.apply(end.x, end.y);
        ring(surface, p);
        let at = Point::new(p.x + 10.0, p.y - 8.0);
        surface.draw_text(at, "end", 12.0, palette::TEXT);
    }
}

fn draw_metrics<S: DrawSurface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    run: &Run,
    t: f64,
    current: &Timestep,
) {
    let mut lines = vec![
        format!("t = {:.1}%", t * 100.0),
        format!("effective dim = {:.3}", current.effective_dim),
        format!("curvature = {:.4}", current.curvature),
    ];
    for (name, series) in run.scalars().iter().take(MAX_SCALAR_READOUTS) {
        if let Some(i) = sample_index(t, series.len()) {
            lines.push(format!("{name} = {:.4}", series[i]));
        }
    }

    let h = f64::from(canvas.height);
    let top = h - MARGIN - LINE_HEIGHT * lines.len() as f64;
    surface.fill_rect(
        Rect::new(MARGIN - 8.0, top - 8.0, MARGIN + 240.0, h - MARGIN + 8.0),
        palette::PANEL,
    );
    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(
            Point::new(MARGIN, top + LINE_HEIGHT * i as f64),
            line,
            TEXT_SIZE,
            palette::TEXT,
        );
    }
}

fn draw_eigen<S: DrawSurface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    run: &Run,
    t: f64,
    current: &Timestep,
    guard: &InvariantGuard,
) -> (Option<usize>, usize) {
    let Some(ei) = sample_index(t, run.geometry().len()) else {
        return (None, 0);
    };
    let snap = &run.geometry()[ei];
    if snap.values.is_empty() {
        return (Some(ei), 0);
    }
    let ctx = "render.eigen";
    let _ = guard.check_eigenvalues_sorted(&snap.values, ctx);
    let _ = guard.check_effective_dim(current.effective_dim, snap.values.len(), ctx);
    let non_negative = guard.check_eigenvalues_non_negative(&snap.values, ctx);
    if !non_negative.passed() {
        return (Some(ei), 0);
    }
    let total = snap.sum();
    if !(total.is_finite() && total > 0.0) {
        return (Some(ei), 0);
    }

    let shown: SmallVec<[f64; MAX_EIGEN_BARS]> =
        snap.values.iter().take(MAX_EIGEN_BARS).copied().collect();
    let w = f64::from(canvas.width);
    let baseline = f64::from(canvas.height) - MARGIN;
    let chart_w = shown.len() as f64 * (EIGEN_BAR_WIDTH + EIGEN_BAR_GAP) - EIGEN_BAR_GAP;
    let left = w - MARGIN - chart_w;
    for (i, v) in shown.iter().enumerate() {
        let frac = (v / total).clamp(0.0, 1.0);
        let x0 = left + i as f64 * (EIGEN_BAR_WIDTH + EIGEN_BAR_GAP);
        surface.fill_rect(
            Rect::new(
                x0,
                baseline - frac * EIGEN_BAR_MAX_HEIGHT,
                x0 + EIGEN_BAR_WIDTH,
                baseline,
            ),
            palette::eigen_bar_color(i),
        );
    }
    (Some(ei), shown.len())
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;

use super::*;
use crate::foundation::error::TrajError;
use crate::guard::Rule;
use crate::model::run::{EigenSnapshot, Professor, RunMetadata};
use std::collections::BTreeMap;

#[path = "recording.rs"]
mod recording;
use recording::{Op, RecordingSurface};

const W: u32 = 400;
const H: u32 = 300;

fn line_run(n: usize) -> Run {
    let trajectory = (0..n)
        .map(|i| {
            let f = i as f64 / (n.max(2) - 1) as f64;
            Timestep {
                t: f,
                point: Point::new(f - 0.5, 0.25),
                effective_dim: 2.0 + f,
                curvature: 0.1,
            }
        })
        .collect();
    Run::new(
        RunMetadata {
            run_id: Some("r".into()),
            ..RunMetadata::default()
        },
        trajectory,
        Vec::new(),
        BTreeMap::new(),
        Vec::new(),
    )
}

fn with_geometry(run: &Run, snapshots: Vec<Vec<f64>>) -> Run {
    Run::new(
        run.metadata().clone(),
        run.trajectory().to_vec(),
        snapshots
            .into_iter()
            .map(|values| EigenSnapshot { values })
            .collect(),
        run.scalars().clone(),
        run.evaluators().to_vec(),
    )
}

fn draw(
    run: &Run,
    time: f64,
    opts: &RenderOptions,
) -> (RecordingSurface, FrameReport, InvariantGuard) {
    let guard = InvariantGuard::new();
    let mut s = RecordingSurface::new(W, H);
    let report = render_frame(&mut s, Canvas::new(W, H), run, time, opts, &guard).unwrap();
    (s, report, guard)
}

#[test]
fn midpoint_of_hundred_steps_selects_index_49() {
    let (s, report, _) = draw(&line_run(100), 0.5, &RenderOptions::default());
    assert_eq!(report.trajectory_index, 49);

    let xf = ScreenTransform::for_canvas(Canvas::new(W, H));
    let p = line_run(100).trajectory()[49].point;
    let marker = Op::FillCircle(xf.apply(p.x, p.y), MARKER_RADIUS, Rgba8::WHITE);
    assert!(s.ops.contains(&marker));
}

#[test]
fn empty_trajectory_is_refused_before_drawing() {
    let guard = InvariantGuard::new();
    let mut s = RecordingSurface::new(W, H);
    let err = render_frame(
        &mut s,
        Canvas::new(W, H),
        &line_run(0),
        0.5,
        &RenderOptions::default(),
        &guard,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        TrajError::Precondition {
            rule: Rule::TrajectoryNonEmpty,
            ..
        }
    ));
    assert!(s.ops.is_empty());
}

#[test]
fn out_of_range_time_is_corrected_and_reported() {
    let (_, report, guard) = draw(&line_run(10), 1.7, &RenderOptions::default());
    assert_eq!(report.time, 1.0);
    assert_eq!(report.trajectory_index, 9);
    assert_eq!(guard.recent()[0].rule, Rule::TimeInRange);
}

#[test]
fn identical_inputs_issue_identical_draw_calls() {
    let run = with_geometry(&line_run(50), vec![vec![0.6, 0.3, 0.1]; 20]);
    let opts = RenderOptions::default().with_label("same");
    let (a, ra, _) = draw(&run, 0.37, &opts);
    let (b, rb, _) = draw(&run, 0.37, &opts);
    assert_eq!(a.ops, b.ops);
    assert_eq!(ra, rb);
}

#[test]
fn background_and_grid_come_first() {
    let (s, _, _) = draw(&line_run(3), 0.0, &RenderOptions::default());
    assert_eq!(
        s.ops[0],
        Op::FillRect(Canvas::new(W, H).rect(), palette::BACKGROUND)
    );
    assert_eq!(s.lines_exact(palette::GRID_MAJOR), 2);
    assert!(s.lines_exact(palette::GRID_MINOR) > 8);
}

#[test]
fn trail_alpha_ramps_toward_current_index() {
    let opts = RenderOptions::default().with_overlays(false);
    let (s, report, _) = draw(&line_run(20), 1.0, &opts);
    let trail = s.lines_with(palette::TRAJECTORY);
    assert_eq!(trail.len(), report.trajectory_index);
    let alphas: Vec<u8> = trail.iter().map(|(_, _, c)| c.a).collect();
    assert!(alphas.windows(2).all(|w| w[0] <= w[1]), "{alphas:?}");
    assert_eq!(alphas.last(), Some(&255));
    assert!(alphas[0] < 100);
}

#[test]
fn eigen_bars_normalize_first_five() {
    let run = with_geometry(&line_run(10), vec![vec![0.4, 0.2, 0.1, 0.1, 0.1, 0.1]]);
    let (s, report, _) = draw(&run, 0.5, &RenderOptions::default());
    assert_eq!(report.eigen_index, Some(0));
    assert_eq!(report.eigen_bars_drawn, 5);

    let bars: Vec<Rect> = s
        .rects()
        .into_iter()
        .filter(|(_, c)| palette::EIGEN_BARS.contains(c))
        .map(|(r, _)| r)
        .collect();
    assert_eq!(bars.len(), 5);
    let tallest = bars[0].height();
    assert!((tallest - EIGEN_BAR_MAX_HEIGHT * 0.4).abs() < 1e-9);
    assert!((bars[1].height() - EIGEN_BAR_MAX_HEIGHT * 0.2).abs() < 1e-9);
}

#[test]
fn degenerate_spectra_draw_no_bars() {
    for values in [vec![], vec![0.0, 0.0], vec![0.5, -0.3]] {
        let run = with_geometry(&line_run(10), vec![values.clone()]);
        let (_, report, _) = draw(&run, 0.5, &RenderOptions::default());
        assert_eq!(report.eigen_bars_drawn, 0, "{values:?}");
    }
}

#[test]
fn negative_spectrum_is_reported_and_skipped() {
    let run = with_geometry(&line_run(10), vec![vec![0.5, -0.3]]);
    let (_, _, guard) = draw(&run, 0.5, &RenderOptions::default());
    assert!(
        guard
            .recent()
            .iter()
            .any(|v| v.rule == Rule::EigenvaluesNonNegative)
    );
}

#[test]
fn unsorted_spectrum_still_draws() {
    let run = with_geometry(&line_run(10), vec![vec![0.2, 0.5, 0.3]]);
    let (_, report, guard) = draw(&run, 0.0, &RenderOptions::default());
    assert_eq!(report.eigen_bars_drawn, 3);
    assert_eq!(guard.recent()[0].rule, Rule::EigenvaluesSorted);
}

#[test]
fn evaluators_use_holdout_color_and_skip_short_vectors() {
    let base = line_run(5);
    let prof = |v: Vec<f64>, holdout| Professor {
        name: None,
        vector: v,
        holdout,
    };
    let run = Run::new(
        base.metadata().clone(),
        base.trajectory().to_vec(),
        Vec::new(),
        BTreeMap::new(),
        vec![
            prof(vec![1.0, 0.0], false),
            prof(vec![0.0, 1.0, 3.0], true),
            prof(vec![0.5], false),
        ],
    );
    let (s, report, _) = draw(&run, 0.0, &RenderOptions::default());
    assert_eq!(report.evaluators_drawn, 2);
    // shaft plus two arrowhead strokes each
    assert_eq!(s.lines_with(palette::EVALUATOR).len(), 3);
    assert_eq!(s.lines_with(palette::EVALUATOR_HOLDOUT).len(), 3);
}

#[test]
fn metrics_list_time_and_first_three_scalars() {
    let base = line_run(11);
    let mut scalars = BTreeMap::new();
    for name in ["d_loss", "a_acc", "c_lr", "b_grad"] {
        scalars.insert(name.to_owned(), vec![1.0, 2.0, 3.0]);
    }
    let run = Run::new(
        base.metadata().clone(),
        base.trajectory().to_vec(),
        Vec::new(),
        scalars,
        Vec::new(),
    );
    let (s, report, _) = draw(&run, 0.5, &RenderOptions::default());
    assert!(report.metrics_drawn);
    let texts = s.texts();
    assert!(texts.contains(&"t = 50.0%"));
    assert!(texts.contains(&"effective dim = 2.500"));
    assert!(texts.contains(&"a_acc = 2.0000"));
    assert!(texts.contains(&"c_lr = 2.0000"));
    assert!(!texts.iter().any(|t| t.starts_with("d_loss")));
}

#[test]
fn label_uses_accent_at_top_left() {
    let accent = Rgba8::rgb(1, 2, 3);
    let opts = RenderOptions::default()
        .with_label("run A")
        .with_accent(accent);
    let (s, _, _) = draw(&line_run(5), 0.2, &opts);
    let label = Op::Text(Point::new(16.0, 16.0), "run A".to_owned(), accent);
    assert_eq!(s.ops.last(), Some(&label));
}

#[test]
fn annotations_mark_start_and_end() {
    let (s, _, _) = draw(&line_run(5), 0.5, &RenderOptions::default());
    assert!(s.texts().contains(&"start"));
    assert!(!s.texts().contains(&"end"));

    let (s, _, _) = draw(&line_run(5), 1.0, &RenderOptions::default());
    assert!(s.texts().contains(&"end"));
}

#[test]
fn overlays_off_draws_only_grid_trail_and_marker() {
    let run = with_geometry(&line_run(5), vec![vec![1.0]]);
    let (s, report, _) = draw(&run, 1.0, &RenderOptions::default().with_overlays(false));
    assert!(s.texts().is_empty());
    assert!(!report.metrics_drawn);
    assert_eq!(report.eigen_bars_drawn, 0);
    assert_eq!(report.eigen_index, Some(0));
}

#[test]
fn marker_falls_back_to_last_finite_point() {
    let mut traj = line_run(4).trajectory().to_vec();
    traj[3].point = Point::new(f64::NAN, 0.0);
    let run = Run::new(
        RunMetadata::default(),
        traj.clone(),
        Vec::new(),
        BTreeMap::new(),
        Vec::new(),
    );
    let (s, report, _) = draw(&run, 1.0, &RenderOptions::default().with_overlays(false));
    assert_eq!(report.trajectory_index, 3);
    let xf = ScreenTransform::for_canvas(Canvas::new(W, H));
    let p = xf.apply(traj[2].point.x, traj[2].point.y);
    let marker = Op::FillCircle(p, MARKER_RADIUS, Rgba8::WHITE);
    assert!(s.ops.contains(&marker));
}

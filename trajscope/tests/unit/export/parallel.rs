use super::*;
use crate::foundation::core::Point;
use crate::model::run::{RunMetadata, Timestep};
use std::collections::BTreeMap;

fn run() -> Run {
    let trajectory = (0..12)
        .map(|i| Timestep {
            t: i as f64,
            point: Point::new(i as f64 * 0.05, 0.0),
            effective_dim: 1.0,
            curvature: 0.0,
        })
        .collect();
    Run::new(
        RunMetadata::default(),
        trajectory,
        Vec::new(),
        BTreeMap::new(),
        Vec::new(),
    )
}

#[test]
fn chunk_results_come_back_in_frame_order() {
    let r = run();
    let opts = RenderOptions::default().with_size(320, 240);
    let guard = InvariantGuard::new();
    let job = FrameJob {
        run: &r,
        opts: &opts,
        canvas: opts.canvas(),
        guard: &guard,
        font: None,
        total_frames: 6,
        cancel: None,
    };
    let pool = build_pool(3).unwrap();
    let chunk = render_chunk(&pool, &job, 0..6);
    assert_eq!(chunk.len(), 6);

    let mut surface = job.surface().unwrap();
    for (f, got) in chunk.into_iter().enumerate() {
        let expected = job.render(&mut surface, f as u64).unwrap();
        assert_eq!(got, Some(Ok(expected)), "frame {f}");
    }
}

#[test]
fn cancelled_chunk_starts_nothing() {
    let r = run();
    let opts = RenderOptions::default().with_size(320, 240);
    let guard = InvariantGuard::new();
    let token = CancelToken::new();
    token.cancel();
    let job = FrameJob {
        run: &r,
        opts: &opts,
        canvas: opts.canvas(),
        guard: &guard,
        font: None,
        total_frames: 4,
        cancel: Some(&token),
    };
    let chunk = render_chunk(&build_pool(2).unwrap(), &job, 0..4);
    assert!(chunk.iter().all(Option::is_none));
}

use super::*;

#[test]
fn long_duration_is_capped_with_warning() {
    let opts = RenderOptions::default().with_timing(30, 200.0);
    let n = normalize_options(&opts, 3600);
    assert_eq!(n.options.duration_secs, 120.0);
    assert_eq!(n.total_frames, 3600);
    let w = n.warning.unwrap();
    assert!(w.contains("capped"), "{w}");
    assert!(w.contains("3600-frame limit"), "{w}");
}

#[test]
fn duration_clamp_below_frame_cap_names_maximum_duration() {
    let opts = RenderOptions::default().with_timing(1, 200.0);
    let n = normalize_options(&opts, 3600);
    assert_eq!(n.options.duration_secs, 120.0);
    assert_eq!(n.total_frames, 120);
    let w = n.warning.unwrap();
    assert!(w.contains("120 s maximum duration"), "{w}");
    assert!(!w.contains("frame limit"), "{w}");
}

#[test]
fn frame_cap_shortens_duration_at_high_fps() {
    let opts = RenderOptions::default().with_timing(120, 40.0);
    let n = normalize_options(&opts, 3600);
    assert_eq!(n.options.duration_secs, 30.0);
    assert_eq!(n.total_frames, 3600);
    assert!(n.warning.is_some());
}

#[test]
fn in_range_options_pass_through_silently() {
    let opts = RenderOptions::default()
        .with_size(640, 480)
        .with_timing(24, 5.0);
    let n = normalize_options(&opts, 3600);
    assert_eq!(n.options, opts);
    assert_eq!(n.total_frames, 120);
    assert_eq!(n.warning, None);
}

#[test]
fn dimensions_and_fps_are_clamped() {
    let opts = RenderOptions::default()
        .with_size(10, 100_000)
        .with_timing(0, 0.0);
    let n = normalize_options(&opts, 3600);
    assert_eq!((n.options.width, n.options.height), (320, 4320));
    assert_eq!(n.options.fps, 1);
    assert_eq!(n.options.duration_secs, 0.1);
    assert_eq!(n.total_frames, 1);
    assert_eq!(n.warning, None);

    let opts = RenderOptions::default()
        .with_size(9000, 100)
        .with_timing(500, 1.0);
    let n = normalize_options(&opts, 3600);
    assert_eq!(
        (n.options.width, n.options.height, n.options.fps),
        (7680, 240, 120)
    );
}

#[test]
fn non_finite_duration_is_normalized() {
    let n = normalize_options(&RenderOptions::default().with_timing(30, f64::NAN), 3600);
    assert_eq!(n.options.duration_secs, 0.1);
    assert_eq!(n.total_frames, 3);

    let forever = RenderOptions::default().with_timing(30, f64::INFINITY);
    let n = normalize_options(&forever, 3600);
    assert_eq!(n.options.duration_secs, 120.0);
    assert!(n.warning.is_some());
}

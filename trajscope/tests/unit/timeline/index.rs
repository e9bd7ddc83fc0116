use super::*;

#[test]
fn endpoints_map_to_first_and_last() {
    for n in [1usize, 2, 3, 10, 100, 4097] {
        assert_eq!(sample_index(0.0, n), Some(0));
        assert_eq!(sample_index(1.0, n), Some(n - 1));
    }
}

#[test]
fn empty_series_has_no_index() {
    assert_eq!(sample_index(0.5, 0), None);
}

#[test]
fn index_is_monotonic_in_time() {
    for n in [1usize, 7, 100, 333] {
        let mut prev = 0;
        for step in 0..=1000 {
            let i = sample_index(step as f64 / 1000.0, n).unwrap();
            assert!(i >= prev, "n={n} step={step}");
            assert!(i < n);
            prev = i;
        }
    }
}

#[test]
fn midpoint_of_hundred_is_forty_nine() {
    assert_eq!(sample_index(0.5, 100), Some(49));
}

#[test]
fn out_of_range_time_is_clamped() {
    assert_eq!(sample_index(-3.0, 10), Some(0));
    assert_eq!(sample_index(7.0, 10), Some(9));
    assert_eq!(sample_index(f64::NAN, 10), Some(0));
}

#[test]
fn clamp_time_is_idempotent() {
    for x in [-1e9, -1.0, -0.0, 0.0, 0.25, 1.0, 1.5, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let once = clamp_time(x);
        assert_eq!(clamp_time(once), once, "x={x}");
        assert!((0.0..=1.0).contains(&once));
    }
}

#[test]
fn frame_time_spans_unit_interval() {
    assert_eq!(frame_time(0, 1), 0.0);
    assert_eq!(frame_time(0, 0), 0.0);
    assert_eq!(frame_time(0, 100), 0.0);
    assert_eq!(frame_time(99, 100), 1.0);
    assert!((frame_time(50, 101) - 0.5).abs() < 1e-12);
}

use super::*;

fn lower(json: &str) -> Run {
    Run::from_def(serde_json::from_str(json).unwrap())
}

#[test]
fn from_def_fills_missing_time_with_position() {
    let run = lower(
        r#"{
            "metadata": {"run_id": "r1"},
            "trajectory": {"timesteps": [
                {"point_2d": [0.0, 0.0]},
                {"point_2d": [1.0, 0.5]},
                {"t": 7.0, "point_2d": [2.0, 1.0]}
            ]}
        }"#,
    );
    let t: Vec<f64> = run.trajectory().iter().map(|ts| ts.t).collect();
    assert_eq!(t, vec![0.0, 0.5, 7.0]);
    assert_eq!(run.trajectory()[1].point, Point::new(1.0, 0.5));
}

#[test]
fn lenient_coordinates_become_non_finite() {
    let run = lower(
        r#"{"trajectory": {"timesteps": [
            {"point": [null, "Infinity"]},
            {"point2d": ["NaN", "-Infinity"]},
            {"point_2d": [1.0]}
        ]}}"#,
    );
    let traj = run.trajectory();
    assert!(traj[0].point.x.is_nan());
    assert_eq!(traj[0].point.y, f64::INFINITY);
    assert!(traj[1].point.x.is_nan());
    assert_eq!(traj[1].point.y, f64::NEG_INFINITY);
    assert!(traj[2].point.y.is_nan());
}

#[test]
fn eigen_snapshots_accept_bare_and_object_forms() {
    let run = lower(r#"{"geometry": {"eigenvalues": [[0.5, 0.25], {"values": [0.7]}]}}"#);
    assert_eq!(run.geometry().len(), 2);
    assert_eq!(run.geometry()[0].sum(), 0.75);
    assert_eq!(run.geometry()[1].values, vec![0.7]);
}

#[test]
fn schema_version_prefers_top_level() {
    let run = lower(r#"{"schema_version": "1.2", "metadata": {"schema_version": "0.9"}}"#);
    assert_eq!(run.metadata().schema_version.as_deref(), Some("1.2"));
    let run = lower(r#"{"metadata": {"id": "abc", "schema_version": "0.9"}}"#);
    assert_eq!(run.metadata().schema_version.as_deref(), Some("0.9"));
    assert_eq!(run.metadata().run_id.as_deref(), Some("abc"));
}

#[test]
fn display_name_falls_back() {
    let mut m = RunMetadata::default();
    assert_eq!(m.display_name(), "unnamed run");
    m.run_id = Some("r7".into());
    assert_eq!(m.display_name(), "r7");
    m.condition = Some("baseline".into());
    assert_eq!(m.display_name(), "baseline");
}

#[test]
fn projection_needs_two_components() {
    let p = Professor {
        name: None,
        vector: vec![0.1, -0.2, 9.0],
        holdout: false,
    };
    assert_eq!(p.projection(), Some(Point::new(0.1, -0.2)));
    let short = Professor {
        vector: vec![1.0],
        ..p
    };
    assert_eq!(short.projection(), None);
}

#[test]
fn scalars_len_is_longest_series() {
    let run = lower(r#"{"scalars": {"values": {"loss": [1, 2, 3], "acc": [0.5]}}}"#);
    assert_eq!(run.scalars_len(), 3);
    assert_eq!(run.scalars().keys().next().map(String::as_str), Some("acc"));
}

use super::*;
use crate::validate::failure::FailureKind;
use std::io::Write;

const MINIMAL: &str = r#"{"metadata": {"run_id": "r1"}, "trajectory": {"timesteps": [{"t": 0.0, "point_2d": [0.1, 0.2]}]}}"#;

fn text(s: &str) -> Result<LoadedRun, LoadFailure> {
    Validator::default().validate_text(s, s.len() as u64, &InvariantGuard::new())
}

fn kind(s: &str) -> FailureKind {
    text(s).unwrap_err().kind
}

#[test]
fn minimal_run_succeeds_without_warnings() {
    let loaded = text(MINIMAL).unwrap();
    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    assert_eq!(loaded.run.trajectory().len(), 1);
    assert_eq!(loaded.run.metadata().run_id.as_deref(), Some("r1"));
}

#[test]
fn byte_order_mark_is_ignored() {
    assert!(text(&format!("\u{feff}{MINIMAL}")).is_ok());
}

#[test]
fn content_stage_failures() {
    assert_eq!(kind("   \n\t"), FailureKind::EmptyContent);
    assert_eq!(
        kind(r#"{"metadata": {"run_id": "r1"}, "traj"#),
        FailureKind::Truncated
    );
    assert_eq!(kind("{\"a\": 1,}"), FailureKind::InvalidFormat);
    assert_eq!(kind("[1, 2]"), FailureKind::SchemaMismatch);
}

#[test]
fn null_document_produces_nothing() {
    assert_eq!(kind("null"), FailureKind::ParseProducedNothing);
    assert_eq!(kind(" null \n"), FailureKind::ParseProducedNothing);
}

#[test]
fn schema_errors_are_collected_into_one_failure() {
    let f = text(r#"{"schema_version": "3.1", "trajectory": {"timesteps": []}}"#).unwrap_err();
    assert_eq!(f.kind, FailureKind::SchemaMismatch);
    assert_eq!(f.message.lines().count(), 3, "{}", f.message);
    assert!(f.message.contains("supported major version is 1"));
    assert!(!f.suggestions.is_empty());
}

#[test]
fn version_mismatch_alone_is_a_warning() {
    let loaded = text(&MINIMAL.replacen('{', r#"{"schema_version": "2.0", "#, 1)).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("may be incompatible"));
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let f = Validator::default()
        .validate_path(dir.path().join("absent.json"), &InvariantGuard::new())
        .unwrap_err();
    assert_eq!(f.kind, FailureKind::NotFound);
}

#[test]
fn empty_file_and_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let guard = InvariantGuard::new();
    let validator = Validator::default();

    let empty = dir.path().join("empty.json");
    std::fs::File::create(&empty).unwrap();
    let f = validator.validate_path(&empty, &guard).unwrap_err();
    assert_eq!(f.kind, FailureKind::EmptyFile);

    let txt = dir.path().join("run.txt");
    std::fs::write(&txt, MINIMAL).unwrap();
    let f = validator.validate_path(&txt, &guard).unwrap_err();
    assert_eq!(f.kind, FailureKind::WrongType);
    assert!(f.message.contains("'.txt'"));
}

#[test]
fn oversized_file_reports_measured_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.json");
    let size = 100 * 1024 * 1024 + 1;
    std::fs::File::create(&path).unwrap().set_len(size).unwrap();
    let f = Validator::default()
        .validate_path(&path, &InvariantGuard::new())
        .unwrap_err();
    assert_eq!(f.kind, FailureKind::TooLarge);
    let measured = format!("{size} bytes");
    assert!(f.message.contains(&measured), "{}", f.message);
}

#[test]
fn truncated_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.json");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(br#"{"metadata": {"run_id": "r1"}, "trajectory": {"timesteps": [{"t": 0"#)
        .unwrap();
    drop(f);
    let err = Validator::default()
        .validate_path(&path, &InvariantGuard::new())
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Truncated);
}

#[test]
fn non_utf8_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bin.json");
    std::fs::write(&path, [0xff, 0xfe, b'}']).unwrap();
    let err = Validator::default()
        .validate_path(&path, &InvariantGuard::new())
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Unreadable);
}

#[test]
fn valid_file_round_trips_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.JSON");
    std::fs::write(&path, MINIMAL).unwrap();
    let loaded = Validator::default()
        .validate_path(&path, &InvariantGuard::new())
        .unwrap();
    assert!(loaded.warnings.is_empty());
}

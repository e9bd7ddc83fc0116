use super::*;

#[test]
fn staged_file_commits_by_rename() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested/out.png");
    let staged = StagedFile::write(&target, b"png").unwrap();
    assert!(partial_path(&target).exists());
    assert!(!target.exists());

    let p = staged.commit().unwrap();
    assert_eq!(p, target);
    assert_eq!(std::fs::read(&target).unwrap(), b"png");
    assert!(!partial_path(&target).exists());
}

#[test]
fn dropped_stage_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.png");
    drop(StagedFile::write(&target, b"png").unwrap());
    assert!(!target.exists());
    assert!(!partial_path(&target).exists());
}

#[test]
fn created_directory_is_removed_on_discard() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("seq");
    let mut out = SequenceDir::create(&dir).unwrap();
    out.write_frame("frame_00000.png", b"a").unwrap();
    out.write_frame("frame_00001.png", b"b").unwrap();
    out.discard();
    assert!(!dir.exists());
}

#[test]
fn existing_directory_keeps_unrelated_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();
    let mut out = SequenceDir::create(dir.path()).unwrap();
    out.write_frame("frame_00000.png", b"a").unwrap();
    drop(out);
    assert!(dir.path().join("notes.txt").exists());
    assert!(!dir.path().join("frame_00000.png").exists());
}

#[test]
fn finished_sequence_is_kept_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = SequenceDir::create(dir.path()).unwrap();
    for i in 0..3 {
        out.write_frame(&format!("f{i}.png"), b"x").unwrap();
    }
    let paths = out.finish();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.exists()));
    assert!(paths[0].ends_with("f0.png"));
}

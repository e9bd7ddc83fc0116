use super::*;

#[test]
fn defaults_enable_every_overlay() {
    let o = RenderOptions::default();
    assert_eq!((o.width, o.height, o.fps), (1920, 1080, 30));
    assert!(o.show_evaluators && o.show_metrics && o.show_eigen && o.show_annotations);
    assert_eq!(o.canvas(), Canvas::new(1920, 1080));
}

#[test]
fn overrides_copy_without_touching_the_source() {
    let base = RenderOptions::default().with_label("base");
    let panel = base.with_label("left").with_accent(Rgba8::rgb(9, 9, 9));
    assert_eq!(base.label.as_deref(), Some("base"));
    assert_eq!(base.accent, None);
    assert_eq!(panel.label.as_deref(), Some("left"));
    assert_eq!(panel.width, base.width);
    assert_eq!(base.without_label().label, None);
}

#[test]
fn size_timing_and_overlay_builders() {
    let o = RenderOptions::default()
        .with_size(640, 480)
        .with_timing(12, 2.5)
        .with_overlays(false);
    assert_eq!(o.canvas(), Canvas::new(640, 480));
    assert_eq!((o.fps, o.duration_secs), (12, 2.5));
    assert!(!o.show_evaluators && !o.show_metrics && !o.show_eigen && !o.show_annotations);
}

#[test]
fn deserializes_with_defaults_and_hex_accent() {
    let o: RenderOptions =
        serde_json::from_str(r##"{"width": 800, "accent": "#ff0000", "show_eigen": false}"##)
            .unwrap();
    assert_eq!(o.width, 800);
    assert_eq!(o.height, 1080);
    assert_eq!(o.accent, Some(Rgba8::rgb(255, 0, 0)));
    assert!(!o.show_eigen);
    assert!(o.show_metrics);
}

use super::*;

#[test]
fn screen_transform_centers_and_scales_by_short_side() {
    let xf = ScreenTransform::for_canvas(Canvas::new(800, 400));
    assert_eq!(xf.center, Point::new(400.0, 200.0));
    assert_eq!(xf.scale, 100.0);
}

#[test]
fn screen_transform_flips_y() {
    let xf = ScreenTransform::for_canvas(Canvas::new(400, 400));
    assert_eq!(xf.apply(0.0, 0.0), Point::new(200.0, 200.0));
    assert_eq!(xf.apply(1.0, 1.0), Point::new(300.0, 100.0));
    assert_eq!(xf.apply(-0.5, -1.0), Point::new(150.0, 300.0));
}

#[test]
fn affine_matches_apply() {
    let xf = ScreenTransform::for_canvas(Canvas::new(640, 480));
    let p = xf.as_affine() * Point::new(0.3, -0.7);
    let q = xf.apply(0.3, -0.7);
    assert!((p.x - q.x).abs() < 1e-9);
    assert!((p.y - q.y).abs() < 1e-9);
}

#[test]
fn canvas_rect_covers_dimensions() {
    assert_eq!(Canvas::new(10, 20).rect(), Rect::new(0.0, 0.0, 10.0, 20.0));
}

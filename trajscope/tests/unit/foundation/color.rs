use super::*;

#[test]
fn parse_hex_accepts_rgb_and_rgba() {
    assert_eq!(
        Rgba8::parse_hex("#ff8000").unwrap(),
        Rgba8::rgb(255, 128, 0)
    );
    assert_eq!(
        Rgba8::parse_hex("00ff0080").unwrap(),
        Rgba8::rgba(0, 255, 0, 128)
    );
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
}

#[test]
fn to_hex_omits_opaque_alpha() {
    assert_eq!(Rgba8::rgb(1, 2, 3).to_hex(), "#010203");
    assert_eq!(Rgba8::rgba(1, 2, 3, 4).to_hex(), "#01020304");
}

#[test]
fn with_opacity_scales_alpha_only() {
    let c = Rgba8::rgba(10, 20, 30, 200).with_opacity(0.5);
    assert_eq!(c, Rgba8::rgba(10, 20, 30, 100));
    assert_eq!(Rgba8::WHITE.with_opacity(7.0).a, 255);
    assert_eq!(Rgba8::WHITE.with_opacity(f64::NAN).a, 0);
}

#[test]
fn deserializes_from_string_or_array() {
    let a: Rgba8 = serde_json::from_str("\"#102030\"").unwrap();
    let b: Rgba8 = serde_json::from_str("[16, 32, 48]").unwrap();
    let c: Rgba8 = serde_json::from_str("[16, 32, 48, 64]").unwrap();
    assert_eq!(a, b);
    assert_eq!(c.a, 64);
    assert!(serde_json::from_str::<Rgba8>("[1, 2]").is_err());
    assert_eq!(serde_json::to_string(&a).unwrap(), "\"#102030\"");
}

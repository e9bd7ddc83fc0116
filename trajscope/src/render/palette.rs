use crate::foundation::color::Rgba8;

pub(crate) const BACKGROUND: Rgba8 = Rgba8::rgb(0x10, 0x12, 0x1a);
pub(crate) const GRID_MAJOR: Rgba8 = Rgba8::rgba(0x8a, 0x93, 0xa6, 0x80);
pub(crate) const GRID_MINOR: Rgba8 = Rgba8::rgba(0x8a, 0x93, 0xa6, 0x40);
pub(crate) const TRAJECTORY: Rgba8 = Rgba8::rgb(0x4f, 0xc3, 0xf7);
pub(crate) const EVALUATOR: Rgba8 = Rgba8::rgb(0xf5, 0xa6, 0x23);
pub(crate) const EVALUATOR_HOLDOUT: Rgba8 = Rgba8::rgb(0xb3, 0x7f, 0xeb);
pub(crate) const TEXT: Rgba8 = Rgba8::rgb(0xe6, 0xe9, 0xef);
pub(crate) const PANEL: Rgba8 = Rgba8::rgba(0x00, 0x00, 0x00, 0x99);
pub(crate) const DIVIDER: Rgba8 = Rgba8::rgb(0x3a, 0x3f, 0x4b);
pub(crate) const COMPARE_LEFT: Rgba8 = Rgba8::rgb(0x4f, 0xc3, 0xf7);
pub(crate) const COMPARE_RIGHT: Rgba8 = Rgba8::rgb(0xff, 0x7a, 0x8a);

/// Eigen bar colors, cycled by eigenvalue index.
pub(crate) const EIGEN_BARS: [Rgba8; 5] = [
    Rgba8::rgb(0x4f, 0xc3, 0xf7),
    Rgba8::rgb(0x81, 0xc7, 0x84),
    Rgba8::rgb(0xff, 0xd5, 0x4f),
    Rgba8::rgb(0xff, 0x8a, 0x65),
    Rgba8::rgb(0xba, 0x68, 0xc8),
];

pub(crate) fn eigen_bar_color(i: usize) -> Rgba8 {
    EIGEN_BARS[i % EIGEN_BARS.len()]
}

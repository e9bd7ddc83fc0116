use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Point, Rect, Vec2};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by [`crate::CpuSurface`] are **premultiplied alpha**; the flag makes this
/// explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Stable 64-bit fingerprint of the dimensions and pixels.
    ///
    /// Two renders of the same `(run, time, options, canvas)` must produce equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = xxhash_rust::xxh3::Xxh3::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(&[u8::from(self.premultiplied)]);
        hasher.update(&self.data);
        hasher.digest()
    }

    /// RGBA bytes of pixel `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Drawing primitives the frame renderer is written against.
///
/// Coordinates are in pixels, relative to the current transform (see [`DrawSurface::translate`]).
/// Implementations must be deterministic: the same call sequence yields the same pixels.
pub trait DrawSurface {
    /// Full surface size in pixels.
    fn canvas(&self) -> Canvas;

    /// Fill the whole surface with `color`, ignoring transform and clip.
    fn clear(&mut self, color: Rgba8);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);

    /// Stroke a straight segment with round caps.
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8);

    /// Draw single-line text with its top-left corner at `origin`.
    ///
    /// Surfaces without a font treat this as a no-op.
    fn draw_text(&mut self, origin: Point, text: &str, size_px: f32, color: Rgba8);

    /// Restrict drawing to `rect` until the matching [`DrawSurface::pop_clip`].
    fn push_clip(&mut self, rect: Rect);

    /// Undo the most recent [`DrawSurface::push_clip`].
    fn pop_clip(&mut self);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop the transform pushed by the matching [`DrawSurface::save`].
    fn restore(&mut self);

    /// Offset subsequent drawing by `offset`.
    fn translate(&mut self, offset: Vec2);
}

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rectangle covering the whole canvas in local coordinates.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Fixed data-space to screen-space mapping used by every renderer layer.
///
/// `screen = center + (x * scale, -y * scale)` with `center = (w/2, h/2)` and
/// `scale = min(w, h) / 4`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
    /// Screen-space origin of the data-space `(0, 0)`.
    pub center: Point,
    /// Pixels per data-space unit.
    pub scale: f64,
}

impl ScreenTransform {
    /// Build the transform for a canvas.
    pub fn for_canvas(canvas: Canvas) -> Self {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        Self {
            center: Point::new(w / 2.0, h / 2.0),
            scale: w.min(h) / 4.0,
        }
    }

    /// Map a data-space point to screen space.
    pub fn apply(self, x: f64, y: f64) -> Point {
        Point::new(
            self.center.x + x * self.scale,
            self.center.y - y * self.scale,
        )
    }

    /// Same mapping as an [`Affine`].
    pub fn as_affine(self) -> Affine {
        Affine::new([self.scale, 0.0, 0.0, -self.scale, self.center.x, self.center.y])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

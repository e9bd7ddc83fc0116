use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Vec2};
use crate::foundation::error::{TrajError, TrajResult};
use crate::render::surface::{DrawSurface, FrameRGBA};
use crate::render::text::{Font, TextLayoutEngine};
use kurbo::Shape;

const CURVE_TOLERANCE: f64 = 0.1;

/// [`DrawSurface`] rasterized on the CPU by `vello_cpu`.
///
/// The render context and target pixmap are reused across frames: call
/// [`CpuSurface::begin_frame`] before drawing and [`CpuSurface::finish`] to read pixels back.
pub struct CpuSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    transform: Affine,
    saved: Vec<Affine>,
    clip_depth: usize,
    text: Option<TextLayoutEngine>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("has_font", &self.text.is_some())
            .finish()
    }
}

impl CpuSurface {
    /// Allocate a surface; both dimensions must fit in `u16` and be non-zero.
    pub fn new(canvas: Canvas) -> TrajResult<Self> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| TrajError::render("surface width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| TrajError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(TrajError::render("surface dimensions must be non-zero"));
        }
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            transform: Affine::IDENTITY,
            saved: Vec::new(),
            clip_depth: 0,
            text: None,
        })
    }

    /// Enable text drawing with `font`.
    pub fn with_font(mut self, font: &Font) -> TrajResult<Self> {
        self.text = Some(TextLayoutEngine::new(font)?);
        Ok(self)
    }

    /// Attach `font` when present.
    pub fn with_optional_font(self, font: Option<&Font>) -> TrajResult<Self> {
        match font {
            Some(f) => self.with_font(f),
            None => Ok(self),
        }
    }

    /// Discard pending drawing and reset transform / clip state.
    pub fn begin_frame(&mut self) {
        self.ctx.reset();
        self.transform = Affine::IDENTITY;
        self.saved.clear();
        self.clip_depth = 0;
    }

    /// Rasterize everything drawn since [`CpuSurface::begin_frame`] and read it back.
    pub fn finish(&mut self) -> FrameRGBA {
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn prepare(&mut self, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }
}

impl DrawSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, color: Rgba8) {
        let saved = self.transform;
        self.transform = Affine::IDENTITY;
        self.prepare(color);
        self.ctx.fill_rect(&rect_to_cpu(self.canvas.rect()));
        self.transform = saved;
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.prepare(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if color.a == 0 || radius.is_nan() || radius <= 0.0 || !center.is_finite() {
            return;
        }
        let circle = kurbo::Circle::new(center, radius);
        let mut p = vello_cpu::kurbo::BezPath::new();
        for el in circle.path_elements(CURVE_TOLERANCE) {
            push_el(&mut p, el);
        }
        self.prepare(color);
        self.ctx.fill_path(&p);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        if color.a == 0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let mut p = vello_cpu::kurbo::BezPath::new();
        p.move_to(point_to_cpu(from));
        p.line_to(point_to_cpu(to));
        self.prepare(color);
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width).with_caps(vello_cpu::kurbo::Cap::Round),
        );
        self.ctx.stroke_path(&p);
    }

    fn draw_text(&mut self, origin: Point, text: &str, size_px: f32, color: Rgba8) {
        let Some(mut engine) = self.text.take() else {
            tracing::trace!(text, "no font attached; skipping text");
            return;
        };
        match engine.layout_line(text, size_px, color) {
            Ok(layout) => {
                self.ctx.set_transform(affine_to_cpu(
                    self.transform * Affine::translate(origin.to_vec2()),
                ));
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        self.ctx
                            .glyph_run(engine.font_data())
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "text layout failed"),
        }
        self.text = Some(engine);
    }

    fn push_clip(&mut self, rect: Rect) {
        let mut p = vello_cpu::kurbo::BezPath::new();
        for el in rect.path_elements(CURVE_TOLERANCE) {
            push_el(&mut p, el);
        }
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.push_clip_layer(&p);
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            return;
        }
        self.ctx.pop_layer();
        self.clip_depth -= 1;
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform *= Affine::translate(offset);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn push_el(out: &mut vello_cpu::kurbo::BezPath, el: kurbo::PathEl) {
    use kurbo::PathEl;

    match el {
        PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
        PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
        PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
        PathEl::CurveTo(p1, p2, p3) => {
            out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
        }
        PathEl::ClosePath => out.close_path(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

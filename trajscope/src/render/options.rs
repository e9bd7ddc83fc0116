use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use serde::{Deserialize, Serialize};

/// Per-request rendering and export options.
///
/// Treated as an immutable value: derive variants with the `with_*` copy-with-override methods
/// (e.g. to give each comparison panel its own label and accent).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Sequence frames per second.
    pub fps: u32,
    /// Sequence duration in seconds.
    pub duration_secs: f64,
    /// Optional caption drawn near the top-left.
    pub label: Option<String>,
    /// Optional accent color for the trajectory, marker glow and label.
    pub accent: Option<Rgba8>,
    /// Draw evaluator vectors.
    pub show_evaluators: bool,
    /// Draw the time / geometry / scalar readout.
    pub show_metrics: bool,
    /// Draw the eigen-spectrum bar chart.
    pub show_eigen: bool,
    /// Draw start / end annotations.
    pub show_annotations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            duration_secs: 10.0,
            label: None,
            accent: None,
            show_evaluators: true,
            show_metrics: true,
            show_eigen: true,
            show_annotations: true,
        }
    }
}

impl RenderOptions {
    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Copy with a different label.
    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..self.clone()
        }
    }

    /// Copy without a label.
    pub fn without_label(&self) -> Self {
        Self {
            label: None,
            ..self.clone()
        }
    }

    /// Copy with a different accent color.
    pub fn with_accent(&self, accent: Rgba8) -> Self {
        Self {
            accent: Some(accent),
            ..self.clone()
        }
    }

    /// Copy with a different output size.
    pub fn with_size(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Copy with different sequence timing.
    pub fn with_timing(&self, fps: u32, duration_secs: f64) -> Self {
        Self {
            fps,
            duration_secs,
            ..self.clone()
        }
    }

    /// Copy with every overlay toggled to `on`.
    pub fn with_overlays(&self, on: bool) -> Self {
        Self {
            show_evaluators: on,
            show_metrics: on,
            show_eigen: on,
            show_annotations: on,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/options.rs"]
mod tests;

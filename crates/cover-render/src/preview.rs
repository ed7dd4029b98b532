//! Preview surface: canvas-level settings projected onto the preview card,
//! plus the scale that fits the card into the stage.

use cover_core::Document;
use serde::Serialize;

use crate::gradient::BackgroundGradients;

/// Space available to the preview card, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Stage client size minus the breathing room around the card.
    pub fn from_stage(stage_width: f64, stage_height: f64, inset: f64) -> Self {
        Self {
            width: (stage_width - inset).max(0.0),
            height: (stage_height - inset).max(0.0),
        }
    }
}

/// `min(avail_w / w, avail_h / h, 1)`. A zero-area canvas keeps scale 1.
pub fn fit_scale(width: u32, height: u32, viewport: Viewport) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    (viewport.width / f64::from(width))
        .min(viewport.height / f64::from(height))
        .min(1.0)
        .max(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSurface {
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    pub background_color: String,
    pub background_image: String,
    pub texture_visible: bool,
    pub size_label: String,
    pub scale: f64,
}

impl PreviewSurface {
    /// Inline styles for the preview card element.
    pub fn styles(&self) -> Vec<(&'static str, String)> {
        vec![
            ("width", format!("{}px", self.width)),
            ("height", format!("{}px", self.height)),
            ("border-radius", format!("{}px", self.radius)),
            ("background-color", self.background_color.clone()),
            ("background-image", self.background_image.clone()),
            // Full precision: pointer math divides by the same value.
            ("transform", format!("scale({})", self.scale)),
        ]
    }
}

pub fn render_preview(doc: &Document, viewport: Viewport) -> PreviewSurface {
    let gradients = BackgroundGradients::for_canvas(doc.width, doc.height, &doc.background);
    PreviewSurface {
        width: doc.width,
        height: doc.height,
        radius: doc.radius,
        background_color: doc.background.c3.to_hex(),
        background_image: gradients.to_css(),
        texture_visible: doc.texture,
        size_label: format!("{} x {}", doc.width, doc.height),
        scale: fit_scale(doc.width, doc.height, viewport),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scale_never_exceeds_one() {
        assert_eq!(fit_scale(980, 320, Viewport::new(4000.0, 4000.0)), 1.0);
        assert_eq!(fit_scale(1000, 500, Viewport::new(500.0, 500.0)), 0.5);
        assert_eq!(fit_scale(1000, 1000, Viewport::new(800.0, 250.0)), 0.25);
    }

    #[test]
    fn zero_canvas_keeps_unit_scale() {
        assert_eq!(fit_scale(0, 320, Viewport::new(10.0, 10.0)), 1.0);
    }

    #[test]
    fn stage_inset_is_subtracted() {
        let vp = Viewport::from_stage(1064.0, 384.0, 64.0);
        assert_eq!(vp, Viewport::new(1000.0, 320.0));
        assert_eq!(Viewport::from_stage(10.0, 10.0, 64.0), Viewport::new(0.0, 0.0));
    }

    #[test]
    fn surface_reflects_document() {
        let mut doc = cover_core::Document::default();
        doc.texture = true;
        let surface = render_preview(&doc, Viewport::new(490.0, 800.0));
        assert_eq!(surface.size_label, "980 x 320");
        assert_eq!(surface.background_color, "#f8f9fa");
        assert_eq!(surface.scale, 0.5);
        assert!(surface.texture_visible);
        assert_eq!(surface.styles()[5], ("transform", "scale(0.5)".to_string()));
    }
}

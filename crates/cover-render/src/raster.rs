//! Raster export.
//!
//! [`raster_plan`] lists the paint operations in order: base fill, the two
//! glows, every text line (top baseline, so the glyph top sits at the
//! stored y), then images. The browser runs the plan on a Canvas2D context
//! and calls `toDataURL(mime, 0.95)`. Native builds rasterize the SVG export
//! through resvg and encode PNG/JPEG directly (feature `raster`).

use cover_core::model::*;
use cover_core::Color;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::gradient::{BackgroundGradients, RadialGlow};

/// Quality passed to `toDataURL` for JPEG.
pub const JPEG_QUALITY: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Some(RasterFormat::Png),
            "jpeg" | "jpg" => Some(RasterFormat::Jpeg),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpeg",
        }
    }

    /// Download name: `cover.png` / `cover.jpeg`.
    pub fn file_name(&self) -> String {
        format!("cover.{}", self.extension())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RasterOp {
    FillRect {
        rect: Rect,
        color: Color,
    },
    RadialFill {
        rect: Rect,
        glow: RadialGlow,
    },
    /// One line of text, top baseline at `y`.
    FillText {
        x: f64,
        y: f64,
        font: String,
        color: String,
        text: String,
    },
    DrawImage {
        rect: Rect,
        src: String,
    },
}

pub fn raster_plan(doc: &Document) -> Vec<RasterOp> {
    let gradients = BackgroundGradients::for_canvas(doc.width, doc.height, &doc.background);
    let canvas = Rect::new(0.0, 0.0, gradients.width, gradients.height);

    let mut ops = vec![RasterOp::FillRect {
        rect: canvas,
        color: gradients.base,
    }];
    ops.extend(gradients.glows.iter().map(|glow| RasterOp::RadialFill {
        rect: canvas,
        glow: *glow,
    }));

    for t in &doc.texts {
        let font = t.css_font();
        let step = f64::from(t.font_size) * LINE_HEIGHT;
        for (i, line) in t.lines().enumerate() {
            ops.push(RasterOp::FillText {
                x: t.x,
                y: t.y + i as f64 * step,
                font: font.clone(),
                color: t.color.clone(),
                text: line.to_string(),
            });
        }
    }

    for img in &doc.images {
        ops.push(RasterOp::DrawImage {
            rect: Rect::from_origin_size((img.x, img.y), (img.width, img.height)),
            src: img.src.clone(),
        });
    }

    ops
}

#[cfg(feature = "raster")]
pub use native::encode;

#[cfg(feature = "raster")]
mod native {
    use super::RasterFormat;
    use crate::error::{ExportError, ExportResult};
    use crate::svg::write_svg;
    use cover_core::Document;
    use image::ImageEncoder;

    /// Rasterize the document and encode it in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-area canvas or if encoding fails.
    pub fn encode(doc: &Document, format: RasterFormat) -> ExportResult<Vec<u8>> {
        if doc.width == 0 || doc.height == 0 {
            return Err(ExportError::EmptyCanvas {
                width: doc.width,
                height: doc.height,
            });
        }

        // The bitmap is a full rectangle; only the SVG keeps rounded corners.
        let pixmap = rasterize_svg(&write_svg(doc, 0))?;
        log::debug!(
            "rasterized {}x{} cover as {}",
            pixmap.width(),
            pixmap.height(),
            format.extension()
        );

        match format {
            RasterFormat::Png => pixmap.encode_png().map_err(|e| ExportError::Encode {
                format: "PNG",
                message: e.to_string(),
            }),
            RasterFormat::Jpeg => encode_jpeg(&pixmap, doc),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn encode_jpeg(pixmap: &tiny_skia::Pixmap, doc: &Document) -> ExportResult<Vec<u8>> {
        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = doc.background.c3;
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        // Pixmap data is premultiplied, so flattening is `px + bg * (1 - a)`.
        for px in pixmap.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(px[3]) / 255.0;
            for (c, b) in px[..3].iter().zip([bg.r, bg.g, bg.b]) {
                rgb.push(f32::from(b).mul_add(inv, f32::from(*c)).round().min(255.0) as u8);
            }
        }

        let quality = (super::JPEG_QUALITY * 100.0).round() as u8;
        let mut buf = std::io::Cursor::new(Vec::new());
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
            .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| ExportError::Encode {
                format: "JPEG",
                message: e.to_string(),
            })?;
        Ok(buf.into_inner())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg: &str) -> ExportResult<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();
        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| ExportError::Svg(e.to_string()))?;

        let width = tree.size().width().ceil() as u32;
        let height = tree.size().height().ceil() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width.max(1), height.max(1))
            .ok_or(ExportError::Pixmap { width, height })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_core::LayerId;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats() {
        assert_eq!(RasterFormat::parse("JPG"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::parse("gif"), None);
        assert_eq!(RasterFormat::Png.file_name(), "cover.png");
        assert_eq!(RasterFormat::Jpeg.file_name(), "cover.jpeg");
        assert_eq!(RasterFormat::Jpeg.mime(), "image/jpeg");
    }

    #[test]
    fn plan_order_background_then_text() {
        let doc = Document::default();
        let ops = raster_plan(&doc);
        assert_eq!(ops.len(), 6);
        assert!(matches!(&ops[0], RasterOp::FillRect { color, .. } if color.to_hex() == "#f8f9fa"));
        assert!(matches!(&ops[1], RasterOp::RadialFill { glow, .. } if glow.alpha == 0.7));
        assert!(matches!(&ops[2], RasterOp::RadialFill { glow, .. } if glow.alpha == 0.6));
        assert_eq!(
            ops[4],
            RasterOp::FillText {
                x: 36.0,
                y: 120.0,
                font: "normal 600 64px Inter, sans-serif".into(),
                color: "#0A1220".into(),
                text: "GPT-5 vs. Claude Opus 4.1".into(),
            }
        );
    }

    #[test]
    fn multiline_text_and_images() {
        let mut doc = Document::default();
        doc.texts.truncate(1);
        doc.texts[0].text = "one\ntwo".into();
        doc.texts[0].font_size = 20;
        doc.images.push(ImageLayer::new(
            LayerId::intern("plan-img"),
            10.0,
            10.0,
            50.0,
            60.0,
            "data:x".into(),
        ));
        let ops = raster_plan(&doc);
        assert!(matches!(&ops[4], RasterOp::FillText { y, text, .. } if *y == 28.0 + 24.0 && text == "two"));
        assert_eq!(
            ops[5],
            RasterOp::DrawImage {
                rect: Rect::new(10.0, 10.0, 60.0, 70.0),
                src: "data:x".into(),
            }
        );
    }
}

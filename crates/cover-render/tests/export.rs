//! Integration tests: SVG and raster export of a document.
//!
//! Checks that the three projections (CSS preview, SVG, raster plan) agree
//! on background geometry and that native encoding produces real files.

use cover_core::Color;
use cover_core::model::*;
use cover_render::gradient::BackgroundGradients;
use cover_render::preview::{Viewport, render_preview};
use cover_render::raster::{RasterFormat, RasterOp, raster_plan};
use cover_render::svg::export_svg;
use pretty_assertions::assert_eq;

fn square_doc() -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut doc = Document::default();
    doc.width = 1080;
    doc.height = 1080;
    doc.background.c1 = Color::from_u32(0xff0000);
    doc
}

/// Value of `name="..."` on the first `<svg` element.
fn root_attr(svg: &str, name: &str) -> Option<String> {
    let start = svg.find("<svg")?;
    let tag = &svg[start..start + svg[start..].find('>')?];
    let needle = format!(" {name}=\"");
    let from = tag.find(&needle)? + needle.len();
    let len = tag[from..].find('"')?;
    Some(tag[from..from + len].to_string())
}

// ─── SVG ────────────────────────────────────────────────────────────────

#[test]
fn svg_root_dimensions_match_canvas() {
    let svg = export_svg(&square_doc());
    assert_eq!(root_attr(&svg, "width").as_deref(), Some("1080"));
    assert_eq!(root_attr(&svg, "height").as_deref(), Some("1080"));
    assert_eq!(root_attr(&svg, "xmlns").as_deref(), Some("http://www.w3.org/2000/svg"));
}

#[test]
fn svg_text_content_is_escaped() {
    let mut doc = square_doc();
    doc.texts[0].text = "R&D <beta> \"quoted\"".into();
    let svg = export_svg(&doc);
    assert!(svg.contains("R&amp;D &lt;beta&gt; &quot;quoted&quot;"));
    assert!(!svg.contains("<beta>"));
}

// ─── Consistency ────────────────────────────────────────────────────────

#[test]
fn projections_share_background_geometry() {
    let doc = square_doc();
    let gradients = BackgroundGradients::for_canvas(doc.width, doc.height, &doc.background);

    let css = render_preview(&doc, Viewport::new(2000.0, 2000.0)).background_image;
    assert!(css.starts_with("radial-gradient(circle at 85% 20%, rgba(255, 0, 0, 0.7) 0px, rgba(255, 0, 0, 0) 432px)"));

    let svg = export_svg(&doc);
    assert!(svg.contains("cx=\"918\" cy=\"216\" r=\"432\""));
    assert!(svg.contains("cx=\"162\" cy=\"864\" r=\"540\""));

    let glows: Vec<_> = raster_plan(&doc)
        .into_iter()
        .filter_map(|op| match op {
            RasterOp::RadialFill { glow, .. } => Some(glow),
            _ => None,
        })
        .collect();
    assert_eq!(glows, gradients.glows.to_vec());
}

// ─── Native encoding ────────────────────────────────────────────────────

#[cfg(feature = "raster")]
mod native {
    use super::*;
    use cover_render::error::ExportError;
    use cover_render::raster::encode;
    use pretty_assertions::assert_eq;

    #[test]
    fn png_has_canvas_dimensions() {
        let mut doc = square_doc();
        doc.width = 120;
        doc.height = 60;
        let bytes = encode(&doc, RasterFormat::Png).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (120, 60));
    }

    #[test]
    fn jpeg_is_opaque_and_sized() {
        let mut doc = square_doc();
        doc.width = 64;
        doc.height = 32;
        let bytes = encode(&doc, RasterFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (64, 32));
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let mut doc = square_doc();
        doc.width = 0;
        assert!(matches!(
            encode(&doc, RasterFormat::Png),
            Err(ExportError::EmptyCanvas { width: 0, .. })
        ));
    }
}

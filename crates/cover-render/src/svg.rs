//! SVG export.
//!
//! Background rects and the two glows use the same geometry as the live
//! preview ([`BackgroundGradients`]), in user space so the radii are real
//! canvas units. Text is anchored by its top edge at the stored y, like the
//! preview and the raster export.

use cover_core::model::*;

use crate::gradient::BackgroundGradients;
use crate::num;

/// Escape `&`, `<`, `>` and `"` for text content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Download name for the vector export: `cover_{w}x{h}.svg`.
pub fn svg_file_name(doc: &Document) -> String {
    format!("cover_{}x{}.svg", doc.width, doc.height)
}

/// Render the document as a standalone SVG document.
pub fn export_svg(doc: &Document) -> String {
    write_svg(doc, doc.radius)
}

/// Render with an explicit corner radius (the raster path draws square).
pub(crate) fn write_svg(doc: &Document, radius: u32) -> String {
    let (w, h) = (doc.width, doc.height);
    let gradients = BackgroundGradients::for_canvas(w, h, &doc.background);
    let mut svg = String::with_capacity(2048);

    svg.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
    ));

    svg.push_str("  <defs>\n");
    for (i, glow) in gradients.glows.iter().enumerate() {
        let color = glow.color.to_hex();
        svg.push_str(&format!(
            "    <radialGradient id=\"grad{}\" gradientUnits=\"userSpaceOnUse\" cx=\"{}\" cy=\"{}\" r=\"{}\">\n",
            i + 1,
            num(glow.center.x),
            num(glow.center.y),
            num(glow.radius),
        ));
        svg.push_str(&format!(
            "      <stop offset=\"0%\" stop-color=\"{color}\" stop-opacity=\"{}\" />\n",
            glow.alpha
        ));
        svg.push_str(&format!(
            "      <stop offset=\"100%\" stop-color=\"{color}\" stop-opacity=\"0\" />\n"
        ));
        svg.push_str("    </radialGradient>\n");
    }
    svg.push_str("    <style>\n");
    svg.push_str(
        "      .card{font-family: system-ui, -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; fill:#0A1220}\n",
    );
    svg.push_str("    </style>\n");
    svg.push_str("  </defs>\n");

    for fill in [gradients.base.to_hex(), "url(#grad1)".into(), "url(#grad2)".into()] {
        svg.push_str(&format!(
            "  <rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{fill}\" />\n"
        ));
    }

    svg.push_str("  <g class=\"card\">\n");
    for t in &doc.texts {
        write_text(&mut svg, t);
    }
    for img in &doc.images {
        svg.push_str(&format!(
            "    <image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid slice\" />\n",
            escape_xml(&img.src),
            num(img.x),
            num(img.y),
            num(img.width),
            num(img.height),
        ));
    }
    svg.push_str("  </g>\n");
    svg.push_str("</svg>\n");
    svg
}

fn write_text(svg: &mut String, t: &TextLayer) {
    let x = num(t.x);
    svg.push_str(&format!(
        "    <text x=\"{x}\" y=\"{}\" dominant-baseline=\"text-before-edge\" xml:space=\"preserve\" style=\"{}\">",
        num(t.y),
        escape_xml(&format!(
            "font-size:{}px; font-weight:{}; font-style:{}; font-family:{}; fill:{}",
            t.font_size,
            t.font_weight,
            t.font_style.as_css(),
            t.font_family,
            t.color
        )),
    ));

    let lines: Vec<&str> = t.lines().collect();
    if let [single] = lines.as_slice() {
        svg.push_str(&escape_xml(single));
    } else {
        let step = num(f64::from(t.font_size) * LINE_HEIGHT);
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { "0".to_string() } else { step.clone() };
            svg.push_str(&format!(
                "<tspan x=\"{x}\" dy=\"{dy}\">{}</tspan>",
                escape_xml(line)
            ));
        }
    }
    svg.push_str("</text>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_core::LayerId;

    #[test]
    fn escapes_metacharacters() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & Jerry</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&lt;/a&gt;"
        );
        assert_eq!(escape_xml("plain 'quotes'"), "plain 'quotes'");
    }

    #[test]
    fn document_skeleton() {
        let doc = Document::default();
        let svg = export_svg(&doc);
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(svg.contains("width=\"980\" height=\"320\" viewBox=\"0 0 980 320\""));
        assert!(svg.contains("<radialGradient id=\"grad1\" gradientUnits=\"userSpaceOnUse\" cx=\"833\" cy=\"64\" r=\"128\">"));
        assert!(svg.contains("<radialGradient id=\"grad2\" gradientUnits=\"userSpaceOnUse\" cx=\"147\" cy=\"256\" r=\"160\">"));
        assert!(svg.contains("stop-opacity=\"0.7\""));
        assert!(svg.contains("<style>"));
        assert_eq!(svg.matches("<rect ").count(), 3);
        assert!(svg.contains("rx=\"22\" ry=\"22\" fill=\"#f8f9fa\""));
        assert_eq!(svg.matches("<text ").count(), 3);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_anchored_at_top() {
        let doc = Document::default();
        let svg = export_svg(&doc);
        assert!(svg.contains(
            "<text x=\"36\" y=\"120\" dominant-baseline=\"text-before-edge\""
        ));
        assert!(svg.contains("font-family:'Playfair Display', serif"));
    }

    #[test]
    fn multiline_text_uses_tspans() {
        let mut doc = Document::default();
        doc.texts[1].text = "a<b\nc".into();
        doc.texts[1].font_size = 10;
        let svg = export_svg(&doc);
        assert!(svg.contains("<tspan x=\"36\" dy=\"0\">a&lt;b</tspan><tspan x=\"36\" dy=\"12\">c</tspan>"));
    }

    #[test]
    fn images_are_exported() {
        let mut doc = Document::default();
        doc.images.push(ImageLayer::new(
            LayerId::intern("svg-img"),
            1.5,
            2.0,
            30.0,
            40.0,
            "data:image/png;base64,AA==".into(),
        ));
        let svg = export_svg(&doc);
        assert!(svg.contains(
            "<image href=\"data:image/png;base64,AA==\" x=\"1.5\" y=\"2\" width=\"30\" height=\"40\""
        ));
    }

    #[test]
    fn file_name_has_dimensions() {
        let mut doc = Document::default();
        doc.width = 1080;
        doc.height = 1080;
        assert_eq!(svg_file_name(&doc), "cover_1080x1080.svg");
    }
}

pub mod error;
pub mod gradient;
pub mod hit;
pub mod layers;
pub mod preview;
pub mod raster;
pub mod sidebar;
pub mod svg;
pub mod view;

pub use error::{ExportError, ExportResult};
pub use gradient::{BackgroundGradients, RadialGlow};
pub use hit::{EstimatedMeasure, Handle, HitTarget, Measure, hit_test, layer_bounds};
pub use layers::{LAYER_CONTAINER, handle_key, render_layers};
pub use preview::{PreviewSurface, Viewport, fit_scale, render_preview};
pub use raster::{JPEG_QUALITY, RasterFormat, RasterOp, raster_plan};
pub use sidebar::{
    LAYER_LIST, LayerListItem, PropsPanel, TextProps, layer_list, layer_list_view, props_panel,
};
pub use svg::{escape_xml, export_svg, svg_file_name};
pub use view::{Patch, ViewNode, diff};

/// Format a canvas coordinate for CSS/SVG: at most two decimals, no
/// trailing zeros (`36`, `240.5`, `33.33`).
pub(crate) fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::num;

    #[test]
    fn number_formatting() {
        assert_eq!(num(36.0), "36");
        assert_eq!(num(240.5), "240.5");
        assert_eq!(num(100.0 / 3.0), "33.33");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(-12.25), "-12.25");
    }
}

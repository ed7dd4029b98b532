use cover_core::model::LayerRef;
use cover_render::{EstimatedMeasure, Measure};
use kurbo::Size;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

/// Layer size from the rendered element's offset box. `offsetWidth` ignores
/// the preview card's CSS transform, so the result is in canvas units.
pub struct DomMeasure {
    doc: Document,
}

impl DomMeasure {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }
}

impl Measure for DomMeasure {
    fn measure(&self, layer: LayerRef<'_>) -> Size {
        self.doc
            .get_element_by_id(layer.id().as_str())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(|el| Size::new(f64::from(el.offset_width()), f64::from(el.offset_height())))
            // Not rendered yet.
            .unwrap_or_else(|| EstimatedMeasure.measure(layer))
    }
}

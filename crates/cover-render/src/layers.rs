//! Layer view: one absolutely positioned element per layer.
//!
//! Texts come first, then images. The selected layer carries the
//! `selected` class and four gizmo handle children keyed
//! `{id}-handle-{tl,tr,bl,br}`. Every element carries `data-layer` (and
//! handles `data-handle`) so the host can map DOM events back to a
//! [`HitTarget`](crate::hit::HitTarget).

use cover_core::model::*;
use cover_core::LayerId;

use crate::hit::Handle;
use crate::num;
use crate::view::ViewNode;

/// Key of the container element holding the layers.
pub const LAYER_CONTAINER: &str = "textLayerContainer";

pub fn render_layers(doc: &Document) -> ViewNode {
    let root = ViewNode::div(LAYER_CONTAINER).class("layer-container");
    let root = doc
        .texts
        .iter()
        .fold(root, |root, t| root.child(text_node(t, doc.selected == Some(t.id))));
    doc.images
        .iter()
        .fold(root, |root, i| root.child(image_node(i, doc.selected == Some(i.id))))
}

fn text_node(t: &TextLayer, selected: bool) -> ViewNode {
    let node = ViewNode::div(t.id.as_str())
        .class("text-layer")
        .attr("data-layer", t.id.as_str())
        .style("left", format!("{}px", num(t.x)))
        .style("top", format!("{}px", num(t.y)))
        .style("font-size", format!("{}px", t.font_size))
        .style("color", t.color.as_str())
        .style("font-weight", t.font_weight.to_string())
        .style("font-style", t.font_style.as_css())
        .style("font-family", t.font_family.as_str())
        .style("white-space", "pre")
        .text(t.text.as_str());
    decorate(node, t.id, selected)
}

fn image_node(img: &ImageLayer, selected: bool) -> ViewNode {
    let mut node = ViewNode::div(img.id.as_str())
        .class("image-layer")
        .attr("data-layer", img.id.as_str())
        .style("position", "absolute")
        .style("left", format!("{}px", num(img.x)))
        .style("top", format!("{}px", num(img.y)))
        .style("width", format!("{}px", num(img.width)))
        .style("height", format!("{}px", num(img.height)))
        .style("background-image", format!("url({})", img.src))
        .style("background-size", "cover")
        .style("cursor", "move")
        .style("user-select", "none");
    if selected {
        node = node.style("outline", "1px solid #BFC7FF");
    }
    decorate(node, img.id, selected)
}

fn decorate(node: ViewNode, id: LayerId, selected: bool) -> ViewNode {
    if !selected {
        return node;
    }
    Handle::ALL
        .into_iter()
        .fold(node.class("selected"), |node, h| node.child(handle_node(id, h)))
}

fn handle_node(id: LayerId, handle: Handle) -> ViewNode {
    ViewNode::div(handle_key(id, handle))
        .class("gizmo-handle")
        .class(format!("handle-{}", handle.as_str()))
        .attr("data-layer", id.as_str())
        .attr("data-handle", handle.as_str())
}

pub fn handle_key(id: LayerId, handle: Handle) -> String {
    format!("{id}-handle-{}", handle.as_str())
}

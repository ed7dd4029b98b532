//! Applying view patches and editor effects to the live DOM.
//!
//! Every managed element carries its view key as its `id`, so patches look
//! elements up by id. Child indices in patches count element children only.

use cover_core::LayerId;
use cover_editor::SnapGuides;
use cover_render::{Patch, PreviewSurface, PropsPanel, ViewNode};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Node};

/// Element ids the page provides.
pub mod ids {
    pub const PREVIEW: &str = "preview";
    pub const SIZE_LABEL: &str = "curSize";
    pub const TEXTURE: &str = "textureOverlay";
    pub const PROPS_PANEL: &str = "propsPanel";
    pub const PROP_TEXT: &str = "propText";
    pub const PROP_SIZE: &str = "propSize";
    pub const PROP_COLOR: &str = "propColor";
    pub const PROP_WEIGHT: &str = "propWeight";
    pub const PROP_STYLE: &str = "propStyle";
    pub const PROP_FONT: &str = "propFont";
    pub const GUIDE_V: &str = "snapGuideV";
    pub const GUIDE_H: &str = "snapGuideH";
}

const GUIDE_STYLE: &str = "position:absolute; width:1px; background:#ff0044; z-index:9999; \
     display:none; pointer-events:none; box-shadow:0 0 2px rgba(255,255,255,0.5);";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn element(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{id}")))
}

fn html(el: &Element) -> Result<&HtmlElement, JsValue> {
    el.dyn_ref::<HtmlElement>()
        .ok_or_else(|| JsValue::from_str("not an HTML element"))
}

pub fn set_style(el: &Element, name: &str, value: &str) -> Result<(), JsValue> {
    html(el)?.style().set_property(name, value)
}

// ─── Patches ─────────────────────────────────────────────────────────────

pub fn apply_patches(doc: &Document, patches: &[Patch]) -> Result<(), JsValue> {
    for patch in patches {
        apply_patch(doc, patch)?;
    }
    Ok(())
}

fn apply_patch(doc: &Document, patch: &Patch) -> Result<(), JsValue> {
    match patch {
        Patch::Insert {
            parent,
            index,
            node,
        } => {
            let parent = element(doc, parent)?;
            let el = build(doc, node)?;
            insert_at(&parent, &el, *index)
        }
        Patch::Remove { key } => {
            if let Some(el) = doc.get_element_by_id(key) {
                el.remove();
            }
            Ok(())
        }
        Patch::Move { parent, key, index } => {
            let parent = element(doc, parent)?;
            let el = element(doc, key)?;
            insert_at(&parent, &el, *index)
        }
        Patch::Replace { key, node } => {
            let old = element(doc, key)?;
            let el = build(doc, node)?;
            old.replace_with_with_node_1(&el)
        }
        Patch::SetClasses { key, classes } => {
            element(doc, key)?.set_class_name(&classes.join(" "));
            Ok(())
        }
        Patch::SetStyle { key, name, value } => set_style(&element(doc, key)?, name, value),
        Patch::RemoveStyle { key, name } => {
            html(&element(doc, key)?)?.style().remove_property(name)?;
            Ok(())
        }
        Patch::SetAttr { key, name, value } => element(doc, key)?.set_attribute(name, value),
        Patch::RemoveAttr { key, name } => element(doc, key)?.remove_attribute(name),
        Patch::SetText { key, text } => {
            set_text(doc, &element(doc, key)?, text.as_deref().unwrap_or(""))
        }
    }
}

/// Place `el` as element child `index` of `parent` (appending past the end).
fn insert_at(parent: &Element, el: &Element, index: usize) -> Result<(), JsValue> {
    let reference = u32::try_from(index)
        .ok()
        .and_then(|i| parent.children().item(i));
    if reference.as_ref() == Some(el) {
        return Ok(());
    }
    let reference: Option<&Node> = reference.as_ref().map(|r| r.as_ref());
    parent.insert_before(el, reference)?;
    Ok(())
}

fn build(doc: &Document, node: &ViewNode) -> Result<Element, JsValue> {
    let el = doc.create_element(node.tag)?;
    el.set_id(&node.key);
    el.set_class_name(&node.classes.join(" "));
    for (name, value) in &node.attrs {
        el.set_attribute(name, value)?;
    }
    for (name, value) in &node.styles {
        set_style(&el, name, value)?;
    }
    if let Some(text) = &node.text {
        el.append_child(&doc.create_text_node(text))?;
    }
    for child in &node.children {
        el.append_child(build(doc, child)?.as_ref())?;
    }
    Ok(el)
}

/// Replace the element's own text while keeping its managed children
/// (gizmo handles). Stray nodes left by inline editing (`<br>`, `<div>`,
/// split text nodes) are dropped.
pub fn set_text(doc: &Document, el: &Element, text: &str) -> Result<(), JsValue> {
    let nodes = el.child_nodes();
    let mut stray = Vec::new();
    for i in 0..nodes.length() {
        let Some(node) = nodes.get(i) else { continue };
        let managed = node
            .dyn_ref::<Element>()
            .is_some_and(|child| !child.id().is_empty());
        if !managed {
            stray.push(node);
        }
    }
    for node in stray {
        el.remove_child(&node)?;
    }
    if !text.is_empty() {
        let first = el.first_child();
        el.insert_before(&doc.create_text_node(text), first.as_ref())?;
    }
    Ok(())
}

// ─── Preview card ────────────────────────────────────────────────────────

pub fn apply_preview(doc: &Document, surface: &PreviewSurface) -> Result<(), JsValue> {
    let preview = element(doc, ids::PREVIEW)?;
    for (name, value) in surface.styles() {
        set_style(&preview, name, &value)?;
    }
    if let Some(label) = doc.get_element_by_id(ids::SIZE_LABEL) {
        label.set_text_content(Some(&surface.size_label));
    }
    if let Some(texture) = doc.get_element_by_id(ids::TEXTURE) {
        let display = if surface.texture_visible { "block" } else { "none" };
        set_style(&texture, "display", display)?;
    }
    Ok(())
}

// ─── Direct element updates ──────────────────────────────────────────────

pub fn move_element(doc: &Document, id: LayerId, x: f64, y: f64) -> Result<(), JsValue> {
    let el = element(doc, id.as_str())?;
    set_style(&el, "left", &format!("{x}px"))?;
    set_style(&el, "top", &format!("{y}px"))
}

pub fn resize_element(
    doc: &Document,
    id: LayerId,
    font_size: Option<u32>,
    rect: [Option<f64>; 4],
) -> Result<(), JsValue> {
    let el = element(doc, id.as_str())?;
    if let Some(size) = font_size {
        set_style(&el, "font-size", &format!("{size}px"))?;
    }
    for (name, value) in ["left", "top", "width", "height"].into_iter().zip(rect) {
        if let Some(v) = value {
            set_style(&el, name, &format!("{v}px"))?;
        }
    }
    Ok(())
}

fn guide(doc: &Document, id: &str, vertical: bool) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element("div")?;
    el.set_id(id);
    el.set_class_name(if vertical {
        "snap-guide v-guide"
    } else {
        "snap-guide h-guide"
    });
    el.set_attribute("style", GUIDE_STYLE)?;
    if vertical {
        set_style(&el, "top", "0")?;
        set_style(&el, "bottom", "0")?;
    } else {
        set_style(&el, "left", "0")?;
        set_style(&el, "right", "0")?;
        set_style(&el, "width", "auto")?;
        set_style(&el, "height", "1px")?;
    }
    element(doc, ids::PREVIEW)?.append_child(&el)?;
    Ok(el)
}

/// Show the guide lines (canvas units; the preview card is scaled as a whole).
pub fn show_guides(doc: &Document, guides: &SnapGuides) -> Result<(), JsValue> {
    let v = guide(doc, ids::GUIDE_V, true)?;
    match guides.vertical {
        Some(x) => {
            set_style(&v, "left", &format!("{x}px"))?;
            set_style(&v, "display", "block")?;
        }
        None => set_style(&v, "display", "none")?,
    }
    let h = guide(doc, ids::GUIDE_H, false)?;
    match guides.horizontal {
        Some(y) => {
            set_style(&h, "top", &format!("{y}px"))?;
            set_style(&h, "display", "block")?;
        }
        None => set_style(&h, "display", "none")?,
    }
    Ok(())
}

pub fn hide_guides(doc: &Document) -> Result<(), JsValue> {
    for id in [ids::GUIDE_V, ids::GUIDE_H] {
        if let Some(el) = doc.get_element_by_id(id) {
            set_style(&el, "display", "none")?;
        }
    }
    Ok(())
}

// ─── Inline editing ──────────────────────────────────────────────────────

/// Make the layer editable, focus it, and select its text. The selection
/// covers the leading text node only, so typing cannot delete the handles.
pub fn begin_inline_edit(doc: &Document, id: LayerId) -> Result<(), JsValue> {
    let el = element(doc, id.as_str())?;
    let html = html(&el)?;
    html.set_content_editable("true");
    set_style(&el, "cursor", "text")?;
    html.focus()?;

    let range = doc.create_range()?;
    match el
        .first_child()
        .filter(|n| n.node_type() == Node::TEXT_NODE)
    {
        Some(text) => range.select_node_contents(&text)?,
        None => {
            range.set_start(&el, 0)?;
            range.collapse_with_to_start(true);
        }
    }
    if let Some(selection) = web_sys::window()
        .map(|w| w.get_selection())
        .transpose()?
        .flatten()
    {
        selection.remove_all_ranges()?;
        selection.add_range(&range)?;
    }
    Ok(())
}

pub fn end_inline_edit(doc: &Document, id: LayerId, text: &str) -> Result<(), JsValue> {
    // The layer may have been deleted while it was being edited.
    let Some(el) = doc.get_element_by_id(id.as_str()) else {
        return Ok(());
    };
    html(&el)?.set_content_editable("false");
    set_style(&el, "cursor", "move")?;
    set_text(doc, &el, text)
}

pub fn insert_line_break(doc: &Document) -> Result<(), JsValue> {
    if let Some(html_doc) = doc.dyn_ref::<web_sys::HtmlDocument>() {
        html_doc.exec_command("insertLineBreak")?;
    }
    Ok(())
}

// ─── Properties panel ────────────────────────────────────────────────────

fn set_input(doc: &Document, id: &str, value: &str) {
    if let Some(input) = doc
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    } else if let Some(el) = doc.get_element_by_id(id) {
        // <select> and <textarea> expose `value` too.
        let _ = js_sys::Reflect::set(&el, &JsValue::from_str("value"), &JsValue::from_str(value));
    }
}

pub fn echo_font_size(doc: &Document, size: u32) {
    set_input(doc, ids::PROP_SIZE, &size.to_string());
}

pub fn apply_props(doc: &Document, props: &PropsPanel) -> Result<(), JsValue> {
    if let Some(panel) = doc.get_element_by_id(ids::PROPS_PANEL) {
        set_style(&panel, "display", if props.visible { "block" } else { "none" })?;
    }
    let Some(text) = &props.text else {
        return Ok(());
    };
    set_input(doc, ids::PROP_TEXT, &text.text);
    set_input(doc, ids::PROP_SIZE, &text.font_size.to_string());
    set_input(doc, ids::PROP_COLOR, &text.color);
    set_input(doc, ids::PROP_WEIGHT, &text.font_weight.to_string());
    set_input(doc, ids::PROP_STYLE, text.font_style.as_css());
    if let Some(label) = doc
        .get_element_by_id(ids::PROP_FONT)
        .and_then(|picker| picker.query_selector("span").ok().flatten())
    {
        label.set_text_content(Some(&text.font_label));
    }
    Ok(())
}

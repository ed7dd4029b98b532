//! Sidebar view models: the layer list and the text properties panel.

use cover_core::model::*;
use cover_core::presets;
use cover_core::LayerId;
use serde::Serialize;

use crate::view::ViewNode;

/// Key of the layer list container element.
pub const LAYER_LIST: &str = "layersList";

const LABEL_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerListItem {
    pub id: LayerId,
    pub label: String,
    pub active: bool,
}

/// Sidebar entries in paint order. Texts show their first 20 characters
/// (or `(Empty)`), images show `(Image)`.
pub fn layer_list(doc: &Document) -> Vec<LayerListItem> {
    doc.layers()
        .map(|layer| {
            let label = match layer {
                LayerRef::Text(t) if t.text.is_empty() => "(Empty)".to_string(),
                LayerRef::Text(t) => t.text.chars().take(LABEL_CHARS).collect(),
                LayerRef::Image(_) => "(Image)".to_string(),
            };
            LayerListItem {
                id: layer.id(),
                label,
                active: doc.selected == Some(layer.id()),
            }
        })
        .collect()
}

/// The layer list as a view tree, diffed like the canvas layers.
pub fn layer_list_view(doc: &Document) -> ViewNode {
    layer_list(doc)
        .into_iter()
        .fold(ViewNode::div(LAYER_LIST), |list, item| {
            let mut node = ViewNode::div(format!("layer-item-{}", item.id))
                .class("layer-item")
                .attr("data-layer", item.id.as_str())
                .text(item.label);
            if item.active {
                node = node.class("active");
            }
            list.child(node)
        })
}

/// Field values of the selected text layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub text: String,
    pub font_size: u32,
    pub color: String,
    pub font_family: String,
    /// Font picker label: catalog name or `Select Font`.
    pub font_label: String,
    pub font_weight: u16,
    pub font_style: FontStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropsPanel {
    /// Shown whenever something is selected.
    pub visible: bool,
    /// Populated only when the selection is a text layer.
    pub text: Option<TextProps>,
}

pub fn props_panel(doc: &Document) -> PropsPanel {
    PropsPanel {
        visible: doc.selected.is_some(),
        text: doc.selected_text().map(|t| TextProps {
            text: t.text.clone(),
            font_size: t.font_size,
            color: t.color.clone(),
            font_family: t.font_family.clone(),
            font_label: presets::font_name(&t.font_family)
                .unwrap_or("Select Font")
                .to_string(),
            font_weight: t.font_weight,
            font_style: t.font_style,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_truncate_and_mark_empty() {
        let mut doc = Document::default();
        doc.texts[0].text = String::new();
        doc.images.push(ImageLayer::new(
            LayerId::intern("side-img"),
            0.0,
            0.0,
            30.0,
            30.0,
            String::new(),
        ));
        doc.select(LayerId::intern("t2"));
        let items = layer_list(&doc);
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["(Empty)", "GPT-5 vs. Claude Opu", "live demo", "(Image)"]
        );
        assert!(items[1].active);
        assert!(!items[0].active);
    }

    #[test]
    fn label_truncation_counts_chars() {
        let mut doc = Document::default();
        doc.texts[0].text = "小红书".repeat(10);
        assert_eq!(layer_list(&doc)[0].label.chars().count(), 20);
    }

    #[test]
    fn props_panel_follows_selection() {
        let mut doc = Document::default();
        assert_eq!(
            props_panel(&doc),
            PropsPanel {
                visible: false,
                text: None
            }
        );
        doc.select(LayerId::intern("t3"));
        let panel = props_panel(&doc);
        assert!(panel.visible);
        let props = panel.text.unwrap();
        assert_eq!(props.font_size, 44);
        assert_eq!(props.font_label, "Playfair Display");
        assert_eq!(props.font_style, FontStyle::Italic);
    }

    #[test]
    fn list_view_marks_active_item() {
        let mut doc = Document::default();
        doc.select(LayerId::intern("t1"));
        let view = layer_list_view(&doc);
        assert_eq!(view.children.len(), 3);
        assert!(view.children[0].has_class("active"));
        assert_eq!(view.children[0].key, "layer-item-t1");
    }
}

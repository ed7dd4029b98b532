//! Document mutations.
//!
//! Interactions and editor actions describe changes as [`Mutation`]s; the
//! editor applies them here. Every mutation keeps the document invariants
//! (unique ids, selection names an existing layer, size floors).

use cover_core::model::*;
use cover_core::LayerId;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Select {
        id: LayerId,
    },
    ClearSelection,
    MoveLayer {
        id: LayerId,
        x: f64,
        y: f64,
    },
    SetFontSize {
        id: LayerId,
        size: u32,
    },
    SetImageGeometry {
        id: LayerId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    SetText {
        id: LayerId,
        text: String,
    },
    /// Replace every styled field of a text layer.
    SetTextStyle {
        id: LayerId,
        font_size: u32,
        font_weight: u16,
        font_style: FontStyle,
        font_family: String,
        color: String,
    },
    AddText(Box<TextLayer>),
    AddImage(Box<ImageLayer>),
    RemoveLayer {
        id: LayerId,
    },
    SetCanvasSize {
        width: u32,
        height: u32,
    },
    SetBackground(Background),
    SetTexture(bool),
    AddBackgroundPreset(BackgroundPreset),
    RemoveBackgroundPreset {
        index: usize,
    },
}

/// Apply one mutation. Returns `false` when it was a no-op (missing layer,
/// duplicate id, nothing changed).
pub fn apply_mutation(doc: &mut Document, mutation: Mutation) -> bool {
    match mutation {
        Mutation::Select { id } => doc.select(id),
        Mutation::ClearSelection => doc.clear_selection(),
        Mutation::MoveLayer { id, x, y } => match doc.layer_mut(id) {
            Some(mut layer) => {
                layer.set_position(x, y);
                true
            }
            None => false,
        },
        Mutation::SetFontSize { id, size } => match doc.text_mut(id) {
            Some(t) => {
                t.font_size = size.max(MIN_FONT_SIZE);
                true
            }
            None => false,
        },
        Mutation::SetImageGeometry {
            id,
            x,
            y,
            width,
            height,
        } => match doc.image_mut(id) {
            Some(img) => {
                img.x = x;
                img.y = y;
                img.width = width.max(MIN_IMAGE_SIZE);
                img.height = height.max(MIN_IMAGE_SIZE);
                true
            }
            None => false,
        },
        Mutation::SetText { id, text } => match doc.text_mut(id) {
            Some(t) => {
                t.text = text;
                true
            }
            None => false,
        },
        Mutation::SetTextStyle {
            id,
            font_size,
            font_weight,
            font_style,
            font_family,
            color,
        } => match doc.text_mut(id) {
            Some(t) => {
                t.font_size = font_size.max(MIN_FONT_SIZE);
                t.font_weight = font_weight.clamp(100, 900);
                t.font_style = font_style;
                t.font_family = font_family;
                t.color = color;
                true
            }
            None => false,
        },
        Mutation::AddText(layer) => {
            if doc.contains(layer.id) {
                log::warn!("refusing to add duplicate layer {}", layer.id);
                return false;
            }
            doc.texts.push(*layer);
            true
        }
        Mutation::AddImage(layer) => {
            if doc.contains(layer.id) {
                log::warn!("refusing to add duplicate layer {}", layer.id);
                return false;
            }
            doc.images.push(*layer);
            true
        }
        Mutation::RemoveLayer { id } => doc.remove_layer(id),
        Mutation::SetCanvasSize { width, height } => {
            doc.width = width;
            doc.height = height;
            true
        }
        Mutation::SetBackground(bg) => {
            doc.background = bg;
            true
        }
        Mutation::SetTexture(on) => {
            let changed = doc.texture != on;
            doc.texture = on;
            changed
        }
        Mutation::AddBackgroundPreset(preset) => {
            doc.bg_presets.push(preset);
            true
        }
        Mutation::RemoveBackgroundPreset { index } => {
            if index < cover_core::presets::BUILTIN_BG_PRESETS || index >= doc.bg_presets.len() {
                return false;
            }
            doc.bg_presets.remove(index);
            true
        }
    }
}

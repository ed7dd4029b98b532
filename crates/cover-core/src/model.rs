//! Cover document data model.
//!
//! A document is a fixed-size canvas with canvas-level settings (size,
//! padding, corner radius, three background stops, texture overlay) and two
//! ordered layer collections: text layers and image layers. Texts always
//! paint before images. Layer ids are unique across both collections and
//! the selection, when set, always names an existing layer.
//!
//! The serde shape is the persisted JSON blob (camelCase keys, as written
//! by earlier versions of the editor). Selection is transient and never
//! serialized.

use crate::color::Color;
use crate::id::LayerId;
use crate::presets;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Smallest font size a resize gesture can produce.
pub const MIN_FONT_SIZE: u32 = 8;
/// Smallest width/height of an image layer.
pub const MIN_IMAGE_SIZE: f64 = 20.0;
/// Line box multiplier shared by measurement, SVG, and raster output.
/// Font size of a new text layer.
pub const DEFAULT_FONT_SIZE: u32 = 24;
/// Side of an image box whose size is unknown.
pub const DEFAULT_IMAGE_SIDE: f64 = 200.0;
pub const LINE_HEIGHT: f64 = 1.2;

pub const DEFAULT_WIDTH: u32 = 980;
pub const DEFAULT_HEIGHT: u32 = 320;
pub const DEFAULT_PADDING: u32 = 36;
pub const DEFAULT_RADIUS: u32 = 22;

// ─── Text styling ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    /// Anything other than `italic` reads as normal.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("italic") {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

impl<'de> Deserialize<'de> for FontStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FontStyle::parse(&s))
    }
}

/// Numbers in stored blobs may arrive as JSON numbers or as the string
/// value of a form control (`"600"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Num(f64),
    Str(String),
}

impl Numeric {
    fn value(self) -> Option<f64> {
        match self {
            Numeric::Num(n) => Some(n),
            Numeric::Str(s) => crate::controls::parse_int(&s).map(|n| n as f64),
        }
    }
}

fn de_font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = Numeric::deserialize(deserializer)?
        .value()
        .unwrap_or(f64::from(MIN_FONT_SIZE));
    Ok(clamp_font_size(n))
}

fn de_font_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let n = Numeric::deserialize(deserializer)?.value().unwrap_or(400.0);
    Ok(n.round().clamp(100.0, 900.0) as u16)
}

/// Round and floor a font size at [`MIN_FONT_SIZE`].
pub fn clamp_font_size(size: f64) -> u32 {
    if size.is_nan() {
        return MIN_FONT_SIZE;
    }
    size.max(f64::from(MIN_FONT_SIZE)).round().min(f64::from(u32::MAX)) as u32
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_image_side() -> f64 {
    DEFAULT_IMAGE_SIDE
}

fn default_weight() -> u16 {
    400
}

fn default_family() -> String {
    presets::DEFAULT_FONT_FAMILY.to_string()
}

fn default_text_color() -> String {
    presets::DEFAULT_TEXT_COLOR.to_string()
}

// ─── Layers ──────────────────────────────────────────────────────────────

/// A text layer. `(x, y)` is the top-left of the text box in canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: LayerId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size", deserialize_with = "de_font_size")]
    pub font_size: u32,
    #[serde(default = "default_weight", deserialize_with = "de_font_weight")]
    pub font_weight: u16,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default = "default_family")]
    pub font_family: String,
    /// Any CSS color string (`#0A1220`, `rgba(10,18,32,0.72)`, ...).
    #[serde(default = "default_text_color")]
    pub color: String,
}

impl TextLayer {
    /// A fresh "New Text" layer with the editor's default styling.
    pub fn new(id: LayerId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            text: "New Text".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: 400,
            font_style: FontStyle::Normal,
            font_family: default_family(),
            color: default_text_color(),
        }
    }

    /// CSS/Canvas2D font shorthand: `"{style} {weight} {size}px {family}"`.
    pub fn css_font(&self) -> String {
        format!(
            "{} {} {}px {}",
            self.font_style.as_css(),
            self.font_weight,
            self.font_size,
            self.font_family
        )
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Marker written as `"type": "image"` in the stored blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    #[default]
    Image,
}

/// An image layer drawn as a box with its picture scaled to cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    #[serde(rename = "type", default)]
    pub kind: ImageKind,
    pub id: LayerId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_image_side")]
    pub width: f64,
    #[serde(default = "default_image_side")]
    pub height: f64,
    /// Embedded data URL.
    #[serde(default)]
    pub src: String,
}

impl ImageLayer {
    pub fn new(id: LayerId, x: f64, y: f64, width: f64, height: f64, src: String) -> Self {
        Self {
            kind: ImageKind::Image,
            id,
            x,
            y,
            width: width.max(MIN_IMAGE_SIZE),
            height: height.max(MIN_IMAGE_SIZE),
            src,
        }
    }
}

/// Borrowed view of either layer kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerRef<'a> {
    Text(&'a TextLayer),
    Image(&'a ImageLayer),
}

impl LayerRef<'_> {
    pub fn id(&self) -> LayerId {
        match self {
            LayerRef::Text(t) => t.id,
            LayerRef::Image(i) => i.id,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match self {
            LayerRef::Text(t) => (t.x, t.y),
            LayerRef::Image(i) => (i.x, i.y),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, LayerRef::Text(_))
    }
}

/// Mutable view of either layer kind.
#[derive(Debug)]
pub enum LayerMut<'a> {
    Text(&'a mut TextLayer),
    Image(&'a mut ImageLayer),
}

impl LayerMut<'_> {
    pub fn set_position(&mut self, x: f64, y: f64) {
        match self {
            LayerMut::Text(t) => {
                t.x = x;
                t.y = y;
            }
            LayerMut::Image(i) => {
                i.x = x;
                i.y = y;
            }
        }
    }
}

// ─── Background ──────────────────────────────────────────────────────────

/// Three background stops: two radial glows (`c1`, `c2`) over a solid base (`c3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub c1: Color,
    pub c2: Color,
    pub c3: Color,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            c1: Color::from_u32(0xdbeafe),
            c2: Color::from_u32(0xf3e8ff),
            c3: Color::from_u32(0xf8f9fa),
        }
    }
}

/// A named background snapshot. The first three are built in; the rest
/// are user-saved and deletable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundPreset {
    pub name: String,
    pub c1: Color,
    pub c2: Color,
    pub c3: Color,
}

impl BackgroundPreset {
    pub fn background(&self) -> Background {
        Background {
            c1: self.c1,
            c2: self.c2,
            c3: self.c3,
        }
    }
}

// ─── Document ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub radius: u32,
    pub background: Background,
    pub texture: bool,
    pub texts: Vec<TextLayer>,
    pub images: Vec<ImageLayer>,
    pub bg_presets: Vec<BackgroundPreset>,
    #[serde(skip)]
    pub selected: Option<LayerId>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
            radius: DEFAULT_RADIUS,
            background: Background::default(),
            texture: false,
            texts: presets::default_texts(),
            images: Vec::new(),
            bg_presets: presets::default_bg_presets(),
            selected: None,
        }
    }
}

impl Document {
    /// All layers in paint order: texts, then images.
    pub fn layers(&self) -> impl Iterator<Item = LayerRef<'_>> {
        self.texts
            .iter()
            .map(LayerRef::Text)
            .chain(self.images.iter().map(LayerRef::Image))
    }

    pub fn layer_count(&self) -> usize {
        self.texts.len() + self.images.len()
    }

    pub fn layer(&self, id: LayerId) -> Option<LayerRef<'_>> {
        self.layers().find(|l| l.id() == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<LayerMut<'_>> {
        if let Some(t) = self.texts.iter_mut().find(|t| t.id == id) {
            return Some(LayerMut::Text(t));
        }
        self.images
            .iter_mut()
            .find(|i| i.id == id)
            .map(LayerMut::Image)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    pub fn text(&self, id: LayerId) -> Option<&TextLayer> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn text_mut(&mut self, id: LayerId) -> Option<&mut TextLayer> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    pub fn image(&self, id: LayerId) -> Option<&ImageLayer> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn image_mut(&mut self, id: LayerId) -> Option<&mut ImageLayer> {
        self.images.iter_mut().find(|i| i.id == id)
    }

    /// The selected layer if it is a text layer.
    pub fn selected_text(&self) -> Option<&TextLayer> {
        self.selected.and_then(|id| self.text(id))
    }

    /// Select a layer. Returns `false` when nothing changed: the id is
    /// already selected, or no such layer exists.
    pub fn select(&mut self, id: LayerId) -> bool {
        if self.selected == Some(id) || !self.contains(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Remove a layer from whichever collection holds it. Clears the
    /// selection if it pointed at the removed layer.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let before = self.layer_count();
        self.texts.retain(|t| t.id != id);
        self.images.retain(|i| i.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.layer_count() != before
    }

    /// A time-based id not yet used in this document. On a clash a numeric
    /// suffix is appended (`t1700000000000_2`).
    pub fn fresh_id(&self, prefix: &str, now_ms: u64) -> LayerId {
        let base = LayerId::timestamped(prefix, now_ms);
        if !self.contains(base) {
            return base;
        }
        (2u32..)
            .map(|n| LayerId::intern(&format!("{base}_{n}")))
            .find(|id| !self.contains(*id))
            .unwrap_or(base)
    }

    /// Restore the id uniqueness and selection invariants after loading
    /// foreign data: later duplicates are dropped, a dangling selection is
    /// cleared.
    pub fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.texts.retain(|t| {
            let fresh = seen.insert(t.id);
            if !fresh {
                log::warn!("dropping text layer with duplicate id {}", t.id);
            }
            fresh
        });
        self.images.retain(|i| {
            let fresh = seen.insert(i.id);
            if !fresh {
                log::warn!("dropping image layer with duplicate id {}", i.id);
            }
            fresh
        });
        if let Some(id) = self.selected
            && !seen.contains(&id)
        {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_document_matches_editor_defaults() {
        let doc = Document::default();
        assert_eq!((doc.width, doc.height), (980, 320));
        assert_eq!((doc.padding, doc.radius), (36, 22));
        assert_eq!(doc.background.c1.to_hex(), "#dbeafe");
        assert_eq!(doc.texts.len(), 3);
        assert_eq!(doc.bg_presets.len(), 3);
        assert_eq!(doc.selected, None);
    }

    #[test]
    fn select_is_idempotent_and_checked() {
        let mut doc = Document::default();
        let t2 = LayerId::intern("t2");
        assert!(doc.select(t2));
        assert!(!doc.select(t2));
        assert!(!doc.select(LayerId::intern("nope")));
        assert_eq!(doc.selected, Some(t2));
    }

    #[test]
    fn remove_image_clears_selection() {
        let mut doc = Document::default();
        let id = LayerId::intern("img1");
        doc.images
            .push(ImageLayer::new(id, 0.0, 0.0, 50.0, 50.0, "data:,".into()));
        doc.select(id);
        assert!(doc.remove_layer(id));
        assert_eq!(doc.selected, None);
        assert!(doc.images.is_empty());
        assert!(!doc.remove_layer(id));
    }

    #[test]
    fn fresh_id_avoids_clashes() {
        let mut doc = Document::default();
        let first = doc.fresh_id("t", 42);
        assert_eq!(first.as_str(), "t42");
        doc.texts.push(TextLayer::new(first, 0.0, 0.0));
        let second = doc.fresh_id("t", 42);
        assert_eq!(second.as_str(), "t42_2");
    }

    #[test]
    fn normalize_drops_duplicates_across_collections() {
        let mut doc = Document::default();
        let dup = LayerId::intern("t1");
        doc.images
            .push(ImageLayer::new(dup, 0.0, 0.0, 10.0, 10.0, String::new()));
        doc.selected = Some(LayerId::intern("ghost"));
        doc.normalize();
        assert_eq!(doc.layer_count(), 3);
        assert!(doc.images.is_empty());
        assert_eq!(doc.selected, None);
    }

    #[test]
    fn text_layer_accepts_string_weights() {
        let t: TextLayer = serde_json::from_str(
            r#"{"id":"a","x":1,"y":2,"text":"hi","fontSize":"30","fontWeight":"600","fontStyle":"oblique"}"#,
        )
        .unwrap();
        assert_eq!(t.font_size, 30);
        assert_eq!(t.font_weight, 600);
        assert_eq!(t.font_style, FontStyle::Normal);
        assert_eq!(t.font_family, "Inter, sans-serif");
    }

    #[test]
    fn image_layer_carries_type_tag() {
        let img = ImageLayer::new(LayerId::intern("img7"), 1.0, 2.0, 5.0, 300.0, "data:x".into());
        assert_eq!(img.width, MIN_IMAGE_SIZE);
        let json = serde_json::to_value(&img).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["id"], "img7");
    }

    #[test]
    fn css_font_shorthand() {
        let mut t = TextLayer::new(LayerId::intern("f"), 0.0, 0.0);
        t.font_style = FontStyle::Italic;
        assert_eq!(t.css_font(), "italic 400 24px Inter, sans-serif");
    }
}

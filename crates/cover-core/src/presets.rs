//! Static catalogs: canvas sizes, background presets, style templates,
//! fonts, and the base sets for random gradients.

use crate::color::Color;
use crate::id::LayerId;
use crate::model::{Background, BackgroundPreset, FontStyle, TextLayer};
use serde::Serialize;

pub const DEFAULT_FONT_FAMILY: &str = "Inter, sans-serif";
pub const DEFAULT_TEXT_COLOR: &str = "#0A1220";

/// Number of built-in background presets at the head of `bg_presets`.
pub const BUILTIN_BG_PRESETS: usize = 3;

// ─── Canvas sizes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Common,
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasPreset {
    pub name: &'static str,
    pub w: u32,
    pub h: u32,
    pub category: PresetCategory,
}

const fn canvas(name: &'static str, w: u32, h: u32, category: PresetCategory) -> CanvasPreset {
    CanvasPreset {
        name,
        w,
        h,
        category,
    }
}

pub const CANVAS_PRESETS: &[CanvasPreset] = &[
    canvas("WeChat Article 微信公众号", 900, 383, PresetCategory::Common),
    canvas("Instagram Post", 1080, 1080, PresetCategory::Common),
    canvas("YouTube Thumbnail", 1280, 720, PresetCategory::Common),
    canvas("Twitter/X Post", 1200, 900, PresetCategory::Common),
    canvas("Xiaohongshu 小红书竖版", 900, 1200, PresetCategory::Common),
    canvas("Square 1:1", 1080, 1080, PresetCategory::More),
    canvas("Landscape 16:9", 1920, 1080, PresetCategory::More),
    canvas("Instagram Story", 1080, 1920, PresetCategory::More),
    canvas("Instagram Portrait", 1080, 1350, PresetCategory::More),
    canvas("Xiaohongshu Square", 1080, 1080, PresetCategory::More),
    canvas("WeChat Video 视频号竖", 1080, 1260, PresetCategory::More),
    canvas("WeChat Video 视频号横", 1080, 608, PresetCategory::More),
    canvas("Bilibili Cover", 1280, 800, PresetCategory::More),
    canvas("Twitter Card", 1200, 628, PresetCategory::More),
    canvas("LinkedIn Post", 1200, 627, PresetCategory::More),
];

// ─── Fonts ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontOption {
    pub name: &'static str,
    pub value: &'static str,
}

const fn font(name: &'static str, value: &'static str) -> FontOption {
    FontOption { name, value }
}

pub const FONTS: &[FontOption] = &[
    font("Inter", "Inter, sans-serif"),
    font("Playfair Display", "'Playfair Display', serif"),
    font("Roboto", "'Roboto', sans-serif"),
    font("Lato", "'Lato', sans-serif"),
    font("Montserrat", "'Montserrat', sans-serif"),
    font("Oswald", "'Oswald', sans-serif"),
    font("Merriweather", "'Merriweather', serif"),
    font("Dancing Script", "'Dancing Script', cursive"),
    font("Lobster", "'Lobster', cursive"),
    font("Pacifico", "'Pacifico', cursive"),
    font("Monospace", "monospace"),
    font("System UI", "system-ui, sans-serif"),
];

/// Display name for a font-family value, if it is in the catalog.
pub fn font_name(value: &str) -> Option<&'static str> {
    FONTS.iter().find(|f| f.value == value).map(|f| f.name)
}

// ─── Style templates ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateFont {
    pub font: &'static str,
    pub weight: u16,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleTemplate {
    pub name: &'static str,
    pub c1: Color,
    pub c2: Color,
    pub c3: Color,
    pub texture: bool,
    /// Applied to the first three text layers by position.
    pub fonts: [TemplateFont; 3],
}

impl StyleTemplate {
    pub fn background(&self) -> Background {
        Background {
            c1: self.c1,
            c2: self.c2,
            c3: self.c3,
        }
    }
}

const fn tf(font: &'static str, weight: u16, color: &'static str) -> TemplateFont {
    TemplateFont {
        font,
        weight,
        color,
    }
}

pub const STYLE_TEMPLATES: &[StyleTemplate] = &[
    StyleTemplate {
        name: "Tech Minimal",
        c1: Color::from_u32(0x0f172a),
        c2: Color::from_u32(0x1e293b),
        c3: Color::from_u32(0x020617),
        texture: true,
        fonts: [
            tf("Inter, sans-serif", 400, "#94a3b8"),
            tf("Inter, sans-serif", 700, "#ffffff"),
            tf("monospace", 400, "#38bdf8"),
        ],
    },
    StyleTemplate {
        name: "Elegant",
        c1: Color::from_u32(0xfdf4ff),
        c2: Color::from_u32(0xfae8ff),
        c3: Color::from_u32(0xffffff),
        texture: true,
        fonts: [
            tf("'Playfair Display', serif", 400, "#701a75"),
            tf("'Playfair Display', serif", 600, "#4a044e"),
            tf("'Playfair Display', serif", 400, "#a21caf"),
        ],
    },
    StyleTemplate {
        name: "Pop Bold",
        c1: Color::from_u32(0xbef264),
        c2: Color::from_u32(0xfde047),
        c3: Color::from_u32(0xffffff),
        texture: false,
        fonts: [
            tf("'Oswald', sans-serif", 700, "#000000"),
            tf("'Oswald', sans-serif", 700, "#000000"),
            tf("'Oswald', sans-serif", 500, "#000000"),
        ],
    },
];

// ─── Defaults ────────────────────────────────────────────────────────────

pub fn default_bg_presets() -> Vec<BackgroundPreset> {
    let preset = |name: &str, c1: u32, c2: u32, c3: u32| BackgroundPreset {
        name: name.to_string(),
        c1: Color::from_u32(c1),
        c2: Color::from_u32(c2),
        c3: Color::from_u32(c3),
    };
    vec![
        preset("Default Blue", 0xdbeafe, 0xf3e8ff, 0xf8f9fa),
        preset("Mint Green", 0x43d0ad, 0x68df68, 0xf0fdf4),
        preset("Sunset", 0xfed7aa, 0xfecaca, 0xfff7ed),
    ]
}

/// Caption, title, and subtitle layers of a brand-new cover.
pub fn default_texts() -> Vec<TextLayer> {
    let layer = |id: &str, y: f64, text: &str, size: u32, weight: u16, color: &str| TextLayer {
        id: LayerId::intern(id),
        x: 36.0,
        y,
        text: text.to_string(),
        font_size: size,
        font_weight: weight,
        font_style: FontStyle::Normal,
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        color: color.to_string(),
    };

    let mut subtitle = layer("t3", 190.0, "live demo", 44, 400, DEFAULT_TEXT_COLOR);
    subtitle.font_style = FontStyle::Italic;
    subtitle.font_family = "'Playfair Display', serif".to_string();

    vec![
        layer(
            "t1",
            28.0,
            "Mixture of Experts | Ep. 67.1",
            13,
            500,
            "rgba(10,18,32,0.72)",
        ),
        layer(
            "t2",
            120.0,
            "GPT-5 vs. Claude Opus 4.1",
            64,
            600,
            DEFAULT_TEXT_COLOR,
        ),
        subtitle,
    ]
}

// ─── Random gradients ────────────────────────────────────────────────────

pub const GRADIENT_SETS: [[u32; 3]; 10] = [
    [0xFFE5E5, 0xFFB3BA, 0xFFDFBA],
    [0xE5F3FF, 0xB3D9FF, 0xFFE5B3],
    [0xF0E5FF, 0xD9B3FF, 0xE5FFB3],
    [0xFFE5F0, 0xFFB3D9, 0xB3FFE5],
    [0xE5FFE5, 0xB3FFB3, 0xFFE5FF],
    [0xFFF0E5, 0xFFDFB3, 0xE5F0FF],
    [0xE5F0E5, 0xB3DFB3, 0xF0E5F0],
    [0xFFE5DF, 0xFFB3A7, 0xDFE5FF],
    [0xF5E5FF, 0xE5B3FF, 0xE5FFE5],
    [0xE5FFF5, 0xB3FFD9, 0xFFE5F5],
];

/// Pick a base set and jitter each stop's saturation and lightness.
///
/// `rng` yields uniform samples in `[0, 1)` (`Math.random` in the
/// browser). Saturation stays within `[0.2, 0.8]` and lightness within
/// `[0.7, 0.95]`, so the result is always a soft pastel.
pub fn random_gradient(mut rng: impl FnMut() -> f64) -> Background {
    let idx = ((rng() * GRADIENT_SETS.len() as f64).floor() as usize).min(GRADIENT_SETS.len() - 1);
    let mut jitter = |rgb: u32| {
        let mut hsl = Color::from_u32(rgb).to_hsl();
        hsl.s = (hsl.s + (rng() - 0.5) * 0.3).clamp(0.2, 0.8);
        hsl.l = (hsl.l + (rng() - 0.5) * 0.2).clamp(0.7, 0.95);
        hsl.to_color()
    };
    let [c1, c2, c3] = GRADIENT_SETS[idx];
    Background {
        c1: jitter(c1),
        c2: jitter(c2),
        c3: jitter(c3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_shapes() {
        assert_eq!(CANVAS_PRESETS.len(), 15);
        let common = CANVAS_PRESETS
            .iter()
            .filter(|p| p.category == PresetCategory::Common)
            .count();
        assert_eq!(common, 5);
        assert_eq!(STYLE_TEMPLATES.len(), 3);
        assert_eq!(font_name("monospace"), Some("Monospace"));
        assert_eq!(font_name("Comic Sans"), None);
    }

    #[test]
    fn random_gradient_stays_pastel() {
        let samples = [0.0, 0.99, 0.5, 0.13, 0.77];
        for seed in 0..samples.len() {
            let mut i = seed;
            let bg = random_gradient(|| {
                i += 1;
                samples[i % samples.len()]
            });
            for c in [bg.c1, bg.c2, bg.c3] {
                let hsl = c.to_hsl();
                assert!(hsl.l >= 0.69 && hsl.l <= 0.96, "{c} l={}", hsl.l);
            }
        }
    }

    #[test]
    fn random_gradient_handles_rng_of_one() {
        let bg = random_gradient(|| 1.0);
        assert_ne!(bg, Background::default());
    }
}

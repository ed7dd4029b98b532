//! Canvas setting controls as the page reports them: raw text from the
//! size inputs and hex values from the color pickers.

use crate::color::Color;
use crate::model::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Document};
use serde::{Deserialize, Serialize};

/// Raw values of the bound canvas inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlValues {
    pub width: String,
    pub height: String,
    pub padding: String,
    pub radius: String,
    pub c1: String,
    pub c2: String,
    pub c3: String,
}

impl ControlValues {
    /// Snapshot the document into control values.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            width: doc.width.to_string(),
            height: doc.height.to_string(),
            padding: doc.padding.to_string(),
            radius: doc.radius.to_string(),
            c1: doc.background.c1.to_hex(),
            c2: doc.background.c2.to_hex(),
            c3: doc.background.c3.to_hex(),
        }
    }

    /// Write the controls into the document. Unparseable or non-positive
    /// sizes fall back to 980 × 320, padding and radius to 0. Unparseable
    /// colors leave the current stop untouched.
    pub fn apply_to(&self, doc: &mut Document) {
        doc.width = positive_or(&self.width, DEFAULT_WIDTH);
        doc.height = positive_or(&self.height, DEFAULT_HEIGHT);
        doc.padding = positive_or(&self.padding, 0);
        doc.radius = positive_or(&self.radius, 0);

        for (raw, slot) in [
            (&self.c1, &mut doc.background.c1),
            (&self.c2, &mut doc.background.c2),
            (&self.c3, &mut doc.background.c3),
        ] {
            match Color::from_hex(raw) {
                Some(c) => *slot = c,
                None => log::warn!("ignoring invalid color control value {raw:?}"),
            }
        }
    }
}

fn positive_or(raw: &str, fallback: u32) -> u32 {
    match parse_int(raw) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => fallback,
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits,
/// ignoring anything after them. `"320px"` → 320, `"abc"` → `None`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let n: i64 = digits[..end].parse().ok()?;
    Some(if neg { -n } else { n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_int_like_a_form_field() {
        assert_eq!(parse_int("1080"), Some(1080));
        assert_eq!(parse_int("  42px"), Some(42));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("12.9"), Some(12));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("px"), None);
        assert_eq!(parse_int("-"), None);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let mut doc = Document::default();
        let controls = ControlValues {
            width: "wide".into(),
            height: "0".into(),
            padding: "".into(),
            radius: "x".into(),
            c1: "#123456".into(),
            c2: "not a color".into(),
            c3: "#fff".into(),
        };
        controls.apply_to(&mut doc);
        assert_eq!((doc.width, doc.height), (980, 320));
        assert_eq!((doc.padding, doc.radius), (0, 0));
        assert_eq!(doc.background.c1.to_hex(), "#123456");
        assert_eq!(doc.background.c2.to_hex(), "#f3e8ff");
        assert_eq!(doc.background.c3.to_hex(), "#ffffff");
    }

    #[test]
    fn document_snapshot_roundtrips() {
        let mut doc = Document::default();
        doc.width = 1280;
        let controls = ControlValues::from_document(&doc);
        assert_eq!(controls.width, "1280");
        let mut other = Document::default();
        controls.apply_to(&mut other);
        assert_eq!(other.width, 1280);
        assert_eq!(other.padding, 36);
    }
}

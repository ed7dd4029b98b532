//! Hit testing: canvas point → layer or gizmo handle.
//!
//! Layer sizes come through the [`Measure`] seam. In the browser that is
//! the element's offset size; natively (and in tests) it is an estimate
//! from the font metrics.

use cover_core::model::*;
use cover_core::LayerId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::TopLeft => "tl",
            Handle::TopRight => "tr",
            Handle::BottomLeft => "bl",
            Handle::BottomRight => "br",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == s)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight)
    }

    /// The corner of `rect` this handle sits on.
    pub fn anchor(&self, rect: Rect) -> Point {
        let x = if self.is_left() { rect.x0 } else { rect.x1 };
        let y = if self.is_top() { rect.y0 } else { rect.y1 };
        Point::new(x, y)
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty canvas (background).
    Canvas,
    Layer(LayerId),
    Handle(LayerId, Handle),
}

/// Rendered size of a layer in canvas units.
pub trait Measure {
    fn measure(&self, layer: LayerRef<'_>) -> Size;
}

/// Font-metric estimate: average glyph advance of 0.55em, line box of
/// 1.2em. Images report their stored size.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMeasure;

pub const AVG_ADVANCE_EM: f64 = 0.55;

impl Measure for EstimatedMeasure {
    fn measure(&self, layer: LayerRef<'_>) -> Size {
        match layer {
            LayerRef::Text(t) => {
                let size = f64::from(t.font_size);
                let widest = t.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                let lines = t.lines().count().max(1);
                Size::new(
                    widest as f64 * AVG_ADVANCE_EM * size,
                    lines as f64 * LINE_HEIGHT * size,
                )
            }
            LayerRef::Image(i) => Size::new(i.width, i.height),
        }
    }
}

pub fn layer_bounds(layer: LayerRef<'_>, measure: &dyn Measure) -> Rect {
    let (x, y) = layer.position();
    Rect::from_origin_size((x, y), measure.measure(layer))
}

/// Find what is under `point`. Handles of the selected layer win, then
/// layers from topmost (last painted) down.
pub fn hit_test(doc: &Document, measure: &dyn Measure, point: Point, handle_size: f64) -> HitTarget {
    if let Some(selected) = doc.selected.and_then(|id| doc.layer(id)) {
        let bounds = layer_bounds(selected, measure);
        let half = handle_size / 2.0;
        for handle in Handle::ALL {
            let anchor = handle.anchor(bounds);
            if (point.x - anchor.x).abs() <= half && (point.y - anchor.y).abs() <= half {
                return HitTarget::Handle(selected.id(), handle);
            }
        }
    }

    let layers: Vec<_> = doc.layers().collect();
    layers
        .iter()
        .rev()
        .find(|l| layer_bounds(**l, measure).contains(point))
        .map_or(HitTarget::Canvas, |l| HitTarget::Layer(l.id()))
}

//! Alignment snapping while dragging a layer.
//!
//! Candidates are checked in a fixed order and the first match within the
//! threshold wins, independently per axis:
//!
//! 1. canvas centre (both axes);
//! 2. every other layer in paint order (texts, then images): its centre-x,
//!    its centre-y, then its left edge.
//!
//! At most one guide per axis is reported.

use cover_core::{Document, LayerId};
use cover_render::hit::{Measure, layer_bounds};
use kurbo::{Point, Size};
use serde::Serialize;

/// Guide lines to show, in canvas units. `None` hides that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SnapGuides {
    /// x of the vertical guide.
    pub vertical: Option<f64>,
    /// y of the horizontal guide.
    pub horizontal: Option<f64>,
}

impl SnapGuides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Top-left after snapping (not yet rounded).
    pub point: Point,
    pub guides: SnapGuides,
}

/// Snap the proposed top-left `proposed` of layer `moving` (rendered size
/// `size`) against the canvas and the other layers.
pub fn snap_position(
    doc: &Document,
    moving: LayerId,
    proposed: Point,
    size: Size,
    measure: &dyn Measure,
    threshold: f64,
) -> SnapResult {
    let near = |a: f64, b: f64| (a - b).abs() < threshold;
    let (w, h) = (size.width, size.height);
    let cx = proposed.x + w / 2.0;
    let cy = proposed.y + h / 2.0;

    let mut point = proposed;
    let mut guides = SnapGuides::default();

    let canvas_cx = f64::from(doc.width) / 2.0;
    let canvas_cy = f64::from(doc.height) / 2.0;
    if near(cx, canvas_cx) {
        point.x = canvas_cx - w / 2.0;
        guides.vertical = Some(canvas_cx);
    }
    if near(cy, canvas_cy) {
        point.y = canvas_cy - h / 2.0;
        guides.horizontal = Some(canvas_cy);
    }

    for other in doc.layers().filter(|l| l.id() != moving) {
        if guides.vertical.is_some() && guides.horizontal.is_some() {
            break;
        }
        let bounds = layer_bounds(other, measure);
        let center = bounds.center();

        if guides.vertical.is_none() && near(cx, center.x) {
            point.x = center.x - w / 2.0;
            guides.vertical = Some(center.x);
        }
        if guides.horizontal.is_none() && near(cy, center.y) {
            point.y = center.y - h / 2.0;
            guides.horizontal = Some(center.y);
        }
        if guides.vertical.is_none() && near(proposed.x, bounds.x0) {
            point.x = bounds.x0;
            guides.vertical = Some(bounds.x0);
        }
    }

    SnapResult { point, guides }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_core::ImageLayer;
    use cover_render::hit::EstimatedMeasure;
    use pretty_assertions::assert_eq;

    fn doc_with_boxes() -> Document {
        let mut doc = Document::default();
        doc.texts.clear();
        for (id, x, y) in [("box-a", 100.0, 100.0), ("box-b", 600.0, 40.0)] {
            doc.images.push(ImageLayer::new(
                LayerId::intern(id),
                x,
                y,
                100.0,
                50.0,
                String::new(),
            ));
        }
        doc
    }

    const SIZE: Size = Size::new(40.0, 20.0);

    #[test]
    fn canvas_centre_snaps_exactly() {
        let doc = doc_with_boxes();
        // Canvas 980 x 320, centre (490, 160). Proposed centre (493, 158).
        let r = snap_position(
            &doc,
            LayerId::intern("box-a"),
            Point::new(473.0, 148.0),
            SIZE,
            &EstimatedMeasure,
            5.0,
        );
        assert_eq!(r.point, Point::new(470.0, 150.0));
        assert_eq!(
            r.guides,
            SnapGuides {
                vertical: Some(490.0),
                horizontal: Some(160.0)
            }
        );
    }

    #[test]
    fn threshold_is_strict() {
        let doc = doc_with_boxes();
        // Centre x exactly 5 away from 490.
        let r = snap_position(
            &doc,
            LayerId::intern("box-a"),
            Point::new(475.0, 10.0),
            SIZE,
            &EstimatedMeasure,
            5.0,
        );
        assert_eq!(r.guides.vertical, None);
        assert_eq!(r.point.x, 475.0);
    }

    #[test]
    fn other_layer_centre_beats_left_edge() {
        let doc = doc_with_boxes();
        // box-b centre (650, 65). Proposed centre x 652 → centre snap.
        let r = snap_position(
            &doc,
            LayerId::intern("box-a"),
            Point::new(632.0, 250.0),
            SIZE,
            &EstimatedMeasure,
            5.0,
        );
        assert_eq!(r.point.x, 630.0);
        assert_eq!(r.guides.vertical, Some(650.0));
        assert_eq!(r.guides.horizontal, None);
    }

    #[test]
    fn left_edge_alignment() {
        let doc = doc_with_boxes();
        let r = snap_position(
            &doc,
            LayerId::intern("box-b"),
            Point::new(103.0, 260.0),
            SIZE,
            &EstimatedMeasure,
            5.0,
        );
        assert_eq!(r.point, Point::new(100.0, 260.0));
        assert_eq!(r.guides.vertical, Some(100.0));
    }

    #[test]
    fn moving_layer_ignores_itself() {
        let doc = doc_with_boxes();
        // Sitting exactly on its own stored position must not snap to itself.
        let r = snap_position(
            &doc,
            LayerId::intern("box-a"),
            Point::new(100.0, 260.0),
            Size::new(100.0, 50.0),
            &EstimatedMeasure,
            5.0,
        );
        assert!(r.guides.is_empty());
    }
}

//! Input abstraction layer.
//!
//! Normalizes the DOM events the editor cares about into `InputEvent`s.
//! Pointer positions are screen pixels relative to the layer container's
//! top-left corner; the interaction divides by the preview scale.

use cover_render::HitTarget;
use kurbo::Point;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on `target`.
    PointerDown { pos: Point, target: HitTarget },

    /// Pointer moved anywhere in the window.
    PointerMove { pos: Point },

    /// Pointer released anywhere in the window.
    PointerUp { pos: Point },

    DoubleClick { pos: Point, target: HitTarget },

    /// Key pressed inside an element being edited inline. `text` is the
    /// element's current content.
    EditKey {
        key: String,
        shift: bool,
        text: String,
    },

    /// The element being edited inline lost focus.
    EditBlur { text: String },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, target: HitTarget) -> Self {
        Self::PointerDown {
            pos: Point::new(x, y),
            target,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            pos: Point::new(x, y),
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            pos: Point::new(x, y),
        }
    }
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// Ctrl, Meta, or Alt held: the key belongs to a browser or OS binding.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

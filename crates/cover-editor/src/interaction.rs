//! Direct manipulation: drag, corner resize, and inline text editing.
//!
//! One [`Gesture`] value holds the active mode, so two gestures can never
//! hold the window pointer at once. [`Interaction::handle`] reads the
//! document, advances the gesture, and returns the [`Mutation`]s to apply
//! plus the [`Effect`]s the host must perform (pointer capture, direct
//! element updates for smooth feedback, guides, persistence, re-render).
//!
//! | from          | event                         | to            |
//! |---------------|-------------------------------|---------------|
//! | Idle          | pointer-down on layer         | Dragging      |
//! | Idle          | pointer-down on handle        | Resizing      |
//! | Dragging      | pointer-up                    | Idle          |
//! | Resizing      | pointer-up                    | Idle          |
//! | Idle/Dragging | double-click on text layer    | InlineEditing |
//! | InlineEditing | blur, Enter without Shift     | Idle          |
//! | InlineEditing | pointer-down on another layer | Dragging      |
//!
//! A press on another layer during an inline edit arrives before the edited
//! element's blur. The drag starts at once; the edit is committed when the
//! blur delivers its text.

use cover_core::model::*;
use cover_core::LayerId;
use cover_render::hit::{Handle, HitTarget, Measure};
use kurbo::{Point, Rect, Vec2};
use serde::Serialize;

use crate::engine::Mutation;
use crate::input::InputEvent;
use crate::snap::{SnapGuides, snap_position};

/// Geometry captured when a resize starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOrigin {
    Text { font_size: u32 },
    Image { rect: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        id: LayerId,
        /// Pointer offset from the layer's top-left, canvas units.
        offset: Vec2,
    },
    Resizing {
        id: LayerId,
        handle: Handle,
        /// Pointer position at pointer-down, screen pixels.
        start: Point,
        origin: ResizeOrigin,
    },
    InlineEditing {
        id: LayerId,
    },
}

impl Gesture {
    /// Layer the active gesture operates on.
    pub fn layer(&self) -> Option<LayerId> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging { id, .. }
            | Gesture::Resizing { id, .. }
            | Gesture::InlineEditing { id } => Some(*id),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging { .. } => "dragging",
            Gesture::Resizing { .. } => "resizing",
            Gesture::InlineEditing { .. } => "inline-editing",
        }
    }
}

/// Work for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Effect {
    /// Route pointer move/up from the whole window to the editor.
    CapturePointer,
    ReleasePointer,
    /// Update an element's position in place.
    MoveElement { id: LayerId, x: f64, y: f64 },
    /// Update an element's size in place: font size for text, box for images.
    ResizeElement {
        id: LayerId,
        font_size: Option<u32>,
        x: Option<f64>,
        y: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    },
    ShowGuides(SnapGuides),
    HideGuides,
    /// Mirror a font size into the properties panel's size field.
    EchoFontSize { size: u32 },
    /// Make the element editable, focus it, select its text.
    BeginInlineEdit { id: LayerId },
    /// Leave edit mode; `text` is what the element must show.
    EndInlineEdit { id: LayerId, text: String },
    InsertLineBreak,
    RenderLayers,
    RefreshLayerList,
    Persist,
}

/// Mutations and effects produced by one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub mutations: Vec<Mutation>,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn mutate(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.effects.is_empty()
    }
}

/// Per-event view of the host: preview scale and element measurement.
pub struct InteractionContext<'a> {
    pub scale: f64,
    pub measure: &'a dyn Measure,
    pub snap_threshold: f64,
}

impl InteractionContext<'_> {
    /// Screen pixels (container-relative) to canvas units.
    fn to_canvas(&self, pos: Point) -> Point {
        let s = if self.scale > 0.0 { self.scale } else { 1.0 };
        Point::new(pos.x / s, pos.y / s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    gesture: Gesture,
    /// Edit left by a press elsewhere, waiting for its blur.
    unsaved_edit: Option<LayerId>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.gesture, Gesture::InlineEditing { .. })
    }

    fn transition(&mut self, next: Gesture) {
        if self.gesture.name() != next.name() {
            log::debug!("gesture {} -> {}", self.gesture.name(), next.name());
        }
        self.gesture = next;
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        doc: &Document,
        ctx: &InteractionContext<'_>,
    ) -> Outcome {
        let mut out = Outcome::default();
        match event {
            InputEvent::PointerDown { pos, target } => self.pointer_down(*pos, *target, doc, ctx, &mut out),
            InputEvent::PointerMove { pos } => self.pointer_move(*pos, doc, ctx, &mut out),
            InputEvent::PointerUp { .. } => self.finish_pointer_gesture(&mut out),
            InputEvent::DoubleClick { target, .. } => self.double_click(*target, doc, &mut out),
            InputEvent::EditKey { key, shift, text } => {
                if self.is_editing() && key == "Enter" {
                    if *shift {
                        out.effect(Effect::InsertLineBreak);
                    } else {
                        self.commit_edit(text, doc, &mut out);
                    }
                }
            }
            InputEvent::EditBlur { text } => {
                if self.is_editing() {
                    self.commit_edit(text, doc, &mut out);
                } else if let Some(id) = self.unsaved_edit.take() {
                    commit_text(id, text, doc, &mut out);
                }
            }
        }
        out
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    fn pointer_down(
        &mut self,
        pos: Point,
        target: HitTarget,
        doc: &Document,
        ctx: &InteractionContext<'_>,
        out: &mut Outcome,
    ) {
        if let Gesture::InlineEditing { id: editing } = self.gesture {
            match target {
                HitTarget::Layer(id) | HitTarget::Handle(id, _) if id != editing => {
                    self.unsaved_edit = Some(editing);
                    self.transition(Gesture::Idle);
                }
                // Caret placement inside the edited layer, or a press on the
                // canvas whose blur commits.
                _ => return,
            }
        }
        self.finish_pointer_gesture(out);

        match target {
            HitTarget::Canvas => {}
            HitTarget::Layer(id) => {
                let Some(layer) = doc.layer(id) else {
                    log::debug!("pointer-down on missing layer {id}");
                    return;
                };
                if doc.selected != Some(id) {
                    out.mutate(Mutation::Select { id });
                    out.effect(Effect::RenderLayers);
                    out.effect(Effect::RefreshLayerList);
                }
                let (x, y) = layer.position();
                let offset = ctx.to_canvas(pos) - Point::new(x, y);
                self.transition(Gesture::Dragging { id, offset });
                out.effect(Effect::CapturePointer);
            }
            HitTarget::Handle(id, handle) => {
                let origin = match doc.layer(id) {
                    Some(LayerRef::Text(t)) => ResizeOrigin::Text {
                        font_size: t.font_size,
                    },
                    Some(LayerRef::Image(i)) => ResizeOrigin::Image {
                        rect: Rect::from_origin_size((i.x, i.y), (i.width, i.height)),
                    },
                    None => {
                        log::debug!("resize handle of missing layer {id}");
                        return;
                    }
                };
                self.transition(Gesture::Resizing {
                    id,
                    handle,
                    start: pos,
                    origin,
                });
                out.effect(Effect::CapturePointer);
            }
        }
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    fn pointer_move(
        &mut self,
        pos: Point,
        doc: &Document,
        ctx: &InteractionContext<'_>,
        out: &mut Outcome,
    ) {
        match self.gesture {
            Gesture::Dragging { id, offset } => {
                let Some(layer) = doc.layer(id) else {
                    self.abandon(id, out);
                    return;
                };
                let proposed = ctx.to_canvas(pos) - offset;
                let size = ctx.measure.measure(layer);
                let snapped = snap_position(
                    doc,
                    id,
                    proposed,
                    size,
                    ctx.measure,
                    ctx.snap_threshold,
                );
                let x = snapped.point.x.round();
                let y = snapped.point.y.round();
                log::trace!("drag {id} to ({x}, {y})");
                out.mutate(Mutation::MoveLayer { id, x, y });
                out.effect(Effect::MoveElement { id, x, y });
                out.effect(Effect::ShowGuides(snapped.guides));
            }
            Gesture::Resizing {
                id,
                handle,
                start,
                origin,
            } => {
                if !doc.contains(id) {
                    self.abandon(id, out);
                    return;
                }
                let delta = ctx.to_canvas(pos) - ctx.to_canvas(start);
                match origin {
                    ResizeOrigin::Text { font_size } => {
                        let dy = if handle.is_top() { -delta.y } else { delta.y };
                        let size = clamp_font_size(f64::from(font_size) + dy);
                        log::trace!("resize {id} font to {size}");
                        out.mutate(Mutation::SetFontSize { id, size });
                        out.effect(Effect::ResizeElement {
                            id,
                            font_size: Some(size),
                            x: None,
                            y: None,
                            width: None,
                            height: None,
                        });
                        out.effect(Effect::EchoFontSize { size });
                    }
                    ResizeOrigin::Image { rect } => {
                        let rect = resize_image(rect, handle, delta);
                        log::trace!("resize {id} image to {rect:?}");
                        out.mutate(Mutation::SetImageGeometry {
                            id,
                            x: rect.x0,
                            y: rect.y0,
                            width: rect.width(),
                            height: rect.height(),
                        });
                        out.effect(Effect::ResizeElement {
                            id,
                            font_size: None,
                            x: Some(rect.x0),
                            y: Some(rect.y0),
                            width: Some(rect.width()),
                            height: Some(rect.height()),
                        });
                    }
                }
            }
            Gesture::Idle | Gesture::InlineEditing { .. } => {}
        }
    }

    // ─── Gesture end ─────────────────────────────────────────────────────

    /// End a drag or resize the normal way (pointer-up).
    fn finish_pointer_gesture(&mut self, out: &mut Outcome) {
        match self.gesture {
            Gesture::Dragging { .. } => {
                out.effect(Effect::HideGuides);
                out.effect(Effect::ReleasePointer);
                out.effect(Effect::Persist);
            }
            Gesture::Resizing { .. } => {
                out.effect(Effect::ReleasePointer);
                out.effect(Effect::RenderLayers);
                out.effect(Effect::Persist);
            }
            Gesture::Idle | Gesture::InlineEditing { .. } => return,
        }
        self.transition(Gesture::Idle);
    }

    /// The layer disappeared mid-gesture: drop back to idle without mutating.
    fn abandon(&mut self, id: LayerId, out: &mut Outcome) {
        log::debug!("layer {id} vanished during {}", self.gesture.name());
        if matches!(self.gesture, Gesture::Dragging { .. }) {
            out.effect(Effect::HideGuides);
        }
        out.effect(Effect::ReleasePointer);
        self.transition(Gesture::Idle);
    }

    // ─── Inline editing ──────────────────────────────────────────────────

    fn double_click(&mut self, target: HitTarget, doc: &Document, out: &mut Outcome) {
        let HitTarget::Layer(id) = target else {
            return;
        };
        if self.is_editing() || doc.text(id).is_none() {
            return;
        }
        self.finish_pointer_gesture(out);
        self.transition(Gesture::InlineEditing { id });
        out.effect(Effect::BeginInlineEdit { id });
    }

    fn commit_edit(&mut self, text: &str, doc: &Document, out: &mut Outcome) {
        let Gesture::InlineEditing { id } = self.gesture else {
            return;
        };
        self.transition(Gesture::Idle);
        commit_text(id, text, doc, out);
    }
}

/// Write the edited text back and leave edit mode on the element. A layer
/// deleted while it was edited only gets its element reset.
fn commit_text(id: LayerId, text: &str, doc: &Document, out: &mut Outcome) {
    let committed = match doc.text(id) {
        Some(_) => {
            out.mutate(Mutation::SetText {
                id,
                text: text.to_string(),
            });
            out.effect(Effect::RefreshLayerList);
            out.effect(Effect::Persist);
            text.to_string()
        }
        None => String::new(),
    };
    out.effect(Effect::EndInlineEdit {
        id,
        text: committed,
    });
    out.effect(Effect::RenderLayers);
}

/// New image box for a corner drag of `delta` canvas units. Each side is
/// floored at [`MIN_IMAGE_SIZE`]; left/top handles move the origin so the
/// opposite edge stays put.
pub fn resize_image(start: Rect, handle: Handle, delta: Vec2) -> Rect {
    let dx = if handle.is_left() { -delta.x } else { delta.x };
    let dy = if handle.is_top() { -delta.y } else { delta.y };
    let width = (start.width() + dx).max(MIN_IMAGE_SIZE);
    let height = (start.height() + dy).max(MIN_IMAGE_SIZE);
    let x = if handle.is_left() {
        start.x1 - width
    } else {
        start.x0
    };
    let y = if handle.is_top() {
        start.y1 - height
    } else {
        start.y0
    };
    Rect::from_origin_size((x, y), (width, height))
}

//! The editor application state.
//!
//! `CoverEditor` owns the document, the storage backend, the gesture state
//! machine, and the last rendered view trees. Hosts feed it input events
//! and button actions, then pull view patches and view models back out.
//! Nothing here touches the DOM.

use cover_core::controls::parse_int;
use cover_core::model::*;
use cover_core::presets::{self, CANVAS_PRESETS, STYLE_TEMPLATES};
use cover_core::{ControlValues, LayerId, Storage, load_from, save_to};
use cover_render::{
    HitTarget, LayerListItem, Measure, Patch, PreviewSurface, PropsPanel, ViewNode, Viewport,
    diff, hit_test, layer_list, layer_list_view, props_panel, render_layers, render_preview,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::autosave::Debouncer;
use crate::config::EditorConfig;
use crate::engine::{Mutation, apply_mutation};
use crate::input::{InputEvent, Modifiers};
use crate::interaction::{Effect, Gesture, Interaction, InteractionContext};
use crate::shortcuts::{ShortcutAction, ShortcutMap};

/// Default spot for layers added from the toolbar.
const NEW_LAYER_POS: Point = Point::new(40.0, 40.0);
/// A canvas double-click places the new text so the click lands near its middle.
const DOUBLE_CLICK_TEXT_OFFSET: Vec2 = Vec2::new(50.0, 12.0);
/// Font size used when the size field does not parse.
const FALLBACK_FONT_SIZE: u32 = 12;
const FALLBACK_FONT_WEIGHT: u16 = 400;

/// Patch lists for the two keyed view trees the host keeps in the DOM.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderPatches {
    pub layers: Vec<Patch>,
    pub list: Vec<Patch>,
}

impl RenderPatches {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.list.is_empty()
    }
}

/// Raw values of the text properties panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextPropsInput {
    pub text: String,
    pub font_size: String,
    pub color: String,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
}

pub struct CoverEditor {
    doc: Document,
    store: Box<dyn Storage>,
    config: EditorConfig,
    interaction: Interaction,
    autosave: Debouncer,
    /// Preview scale from the last layout, screen px per canvas unit.
    scale: f64,
    rendered_layers: Option<ViewNode>,
    rendered_list: Option<ViewNode>,
    /// Layers whose live element was edited by hand (inline editing) and
    /// must be rebuilt on the next render.
    rebuild: Vec<LayerId>,
}

impl CoverEditor {
    /// Load the stored document (or the defaults) from `store`.
    pub fn new(store: Box<dyn Storage>, config: EditorConfig) -> Self {
        let doc = load_from(store.as_ref(), &config.storage_key);
        Self::with_document(doc, store, config)
    }

    pub fn with_document(doc: Document, store: Box<dyn Storage>, config: EditorConfig) -> Self {
        let autosave = Debouncer::new(config.autosave_debounce_ms);
        Self {
            doc,
            store,
            config,
            interaction: Interaction::new(),
            autosave,
            scale: 1.0,
            rendered_layers: None,
            rendered_list: None,
            rebuild: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn storage(&self) -> &dyn Storage {
        self.store.as_ref()
    }

    pub fn gesture(&self) -> &Gesture {
        self.interaction.gesture()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether a debounced save is waiting to fire.
    pub fn save_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Save now. Failures are logged; the document stays as it is.
    pub fn persist(&mut self) -> bool {
        self.autosave.cancel();
        match save_to(
            &mut self.doc,
            self.store.as_ref(),
            &self.config.storage_key,
            None,
        ) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save state: {e}");
                false
            }
        }
    }

    /// Fire the debounced save if its quiet period is over.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.autosave.poll(now_ms) {
            self.persist()
        } else {
            false
        }
    }

    /// Milliseconds until the pending save, if any.
    pub fn next_save_in(&self, now_ms: f64) -> Option<f64> {
        self.autosave.remaining(now_ms)
    }

    // ─── Projections ─────────────────────────────────────────────────────

    /// Patches that bring the host's layer container and layer list up to
    /// date. The first call replaces both roots wholesale; layers left by
    /// inline editing are replaced whole.
    pub fn render(&mut self) -> RenderPatches {
        let layers = render_layers(&self.doc);
        let list = layer_list_view(&self.doc);
        let mut layer_patches = patch_from(self.rendered_layers.replace(layers.clone()), &layers);
        for id in self.rebuild.drain(..) {
            if let Some(node) = layers.find(id.as_str()) {
                rebuild_node(&mut layer_patches, node);
            }
        }
        RenderPatches {
            layers: layer_patches,
            list: patch_from(self.rendered_list.replace(list.clone()), &list),
        }
    }

    /// Forget what the host shows; the next [`render`](Self::render) sends
    /// full trees.
    pub fn invalidate(&mut self) {
        self.rendered_layers = None;
        self.rendered_list = None;
        self.rebuild.clear();
    }

    /// Lay out the preview card for `viewport` and remember its scale for
    /// pointer conversion.
    pub fn preview(&mut self, viewport: Viewport) -> PreviewSurface {
        let surface = render_preview(&self.doc, viewport);
        self.scale = surface.scale;
        surface
    }

    /// [`preview`](Self::preview) for a stage of the given client size.
    pub fn preview_for_stage(&mut self, stage_width: f64, stage_height: f64) -> PreviewSurface {
        self.preview(Viewport::from_stage(
            stage_width,
            stage_height,
            self.config.stage_inset,
        ))
    }

    pub fn props(&self) -> PropsPanel {
        props_panel(&self.doc)
    }

    pub fn layer_items(&self) -> Vec<LayerListItem> {
        layer_list(&self.doc)
    }

    pub fn controls(&self) -> ControlValues {
        ControlValues::from_document(&self.doc)
    }

    /// What is under a container-relative screen point.
    pub fn hit(&self, pos: Point, measure: &dyn Measure) -> HitTarget {
        hit_test(
            &self.doc,
            measure,
            self.to_canvas(pos),
            self.config.handle_size,
        )
    }

    fn to_canvas(&self, pos: Point) -> Point {
        let s = if self.scale > 0.0 { self.scale } else { 1.0 };
        Point::new(pos.x / s, pos.y / s)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Run one input event through the gesture machine, apply its
    /// mutations, and return the effects the host must perform.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        measure: &dyn Measure,
        now_ms: f64,
    ) -> Vec<Effect> {
        if let InputEvent::DoubleClick {
            pos,
            target: HitTarget::Canvas,
        } = event
            && !self.interaction.is_editing()
        {
            let at = self.to_canvas(*pos) - DOUBLE_CLICK_TEXT_OFFSET;
            self.add_text(now_ms, Some(at));
            return vec![Effect::RenderLayers, Effect::RefreshLayerList];
        }

        let ctx = InteractionContext {
            scale: self.scale,
            measure,
            snap_threshold: self.config.snap_threshold,
        };
        let outcome = self.interaction.handle(event, &self.doc, &ctx);
        for mutation in outcome.mutations {
            self.apply(mutation);
        }

        let mut effects = Vec::with_capacity(outcome.effects.len());
        for effect in outcome.effects {
            match effect {
                Effect::Persist => {
                    self.persist();
                }
                Effect::EndInlineEdit { id, .. } => {
                    self.rebuild.push(id);
                    effects.push(effect);
                }
                other => effects.push(other),
            }
        }
        effects
    }

    /// Resolve a global key press. Returns the effects to perform; an empty
    /// list means the key was not handled.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers, typing: bool) -> Vec<Effect> {
        let handled = match ShortcutMap::resolve(key, modifiers, typing) {
            Some(ShortcutAction::Delete) => self.delete_selected(),
            Some(ShortcutAction::Deselect) => self.clear_selection(),
            None => false,
        };
        if handled {
            vec![Effect::RenderLayers, Effect::RefreshLayerList]
        } else {
            Vec::new()
        }
    }

    fn apply(&mut self, mutation: Mutation) -> bool {
        let changed = apply_mutation(&mut self.doc, mutation);
        if !changed {
            log::trace!("mutation was a no-op");
        }
        changed
    }

    // ─── Layer actions ───────────────────────────────────────────────────

    /// Add a "New Text" layer at `at` (rounded) or the default spot, select
    /// it, and save.
    pub fn add_text(&mut self, now_ms: f64, at: Option<Point>) -> LayerId {
        let id = self.doc.fresh_id("t", epoch_ms(now_ms));
        let pos = at.unwrap_or(NEW_LAYER_POS);
        let layer = TextLayer::new(id, pos.x.round(), pos.y.round());
        self.apply(Mutation::AddText(Box::new(layer)));
        self.apply(Mutation::Select { id });
        log::debug!("added text layer {id}");
        self.persist();
        id
    }

    /// Add an image layer from a data URL. The natural size is scaled down
    /// to fit inside the canvas margins, keeping its aspect ratio.
    pub fn add_image(&mut self, now_ms: f64, src: String, natural_width: f64, natural_height: f64) -> LayerId {
        let id = self.doc.fresh_id("img", epoch_ms(now_ms));
        let (width, height) = fit_image(
            natural_width,
            natural_height,
            f64::from(self.doc.width) - 2.0 * NEW_LAYER_POS.x,
            f64::from(self.doc.height) - 2.0 * NEW_LAYER_POS.y,
        );
        let layer = ImageLayer::new(id, NEW_LAYER_POS.x, NEW_LAYER_POS.y, width, height, src);
        self.apply(Mutation::AddImage(Box::new(layer)));
        self.apply(Mutation::Select { id });
        log::debug!("added image layer {id} ({width} x {height})");
        self.persist();
        id
    }

    /// Delete the selected layer. `false` when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.doc.selected else {
            return false;
        };
        self.apply(Mutation::RemoveLayer { id });
        log::debug!("deleted layer {id}");
        self.persist();
        true
    }

    /// Select a layer (sidebar click). Selecting twice is a no-op.
    pub fn select(&mut self, id: LayerId) -> bool {
        self.apply(Mutation::Select { id })
    }

    pub fn clear_selection(&mut self) -> bool {
        self.apply(Mutation::ClearSelection)
    }

    /// Write the properties panel into the selected text layer and save.
    pub fn update_text_props(&mut self, input: &TextPropsInput) -> bool {
        let Some(id) = self.doc.selected_text().map(|t| t.id) else {
            return false;
        };
        let font_size = parse_int(&input.font_size)
            .filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(FALLBACK_FONT_SIZE);
        let font_weight = parse_int(&input.font_weight)
            .map(|n| n.clamp(100, 900) as u16)
            .unwrap_or(FALLBACK_FONT_WEIGHT);
        self.apply(Mutation::SetText {
            id,
            text: input.text.clone(),
        });
        self.apply(Mutation::SetTextStyle {
            id,
            font_size,
            font_weight,
            font_style: FontStyle::parse(&input.font_style),
            font_family: input.font_family.clone(),
            color: input.color.clone(),
        });
        self.persist();
        true
    }

    /// Font picker choice for the selected text layer.
    pub fn set_font(&mut self, family: &str) -> bool {
        let Some(t) = self.doc.selected_text().cloned() else {
            return false;
        };
        self.apply(Mutation::SetTextStyle {
            id: t.id,
            font_size: t.font_size,
            font_weight: t.font_weight,
            font_style: t.font_style,
            font_family: family.to_string(),
            color: t.color,
        });
        self.persist();
        true
    }

    // ─── Canvas actions ──────────────────────────────────────────────────

    /// Apply the values of the canvas controls; the save is debounced.
    pub fn update_controls(&mut self, controls: &ControlValues, now_ms: f64) {
        controls.apply_to(&mut self.doc);
        self.autosave.schedule(now_ms);
    }

    /// Resize the canvas to a catalog preset.
    pub fn apply_canvas_preset(&mut self, index: usize, now_ms: f64) -> bool {
        let Some(preset) = CANVAS_PRESETS.get(index) else {
            log::warn!("no canvas preset at {index}");
            return false;
        };
        self.apply(Mutation::SetCanvasSize {
            width: preset.w,
            height: preset.h,
        });
        self.autosave.schedule(now_ms);
        true
    }

    pub fn apply_bg_preset(&mut self, index: usize, now_ms: f64) -> bool {
        let Some(bg) = self.doc.bg_presets.get(index).map(BackgroundPreset::background) else {
            log::warn!("no background preset at {index}");
            return false;
        };
        self.apply(Mutation::SetBackground(bg));
        self.autosave.schedule(now_ms);
        true
    }

    /// Store the current colors as `Custom N` and save.
    pub fn save_bg_preset(&mut self) -> String {
        let name = format!("Custom {}", self.doc.bg_presets.len() + 1);
        let Background { c1, c2, c3 } = self.doc.background;
        self.apply(Mutation::AddBackgroundPreset(BackgroundPreset {
            name: name.clone(),
            c1,
            c2,
            c3,
        }));
        self.persist();
        name
    }

    /// Delete a custom background preset. The built-ins cannot be removed.
    pub fn delete_bg_preset(&mut self, index: usize) -> bool {
        if !self.apply(Mutation::RemoveBackgroundPreset { index }) {
            return false;
        }
        self.persist();
        true
    }

    /// Apply a style template: background, texture, and the fonts of the
    /// first three text layers.
    pub fn apply_template(&mut self, index: usize) -> bool {
        let Some(template) = STYLE_TEMPLATES.get(index) else {
            log::warn!("no style template at {index}");
            return false;
        };
        self.apply(Mutation::SetBackground(template.background()));
        self.apply(Mutation::SetTexture(template.texture));
        let styled: Vec<_> = self
            .doc
            .texts
            .iter()
            .zip(template.fonts.iter())
            .map(|(t, f)| Mutation::SetTextStyle {
                id: t.id,
                font_size: t.font_size,
                font_weight: f.weight,
                font_style: t.font_style,
                font_family: f.font.to_string(),
                color: f.color.to_string(),
            })
            .collect();
        for mutation in styled {
            self.apply(mutation);
        }
        log::debug!("applied template {}", template.name);
        self.persist();
        true
    }

    pub fn set_texture(&mut self, on: bool) {
        if self.apply(Mutation::SetTexture(on)) {
            self.persist();
        }
    }

    /// Jitter a random pastel set into the background. `rng` yields
    /// samples in `[0, 1)`.
    pub fn random_gradient(&mut self, rng: impl FnMut() -> f64, now_ms: f64) -> Background {
        let bg = presets::random_gradient(rng);
        self.apply(Mutation::SetBackground(bg));
        self.autosave.schedule(now_ms);
        bg
    }
}

fn patch_from(old: Option<ViewNode>, new: &ViewNode) -> Vec<Patch> {
    match old {
        Some(old) => diff(&old, new),
        None => vec![Patch::Replace {
            key: new.key.clone(),
            node: new.clone(),
        }],
    }
}

/// Swap the patches touching `node`'s subtree for one `Replace`. Editing
/// content in place can drop child elements the previous tree still lists.
fn rebuild_node(patches: &mut Vec<Patch>, node: &ViewNode) {
    let mut keys = Vec::new();
    subtree_keys(node, &mut keys);
    patches.retain(|p| !keys.contains(&patch_target(p)));
    patches.push(Patch::Replace {
        key: node.key.clone(),
        node: node.clone(),
    });
}

fn subtree_keys<'a>(node: &'a ViewNode, out: &mut Vec<&'a str>) {
    out.push(&node.key);
    for child in &node.children {
        subtree_keys(child, out);
    }
}

/// Element a patch edits: the parent for inserts and moves.
fn patch_target(patch: &Patch) -> &str {
    match patch {
        Patch::Insert { parent, .. } | Patch::Move { parent, .. } => parent,
        Patch::Remove { key }
        | Patch::Replace { key, .. }
        | Patch::SetClasses { key, .. }
        | Patch::SetStyle { key, .. }
        | Patch::RemoveStyle { key, .. }
        | Patch::SetAttr { key, .. }
        | Patch::RemoveAttr { key, .. }
        | Patch::SetText { key, .. } => key,
    }
}

fn epoch_ms(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 {
        now_ms as u64
    } else {
        0
    }
}

/// Scale `(w, h)` down to fit `max_w × max_h`, never up. Unknown sizes get
/// a square placeholder.
fn fit_image(w: f64, h: f64, max_w: f64, max_h: f64) -> (f64, f64) {
    let (w, h) = if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 {
        (w, h)
    } else {
        (DEFAULT_IMAGE_SIDE, DEFAULT_IMAGE_SIDE)
    };
    let fit = (max_w.max(MIN_IMAGE_SIZE) / w)
        .min(max_h.max(MIN_IMAGE_SIZE) / h)
        .min(1.0);
    (
        (w * fit).round().max(MIN_IMAGE_SIZE),
        (h * fit).round().max(MIN_IMAGE_SIZE),
    )
}

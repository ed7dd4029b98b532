//! WASM bridge for the cover editor: exposes `CoverEditor` to the page.
//!
//! Compiled via `wasm-pack build --target web`. The page's script wires DOM
//! events to the methods below, passing pointer positions relative to the
//! layer container (`clientX - rect.left`) and `Date.now()` timestamps.
//! Rendering, preview layout, guides, and inline editing are applied to
//! the DOM from here; pointer capture is left to the page, which watches
//! the returned effects for `capturePointer` / `releasePointer`.

mod dom;
mod export;
mod measure;
mod storage;

use cover_core::presets::{CANVAS_PRESETS, FONTS, STYLE_TEMPLATES};
use cover_core::{ControlValues, LayerId, MemoryStorage, Storage};
use cover_editor::{CoverEditor, EditorConfig, Effect, InputEvent, Modifiers, TextPropsInput};
use cover_render::{HitTarget, PropsPanel, RasterFormat, export_svg, svg_file_name};
use kurbo::Point;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::export::ImageCache;
use crate::measure::DomMeasure;
use crate::storage::LocalStorage;

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::error!("serialization failed: {e}");
            fallback.to_string()
        }
    }
}

/// The main WASM-facing editor controller.
///
/// Holds the editor state plus what only the browser has: the stage size,
/// decoded images, and the last props panel written to the inputs.
#[wasm_bindgen]
pub struct CoverApp {
    editor: CoverEditor,
    images: ImageCache,
    stage: (f64, f64),
    shown_props: Option<PropsPanel>,
}

#[wasm_bindgen]
impl CoverApp {
    /// Load the saved document (or the defaults) and set up logging.
    #[wasm_bindgen(constructor)]
    pub fn new(log_level: Option<String>) -> Self {
        console_error_panic_hook_setup();
        init_logging(log_level.as_deref());

        let store: Box<dyn Storage> = match LocalStorage::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; changes will not survive a reload");
                Box::new(MemoryStorage::new())
            }
        };
        let editor = CoverEditor::new(store, EditorConfig::default());
        let mut images = ImageCache::default();
        if let Err(e) = images.preload_document(editor.document()) {
            log::warn!("image preload failed: {e:?}");
        }

        Self {
            editor,
            images,
            stage: (0.0, 0.0),
            shown_props: None,
        }
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Bring the layer container, layer list, preview card, and properties
    /// panel up to date.
    pub fn refresh(&mut self) -> Result<(), JsValue> {
        let doc = dom::document()?;
        let patches = self.editor.render();
        dom::apply_patches(&doc, &patches.layers)?;
        dom::apply_patches(&doc, &patches.list)?;

        let (w, h) = self.stage;
        let surface = self.editor.preview_for_stage(w, h);
        dom::apply_preview(&doc, &surface)?;

        let props = self.editor.props();
        if self.shown_props.as_ref() != Some(&props) {
            dom::apply_props(&doc, &props)?;
            self.shown_props = Some(props);
        }
        Ok(())
    }

    /// The page replaced the managed elements; send full trees next time.
    pub fn invalidate(&mut self) {
        self.editor.invalidate();
        self.shown_props = None;
    }

    /// Stage client size changed (window resize). Returns the new scale.
    pub fn layout(&mut self, stage_width: f64, stage_height: f64) -> Result<f64, JsValue> {
        self.stage = (stage_width, stage_height);
        self.refresh()?;
        Ok(self.editor.scale())
    }

    // ─── Pointer & editing input ─────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f64, y: f64, now_ms: f64) -> Result<String, JsValue> {
        let pos = Point::new(x, y);
        let target = self.hit(pos)?;
        self.input(InputEvent::PointerDown { pos, target }, now_ms)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: f64) -> Result<String, JsValue> {
        self.input(InputEvent::pointer_move(x, y), now_ms)
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, now_ms: f64) -> Result<String, JsValue> {
        self.input(InputEvent::pointer_up(x, y), now_ms)
    }

    pub fn double_click(&mut self, x: f64, y: f64, now_ms: f64) -> Result<String, JsValue> {
        let pos = Point::new(x, y);
        let target = match self.hit(pos)? {
            // Double-clicking a handle edits its layer.
            HitTarget::Handle(id, _) => HitTarget::Layer(id),
            other => other,
        };
        self.input(InputEvent::DoubleClick { pos, target }, now_ms)
    }

    /// Key pressed in an inline-edited layer; `text` is its `innerText`.
    /// The page should `preventDefault` every Enter.
    pub fn edit_key(
        &mut self,
        key: &str,
        shift: bool,
        text: &str,
        now_ms: f64,
    ) -> Result<String, JsValue> {
        self.input(
            InputEvent::EditKey {
                key: key.to_string(),
                shift,
                text: text.to_string(),
            },
            now_ms,
        )
    }

    pub fn edit_blur(&mut self, text: &str, now_ms: f64) -> Result<String, JsValue> {
        self.input(
            InputEvent::EditBlur {
                text: text.to_string(),
            },
            now_ms,
        )
    }

    /// Global key press. Returns `true` if handled (call `preventDefault`).
    #[allow(clippy::too_many_arguments)]
    pub fn key_down(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        typing: bool,
    ) -> Result<bool, JsValue> {
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        let effects = self.editor.key_down(key, modifiers, typing);
        if effects.is_empty() {
            return Ok(false);
        }
        self.perform(&effects)?;
        Ok(true)
    }

    /// Fire the debounced save when due. Returns ms until the next one, or
    /// -1 when nothing is pending.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        self.editor.tick(now_ms);
        self.editor.next_save_in(now_ms).unwrap_or(-1.0)
    }

    // ─── Layer actions ───────────────────────────────────────────────────

    pub fn add_text(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let id = self.editor.add_text(now_ms, None);
        self.refresh()?;
        Ok(id.to_string())
    }

    /// Add an image from a data URL with its natural size.
    pub fn add_image(
        &mut self,
        src: String,
        natural_width: f64,
        natural_height: f64,
        now_ms: f64,
    ) -> Result<String, JsValue> {
        self.images.preload(&src)?;
        let id = self
            .editor
            .add_image(now_ms, src, natural_width, natural_height);
        self.refresh()?;
        Ok(id.to_string())
    }

    pub fn delete_selected(&mut self) -> Result<bool, JsValue> {
        let deleted = self.editor.delete_selected();
        if deleted {
            self.images.retain_document(self.editor.document());
            self.refresh()?;
        }
        Ok(deleted)
    }

    /// Sidebar click.
    pub fn select(&mut self, id: &str) -> Result<(), JsValue> {
        if self.editor.select(LayerId::intern(id)) {
            self.refresh()?;
        }
        Ok(())
    }

    /// Properties panel input; `json` is a `TextPropsInput`.
    pub fn update_text_props(&mut self, json: &str) -> Result<bool, JsValue> {
        let input: TextPropsInput =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let changed = self.editor.update_text_props(&input);
        if changed {
            // The panel already shows what was typed.
            self.shown_props = Some(self.editor.props());
            self.refresh()?;
        }
        Ok(changed)
    }

    pub fn set_font(&mut self, family: &str) -> Result<bool, JsValue> {
        let changed = self.editor.set_font(family);
        if changed {
            self.refresh()?;
        }
        Ok(changed)
    }

    // ─── Canvas actions ──────────────────────────────────────────────────

    /// Canvas inputs changed; `json` is a `ControlValues`. Saving is
    /// debounced; keep calling `tick`.
    pub fn update_controls(&mut self, json: &str, now_ms: f64) -> Result<(), JsValue> {
        let controls: ControlValues =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.editor.update_controls(&controls, now_ms);
        self.refresh()
    }

    /// Current canvas control values (JSON), for filling the inputs.
    pub fn controls_json(&self) -> String {
        to_json(&self.editor.controls(), "{}")
    }

    pub fn apply_canvas_preset(&mut self, index: usize, now_ms: f64) -> Result<bool, JsValue> {
        let applied = self.editor.apply_canvas_preset(index, now_ms);
        if applied {
            self.refresh()?;
        }
        Ok(applied)
    }

    pub fn apply_bg_preset(&mut self, index: usize, now_ms: f64) -> Result<bool, JsValue> {
        let applied = self.editor.apply_bg_preset(index, now_ms);
        if applied {
            self.refresh()?;
        }
        Ok(applied)
    }

    /// Returns the new preset's name.
    pub fn save_bg_preset(&mut self) -> String {
        self.editor.save_bg_preset()
    }

    pub fn delete_bg_preset(&mut self, index: usize) -> bool {
        self.editor.delete_bg_preset(index)
    }

    pub fn bg_presets_json(&self) -> String {
        to_json(&self.editor.document().bg_presets, "[]")
    }

    pub fn apply_template(&mut self, index: usize) -> Result<bool, JsValue> {
        let applied = self.editor.apply_template(index);
        if applied {
            self.refresh()?;
        }
        Ok(applied)
    }

    pub fn set_texture(&mut self, on: bool) -> Result<(), JsValue> {
        self.editor.set_texture(on);
        self.refresh()
    }

    pub fn random_gradient(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.editor.random_gradient(js_sys::Math::random, now_ms);
        self.refresh()
    }

    // ─── Views ───────────────────────────────────────────────────────────

    pub fn props_json(&self) -> String {
        to_json(&self.editor.props(), "{}")
    }

    pub fn layers_json(&self) -> String {
        to_json(&self.editor.layer_items(), "[]")
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Download `cover.png` or `cover.jpeg`.
    pub fn download_raster(&self, format: &str) -> Result<(), JsValue> {
        let format = RasterFormat::parse(format)
            .ok_or_else(|| JsValue::from_str(&format!("unknown format {format:?}")))?;
        let url = export::raster_data_url(
            self.editor.document(),
            format,
            self.editor.config().jpeg_quality,
            &self.images,
        )?;
        export::download(&url, &format.file_name())
    }

    /// Download `cover_{w}x{h}.svg`.
    pub fn download_svg(&self) -> Result<(), JsValue> {
        let doc = self.editor.document();
        export::download(&export::svg_data_url(&export_svg(doc)), &svg_file_name(doc))
    }

    pub fn svg(&self) -> String {
        export_svg(self.editor.document())
    }
}

impl CoverApp {
    fn hit(&self, pos: Point) -> Result<HitTarget, JsValue> {
        let measure = DomMeasure::new(dom::document()?);
        Ok(self.editor.hit(pos, &measure))
    }

    fn input(&mut self, event: InputEvent, now_ms: f64) -> Result<String, JsValue> {
        let measure = DomMeasure::new(dom::document()?);
        let effects = self.editor.handle_input(&event, &measure, now_ms);
        self.perform(&effects)?;
        Ok(to_json(&effects, "[]"))
    }

    /// Apply effects to the DOM. Pointer capture stays with the page.
    fn perform(&mut self, effects: &[Effect]) -> Result<(), JsValue> {
        let doc = dom::document()?;
        let mut refresh = false;
        for effect in effects {
            match effect {
                Effect::CapturePointer | Effect::ReleasePointer | Effect::Persist => {}
                Effect::MoveElement { id, x, y } => dom::move_element(&doc, *id, *x, *y)?,
                Effect::ResizeElement {
                    id,
                    font_size,
                    x,
                    y,
                    width,
                    height,
                } => dom::resize_element(&doc, *id, *font_size, [*x, *y, *width, *height])?,
                Effect::ShowGuides(guides) => dom::show_guides(&doc, guides)?,
                Effect::HideGuides => dom::hide_guides(&doc)?,
                Effect::EchoFontSize { size } => dom::echo_font_size(&doc, *size),
                Effect::BeginInlineEdit { id } => dom::begin_inline_edit(&doc, *id)?,
                Effect::EndInlineEdit { id, text } => dom::end_inline_edit(&doc, *id, text)?,
                Effect::InsertLineBreak => dom::insert_line_break(&doc)?,
                Effect::RenderLayers | Effect::RefreshLayerList => refresh = true,
            }
        }
        if refresh {
            self.refresh()?;
        }
        Ok(())
    }
}

// ─── Static catalogs ─────────────────────────────────────────────────────

/// Canvas size presets as JSON.
#[wasm_bindgen]
pub fn canvas_presets() -> String {
    to_json(CANVAS_PRESETS, "[]")
}

#[wasm_bindgen]
pub fn fonts() -> String {
    to_json(FONTS, "[]")
}

#[wasm_bindgen]
pub fn style_templates() -> String {
    to_json(STYLE_TEMPLATES, "[]")
}

/// Route `log` records to the browser console. A second `CoverApp` only
/// changes the level.
fn init_logging(level: Option<&str>) {
    let level = parse_level(level.unwrap_or("info"));
    if let Err(e) = console_log::init_with_level(level) {
        log::warn!("console logger already installed: {e}");
        log::set_max_level(level.to_level_filter());
    }
}

fn parse_level(s: &str) -> log::Level {
    s.parse().unwrap_or(log::Level::Info)
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("cover-wasm panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

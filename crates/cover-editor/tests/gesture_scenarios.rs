//! Integration tests: editor gestures end to end (cover-editor).
//!
//! Drives `CoverEditor` with the same event sequences the browser host
//! sends and checks the document, the host effects, and what was saved.

use std::sync::Arc;

use cover_core::{LayerId, MemoryStorage, STORAGE_KEY, Storage, load};
use cover_editor::{CoverEditor, EditorConfig, Effect, Gesture, InputEvent, Modifiers};
use cover_render::{EstimatedMeasure, Handle, HitTarget, Patch, Viewport};
use kurbo::Point;
use pretty_assertions::assert_eq;

const M: EstimatedMeasure = EstimatedMeasure;
const NOW: f64 = 1_700_000_000_000.0;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor_with_store() -> (CoverEditor, Arc<MemoryStorage>) {
    init();
    let store = Arc::new(MemoryStorage::new());
    let editor = CoverEditor::new(Box::new(Arc::clone(&store)), EditorConfig::default());
    (editor, store)
}

fn editor() -> CoverEditor {
    editor_with_store().0
}

fn id(s: &str) -> LayerId {
    LayerId::intern(s)
}

fn send(ed: &mut CoverEditor, event: InputEvent) -> Vec<Effect> {
    ed.handle_input(&event, &M, NOW)
}

fn position(ed: &CoverEditor, layer: &str) -> (f64, f64) {
    ed.document()
        .layer(id(layer))
        .map(|l| l.position())
        .unwrap_or((f64::NAN, f64::NAN))
}

// ─── Dragging ───────────────────────────────────────────────────────────

#[test]
fn drag_stores_rounded_positions() {
    let mut ed = editor();
    send(&mut ed, InputEvent::pointer_down(50.0, 130.0, HitTarget::Layer(id("t2"))));
    assert!(matches!(ed.gesture(), Gesture::Dragging { .. }));

    let effects = send(&mut ed, InputEvent::pointer_move(300.4, 20.7));
    assert_eq!(position(&ed, "t2"), (286.0, 11.0));
    assert!(effects.contains(&Effect::MoveElement {
        id: id("t2"),
        x: 286.0,
        y: 11.0
    }));

    let effects = send(&mut ed, InputEvent::pointer_up(300.4, 20.7));
    assert_eq!(effects, vec![Effect::HideGuides, Effect::ReleasePointer]);
    assert_eq!(*ed.gesture(), Gesture::Idle);
}

#[test]
fn drag_at_half_scale_snaps_to_canvas_centre() {
    let (mut ed, store) = editor_with_store();
    // 980 x 320 card in a 490 x 160 viewport.
    let surface = ed.preview(Viewport::new(490.0, 160.0));
    assert_eq!(surface.scale, 0.5);

    let target = ed.hit(Point::new(23.0, 19.0), &M);
    assert_eq!(target, HitTarget::Layer(id("t1")));

    let effects = send(&mut ed, InputEvent::pointer_down(23.0, 19.0, target));
    assert_eq!(
        effects,
        vec![
            Effect::RenderLayers,
            Effect::RefreshLayerList,
            Effect::CapturePointer
        ]
    );
    assert_eq!(ed.document().selected, Some(id("t1")));

    // Pointer offset (10, 10); proposed top-left (388, 100), centre x 491.7.
    let effects = send(&mut ed, InputEvent::pointer_move(199.0, 55.0));
    assert_eq!(position(&ed, "t1"), (386.0, 100.0));
    let guides = effects.iter().find_map(|e| match e {
        Effect::ShowGuides(g) => Some(*g),
        _ => None,
    });
    assert_eq!(guides.and_then(|g| g.vertical), Some(490.0));
    assert_eq!(guides.and_then(|g| g.horizontal), None);

    send(&mut ed, InputEvent::pointer_up(199.0, 55.0));
    let reloaded = load(store.as_ref());
    let t1 = reloaded.text(id("t1")).unwrap();
    assert_eq!((t1.x, t1.y), (386.0, 100.0));
}

#[test]
fn new_gesture_tears_down_previous_drag() {
    let mut ed = editor();
    send(&mut ed, InputEvent::pointer_down(40.0, 30.0, HitTarget::Layer(id("t1"))));
    let effects = send(&mut ed, InputEvent::pointer_down(40.0, 125.0, HitTarget::Layer(id("t2"))));
    assert_eq!(&effects[..2], &[Effect::HideGuides, Effect::ReleasePointer]);
    assert_eq!(ed.document().selected, Some(id("t2")));
    assert!(matches!(ed.gesture(), Gesture::Dragging { id: d, .. } if *d == id("t2")));
}

#[test]
fn layer_deleted_mid_drag_returns_to_idle() {
    let mut ed = editor();
    send(&mut ed, InputEvent::pointer_down(40.0, 30.0, HitTarget::Layer(id("t1"))));
    assert!(ed.delete_selected());
    let before = ed.document().clone();

    let effects = send(&mut ed, InputEvent::pointer_move(200.0, 200.0));
    assert_eq!(effects, vec![Effect::HideGuides, Effect::ReleasePointer]);
    assert_eq!(*ed.gesture(), Gesture::Idle);
    assert_eq!(*ed.document(), before);
}

#[test]
fn selecting_twice_is_idempotent() {
    let mut ed = editor();
    assert!(ed.select(id("t3")));
    assert!(!ed.select(id("t3")));
    let effects = send(&mut ed, InputEvent::pointer_down(40.0, 200.0, HitTarget::Layer(id("t3"))));
    assert_eq!(effects, vec![Effect::CapturePointer]);
}

// ─── Resizing ───────────────────────────────────────────────────────────

#[test]
fn bottom_right_resize_grows_font() {
    let mut ed = editor();
    ed.select(id("t2"));
    let handle = HitTarget::Handle(id("t2"), Handle::BottomRight);
    send(&mut ed, InputEvent::pointer_down(916.0, 197.0, handle));
    assert!(matches!(ed.gesture(), Gesture::Resizing { .. }));

    let effects = send(&mut ed, InputEvent::pointer_move(916.0, 207.0));
    assert_eq!(ed.document().text(id("t2")).unwrap().font_size, 74);
    assert!(effects.contains(&Effect::EchoFontSize { size: 74 }));

    let effects = send(&mut ed, InputEvent::pointer_up(916.0, 207.0));
    assert_eq!(effects, vec![Effect::ReleasePointer, Effect::RenderLayers]);
}

#[test]
fn top_handle_resize_inverts_and_floors() {
    let mut ed = editor();
    ed.select(id("t2"));
    send(
        &mut ed,
        InputEvent::pointer_down(36.0, 120.0, HitTarget::Handle(id("t2"), Handle::TopLeft)),
    );
    send(&mut ed, InputEvent::pointer_move(36.0, 130.0));
    assert_eq!(ed.document().text(id("t2")).unwrap().font_size, 54);
    send(&mut ed, InputEvent::pointer_move(36.0, 400.0));
    assert_eq!(ed.document().text(id("t2")).unwrap().font_size, 8);
}

#[test]
fn image_left_handle_keeps_right_edge() {
    let mut ed = editor();
    let img = ed.add_image(NOW, "data:image/png;base64,AAAA".into(), 200.0, 100.0);
    {
        let i = ed.document().image(img).unwrap();
        assert_eq!((i.x, i.y, i.width, i.height), (40.0, 40.0, 200.0, 100.0));
    }

    send(
        &mut ed,
        InputEvent::pointer_down(40.0, 40.0, HitTarget::Handle(img, Handle::TopLeft)),
    );
    send(&mut ed, InputEvent::pointer_move(70.0, 30.0));
    let i = ed.document().image(img).unwrap();
    assert_eq!((i.x, i.y, i.width, i.height), (70.0, 30.0, 170.0, 110.0));
    assert_eq!(i.x + i.width, 240.0);
    assert_eq!(i.y + i.height, 140.0);
}

// ─── Inline editing ─────────────────────────────────────────────────────

#[test]
fn shift_enter_stays_in_edit_mode() {
    let (mut ed, store) = editor_with_store();
    let effects = send(
        &mut ed,
        InputEvent::DoubleClick {
            pos: Point::new(40.0, 200.0),
            target: HitTarget::Layer(id("t3")),
        },
    );
    assert_eq!(effects, vec![Effect::BeginInlineEdit { id: id("t3") }]);

    let effects = send(
        &mut ed,
        InputEvent::EditKey {
            key: "Enter".into(),
            shift: true,
            text: "live".into(),
        },
    );
    assert_eq!(effects, vec![Effect::InsertLineBreak]);
    assert!(matches!(ed.gesture(), Gesture::InlineEditing { .. }));

    let effects = send(
        &mut ed,
        InputEvent::EditKey {
            key: "Enter".into(),
            shift: false,
            text: "live\ndemo".into(),
        },
    );
    assert_eq!(*ed.gesture(), Gesture::Idle);
    assert_eq!(ed.document().text(id("t3")).unwrap().text, "live\ndemo");
    assert!(effects.contains(&Effect::EndInlineEdit {
        id: id("t3"),
        text: "live\ndemo".into()
    }));
    assert!(effects.contains(&Effect::RenderLayers));
    assert!(store.get(STORAGE_KEY).unwrap().unwrap().contains("live\\ndemo"));
}

#[test]
fn press_on_another_layer_drags_and_blur_commits() {
    let mut ed = editor();
    send(
        &mut ed,
        InputEvent::DoubleClick {
            pos: Point::new(40.0, 30.0),
            target: HitTarget::Layer(id("t1")),
        },
    );
    // The press reaches the editor before the edited element's blur.
    let effects = send(&mut ed, InputEvent::pointer_down(40.0, 130.0, HitTarget::Layer(id("t2"))));
    assert!(effects.contains(&Effect::CapturePointer));
    assert!(matches!(ed.gesture(), Gesture::Dragging { id: t, .. } if *t == id("t2")));
    assert_eq!(ed.document().selected, Some(id("t2")));

    let effects = send(&mut ed, InputEvent::EditBlur { text: "Ep. 68".into() });
    assert!(effects.contains(&Effect::EndInlineEdit {
        id: id("t1"),
        text: "Ep. 68".into()
    }));
    assert_eq!(ed.document().text(id("t1")).unwrap().text, "Ep. 68");
    assert_eq!(ed.layer_items()[0].label, "Ep. 68");
    assert!(matches!(ed.gesture(), Gesture::Dragging { .. }));

    send(&mut ed, InputEvent::pointer_move(60.0, 150.0));
    send(&mut ed, InputEvent::pointer_up(60.0, 150.0));
    assert_eq!(*ed.gesture(), Gesture::Idle);
    // A later blur has nothing left to commit.
    assert!(send(&mut ed, InputEvent::EditBlur { text: "stale".into() }).is_empty());
    assert_eq!(ed.document().text(id("t1")).unwrap().text, "Ep. 68");
}

#[test]
fn press_inside_edited_layer_keeps_editing() {
    let mut ed = editor();
    send(
        &mut ed,
        InputEvent::DoubleClick {
            pos: Point::new(40.0, 30.0),
            target: HitTarget::Layer(id("t1")),
        },
    );
    assert!(send(&mut ed, InputEvent::pointer_down(45.0, 32.0, HitTarget::Layer(id("t1")))).is_empty());
    assert!(send(&mut ed, InputEvent::pointer_down(900.0, 300.0, HitTarget::Canvas)).is_empty());
    assert!(matches!(ed.gesture(), Gesture::InlineEditing { .. }));

    send(&mut ed, InputEvent::EditBlur { text: "Ep. 68".into() });
    assert_eq!(*ed.gesture(), Gesture::Idle);
    assert_eq!(ed.document().text(id("t1")).unwrap().text, "Ep. 68");
}

#[test]
fn double_click_on_image_does_not_edit() {
    let mut ed = editor();
    let img = ed.add_image(NOW, String::new(), 50.0, 50.0);
    let effects = send(
        &mut ed,
        InputEvent::DoubleClick {
            pos: Point::new(45.0, 45.0),
            target: HitTarget::Layer(img),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(*ed.gesture(), Gesture::Idle);
}

// ─── Layer actions ──────────────────────────────────────────────────────

#[test]
fn add_text_selects_new_layer() {
    let mut ed = editor();
    let new = ed.add_text(NOW, None);
    let doc = ed.document();
    let t = doc.text(new).unwrap();
    assert_eq!((t.x, t.y, t.font_size), (40.0, 40.0, 24));
    assert_eq!(doc.selected, Some(new));

    let items = ed.layer_items();
    let last = items.last().unwrap();
    assert_eq!(last.label, "New Text");
    assert!(last.active);
    assert_eq!(ed.props().text.map(|p| p.font_size), Some(24));
}

#[test]
fn add_text_ids_stay_unique_within_one_millisecond() {
    let mut ed = editor();
    let a = ed.add_text(NOW, None);
    let b = ed.add_text(NOW, None);
    assert_ne!(a, b);
    assert_eq!(a.as_str(), "t1700000000000");
}

#[test]
fn canvas_double_click_adds_text_near_pointer() {
    let mut ed = editor();
    let effects = send(
        &mut ed,
        InputEvent::DoubleClick {
            pos: Point::new(300.0, 200.0),
            target: HitTarget::Canvas,
        },
    );
    assert_eq!(effects, vec![Effect::RenderLayers, Effect::RefreshLayerList]);
    let t = ed.document().selected_text().unwrap();
    assert_eq!((t.x, t.y), (250.0, 188.0));
}

#[test]
fn delete_key_removes_selection() {
    let mut ed = editor();
    ed.select(id("t2"));

    assert!(ed.key_down("Backspace", Modifiers::NONE, true).is_empty());
    assert!(ed.document().contains(id("t2")));

    let effects = ed.key_down("Delete", Modifiers::NONE, false);
    assert!(!effects.is_empty());
    assert!(!ed.document().contains(id("t2")));
    assert_eq!(ed.document().selected, None);
    assert!(ed.key_down("Delete", Modifiers::NONE, false).is_empty());
}

#[test]
fn escape_clears_selection() {
    let mut ed = editor();
    ed.select(id("t1"));
    assert!(!ed.key_down("Escape", Modifiers::NONE, false).is_empty());
    assert_eq!(ed.document().selected, None);
    assert!(ed.document().contains(id("t1")));
}

// ─── Rendering ──────────────────────────────────────────────────────────

#[test]
fn drag_renders_as_style_patches_only() {
    let mut ed = editor();
    ed.select(id("t1"));
    ed.render();

    send(&mut ed, InputEvent::pointer_down(40.0, 30.0, HitTarget::Layer(id("t1"))));
    send(&mut ed, InputEvent::pointer_move(700.0, 290.0));
    send(&mut ed, InputEvent::pointer_up(700.0, 290.0));

    let patches = ed.render();
    assert!(patches.list.is_empty());
    assert!(!patches.layers.is_empty());
    assert!(
        patches
            .layers
            .iter()
            .all(|p| matches!(p, Patch::SetStyle { key, .. } if key == "t1"))
    );
    assert!(ed.render().is_empty());
}

pub mod autosave;
pub mod config;
pub mod editor;
pub mod engine;
pub mod input;
pub mod interaction;
pub mod shortcuts;
pub mod snap;

pub use autosave::Debouncer;
pub use config::EditorConfig;
pub use editor::{CoverEditor, RenderPatches, TextPropsInput};
pub use engine::{Mutation, apply_mutation};
pub use input::{InputEvent, Modifiers};
pub use interaction::{Effect, Gesture, Interaction, InteractionContext, Outcome};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use snap::{SnapGuides, SnapResult, snap_position};

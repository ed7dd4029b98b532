//! Editor tuning knobs.

use cover_core::STORAGE_KEY;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Snap distance in canvas units (strict `<`).
    pub snap_threshold: f64,
    /// Quiet period before control edits are saved.
    pub autosave_debounce_ms: f64,
    /// Margin subtracted from the stage on each axis before fitting the card.
    pub stage_inset: f64,
    /// Side of a gizmo handle's hit square, in canvas units.
    pub handle_size: f64,
    pub storage_key: String,
    /// `toDataURL` quality for JPEG exports.
    pub jpeg_quality: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 5.0,
            autosave_debounce_ms: 500.0,
            stage_inset: 64.0,
            handle_size: 10.0,
            storage_key: STORAGE_KEY.to_string(),
            jpeg_quality: cover_render::JPEG_QUALITY,
        }
    }
}

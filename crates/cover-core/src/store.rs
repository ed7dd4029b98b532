//! Persistence of the whole document as one JSON blob.
//!
//! Loading never fails: a missing, unreadable, or malformed blob is logged
//! and the defaults are used. Fields are applied one by one over the
//! defaults, so older or newer blobs load as far as they are understood.

use crate::controls::ControlValues;
use crate::model::{Background, BackgroundPreset, Document, ImageLayer, TextLayer};
use crate::presets;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Key the document blob is stored under.
pub const STORAGE_KEY: &str = "coverEditorState";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A synchronous string key-value store (`localStorage` in the browser).
pub trait Storage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store for native use and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Other(format!("Lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock poisoned: {e}")))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock poisoned: {e}")))?;
        entries.remove(key);
        Ok(())
    }
}

/// Stored blob shape. Every field is optional; unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PersistedDocument {
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
    radius: Option<f64>,
    background: Option<Background>,
    texture: Option<bool>,
    texts: Option<Vec<serde_json::Value>>,
    images: Option<Vec<serde_json::Value>>,
    bg_presets: Option<Vec<serde_json::Value>>,
}

/// Decode list entries one by one; an entry that does not decode is
/// dropped with a warning instead of failing the whole blob.
fn entries<T: DeserializeOwned>(what: &str, values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("dropping stored {what} #{i}: {e}");
                None
            }
        })
        .collect()
}

impl PersistedDocument {
    fn apply(self, doc: &mut Document) {
        // Zero counts as absent, as the page always did.
        let dim = |v: Option<f64>, current: u32| match v {
            Some(n) if n.is_finite() && n > 0.0 => n.round().min(f64::from(u32::MAX)) as u32,
            _ => current,
        };
        doc.width = dim(self.width, doc.width);
        doc.height = dim(self.height, doc.height);
        doc.padding = dim(self.padding, doc.padding);
        doc.radius = dim(self.radius, doc.radius);

        if let Some(bg) = self.background {
            doc.background = bg;
        }
        if let Some(texture) = self.texture {
            doc.texture = texture;
        }
        if let Some(texts) = self.texts {
            doc.texts = entries::<TextLayer>("text layer", texts);
        }
        if let Some(images) = self.images {
            doc.images = entries::<ImageLayer>("image layer", images);
        }
        if let Some(bg_presets) = self.bg_presets {
            doc.bg_presets = entries::<BackgroundPreset>("background preset", bg_presets);
        }
    }
}

/// Parse a stored blob over the defaults.
pub fn from_json(json: &str) -> StorageResult<Document> {
    let persisted: PersistedDocument = serde_json::from_str(json)?;
    let mut doc = Document::default();
    persisted.apply(&mut doc);
    fill_empty(&mut doc);
    doc.normalize();
    Ok(doc)
}

pub fn to_json(doc: &Document) -> StorageResult<String> {
    Ok(serde_json::to_string(doc)?)
}

fn fill_empty(doc: &mut Document) {
    if doc.texts.is_empty() {
        doc.texts = presets::default_texts();
    }
    if doc.bg_presets.is_empty() {
        doc.bg_presets = presets::default_bg_presets();
    }
}

/// Load the document from `store`, falling back to defaults on any failure.
pub fn load(store: &dyn Storage) -> Document {
    load_from(store, STORAGE_KEY)
}

/// [`load`] under a custom key.
pub fn load_from(store: &dyn Storage, key: &str) -> Document {
    let blob = match store.get(key) {
        Ok(blob) => blob,
        Err(e) => {
            log::error!("Failed to load state: {e}");
            None
        }
    };

    let Some(json) = blob else {
        log::debug!("no stored state, using defaults");
        return Document::default();
    };

    match from_json(&json) {
        Ok(doc) => {
            log::debug!(
                "loaded {} text and {} image layers",
                doc.texts.len(),
                doc.images.len()
            );
            doc
        }
        Err(e) => {
            log::error!("Failed to load state: {e}");
            Document::default()
        }
    }
}

/// Save the whole document. When `controls` is given, the visible control
/// values are read into the document first.
pub fn save(
    doc: &mut Document,
    store: &dyn Storage,
    controls: Option<&ControlValues>,
) -> StorageResult<()> {
    save_to(doc, store, STORAGE_KEY, controls)
}

/// [`save`] under a custom key.
pub fn save_to(
    doc: &mut Document,
    store: &dyn Storage,
    key: &str,
    controls: Option<&ControlValues>,
) -> StorageResult<()> {
    if let Some(controls) = controls {
        controls.apply_to(doc);
    }
    let json = to_json(doc)?;
    store.set(key, &json)?;
    log::trace!("saved {} bytes under {key}", json.len());
    Ok(())
}

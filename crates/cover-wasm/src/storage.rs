//! `localStorage` backend for the document blob.

use cover_core::{Storage, StorageError, StorageResult};
use wasm_bindgen::JsValue;

pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// The window's `localStorage`. Fails in private modes and sandboxed
    /// frames where storage is blocked.
    pub fn open() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { inner })
    }
}

fn js_err(e: JsValue) -> StorageError {
    StorageError::Unavailable(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key).map_err(js_err)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        // Quota errors land here.
        self.inner.set_item(key, value).map_err(js_err)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key).map_err(js_err)
    }
}

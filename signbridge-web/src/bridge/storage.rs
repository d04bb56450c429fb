//! `localStorage`-backed blob store

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::error::StoreError;
use crate::training::BlobStore;

fn backend_error(context: &str, err: JsValue) -> StoreError {
    StoreError::Backend(format!("{}: {:?}", context, err))
}

pub struct LocalStorageBlobStore {
    storage: Storage,
}

impl LocalStorageBlobStore {
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Backend("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| backend_error("localStorage unavailable", e))?
            .ok_or_else(|| StoreError::Backend("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl BlobStore for LocalStorageBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(|e| backend_error("read failed", e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| backend_error("write failed", e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| backend_error("remove failed", e))
    }
}

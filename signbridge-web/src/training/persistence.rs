//! Trained model persistence
//!
//! A `ModelRecord` (weights, label order, accuracy, training time) is stored
//! as JSON under one key of a `BlobStore`. Loading distinguishes a missing
//! record from one that cannot be decoded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::{NetworkClassifier, NetworkWeights};
use crate::error::{ModelError, StoreError};

pub const MODEL_KEY: &str = "signbridge_gesture_model";

/// String key-value storage
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryBlobStore {
    entries: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub weights: NetworkWeights,
    /// Index = network output
    pub gesture_labels: Vec<String>,
    pub accuracy: f32,
    pub trained_at_ms: f64,
}

impl ModelRecord {
    pub fn to_classifier(&self) -> Result<NetworkClassifier, ModelError> {
        NetworkClassifier::new(&self.weights, self.gesture_labels.clone())
    }
}

pub struct ModelRepository<S: BlobStore> {
    store: S,
    key: String,
}

impl<S: BlobStore> ModelRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, MODEL_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn save(&mut self, record: &ModelRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.store.set(&self.key, &json)?;
        info!(
            key = %self.key,
            classes = record.gesture_labels.len(),
            accuracy = record.accuracy,
            "model saved"
        );
        Ok(())
    }

    pub fn load(&self) -> Result<ModelRecord, StoreError> {
        let json = self
            .store
            .get(&self.key)?
            .ok_or_else(|| StoreError::NotFound(self.key.clone()))?;
        serde_json::from_str(&json).map_err(|e| {
            warn!(key = %self.key, error = %e, "stored model is unreadable");
            StoreError::Corrupt(e.to_string())
        })
    }

    /// Load and build a ready classifier; weights that do not fit count as corrupt
    pub fn load_classifier(&self) -> Result<(NetworkClassifier, ModelRecord), StoreError> {
        let record = self.load()?;
        let classifier = record
            .to_classifier()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        info!(key = %self.key, classes = record.gesture_labels.len(), "model loaded");
        Ok((classifier, record))
    }

    pub fn delete(&mut self) -> Result<(), StoreError> {
        self.store.remove(&self.key)?;
        info!(key = %self.key, "model deleted");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::standard_layers;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record() -> ModelRecord {
        let mut rng = StdRng::seed_from_u64(3);
        ModelRecord {
            weights: NetworkWeights::initialized(&standard_layers(2), &mut rng),
            gesture_labels: vec!["Hello".to_string(), "Yes".to_string()],
            accuracy: 0.85,
            trained_at_ms: 1_700_000_000_000.0,
        }
    }

    #[test]
    fn test_missing_is_not_found() {
        let repo = ModelRepository::new(MemoryBlobStore::new());
        assert_matches!(repo.load(), Err(StoreError::NotFound(key)) if key == MODEL_KEY);
    }

    #[test]
    fn test_save_load_delete() {
        let mut repo = ModelRepository::new(MemoryBlobStore::new());
        let saved = record();
        repo.save(&saved).unwrap();

        let (classifier, loaded) = repo.load_classifier().unwrap();
        assert_eq!(loaded.gesture_labels, saved.gesture_labels);
        assert!(classifier.is_loaded());

        repo.delete().unwrap();
        assert_matches!(repo.load(), Err(StoreError::NotFound(_)));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let mut store = MemoryBlobStore::new();
        store.set(MODEL_KEY, "{not json").unwrap();
        let repo = ModelRepository::new(store);
        assert_matches!(repo.load(), Err(StoreError::Corrupt(_)));
    }

    #[test]
    fn test_label_mismatch_is_corrupt() {
        let mut repo = ModelRepository::new(MemoryBlobStore::new());
        let mut bad = record();
        bad.gesture_labels.push("No".to_string());
        repo.save(&bad).unwrap();

        assert!(repo.load().is_ok());
        assert_matches!(repo.load_classifier(), Err(StoreError::Corrupt(_)));
    }
}

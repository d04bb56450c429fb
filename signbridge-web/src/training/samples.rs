//! Labelled feature samples collected for training
//!
//! Records are keyed by a v4 uuid. `SampleStore` is the collection
//! contract; `MemorySampleStore` keeps everything in a `Vec`,
//! `BlobSampleStore` keeps a JSON array under one `BlobStore` key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::persistence::BlobStore;
use crate::error::{DatasetError, StoreError};
use crate::tracking::FeatureVector;

pub const SAMPLES_KEY: &str = "signbridge_training_samples";

pub const MIN_TOTAL_SAMPLES: usize = 20;
pub const MIN_CLASSES: usize = 2;
pub const MIN_SAMPLES_PER_CLASS: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSample {
    pub id: Uuid,
    pub gesture: String,
    pub features: FeatureVector,
    pub timestamp_ms: f64,
}

impl TrainingSample {
    pub fn new(gesture: impl Into<String>, features: FeatureVector, timestamp_ms: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            gesture: gesture.into(),
            features,
            timestamp_ms,
        }
    }
}

/// Keyed sample collection
pub trait SampleStore {
    /// Insert or replace by id
    fn insert(&mut self, sample: TrainingSample) -> Result<(), StoreError>;

    fn get_all(&self) -> Result<Vec<TrainingSample>, StoreError>;

    fn get_by_label(&self, gesture: &str) -> Result<Vec<TrainingSample>, StoreError>;

    /// Returns how many samples were removed
    fn delete_by_label(&mut self, gesture: &str) -> Result<usize, StoreError>;

    fn delete_all(&mut self) -> Result<(), StoreError>;

    /// Distinct labels, sorted
    fn gesture_classes(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.stats()?.gesture_classes)
    }

    fn stats(&self) -> Result<DatasetStats, StoreError> {
        Ok(DatasetStats::from_samples(&self.get_all()?))
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemorySampleStore {
    samples: Vec<TrainingSample>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleStore for MemorySampleStore {
    fn insert(&mut self, sample: TrainingSample) -> Result<(), StoreError> {
        match self.samples.iter_mut().find(|s| s.id == sample.id) {
            Some(existing) => *existing = sample,
            None => self.samples.push(sample),
        }
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<TrainingSample>, StoreError> {
        Ok(self.samples.clone())
    }

    fn get_by_label(&self, gesture: &str) -> Result<Vec<TrainingSample>, StoreError> {
        Ok(self
            .samples
            .iter()
            .filter(|s| s.gesture == gesture)
            .cloned()
            .collect())
    }

    fn delete_by_label(&mut self, gesture: &str) -> Result<usize, StoreError> {
        let before = self.samples.len();
        self.samples.retain(|s| s.gesture != gesture);
        Ok(before - self.samples.len())
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.samples.clear();
        Ok(())
    }
}

// ============================================================================
// BLOB-BACKED STORE
// ============================================================================

/// Samples persisted as one JSON array; every write rewrites the array
pub struct BlobSampleStore<B: BlobStore> {
    blobs: B,
    key: String,
}

impl<B: BlobStore> BlobSampleStore<B> {
    pub fn new(blobs: B) -> Self {
        Self::with_key(blobs, SAMPLES_KEY)
    }

    pub fn with_key(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    /// Missing key reads as empty
    fn load(&self) -> Result<Vec<TrainingSample>, StoreError> {
        match self.blobs.get(&self.key)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                warn!(key = %self.key, error = %e, "stored samples are unreadable");
                StoreError::Corrupt(e.to_string())
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, samples: &[TrainingSample]) -> Result<(), StoreError> {
        let json = serde_json::to_string(samples).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.blobs.set(&self.key, &json)
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }
}

impl<B: BlobStore> SampleStore for BlobSampleStore<B> {
    fn insert(&mut self, sample: TrainingSample) -> Result<(), StoreError> {
        let mut samples = self.load()?;
        match samples.iter_mut().find(|s| s.id == sample.id) {
            Some(existing) => *existing = sample,
            None => samples.push(sample),
        }
        self.save(&samples)
    }

    fn get_all(&self) -> Result<Vec<TrainingSample>, StoreError> {
        self.load()
    }

    fn get_by_label(&self, gesture: &str) -> Result<Vec<TrainingSample>, StoreError> {
        let mut samples = self.load()?;
        samples.retain(|s| s.gesture == gesture);
        Ok(samples)
    }

    fn delete_by_label(&mut self, gesture: &str) -> Result<usize, StoreError> {
        let mut samples = self.load()?;
        let before = samples.len();
        samples.retain(|s| s.gesture != gesture);
        let removed = before - samples.len();
        if removed > 0 {
            self.save(&samples)?;
        }
        debug!(gesture, removed, "samples deleted");
        Ok(removed)
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.blobs.remove(&self.key)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub total_samples: usize,
    /// Sorted
    pub gesture_classes: Vec<String>,
    pub samples_per_gesture: BTreeMap<String, usize>,
}

impl DatasetStats {
    pub fn from_samples(samples: &[TrainingSample]) -> Self {
        let mut samples_per_gesture = BTreeMap::new();
        for s in samples {
            *samples_per_gesture.entry(s.gesture.clone()).or_insert(0) += 1;
        }
        Self {
            total_samples: samples.len(),
            gesture_classes: samples_per_gesture.keys().cloned().collect(),
            samples_per_gesture,
        }
    }

    /// Minimum viable dataset: 20 samples, 2 classes, 5 per class
    pub fn check_trainable(&self) -> Result<(), DatasetError> {
        if self.total_samples < MIN_TOTAL_SAMPLES {
            return Err(DatasetError::TooFewSamples {
                required: MIN_TOTAL_SAMPLES,
                actual: self.total_samples,
            });
        }
        if self.gesture_classes.len() < MIN_CLASSES {
            return Err(DatasetError::TooFewClasses {
                required: MIN_CLASSES,
                actual: self.gesture_classes.len(),
            });
        }
        if let Some((gesture, count)) = self
            .samples_per_gesture
            .iter()
            .find(|(_, count)| **count < MIN_SAMPLES_PER_CLASS)
        {
            return Err(DatasetError::ClassTooSmall {
                gesture: gesture.clone(),
                required: MIN_SAMPLES_PER_CLASS,
                actual: *count,
            });
        }
        Ok(())
    }
}

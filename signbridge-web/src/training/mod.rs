//! Training module - samples, dataset checks, training runs and persistence
//!
//! Re-exports only. All logic in submodules.

mod coordinator;
mod persistence;
mod samples;

pub use coordinator::{
    EpochMetrics, Hyperparameters, LabeledExample, PreparedDataset, TrainedModel, Trainer,
    TrainingCoordinator, TrainingProgress,
};
pub use persistence::{BlobStore, MemoryBlobStore, ModelRecord, ModelRepository, MODEL_KEY};
pub use samples::{
    BlobSampleStore, DatasetStats, MemorySampleStore, SampleStore, TrainingSample, MIN_CLASSES, MIN_SAMPLES_PER_CLASS,
    MIN_TOTAL_SAMPLES, SAMPLES_KEY,
};

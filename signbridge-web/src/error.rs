//! Error types shared across the pipeline
//!
//! Per-frame geometry never errors (it degrades to defaults). Everything
//! here is for input validation, training, persistence and devices.

use thiserror::Error;

/// Rejected classifier input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("feature vector must have {expected} values, got {actual}")]
    FeatureLength { expected: usize, actual: usize },

    #[error("feature vector contains a non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("frame of {width}x{height} needs {expected} bytes, got {actual}")]
    FrameSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Failures of the training workflow
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("model is already training")]
    Busy,

    #[error("no valid training samples")]
    NoValidSamples,

    #[error("need at least two gesture labels, got {0}")]
    TooFewLabels(usize),

    #[error("trainer failed: {0}")]
    Trainer(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Caller-side minimum viable dataset check
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("need at least {required} samples, have {actual}")]
    TooFewSamples { required: usize, actual: usize },

    #[error("need at least {required} gesture classes, have {actual}")]
    TooFewClasses { required: usize, actual: usize },

    #[error("gesture '{gesture}' has {actual} samples, need at least {required}")]
    ClassTooSmall {
        gesture: String,
        required: usize,
        actual: usize,
    },
}

/// Persisted weights that do not fit the declared network
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("layer {layer}: expected {expected} weights, found {actual}")]
    ShapeMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    #[error("layer {layer} takes {actual} inputs but previous layer produces {expected}")]
    InputMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    #[error("network outputs {outputs} classes but {labels} labels were given")]
    LabelCount { outputs: usize, labels: usize },

    #[error("network has no layers")]
    Empty,
}

/// Key-value persistence failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("no record stored under '{0}'")]
    NotFound(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Camera acquisition failures, never retried automatically
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera access denied")]
    PermissionDenied,

    #[error("no camera found")]
    DeviceNotFound,

    #[error("camera is in use by another application")]
    DeviceBusy,

    #[error("camera error: {0}")]
    Unknown(String),
}

impl CameraError {
    /// Map a DOM exception name from `getUserMedia` onto a category
    pub fn from_dom_name(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" => CameraError::PermissionDenied,
            "NotFoundError" | "OverconstrainedError" => CameraError::DeviceNotFound,
            "NotReadableError" | "AbortError" => CameraError::DeviceBusy,
            _ => CameraError::Unknown(if message.is_empty() {
                "Unknown error".to_string()
            } else {
                message.to_string()
            }),
        }
    }
}

/// Configuration could not be parsed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

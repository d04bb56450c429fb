//! Tracking module - temporal smoothing, normalization and debouncing
//!
//! Re-exports only. All logic in submodules.

mod features;
mod smoothing;
mod stability;

pub use features::{normalize, FeatureVector, FEATURE_LENGTH};
pub use smoothing::LandmarkTemporalSmoother;
pub use stability::{GestureEvent, StabilityGate};

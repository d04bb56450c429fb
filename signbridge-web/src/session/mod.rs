//! Session module - explicit pipeline context and its scheduler
//!
//! Re-exports only. All logic in submodules.

mod recognition;
mod scheduler;

pub use recognition::{FrameOutcome, RecognitionSession};
pub use scheduler::{DetectionLoop, Tick};

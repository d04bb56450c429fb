//! External collaborators: camera, speech and the prediction endpoint
//!
//! Re-exports only. All logic in submodules.

mod api;
mod camera;
mod speech;

pub use api::{handle_predict, ErrorBody, PredictRequest, STATUS_BAD_REQUEST, STATUS_OK, STATUS_UNAVAILABLE};
pub use camera::{CameraGuard, FrameSource, SyntheticCamera};
pub use speech::{RecordingSynthesizer, SpeechSynthesizer};

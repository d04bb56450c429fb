//! SignBridge Web - webcam sign-language gesture recognition
//!
//! Pipeline: skin segmentation → contour and convex hull → synthetic hand
//! skeleton → temporal smoothing → feature normalization → classification
//! → stability gate → sentence composition.
//!
//! Everything outside `bridge` is plain Rust and runs natively; `bridge`
//! holds the wasm_bindgen entry points.

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

pub mod classifier;
pub mod config;
pub mod detection;
pub mod error;
pub mod language;
pub mod services;
pub mod session;
pub mod tracking;
pub mod training;

mod bridge;

use wasm_bindgen::prelude::*;

pub use bridge::{
    camera_error_message, classify_camera_error, init_logging, BrowserSpeech, LocalStorageBlobStore, SignSession,
};
pub use classifier::Classifier;
pub use config::PipelineConfig;
pub use session::{DetectionLoop, RecognitionSession};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    init_logging();
}

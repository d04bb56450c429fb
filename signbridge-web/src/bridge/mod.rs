//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points and web-sys adapters live here.
//! Re-exports only in mod.rs, logic in submodules.

mod camera;
mod errors;
mod logging;
mod session;
mod speech;
mod storage;

pub use camera::{camera_error_message, classify_camera_error};
pub use logging::init_logging;
pub use session::SignSession;
pub use speech::BrowserSpeech;
pub use storage::LocalStorageBlobStore;

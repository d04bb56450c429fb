//! Camera error classification for the JS capture code

use wasm_bindgen::prelude::*;

use crate::error::CameraError;

/// Category of a `getUserMedia` failure:
/// `PermissionDenied`, `DeviceNotFound`, `DeviceBusy` or `Unknown`
#[wasm_bindgen]
pub fn classify_camera_error(name: &str, message: &str) -> String {
    camera_error_kind(&CameraError::from_dom_name(name, message)).to_string()
}

/// User-facing message for a `getUserMedia` failure
#[wasm_bindgen]
pub fn camera_error_message(name: &str, message: &str) -> String {
    CameraError::from_dom_name(name, message).to_string()
}

fn camera_error_kind(err: &CameraError) -> &'static str {
    match err {
        CameraError::PermissionDenied => "PermissionDenied",
        CameraError::DeviceNotFound => "DeviceNotFound",
        CameraError::DeviceBusy => "DeviceBusy",
        CameraError::Unknown(_) => "Unknown",
    }
}

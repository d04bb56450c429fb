//! Error conversion at the JS boundary
//!
//! Every crate error surfaces in JS as an `Error` carrying its display text.

use wasm_bindgen::JsValue;

use crate::error::{
    CameraError, ConfigError, DatasetError, ModelError, StoreError, TrainingError, ValidationError,
};

macro_rules! into_js_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for JsValue {
                fn from(err: $ty) -> Self {
                    js_sys::Error::new(&err.to_string()).into()
                }
            }
        )*
    };
}

into_js_error!(
    ValidationError,
    TrainingError,
    DatasetError,
    ModelError,
    StoreError,
    CameraError,
    ConfigError,
);

/// JSON encoding failures at the boundary
pub(crate) fn json_error(err: serde_json::Error) -> JsValue {
    js_sys::Error::new(&format!("serialization failed: {}", err)).into()
}

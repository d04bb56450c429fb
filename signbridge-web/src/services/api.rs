//! Prediction endpoint contract
//!
//! `POST {features: number[63]}` → `200 {label, confidence, topK}`.
//! Malformed bodies get `400 {error}`, an unloaded model `503 {error}`,
//! a response that cannot be encoded `500 {error}`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classifier::{Classifier, Recognition};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;
pub const STATUS_UNAVAILABLE: u16 = 503;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: u16, message: impl Into<String>) -> (u16, String) {
    let body = ErrorBody { error: message.into() };
    let json = serde_json::to_string(&body).unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    (status, json)
}

fn prediction_response<T: Serialize>(prediction: &T) -> (u16, String) {
    match serde_json::to_string(prediction) {
        Ok(json) => (STATUS_OK, json),
        Err(e) => {
            warn!(error = %e, "prediction could not be encoded");
            error_response(STATUS_INTERNAL_ERROR, format!("internal error: {}", e))
        }
    }
}

/// Handle one request body; returns `(status, json body)`
pub fn handle_predict(classifier: &Classifier, body: &str) -> (u16, String) {
    let request: PredictRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "malformed prediction request");
            return error_response(STATUS_BAD_REQUEST, format!("invalid request: {}", e));
        }
    };

    match classifier.classify(&request.features) {
        Err(e) => error_response(STATUS_BAD_REQUEST, e.to_string()),
        Ok(Recognition::NotReady) => error_response(STATUS_UNAVAILABLE, "model not loaded"),
        Ok(Recognition::Recognized(prediction)) => prediction_response(&prediction),
    }
}

//! Stability gate - debounce of the classification stream
//!
//! Turns a noisy per-frame label stream into sparse gesture events. A label
//! must be held for several consecutive frames with enough confidence, a
//! minimum time must separate events, and the same label is never emitted
//! twice in a row.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::Prediction;
use crate::config::GateConfig;

/// A confirmed gesture
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub label: String,
    pub confidence: f32,
    pub timestamp_ms: f64,
}

pub struct StabilityGate {
    config: GateConfig,
    last_label: Option<String>,
    stable_count: u32,
    /// `None` until the first emit
    last_emit_ms: Option<f64>,
    last_emitted: Option<String>,
}

impl StabilityGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            last_label: None,
            stable_count: 0,
            last_emit_ms: None,
            last_emitted: None,
        }
    }

    /// Feed one classification taken at `now_ms`
    pub fn observe(&mut self, prediction: &Prediction, now_ms: f64) -> Option<GestureEvent> {
        if self.last_label.as_deref() == Some(prediction.label.as_str()) {
            self.stable_count += 1;
        } else {
            self.stable_count = 1;
            self.last_label = Some(prediction.label.clone());
        }

        let interval_ok = self
            .last_emit_ms
            .map_or(true, |last| now_ms - last > self.config.min_interval_ms);

        let should_emit = !prediction.is_placeholder()
            && self.stable_count >= self.config.min_stable_frames
            && prediction.confidence > self.config.min_confidence
            && interval_ok
            && self.last_emitted.as_deref() != Some(prediction.label.as_str());

        if !should_emit {
            return None;
        }

        self.stable_count = 0;
        self.last_emit_ms = Some(now_ms);
        self.last_emitted = Some(prediction.label.clone());
        debug!(label = %prediction.label, confidence = prediction.confidence, "gesture confirmed");

        Some(GestureEvent {
            label: prediction.label.clone(),
            confidence: prediction.confidence,
            timestamp_ms: now_ms,
        })
    }

    pub fn stable_count(&self) -> u32 {
        self.stable_count
    }

    pub fn last_emitted(&self) -> Option<&str> {
        self.last_emitted.as_deref()
    }

    pub fn reset(&mut self) {
        self.last_label = None;
        self.stable_count = 0;
        self.last_emit_ms = None;
        self.last_emitted = None;
    }
}

impl Default for StabilityGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

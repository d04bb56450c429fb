//! Pipeline configuration
//!
//! Every field has a default matching the tuned values; a JSON document
//! only needs to name the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub segmenter: SegmenterConfig,
    pub contour: ContourConfig,
    pub fingers: FingerCountConfig,
    pub smoothing: SmoothingConfig,
    pub gate: GateConfig,
    pub templates: TemplateConfig,
    pub detection_loop: LoopConfig,
    pub speech: SpeechOptions,
}

impl PipelineConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segmenter.stride == 0 {
            return Err(ConfigError::Invalid("segmenter.stride must be at least 1".into()));
        }
        if self.contour.scan_step == 0 {
            return Err(ConfigError::Invalid("contour.scan_step must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.smoothing.alpha) {
            return Err(ConfigError::Invalid("smoothing.alpha must lie in [0, 1]".into()));
        }
        if self.gate.min_stable_frames == 0 {
            return Err(ConfigError::Invalid("gate.min_stable_frames must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Pixel step in both axes (1 = every pixel)
    pub stride: usize,
    /// Minimum skin fraction of scanned pixels to report a hand
    pub min_skin_fraction: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            stride: 1,
            min_skin_fraction: 0.005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContourConfig {
    /// Distance between scan lines
    pub scan_step: usize,
    /// Contours shorter than this are unusable
    pub min_points: usize,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            scan_step: 2,
            min_points: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FingerCountConfig {
    pub max_defect_angle_deg: f32,
    /// Pixels
    pub min_defect_depth: f32,
    pub min_hull_points: usize,
}

impl Default for FingerCountConfig {
    fn default() -> Self {
        Self {
            max_defect_angle_deg: 100.0,
            min_defect_depth: 15.0,
            min_hull_points: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Weight of the prediction against the measurement
    pub alpha: f32,
    /// Weight of the new displacement in the velocity update
    pub velocity_blend: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            velocity_blend: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    pub min_stable_frames: u32,
    pub min_confidence: f32,
    pub min_interval_ms: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_stable_frames: 8,
            min_confidence: 0.6,
            min_interval_ms: 1500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateConfig {
    /// Thumb tip horizontal distance from the wrist
    pub thumb_threshold: f32,
    /// PIP-to-tip rise for the other fingers
    pub finger_threshold: f32,
    /// Best score below this is reported as a placeholder
    pub min_score: f32,
    pub confidence_floor: f32,
    pub top_k: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            thumb_threshold: 0.08,
            finger_threshold: 0.05,
            min_score: 0.4,
            confidence_floor: 0.3,
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoopConfig {
    pub detect_interval_ms: f64,
    /// Speak every composed sentence as soon as it is produced
    pub auto_speak: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            detect_interval_ms: 100.0,
            auto_speak: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechOptions {
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json(r#"{"gate": {"min_stable_frames": 4}}"#).unwrap();
        assert_eq!(config.gate.min_stable_frames, 4);
        assert_eq!(config.gate.min_interval_ms, 1500.0);
        assert_eq!(config.segmenter.stride, 1);
        assert_eq!(config.speech.language, "en-US");
    }

    #[test]
    fn test_zero_stride_rejected() {
        let result = PipelineConfig::from_json(r#"{"segmenter": {"stride": 0}}"#);
        assert_matches!(result, Err(ConfigError::Invalid(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert_matches!(PipelineConfig::from_json("not json"), Err(ConfigError::Parse(_)));
    }
}

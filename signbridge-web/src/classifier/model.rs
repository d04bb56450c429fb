//! Classification results and the classifier dispatch
//!
//! Two interchangeable strategies sit behind `Classifier`: a dense network
//! over persisted weights and the finger-pattern template scorer.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::network::NetworkClassifier;
use super::template_scorer::TemplateScorer;
use crate::config::TemplateConfig;
use crate::detection::Skeleton;
use crate::error::ValidationError;
use crate::tracking::{normalize, FeatureVector};

/// Shown while no template scores well enough
pub const RECOGNIZING_LABEL: &str = "Recognizing...";
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const NO_HAND_LABEL: &str = "No Hand Detected";

/// Ranked alternative
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f32,
}

impl ScoredLabel {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
    /// Best alternatives, highest first
    #[serde(rename = "topK")]
    pub top_k: Vec<ScoredLabel>,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32, top_k: Vec<ScoredLabel>) -> Self {
        Self {
            label: label.into(),
            confidence,
            top_k,
        }
    }

    /// Status labels that never become gesture events
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.label.as_str(),
            RECOGNIZING_LABEL | UNKNOWN_LABEL | NO_HAND_LABEL
        )
    }
}

/// Outcome of a classification request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "prediction", rename_all = "camelCase")]
pub enum Recognition {
    /// No model loaded, or it was released
    NotReady,
    Recognized(Prediction),
}

impl Recognition {
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Recognition::Recognized(p) => Some(p),
            Recognition::NotReady => None,
        }
    }
}

/// Sort descending by score and keep the first `k`
pub fn rank(mut scores: Vec<ScoredLabel>, k: usize) -> Vec<ScoredLabel> {
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.truncate(k);
    scores
}

pub enum Classifier {
    Network(NetworkClassifier),
    Template(TemplateScorer),
}

impl Classifier {
    /// Classify 63 externally supplied values
    ///
    /// The network reads them as normalized features, the template scorer
    /// as flattened landmarks. Malformed input is rejected before either
    /// strategy sees it.
    pub fn classify(&self, values: &[f32]) -> Result<Recognition, ValidationError> {
        let features = FeatureVector::from_slice(values).inspect_err(|e| {
            warn!(error = %e, "rejected classifier input");
        })?;
        Ok(match self {
            Classifier::Network(net) => net.classify(&features),
            Classifier::Template(scorer) => {
                Recognition::Recognized(scorer.classify(&features.to_landmarks()))
            }
        })
    }

    /// Template scorer tuned by `config`
    pub fn templates(config: TemplateConfig) -> Self {
        Classifier::Template(TemplateScorer::new(config))
    }

    /// Classify a skeleton produced by the detection pipeline
    pub fn classify_skeleton(&self, skeleton: &Skeleton) -> Recognition {
        match self {
            Classifier::Network(net) => net.classify(&normalize(skeleton)),
            Classifier::Template(scorer) => Recognition::Recognized(scorer.classify(skeleton)),
        }
    }

    pub fn is_ready(&self) -> bool {
        match self {
            Classifier::Network(net) => net.is_loaded(),
            Classifier::Template(_) => true,
        }
    }

    /// Class labels in output order
    pub fn labels(&self) -> &[String] {
        match self {
            Classifier::Network(net) => net.labels(),
            Classifier::Template(scorer) => scorer.classes(),
        }
    }

    /// Free model resources; the template scorer holds none
    pub fn release(&mut self) {
        if let Classifier::Network(net) = self {
            net.release();
            info!("network classifier released");
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::templates(TemplateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::network::{NetworkWeights, standard_layers};
    use crate::detection::LANDMARK_COUNT;
    use crate::tracking::FEATURE_LENGTH;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network_classifier() -> Classifier {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = NetworkWeights::initialized(&standard_layers(3), &mut rng);
        let labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        Classifier::Network(NetworkClassifier::new(&weights, labels).unwrap())
    }

    #[test]
    fn test_placeholders() {
        assert!(Prediction::new(RECOGNIZING_LABEL, 0.3, Vec::new()).is_placeholder());
        assert!(Prediction::new(NO_HAND_LABEL, 0.0, Vec::new()).is_placeholder());
        assert!(!Prediction::new("Hello", 0.9, Vec::new()).is_placeholder());
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let ranked = rank(
            vec![ScoredLabel::new("a", 0.2), ScoredLabel::new("b", 0.9), ScoredLabel::new("c", 0.5)],
            2,
        );
        assert_eq!(ranked, vec![ScoredLabel::new("b", 0.9), ScoredLabel::new("c", 0.5)]);
    }

    #[test]
    fn test_wrong_length_rejected_by_both() {
        let template = Classifier::default();
        assert_matches!(
            template.classify(&[0.0; 21]),
            Err(ValidationError::FeatureLength { expected: 63, actual: 21 })
        );
        assert_matches!(
            network_classifier().classify(&[0.0; 64]),
            Err(ValidationError::FeatureLength { .. })
        );
    }

    #[test]
    fn test_template_always_ready() {
        let template = Classifier::default();
        assert!(template.is_ready());
        let result = template.classify(&[0.0; FEATURE_LENGTH]).unwrap();
        assert_matches!(result, Recognition::Recognized(_));
    }

    #[test]
    fn test_released_network_not_ready() {
        let mut classifier = network_classifier();
        assert!(classifier.is_ready());
        assert_matches!(classifier.classify(&[0.1; FEATURE_LENGTH]), Ok(Recognition::Recognized(_)));

        classifier.release();
        assert!(!classifier.is_ready());
        assert_matches!(classifier.classify(&[0.1; FEATURE_LENGTH]), Ok(Recognition::NotReady));
        let skeleton = [crate::detection::Landmark::default(); LANDMARK_COUNT];
        assert_eq!(classifier.classify_skeleton(&skeleton), Recognition::NotReady);
    }

    #[test]
    fn test_recognition_json_shape() {
        let json = serde_json::to_string(&Recognition::NotReady).unwrap();
        assert_eq!(json, r#"{"status":"notReady"}"#);
    }
}

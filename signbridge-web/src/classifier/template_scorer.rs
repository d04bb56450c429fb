//! Finger-pattern template scorer
//!
//! Reduces a skeleton to five extended/folded flags and scores every known
//! class by agreement. A mismatching finger still earns partial credit, so
//! no template ever scores zero.

use super::model::{rank, Prediction, ScoredLabel, RECOGNIZING_LABEL};
use super::templates::{find_template, GESTURE_TEMPLATES};
use crate::config::TemplateConfig;
use crate::detection::{finger_base, Skeleton, FINGER_TIPS, THUMB_TIP, WRIST};

const MATCH_SCORE: f32 = 1.0;
const MISMATCH_SCORE: f32 = 0.2;

pub struct TemplateScorer {
    config: TemplateConfig,
    /// Built-in template names plus classes added for training
    classes: Vec<String>,
}

impl TemplateScorer {
    pub fn new(config: TemplateConfig) -> Self {
        Self {
            config,
            classes: GESTURE_TEMPLATES.iter().map(|t| t.name.to_string()).collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Register a class name with no template; it ranks with score 0
    pub fn add_gesture_class(&mut self, name: &str) {
        if !self.classes.iter().any(|c| c == name) {
            self.classes.push(name.to_string());
        }
    }

    /// `[thumb, index, middle, ring, pinky]`, true = extended
    ///
    /// The thumb is judged by horizontal distance from the wrist, the other
    /// fingers by how far the tip rises above the PIP joint.
    pub fn finger_states(&self, landmarks: &Skeleton) -> [bool; 5] {
        let wrist = landmarks[WRIST];
        let mut states = [false; 5];

        states[0] = (landmarks[THUMB_TIP].x - wrist.x).abs() > self.config.thumb_threshold;

        for finger in 1..5 {
            let tip = landmarks[FINGER_TIPS[finger]];
            let pip = landmarks[finger_base(finger) + 1];
            let extension = (pip.y - wrist.y) - (tip.y - wrist.y);
            states[finger] = extension > self.config.finger_threshold;
        }

        states
    }

    /// Score every class against a finger-state vector, best first
    pub fn score_states(&self, states: &[bool; 5]) -> Vec<ScoredLabel> {
        let scores = self
            .classes
            .iter()
            .map(|name| {
                let score = find_template(name).map_or(0.0, |t| {
                    let total: f32 = t
                        .finger_states
                        .iter()
                        .zip(states)
                        .map(|(a, b)| if a == b { MATCH_SCORE } else { MISMATCH_SCORE })
                        .sum();
                    total / 5.0
                });
                ScoredLabel::new(name.as_str(), score)
            })
            .collect();
        rank(scores, usize::MAX)
    }

    pub fn classify(&self, landmarks: &Skeleton) -> Prediction {
        let states = self.finger_states(landmarks);
        self.classify_states(&states)
    }

    pub fn classify_states(&self, states: &[bool; 5]) -> Prediction {
        let mut ranked = self.score_states(states);
        ranked.truncate(self.config.top_k);

        let best_score = ranked.first().map_or(0.0, |s| s.score);
        let label = match ranked.first() {
            Some(best) if best.score >= self.config.min_score => best.label.clone(),
            _ => RECOGNIZING_LABEL.to_string(),
        };

        Prediction {
            label,
            confidence: best_score.max(self.config.confidence_floor),
            top_k: ranked,
        }
    }
}

impl Default for TemplateScorer {
    fn default() -> Self {
        Self::new(TemplateConfig::default())
    }
}

//! Motion and hand-shape template matching
//!
//! Scores the lightweight frame analysis against every template using
//! three weighted cues: finger pattern (0.5), motion (up to 0.3) and hand
//! shape (0.2, or 0.05 when the shape cannot be confirmed).

use tracing::debug;

use super::buffer::MotionBuffer;
use super::model::{rank, Prediction, ScoredLabel, NO_HAND_LABEL, RECOGNIZING_LABEL};
use super::templates::{GestureTemplate, Motion, GESTURE_TEMPLATES};
use crate::detection::{Frame, ShapeAnalysis, ShapeAnalyzer};

const MIN_DENSITY: f32 = 0.05;
const MIN_SCORE: f32 = 0.4;
const TOP_K: usize = 5;

const STILL_LIMIT: f32 = 0.02;
const WAVE_MIN: f32 = 0.03;

fn motion_score(template: &GestureTemplate, analysis: &ShapeAnalysis) -> f32 {
    let magnitude = analysis.motion_magnitude();
    let (dx, dy) = analysis.motion;

    match template.motion {
        Motion::Static if magnitude < STILL_LIMIT => 0.3,
        Motion::Static => 0.0,
        Motion::Wave if magnitude > WAVE_MIN && dx.abs() > dy.abs() => 0.3,
        Motion::Forward if dy < -STILL_LIMIT => 0.3,
        Motion::Shake if magnitude > STILL_LIMIT => 0.2,
        _ => 0.1,
    }
}

fn shape_score(template: &GestureTemplate, analysis: &ShapeAnalysis) -> f32 {
    match template.hand_shape.finger_count() {
        Some(count) if count == analysis.finger_count => 0.2,
        _ => 0.05,
    }
}

/// Score one analysis against every template, best first
pub fn score_analysis(analysis: &ShapeAnalysis) -> Vec<ScoredLabel> {
    let scores = GESTURE_TEMPLATES
        .iter()
        .map(|t| {
            let matching = t
                .finger_states
                .iter()
                .zip(&analysis.finger_states)
                .filter(|(a, b)| a == b)
                .count();
            let finger = matching as f32 / 5.0 * 0.5;
            ScoredLabel::new(t.name, finger + motion_score(t, analysis) + shape_score(t, analysis))
        })
        .collect();
    rank(scores, usize::MAX)
}

/// Frame-level classifier with its own motion history
pub struct ShapeClassifier {
    analyzer: ShapeAnalyzer,
    history: MotionBuffer,
}

impl ShapeClassifier {
    pub fn new() -> Self {
        Self {
            analyzer: ShapeAnalyzer::new(),
            history: MotionBuffer::new(),
        }
    }

    /// Analyse a frame, fill in motion from history, and record it
    pub fn analyze(&mut self, frame: &Frame) -> ShapeAnalysis {
        let mut analysis = self.analyzer.analyze(frame);
        analysis.motion = self.history.motion_to(analysis.centroid);
        self.history.push(analysis.centroid);
        analysis
    }

    pub fn classify_frame(&mut self, frame: &Frame) -> Prediction {
        let analysis = self.analyze(frame);
        self.classify_analysis(&analysis)
    }

    pub fn classify_analysis(&self, analysis: &ShapeAnalysis) -> Prediction {
        if analysis.density < MIN_DENSITY {
            return Prediction::new(NO_HAND_LABEL, 0.0, Vec::new());
        }

        let mut ranked = score_analysis(analysis);
        ranked.truncate(TOP_K);
        let Some(best) = ranked.first().cloned() else {
            return Prediction::new(RECOGNIZING_LABEL, 0.0, ranked);
        };

        debug!(
            fingers = analysis.finger_count,
            best = %best.label,
            score = best.score,
            "shape classification"
        );

        let label = if best.score < MIN_SCORE {
            RECOGNIZING_LABEL.to_string()
        } else {
            best.label
        };
        Prediction {
            label,
            confidence: best.score,
            top_k: ranked,
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for ShapeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

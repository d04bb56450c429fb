//! Recognition session
//!
//! Owns every piece of per-session state (smoother, gate, conversation,
//! classifier, RNG) so independent sessions never share anything. One call
//! to `process_frame` runs the whole pipeline synchronously:
//!
//! ```text
//! frame → region → skeleton → smooth → classify → gate → compose → log → speak
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::{Classifier, Prediction, Recognition, ShapeClassifier};
use crate::config::PipelineConfig;
use crate::detection::{
    Frame, HandDetection, HandRegionDetector, Handedness, Skeleton, SyntheticLandmarkGenerator,
};
use crate::language::{ConversationEntry, ConversationLog, SentenceComposer};
use crate::services::SpeechSynthesizer;
use crate::tracking::{GestureEvent, LandmarkTemporalSmoother, StabilityGate};

/// Result of one analysed frame
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutcome {
    /// `None` when no hand was found
    pub detection: Option<HandDetection>,
    pub recognition: Option<Recognition>,
    pub event: Option<GestureEvent>,
    /// Sentence composed for `event`
    pub sentence: Option<String>,
}

pub struct RecognitionSession<S: SpeechSynthesizer> {
    config: PipelineConfig,
    detector: HandRegionDetector,
    generator: SyntheticLandmarkGenerator,
    smoother: LandmarkTemporalSmoother,
    classifier: Classifier,
    gate: StabilityGate,
    composer: SentenceComposer,
    conversation: ConversationLog,
    shape: ShapeClassifier,
    speech: S,
    rng: StdRng,
}

impl<S: SpeechSynthesizer> RecognitionSession<S> {
    /// Session scoring with the template classifier tuned by `config.templates`
    pub fn new(config: PipelineConfig, speech: S, seed: u64) -> Self {
        let classifier = Classifier::templates(config.templates.clone());
        Self::with_classifier(config, classifier, speech, seed)
    }

    pub fn with_classifier(config: PipelineConfig, classifier: Classifier, speech: S, seed: u64) -> Self {
        info!(
            ready = classifier.is_ready(),
            classes = classifier.labels().len(),
            "recognition session created"
        );
        Self {
            detector: HandRegionDetector::new(&config),
            generator: SyntheticLandmarkGenerator::new(),
            smoother: LandmarkTemporalSmoother::new(&config.smoothing),
            classifier,
            gate: StabilityGate::new(config.gate.clone()),
            composer: SentenceComposer::new(),
            conversation: ConversationLog::new(),
            shape: ShapeClassifier::new(),
            speech,
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline on one frame, timed by `frame.timestamp_ms`
    pub fn process_frame(&mut self, frame: &Frame) -> FrameOutcome {
        let region = self.detector.detect(frame);
        let Some(raw) = self.generator.generate(&region, frame.width(), frame.height()) else {
            if self.smoother.is_tracking() {
                debug!("hand lost, tracking reset");
            }
            self.smoother.reset();
            return FrameOutcome::default();
        };

        let mut landmarks: Skeleton = raw;
        for (dst, src) in landmarks.iter_mut().zip(self.smoother.smooth(&raw)) {
            *dst = src;
        }

        let detection = HandDetection {
            landmarks,
            score: region.confidence,
            handedness: Handedness::from_centroid_x(region.centroid.x),
            bounding_box: region.bounding_box,
            finger_count: region.finger_count,
        };

        let recognition = self.classifier.classify_skeleton(&detection.landmarks);
        let event = recognition
            .prediction()
            .and_then(|p| self.gate.observe(p, frame.timestamp_ms));
        let sentence = event.as_ref().map(|e| self.record_event(e));

        FrameOutcome {
            detection: Some(detection),
            recognition: Some(recognition),
            event,
            sentence,
        }
    }

    /// Compose a sentence from the full emitted history plus `event`, log it
    /// and speak it if configured to
    fn record_event(&mut self, event: &GestureEvent) -> String {
        let mut labels = self.conversation.labels();
        labels.push(event.label.clone());
        let sentence = self.composer.compose(&labels, &mut self.rng);

        info!(gesture = %event.label, confidence = event.confidence, sentence = %sentence, "gesture recognized");
        self.conversation.append(ConversationEntry {
            gesture: event.label.clone(),
            composed_sentence: sentence.clone(),
            confidence: event.confidence,
            timestamp_ms: event.timestamp_ms,
        });

        if self.config.detection_loop.auto_speak {
            self.speech.speak(&sentence, &self.config.speech);
        }
        sentence
    }

    /// Classify with the lightweight analyzer and its motion history
    pub fn classify_shape(&mut self, frame: &Frame) -> Prediction {
        self.shape.classify_frame(frame)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Swap in a new classifier, releasing the old one
    pub fn set_classifier(&mut self, classifier: Classifier) {
        let mut old = std::mem::replace(&mut self.classifier, classifier);
        old.release();
        self.gate.reset();
        info!(ready = self.classifier.is_ready(), "classifier replaced");
    }

    /// Go back to template scoring with the configured settings
    pub fn restore_templates(&mut self) {
        let templates = Classifier::templates(self.config.templates.clone());
        self.set_classifier(templates);
    }

    pub fn release_classifier(&mut self) {
        self.classifier.release();
    }

    /// Register a template-less class on the template scorer
    pub fn add_gesture_class(&mut self, name: &str) {
        if let Classifier::Template(scorer) = &mut self.classifier {
            scorer.add_gesture_class(name);
        }
    }

    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    pub fn latest_sentence(&self) -> Option<&str> {
        self.conversation.latest().map(|e| e.composed_sentence.as_str())
    }

    /// Speak the latest sentence; returns whether there was one
    pub fn speak_latest(&mut self) -> bool {
        match self.conversation.latest() {
            Some(entry) => {
                self.speech.speak(&entry.composed_sentence, &self.config.speech);
                true
            }
            None => false,
        }
    }

    pub fn stop_speech(&mut self) {
        self.speech.stop();
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    /// Drop all temporal state; the conversation is kept
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.gate.reset();
        self.shape.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{standard_layers, NetworkClassifier, NetworkWeights, NO_HAND_LABEL};
    use crate::services::RecordingSynthesizer;
    use assert_matches::assert_matches;

    const SKIN: (u8, u8, u8) = (200, 140, 110);

    fn hand_frame(ts: f64) -> Frame {
        let mut frame = Frame::solid(80, 60, (0, 0, 0), ts);
        frame.fill_rect(25, 10, 30, 40, SKIN);
        frame
    }

    fn session(auto_speak: bool) -> RecognitionSession<RecordingSynthesizer> {
        let mut config = PipelineConfig::default();
        config.detection_loop.auto_speak = auto_speak;
        RecognitionSession::new(config, RecordingSynthesizer::new(), 1)
    }

    #[test]
    fn test_blank_frame_is_noop() {
        let mut s = session(false);
        let outcome = s.process_frame(&Frame::solid(80, 60, (0, 0, 0), 0.0));
        assert_eq!(outcome, FrameOutcome::default());
        assert!(s.conversation().is_empty());
    }

    #[test]
    fn test_hand_frame_produces_skeleton_and_prediction() {
        let mut s = session(false);
        let outcome = s.process_frame(&hand_frame(0.0));

        let detection = outcome.detection.unwrap();
        assert_eq!(detection.landmarks.len(), 21);
        assert!(detection.score > 0.45 && detection.score <= 0.95);
        assert_eq!(detection.handedness, Handedness::Right);
        assert_matches!(outcome.recognition, Some(Recognition::Recognized(_)));
        assert!(outcome.event.is_none());
    }

    #[test]
    fn test_held_gesture_emits_once() {
        let mut s = session(true);
        let outcomes: Vec<FrameOutcome> = (0..12).map(|i| s.process_frame(&hand_frame(i as f64 * 100.0))).collect();

        let events: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.event.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(events, vec![7]);

        let event = outcomes[7].event.as_ref().unwrap();
        let sentence = outcomes[7].sentence.as_deref().unwrap();
        assert!(!sentence.is_empty());

        assert_eq!(s.conversation().len(), 1);
        assert_eq!(s.conversation().entries()[0].gesture, event.label);
        assert_eq!(s.latest_sentence(), Some(sentence));
        assert_eq!(s.speech().last_text(), Some(sentence));
    }

    #[test]
    fn test_hand_lost_resets_tracking() {
        let mut s = session(false);
        s.process_frame(&hand_frame(0.0));
        assert!(s.smoother.is_tracking());
        s.process_frame(&Frame::solid(80, 60, (0, 0, 0), 100.0));
        assert!(!s.smoother.is_tracking());
    }

    #[test]
    fn test_released_network_reports_not_ready() {
        let mut rng = StdRng::seed_from_u64(2);
        let weights = NetworkWeights::initialized(&standard_layers(2), &mut rng);
        let net = NetworkClassifier::new(&weights, vec!["Hello".into(), "Yes".into()]).unwrap();

        let mut s = session(false);
        s.set_classifier(Classifier::Network(net));
        assert_matches!(s.process_frame(&hand_frame(0.0)).recognition, Some(Recognition::Recognized(_)));

        s.release_classifier();
        let outcome = s.process_frame(&hand_frame(100.0));
        assert!(outcome.detection.is_some());
        assert_eq!(outcome.recognition, Some(Recognition::NotReady));
        assert!(outcome.event.is_none());
    }

    fn top_k_len(outcome: FrameOutcome) -> usize {
        match outcome.recognition {
            Some(Recognition::Recognized(prediction)) => prediction.top_k.len(),
            other => panic!("expected a prediction, got {:?}", other),
        }
    }

    #[test]
    fn test_configured_templates_reach_scorer() {
        let config = PipelineConfig::from_json(r#"{"templates":{"top_k":2}}"#).unwrap();
        let mut s = RecognitionSession::new(config, RecordingSynthesizer::new(), 1);
        assert_eq!(top_k_len(s.process_frame(&hand_frame(0.0))), 2);

        let mut rng = StdRng::seed_from_u64(4);
        let weights = NetworkWeights::initialized(&standard_layers(2), &mut rng);
        let net = NetworkClassifier::new(&weights, vec!["Hello".into(), "Yes".into()]).unwrap();
        s.set_classifier(Classifier::Network(net));
        s.restore_templates();
        assert_eq!(top_k_len(s.process_frame(&hand_frame(100.0))), 2);
    }

    #[test]
    fn test_speech_controls() {
        let mut s = session(false);
        assert!(!s.speak_latest());
        s.stop_speech();
        assert_eq!(s.speech().stops, 1);
        assert!(s.speech().utterances.is_empty());
    }

    #[test]
    fn test_shape_path_on_blank_frame() {
        let mut s = session(false);
        let prediction = s.classify_shape(&Frame::solid(64, 64, (0, 0, 0), 0.0));
        assert_eq!(prediction.label, NO_HAND_LABEL);
    }
}

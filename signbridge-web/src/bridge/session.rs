//! `SignSession` - the object JS holds for one recognition session
//!
//! JS owns the capture loop and calls `process_rgba` on every animation
//! frame; the session decides which frames are analysed. Structured results
//! cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use super::errors::json_error;
use super::speech::BrowserSpeech;
use super::storage::LocalStorageBlobStore;
use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::detection::{Frame, PixelFormat};
use crate::error::StoreError;
use crate::session::{DetectionLoop, RecognitionSession, Tick};
use crate::training::{BlobSampleStore, ModelRecord, ModelRepository, SampleStore, TrainingSample};
use crate::tracking::FeatureVector;

#[wasm_bindgen]
pub struct SignSession {
    session: RecognitionSession<BrowserSpeech>,
    scheduler: DetectionLoop,
    models: ModelRepository<LocalStorageBlobStore>,
    samples: BlobSampleStore<LocalStorageBlobStore>,
}

fn rgba_frame(data: &[u8], width: u32, height: u32, now_ms: f64) -> Result<Frame, JsValue> {
    Ok(Frame::new(
        width as usize,
        height as usize,
        PixelFormat::Rgba,
        data.to_vec(),
        now_ms,
    )?)
}

#[wasm_bindgen]
impl SignSession {
    /// `config_json` may be partial; missing fields take defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: u64) -> Result<SignSession, JsValue> {
        let config = match config_json {
            Some(json) => PipelineConfig::from_json(&json)?,
            None => PipelineConfig::default(),
        };
        let scheduler = DetectionLoop::new(&config.detection_loop);
        let models = ModelRepository::new(LocalStorageBlobStore::open()?);
        let samples = BlobSampleStore::new(LocalStorageBlobStore::open()?);
        let mut session = RecognitionSession::new(config, BrowserSpeech::new(), seed);
        let restored = samples.gesture_classes()?;
        for gesture in &restored {
            session.add_gesture_class(gesture);
        }

        console_log!("SignBridge session ready ({} stored sample classes)", restored.len());
        Ok(Self {
            session,
            scheduler,
            models,
            samples,
        })
    }

    // ========================================================================
    // DETECTION LOOP
    // ========================================================================

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.session.reset();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Feed one canvas `ImageData` buffer
    ///
    /// Returns the frame outcome as JSON when the frame was analysed, or
    /// `undefined` when it was rate-limited or the loop is stopped.
    pub fn process_rgba(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        now_ms: f64,
    ) -> Result<Option<String>, JsValue> {
        if self.scheduler.tick(now_ms) != Tick::Analyze {
            return Ok(None);
        }
        let frame = rgba_frame(data, width, height, now_ms)?;
        let outcome = self.session.process_frame(&frame);
        serde_json::to_string(&outcome).map(Some).map_err(json_error)
    }

    /// Lightweight analyzer path, no rate limiting
    pub fn classify_shape(&mut self, data: &[u8], width: u32, height: u32, now_ms: f64) -> Result<String, JsValue> {
        let frame = rgba_frame(data, width, height, now_ms)?;
        let prediction = self.session.classify_shape(&frame);
        serde_json::to_string(&prediction).map_err(json_error)
    }

    /// Classify 63 externally computed values
    pub fn classify_features(&self, features: &[f32]) -> Result<String, JsValue> {
        let recognition = self.session.classifier().classify(features)?;
        serde_json::to_string(&recognition).map_err(json_error)
    }

    // ========================================================================
    // CONVERSATION & SPEECH
    // ========================================================================

    pub fn conversation_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.conversation().entries()).map_err(json_error)
    }

    pub fn clear_conversation(&mut self) {
        self.session.clear_conversation();
    }

    pub fn latest_sentence(&self) -> Option<String> {
        self.session.latest_sentence().map(str::to_string)
    }

    pub fn speak_latest(&mut self) -> bool {
        self.session.speak_latest()
    }

    pub fn stop_speech(&mut self) {
        self.session.stop_speech();
    }

    // ========================================================================
    // TRAINING SAMPLES
    // ========================================================================

    /// Store one sample; returns its id
    pub fn add_sample(&mut self, gesture: &str, features: &[f32], now_ms: f64) -> Result<String, JsValue> {
        let features = FeatureVector::from_slice(features)?;
        let sample = TrainingSample::new(gesture, features, now_ms);
        let id = sample.id.to_string();
        self.samples.insert(sample)?;
        self.session.add_gesture_class(gesture);
        Ok(id)
    }

    pub fn samples_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.samples.get_all()?).map_err(json_error)
    }

    pub fn dataset_stats_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.samples.stats()?).map_err(json_error)
    }

    /// Fails with the reason when the dataset is too small to train on
    pub fn check_trainable(&self) -> Result<(), JsValue> {
        Ok(self.samples.stats()?.check_trainable()?)
    }

    pub fn delete_samples(&mut self, gesture: &str) -> Result<usize, JsValue> {
        Ok(self.samples.delete_by_label(gesture)?)
    }

    pub fn clear_samples(&mut self) -> Result<(), JsValue> {
        Ok(self.samples.delete_all()?)
    }

    // ========================================================================
    // MODEL LIFECYCLE
    // ========================================================================

    /// Load the saved model; `false` if none is stored
    pub fn load_model(&mut self) -> Result<bool, JsValue> {
        match self.models.load_classifier() {
            Ok((classifier, record)) => {
                console_log!(
                    "Loaded model: {} classes, accuracy {:.2}",
                    record.gesture_labels.len(),
                    record.accuracy
                );
                self.session.set_classifier(Classifier::Network(classifier));
                Ok(true)
            }
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Install and persist a trained model record
    pub fn import_model(&mut self, record_json: &str) -> Result<(), JsValue> {
        let record: ModelRecord =
            serde_json::from_str(record_json).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let classifier = record.to_classifier()?;
        self.models.save(&record)?;
        self.session.set_classifier(Classifier::Network(classifier));
        Ok(())
    }

    /// Remove the saved model and fall back to template scoring
    pub fn delete_model(&mut self) -> Result<(), JsValue> {
        self.models.delete()?;
        self.session.restore_templates();
        Ok(())
    }

    pub fn release_model(&mut self) {
        self.session.release_classifier();
    }

    pub fn is_model_ready(&self) -> bool {
        self.session.classifier().is_ready()
    }
}

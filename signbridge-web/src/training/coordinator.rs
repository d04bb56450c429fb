//! Training coordinator
//!
//! Owns everything around the optimizer: the busy flag, label mapping,
//! one-hot targets, the seeded shuffle and 80/20 split, initial weights and
//! progress reporting. The optimizer itself is an injected `Trainer`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::persistence::ModelRecord;
use super::samples::TrainingSample;
use crate::classifier::{standard_layers, NetworkClassifier, NetworkWeights};
use crate::error::TrainingError;
use crate::tracking::FeatureVector;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hyperparameters {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    /// Fraction held out for validation
    pub validation_split: f32,
    /// Seeds the split shuffle and weight initialization
    pub seed: u64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 32,
            learning_rate: 0.001,
            validation_split: 0.2,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgress {
    pub epoch: usize,
    pub total_epochs: usize,
    pub loss: f32,
    pub accuracy: f32,
    pub status: String,
}

/// What a trainer reports at the end of each epoch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochMetrics {
    /// Zero-based
    pub epoch: usize,
    pub loss: f32,
    pub accuracy: f32,
}

#[derive(Clone, Debug)]
pub struct LabeledExample {
    pub features: FeatureVector,
    pub class_index: usize,
    pub target: DVector<f32>,
}

/// Shuffled, split and one-hot encoded training data
#[derive(Clone, Debug)]
pub struct PreparedDataset {
    pub labels: Vec<String>,
    pub train: Vec<LabeledExample>,
    pub validation: Vec<LabeledExample>,
}

/// Optimizes network weights over a prepared dataset
///
/// Implementations call `on_epoch` once per completed epoch and reshuffle
/// the training examples between epochs.
pub trait Trainer {
    fn train(
        &mut self,
        initial: NetworkWeights,
        data: &PreparedDataset,
        params: &Hyperparameters,
        on_epoch: &mut dyn FnMut(EpochMetrics),
    ) -> Result<NetworkWeights, TrainingError>;
}

#[derive(Debug)]
pub struct TrainedModel {
    pub classifier: NetworkClassifier,
    pub record: ModelRecord,
}

/// Clears the busy flag on every exit path
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Default)]
pub struct TrainingCoordinator {
    busy: AtomicBool,
}

impl TrainingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_training(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Result<BusyGuard<'_>, TrainingError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(&self.busy))
            .map_err(|_| {
                warn!("training requested while another run is in progress");
                TrainingError::Busy
            })
    }

    /// Map labels to class indices, drop unknown labels, shuffle and split
    pub fn prepare(
        samples: &[TrainingSample],
        labels: &[String],
        params: &Hyperparameters,
    ) -> Result<PreparedDataset, TrainingError> {
        if labels.len() < 2 {
            return Err(TrainingError::TooFewLabels(labels.len()));
        }

        let index: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let mut examples: Vec<LabeledExample> = samples
            .iter()
            .filter_map(|s| {
                let class_index = *index.get(s.gesture.as_str())?;
                let mut target = DVector::zeros(labels.len());
                target[class_index] = 1.0;
                Some(LabeledExample {
                    features: s.features.clone(),
                    class_index,
                    target,
                })
            })
            .collect();

        if examples.is_empty() {
            return Err(TrainingError::NoValidSamples);
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        examples.shuffle(&mut rng);

        let held_out = ((examples.len() as f32) * params.validation_split.clamp(0.0, 1.0)).floor() as usize;
        let held_out = held_out.min(examples.len() - 1);
        let validation = examples.split_off(examples.len() - held_out);

        Ok(PreparedDataset {
            labels: labels.to_vec(),
            train: examples,
            validation,
        })
    }

    /// Run one training job; concurrent calls fail with `Busy`
    pub fn train<T: Trainer + ?Sized>(
        &self,
        trainer: &mut T,
        samples: &[TrainingSample],
        labels: &[String],
        params: &Hyperparameters,
        now_ms: f64,
        on_progress: &mut dyn FnMut(&TrainingProgress),
    ) -> Result<TrainedModel, TrainingError> {
        let _guard = self.try_begin()?;
        let total_epochs = params.epochs;

        let mut report = |epoch: usize, loss: f32, accuracy: f32, status: String| {
            on_progress(&TrainingProgress {
                epoch,
                total_epochs,
                loss,
                accuracy,
                status,
            });
        };

        report(0, 0.0, 0.0, "Preparing data...".to_string());
        let data = Self::prepare(samples, labels, params)?;
        info!(
            train = data.train.len(),
            validation = data.validation.len(),
            classes = labels.len(),
            "training data prepared"
        );

        report(0, 0.0, 0.0, "Building model...".to_string());
        let mut rng = StdRng::seed_from_u64(params.seed);
        let initial = NetworkWeights::initialized(&standard_layers(labels.len()), &mut rng);

        report(0, 0.0, 0.0, "Training started...".to_string());
        let mut last = EpochMetrics { epoch: 0, loss: 0.0, accuracy: 0.0 };
        let weights = trainer.train(initial, &data, params, &mut |m: EpochMetrics| {
            last = m;
            report(
                m.epoch + 1,
                m.loss,
                m.accuracy,
                format!("Epoch {}/{}", m.epoch + 1, total_epochs),
            );
        })?;

        let classifier = NetworkClassifier::new(&weights, labels.to_vec())?;
        report(total_epochs, last.loss, last.accuracy, "Training complete!".to_string());
        info!(accuracy = last.accuracy, "training complete");

        Ok(TrainedModel {
            classifier,
            record: ModelRecord {
                weights,
                gesture_labels: labels.to_vec(),
                accuracy: last.accuracy,
                trained_at_ms: now_ms,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::FEATURE_LENGTH;
    use assert_matches::assert_matches;

    /// Returns the initial weights and reports steadily improving epochs
    struct FixedTrainer;

    impl Trainer for FixedTrainer {
        fn train(
            &mut self,
            initial: NetworkWeights,
            _data: &PreparedDataset,
            params: &Hyperparameters,
            on_epoch: &mut dyn FnMut(EpochMetrics),
        ) -> Result<NetworkWeights, TrainingError> {
            for epoch in 0..params.epochs {
                on_epoch(EpochMetrics {
                    epoch,
                    loss: 1.0 / (epoch + 1) as f32,
                    accuracy: (epoch + 1) as f32 / params.epochs as f32,
                });
            }
            Ok(initial)
        }
    }

    struct FailingTrainer;

    impl Trainer for FailingTrainer {
        fn train(
            &mut self,
            _initial: NetworkWeights,
            _data: &PreparedDataset,
            _params: &Hyperparameters,
            _on_epoch: &mut dyn FnMut(EpochMetrics),
        ) -> Result<NetworkWeights, TrainingError> {
            Err(TrainingError::Trainer("diverged".to_string()))
        }
    }

    fn samples(counts: &[(&str, usize)]) -> Vec<TrainingSample> {
        let mut out = Vec::new();
        for (gesture, n) in counts {
            for i in 0..*n {
                let features = FeatureVector::from_slice(&[i as f32 * 0.01; FEATURE_LENGTH]).unwrap();
                out.push(TrainingSample::new(*gesture, features, i as f64));
            }
        }
        out
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prepare_split_and_one_hot() {
        let params = Hyperparameters::default();
        let data = TrainingCoordinator::prepare(
            &samples(&[("Hello", 10), ("Yes", 10), ("Juggle", 3)]),
            &labels(&["Hello", "Yes"]),
            &params,
        )
        .unwrap();

        assert_eq!(data.train.len(), 16);
        assert_eq!(data.validation.len(), 4);
        for ex in data.train.iter().chain(&data.validation) {
            assert_eq!(ex.target.len(), 2);
            assert_eq!(ex.target[ex.class_index], 1.0);
            assert_eq!(ex.target.sum(), 1.0);
        }
    }

    #[test]
    fn test_prepare_is_seeded() {
        let s = samples(&[("Hello", 10), ("Yes", 10)]);
        let l = labels(&["Hello", "Yes"]);
        let params = Hyperparameters { seed: 9, ..Default::default() };
        let a = TrainingCoordinator::prepare(&s, &l, &params).unwrap();
        let b = TrainingCoordinator::prepare(&s, &l, &params).unwrap();
        let order = |d: &PreparedDataset| d.train.iter().map(|e| e.features.as_slice()[0]).collect::<Vec<_>>();
        assert_eq!(order(&a), order(&b));
    }

    #[test]
    fn test_prepare_rejects_bad_input() {
        let params = Hyperparameters::default();
        assert_matches!(
            TrainingCoordinator::prepare(&samples(&[("Hello", 5)]), &labels(&["Hello"]), &params),
            Err(TrainingError::TooFewLabels(1))
        );
        assert_matches!(
            TrainingCoordinator::prepare(&samples(&[("Juggle", 5)]), &labels(&["Hello", "Yes"]), &params),
            Err(TrainingError::NoValidSamples)
        );
    }

    #[test]
    fn test_train_reports_progress_in_order() {
        let coordinator = TrainingCoordinator::new();
        let params = Hyperparameters { epochs: 3, ..Default::default() };
        let mut statuses = Vec::new();

        let trained = coordinator
            .train(
                &mut FixedTrainer,
                &samples(&[("Hello", 10), ("Yes", 10)]),
                &labels(&["Hello", "Yes"]),
                &params,
                1234.0,
                &mut |p| statuses.push(p.status.clone()),
            )
            .unwrap();

        assert_eq!(
            statuses,
            vec![
                "Preparing data...",
                "Building model...",
                "Training started...",
                "Epoch 1/3",
                "Epoch 2/3",
                "Epoch 3/3",
                "Training complete!",
            ]
        );
        assert!(trained.classifier.is_loaded());
        assert_eq!(trained.record.accuracy, 1.0);
        assert_eq!(trained.record.trained_at_ms, 1234.0);
        assert!(!coordinator.is_training());
    }

    #[test]
    fn test_concurrent_training_is_busy() {
        let coordinator = TrainingCoordinator::new();
        let guard = coordinator.try_begin().unwrap();
        assert!(coordinator.is_training());

        let result = coordinator.train(
            &mut FixedTrainer,
            &samples(&[("Hello", 10), ("Yes", 10)]),
            &labels(&["Hello", "Yes"]),
            &Hyperparameters::default(),
            0.0,
            &mut |_| {},
        );
        assert_matches!(result, Err(TrainingError::Busy));

        drop(guard);
        assert!(!coordinator.is_training());
    }

    #[test]
    fn test_flag_cleared_after_failure() {
        let coordinator = TrainingCoordinator::new();
        let result = coordinator.train(
            &mut FailingTrainer,
            &samples(&[("Hello", 10), ("Yes", 10)]),
            &labels(&["Hello", "Yes"]),
            &Hyperparameters::default(),
            0.0,
            &mut |_| {},
        );
        assert_matches!(result, Err(TrainingError::Trainer(_)));
        assert!(!coordinator.is_training());
    }
}

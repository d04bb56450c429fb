//! Dense feed-forward network, inference only
//!
//! Architecture for `n` classes:
//!
//! ```text
//! 63 → Dense(128, relu) → BatchNorm → Dropout(0.3)
//!    → Dense(64, relu)  → BatchNorm → Dropout(0.3)
//!    → Dense(32, relu)  → Dropout(0.2)
//!    → Dense(n, softmax)
//! ```
//!
//! Dropout is the identity at inference. Optimization lives behind the
//! `Trainer` trait; this module only evaluates persisted weights.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::model::{rank, Prediction, Recognition, ScoredLabel};
use crate::error::ModelError;
use crate::tracking::{FeatureVector, FEATURE_LENGTH};

const BATCH_NORM_EPSILON: f32 = 1e-3;
const TOP_K: usize = 5;

// ============================================================================
// PERSISTED WEIGHTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Softmax,
    Linear,
}

/// Frozen batch-normalization statistics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchNorm {
    pub gamma: Vec<f32>,
    pub beta: Vec<f32>,
    pub moving_mean: Vec<f32>,
    pub moving_variance: Vec<f32>,
    pub epsilon: f32,
}

impl BatchNorm {
    fn identity(units: usize) -> Self {
        Self {
            gamma: vec![1.0; units],
            beta: vec![0.0; units],
            moving_mean: vec![0.0; units],
            moving_variance: vec![1.0; units],
            epsilon: BATCH_NORM_EPSILON,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    pub inputs: usize,
    pub outputs: usize,
    pub activation: Activation,
    /// Row-major `outputs × inputs`
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub batch_norm: Option<BatchNorm>,
    /// Training-time only
    #[serde(default)]
    pub dropout: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkWeights {
    pub layers: Vec<LayerWeights>,
}

/// Shape of one layer before weights exist
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerShape {
    pub inputs: usize,
    pub outputs: usize,
    pub activation: Activation,
    pub batch_norm: bool,
    pub dropout: f32,
}

/// Layer shapes of the gesture network for `num_classes` outputs
pub fn standard_layers(num_classes: usize) -> Vec<LayerShape> {
    vec![
        LayerShape { inputs: FEATURE_LENGTH, outputs: 128, activation: Activation::Relu, batch_norm: true, dropout: 0.3 },
        LayerShape { inputs: 128, outputs: 64, activation: Activation::Relu, batch_norm: true, dropout: 0.3 },
        LayerShape { inputs: 64, outputs: 32, activation: Activation::Relu, batch_norm: false, dropout: 0.2 },
        LayerShape { inputs: 32, outputs: num_classes, activation: Activation::Softmax, batch_norm: false, dropout: 0.0 },
    ]
}

impl NetworkWeights {
    /// Glorot-uniform weights, zero bias, identity batch norm
    pub fn initialized<R: Rng + ?Sized>(shapes: &[LayerShape], rng: &mut R) -> Self {
        let layers = shapes
            .iter()
            .map(|shape| {
                let limit = (6.0 / (shape.inputs + shape.outputs) as f32).sqrt();
                LayerWeights {
                    inputs: shape.inputs,
                    outputs: shape.outputs,
                    activation: shape.activation,
                    weights: (0..shape.inputs * shape.outputs)
                        .map(|_| rng.random_range(-limit..limit))
                        .collect(),
                    bias: vec![0.0; shape.outputs],
                    batch_norm: shape.batch_norm.then(|| BatchNorm::identity(shape.outputs)),
                    dropout: shape.dropout,
                }
            })
            .collect();
        Self { layers }
    }

    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(|l| l.inputs)
    }

    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(|l| l.outputs)
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

#[derive(Debug)]
struct DenseLayer {
    weights: DMatrix<f32>,
    bias: DVector<f32>,
    activation: Activation,
    /// Folded batch norm: `x * scale + shift`
    norm: Option<(DVector<f32>, DVector<f32>)>,
}

#[derive(Debug)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

fn check_len(layer: usize, expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch { layer, expected, actual })
    }
}

impl DenseNetwork {
    pub fn from_weights(weights: &NetworkWeights) -> Result<Self, ModelError> {
        if weights.layers.is_empty() {
            return Err(ModelError::Empty);
        }

        let mut layers = Vec::with_capacity(weights.layers.len());
        let mut previous_outputs: Option<usize> = None;

        for (i, layer) in weights.layers.iter().enumerate() {
            if let Some(expected) = previous_outputs {
                if layer.inputs != expected {
                    return Err(ModelError::InputMismatch { layer: i, expected, actual: layer.inputs });
                }
            }
            check_len(i, layer.inputs * layer.outputs, layer.weights.len())?;
            check_len(i, layer.outputs, layer.bias.len())?;

            let norm = match &layer.batch_norm {
                Some(bn) => {
                    for v in [&bn.gamma, &bn.beta, &bn.moving_mean, &bn.moving_variance] {
                        check_len(i, layer.outputs, v.len())?;
                    }
                    let scale = DVector::from_iterator(
                        layer.outputs,
                        bn.gamma
                            .iter()
                            .zip(&bn.moving_variance)
                            .map(|(g, var)| g / (var + bn.epsilon).sqrt()),
                    );
                    let shift = DVector::from_iterator(
                        layer.outputs,
                        bn.beta
                            .iter()
                            .zip(&bn.moving_mean)
                            .zip(scale.iter())
                            .map(|((b, m), s)| b - m * s),
                    );
                    Some((scale, shift))
                }
                None => None,
            };

            layers.push(DenseLayer {
                weights: DMatrix::from_row_slice(layer.outputs, layer.inputs, &layer.weights),
                bias: DVector::from_column_slice(&layer.bias),
                activation: layer.activation,
                norm,
            });
            previous_outputs = Some(layer.outputs);
        }

        Ok(Self { layers })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.weights.ncols())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.weights.nrows())
    }

    /// Run one input through every layer
    ///
    /// `input` must have `input_size()` values.
    pub fn forward(&self, input: &[f32]) -> DVector<f32> {
        let mut x = DVector::from_column_slice(input);
        for layer in &self.layers {
            let mut z = &layer.weights * &x + &layer.bias;
            match layer.activation {
                Activation::Relu => z.apply(|v| *v = (*v).max(0.0)),
                Activation::Softmax => softmax(&mut z),
                Activation::Linear => {}
            }
            if let Some((scale, shift)) = &layer.norm {
                z = z.component_mul(scale) + shift;
            }
            x = z;
        }
        x
    }
}

fn softmax(z: &mut DVector<f32>) {
    let max = z.max();
    z.apply(|v| *v = (*v - max).exp());
    let sum = z.sum();
    if sum > 0.0 {
        *z /= sum;
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Trained network plus its label order
#[derive(Debug)]
pub struct NetworkClassifier {
    network: Option<DenseNetwork>,
    labels: Vec<String>,
}

impl NetworkClassifier {
    pub fn new(weights: &NetworkWeights, labels: Vec<String>) -> Result<Self, ModelError> {
        let network = DenseNetwork::from_weights(weights)?;
        if network.input_size() != FEATURE_LENGTH {
            return Err(ModelError::InputMismatch {
                layer: 0,
                expected: FEATURE_LENGTH,
                actual: network.input_size(),
            });
        }
        if network.output_size() != labels.len() {
            return Err(ModelError::LabelCount {
                outputs: network.output_size(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            network: Some(network),
            labels,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_loaded(&self) -> bool {
        self.network.is_some()
    }

    /// Drop the weights; later calls report `NotReady`
    pub fn release(&mut self) {
        self.network = None;
    }

    pub fn classify(&self, features: &FeatureVector) -> Recognition {
        let Some(network) = &self.network else {
            return Recognition::NotReady;
        };

        let probabilities = network.forward(features.as_slice());
        let scores = self
            .labels
            .iter()
            .zip(probabilities.iter())
            .map(|(label, p)| ScoredLabel::new(label.as_str(), *p))
            .collect();
        let top_k = rank(scores, TOP_K);

        match top_k.first() {
            Some(best) => Recognition::Recognized(Prediction::new(best.label.clone(), best.score, top_k)),
            None => Recognition::NotReady,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn linear_softmax() -> NetworkWeights {
        NetworkWeights {
            layers: vec![LayerWeights {
                inputs: 2,
                outputs: 2,
                activation: Activation::Softmax,
                weights: vec![1.0, 0.0, 0.0, 1.0],
                bias: vec![0.0, 0.0],
                batch_norm: None,
                dropout: 0.0,
            }],
        }
    }

    #[test]
    fn test_softmax_output() {
        let net = DenseNetwork::from_weights(&linear_softmax()).unwrap();
        let out = net.forward(&[0.0, 3f32.ln()]);
        assert!((out[0] - 0.25).abs() < 1e-5);
        assert!((out[1] - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_relu_then_batch_norm() {
        let weights = NetworkWeights {
            layers: vec![LayerWeights {
                inputs: 1,
                outputs: 2,
                activation: Activation::Relu,
                weights: vec![1.0, -1.0],
                bias: vec![0.0, 0.0],
                batch_norm: Some(BatchNorm {
                    gamma: vec![2.0, 1.0],
                    beta: vec![0.5, 0.25],
                    moving_mean: vec![1.0, 0.0],
                    moving_variance: vec![4.0, 1.0],
                    epsilon: 0.0,
                }),
                dropout: 0.3,
            }],
        };
        let net = DenseNetwork::from_weights(&weights).unwrap();
        let out = net.forward(&[3.0]);
        // relu(3) = 3 → 2 * (3 - 1) / 2 + 0.5; relu(-3) = 0 → 0.25
        assert!((out[0] - 2.5).abs() < 1e-6);
        assert!((out[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_standard_network_outputs_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        let weights = NetworkWeights::initialized(&standard_layers(4), &mut rng);
        let net = DenseNetwork::from_weights(&weights).unwrap();
        assert_eq!(net.input_size(), FEATURE_LENGTH);
        assert_eq!(net.output_size(), 4);

        let input: Vec<f32> = (0..FEATURE_LENGTH).map(|i| (i as f32 * 0.1).sin()).collect();
        let out = net.forward(&input);
        assert!((out.sum() - 1.0).abs() < 1e-4);
        assert!(out.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn test_shape_errors() {
        let mut weights = linear_softmax();
        weights.layers[0].weights.pop();
        assert_matches!(
            DenseNetwork::from_weights(&weights),
            Err(ModelError::ShapeMismatch { layer: 0, expected: 4, actual: 3 })
        );

        let mut rng = StdRng::seed_from_u64(1);
        let mut chained = NetworkWeights::initialized(&standard_layers(3), &mut rng);
        chained.layers.remove(1);
        assert_matches!(
            DenseNetwork::from_weights(&chained),
            Err(ModelError::InputMismatch { layer: 1, expected: 128, actual: 64 })
        );

        assert_matches!(
            DenseNetwork::from_weights(&NetworkWeights { layers: Vec::new() }),
            Err(ModelError::Empty)
        );
    }

    #[test]
    fn test_label_count_checked() {
        let mut rng = StdRng::seed_from_u64(3);
        let weights = NetworkWeights::initialized(&standard_layers(3), &mut rng);
        let result = NetworkClassifier::new(&weights, vec!["only".into()]);
        assert_matches!(result, Err(ModelError::LabelCount { outputs: 3, labels: 1 }));

        let result = NetworkClassifier::new(&linear_softmax(), vec!["a".into(), "b".into()]);
        assert_matches!(result, Err(ModelError::InputMismatch { layer: 0, expected: 63, actual: 2 }));
    }

    #[test]
    fn test_classify_and_release() {
        let mut rng = StdRng::seed_from_u64(9);
        let weights = NetworkWeights::initialized(&standard_layers(6), &mut rng);
        let labels: Vec<String> = (0..6).map(|i| format!("G{}", i)).collect();
        let mut classifier = NetworkClassifier::new(&weights, labels).unwrap();

        let features = FeatureVector::from_slice(&[0.2; FEATURE_LENGTH]).unwrap();
        let Recognition::Recognized(prediction) = classifier.classify(&features) else {
            panic!("expected a prediction");
        };
        assert_eq!(prediction.top_k.len(), 5);
        assert_eq!(prediction.label, prediction.top_k[0].label);
        assert!(prediction.top_k.windows(2).all(|w| w[0].score >= w[1].score));

        classifier.release();
        assert_eq!(classifier.classify(&features), Recognition::NotReady);
    }

    #[test]
    fn test_weights_survive_json() {
        let mut rng = StdRng::seed_from_u64(5);
        let weights = NetworkWeights::initialized(&standard_layers(2), &mut rng);
        let json = serde_json::to_string(&weights).unwrap();
        let back: NetworkWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back.layers.len(), 4);
        assert_eq!(back.output_size(), Some(2));
    }
}

//! Classifier module - gesture labels from skeletons and frames
//!
//! Template scoring runs without any trained model. The dense network
//! evaluates persisted weights; training itself is an injected capability.

mod buffer;
mod model;
mod motion;
mod network;
mod template_scorer;
mod templates;

pub use buffer::{MotionBuffer, MOTION_BUFFER_SIZE};
pub use model::{
    rank, Classifier, Prediction, Recognition, ScoredLabel, NO_HAND_LABEL, RECOGNIZING_LABEL, UNKNOWN_LABEL,
};
pub use motion::{score_analysis, ShapeClassifier};
pub use network::{
    standard_layers, Activation, BatchNorm, DenseNetwork, LayerShape, LayerWeights, NetworkClassifier, NetworkWeights,
};
pub use template_scorer::TemplateScorer;
pub use templates::{find_template, GestureTemplate, HandShape, Motion, GESTURE_TEMPLATES};

//! Feature normalization
//!
//! Wrist-relative, scale-normalized landmark coordinates flattened to 63
//! floats. Invariant to hand position and size in frame, not to rotation.
//!
//! Layout: `[x0, y0, z0, x1, y1, z1, ..., x20, y20, z20]`

use serde::{Deserialize, Serialize};

use crate::detection::{Landmark, Skeleton, LANDMARK_COUNT, WRIST};
use crate::error::ValidationError;

/// Number of floats per feature vector
pub const FEATURE_LENGTH: usize = LANDMARK_COUNT * 3;

/// Classifier input; always exactly `FEATURE_LENGTH` finite values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    /// Validate raw values from outside the pipeline
    pub fn from_slice(values: &[f32]) -> Result<Self, ValidationError> {
        if values.len() != FEATURE_LENGTH {
            return Err(ValidationError::FeatureLength {
                expected: FEATURE_LENGTH,
                actual: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ValidationError::NonFinite { index });
        }
        Ok(Self(values.to_vec()))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Raw landmarks flattened without normalization
    pub fn flatten(landmarks: &Skeleton) -> Self {
        Self(landmarks.iter().flat_map(|l| [l.x, l.y, l.z]).collect())
    }

    /// Inverse of `flatten`
    pub fn to_landmarks(&self) -> Skeleton {
        let mut skeleton = [Landmark::default(); LANDMARK_COUNT];
        for (i, l) in skeleton.iter_mut().enumerate() {
            let (x, y, z) = self.point(i);
            *l = Landmark::new(x, y, z);
        }
        skeleton
    }

    /// Landmark `index` as (x, y, z)
    pub fn point(&self, index: usize) -> (f32, f32, f32) {
        let i = index * 3;
        (self.0[i], self.0[i + 1], self.0[i + 2])
    }
}

impl TryFrom<Vec<f32>> for FeatureVector {
    type Error = ValidationError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<FeatureVector> for Vec<f32> {
    fn from(features: FeatureVector) -> Self {
        features.0
    }
}

/// Translate to the wrist and divide by the larger of the x/y extents
///
/// A degenerate skeleton (zero extent) uses scale 1.
pub fn normalize(landmarks: &Skeleton) -> FeatureVector {
    let wrist = landmarks[WRIST];

    let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
    for l in landmarks {
        min_x = min_x.min(l.x);
        max_x = max_x.max(l.x);
        min_y = min_y.min(l.y);
        max_y = max_y.max(l.y);
    }

    let extent = (max_x - min_x).max(max_y - min_y);
    let scale = if extent > 0.0 { extent } else { 1.0 };

    let mut values = Vec::with_capacity(FEATURE_LENGTH);
    for l in landmarks {
        values.push((l.x - wrist.x) / scale);
        values.push((l.y - wrist.y) / scale);
        values.push(l.z / scale);
    }
    FeatureVector(values)
}

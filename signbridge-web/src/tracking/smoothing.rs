//! Velocity-predictive landmark smoothing
//!
//! Constant-velocity predictor blended with the measurement, per landmark
//! and per axis. z passes through untouched. No covariance is tracked.

use crate::config::SmoothingConfig;
use crate::detection::Landmark;

pub struct LandmarkTemporalSmoother {
    /// Weight of the prediction against the measurement
    alpha: f32,
    /// Weight of the new displacement in the velocity estimate
    velocity_blend: f32,
    previous: Vec<Landmark>,
    velocity: Vec<(f32, f32)>,
}

impl LandmarkTemporalSmoother {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            alpha: config.alpha,
            velocity_blend: config.velocity_blend,
            previous: Vec::new(),
            velocity: Vec::new(),
        }
    }

    /// Smooth one frame of landmarks
    ///
    /// The first frame, and any frame whose landmark count differs from the
    /// previous one, starts a new track: output equals input exactly.
    pub fn smooth(&mut self, measured: &[Landmark]) -> Vec<Landmark> {
        if self.previous.is_empty() || self.previous.len() != measured.len() {
            self.previous = measured.to_vec();
            self.velocity = vec![(0.0, 0.0); measured.len()];
            return measured.to_vec();
        }

        let alpha = self.alpha;
        let blend = self.velocity_blend;
        let mut out = Vec::with_capacity(measured.len());

        for ((m, prev), vel) in measured
            .iter()
            .zip(self.previous.iter_mut())
            .zip(self.velocity.iter_mut())
        {
            let predicted = (prev.x + vel.0, prev.y + vel.1);
            let smoothed = Landmark::new(
                alpha * predicted.0 + (1.0 - alpha) * m.x,
                alpha * predicted.1 + (1.0 - alpha) * m.y,
                m.z,
            );

            *vel = (
                blend * (smoothed.x - prev.x) + (1.0 - blend) * vel.0,
                blend * (smoothed.y - prev.y) + (1.0 - blend) * vel.1,
            );
            *prev = smoothed;
            out.push(smoothed);
        }

        out
    }

    /// Drop the track, e.g. when the hand is lost
    pub fn reset(&mut self) {
        self.previous.clear();
        self.velocity.clear();
    }

    pub fn is_tracking(&self) -> bool {
        !self.previous.is_empty()
    }

    pub fn velocities(&self) -> &[(f32, f32)] {
        &self.velocity
    }
}

impl Default for LandmarkTemporalSmoother {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}

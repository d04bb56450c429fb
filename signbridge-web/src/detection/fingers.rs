//! Finger counting from convexity defects
//!
//! N extended fingers leave N-1 valleys between them. A hull vertex counts
//! as a valley when its interior angle is sharp, the contour sags deep
//! below the chord of its neighbours, and it sits above the hand centroid.

use super::geometry::{convex_hull, interior_angle_deg, point_to_segment_distance, Point};
use crate::config::{ContourConfig, FingerCountConfig};

pub const MAX_FINGERS: u8 = 5;

pub struct ConvexHullFingerCounter {
    config: FingerCountConfig,
    min_contour_points: usize,
}

impl ConvexHullFingerCounter {
    pub fn new(config: FingerCountConfig, contour: &ContourConfig) -> Self {
        Self {
            config,
            min_contour_points: contour.min_points,
        }
    }

    /// Estimate extended fingers (0..=5) from a pixel-space contour
    ///
    /// Never fails: a short contour gives 0, an ambiguous hull gives 1.
    pub fn count(&self, contour: &[Point], centroid: Point) -> u8 {
        if contour.len() < self.min_contour_points {
            return 0;
        }

        let hull = convex_hull(contour);
        if hull.len() < self.config.min_hull_points {
            return 1;
        }

        let n = hull.len();
        let mut defects = 0usize;
        for i in 0..n {
            let p1 = hull[i];
            let p2 = hull[(i + 1) % n];
            let p3 = hull[(i + 2) % n];

            let Some(angle) = interior_angle_deg(p1, p2, p3) else {
                continue;
            };

            let depth = contour
                .iter()
                .map(|&p| point_to_segment_distance(p, p1, p3))
                .fold(0.0f32, f32::max);

            if angle < self.config.max_defect_angle_deg
                && depth > self.config.min_defect_depth
                && p2.y < centroid.y
            {
                defects += 1;
            }
        }

        (defects + 1).clamp(1, MAX_FINGERS as usize) as u8
    }
}

impl Default for ConvexHullFingerCounter {
    fn default() -> Self {
        Self::new(FingerCountConfig::default(), &ContourConfig::default())
    }
}

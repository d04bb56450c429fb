//! Hand region detection
//!
//! Chains segmentation, contour scanning and finger counting into one
//! `HandRegion` per frame.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::contour::extract_contour;
use super::fingers::ConvexHullFingerCounter;
use super::frame::Frame;
use super::geometry::Point;
use super::segmentation::SkinRegionSegmenter;
use crate::config::PipelineConfig;

/// Normalized axis-aligned box, all fields in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Hand description for one frame
///
/// When `detected` is false every other field holds its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandRegion {
    pub detected: bool,
    pub confidence: f32,
    /// Normalized
    pub centroid: Point,
    pub bounding_box: BoundingBox,
    pub finger_count: u8,
    /// Pixel coordinates
    pub contour: Vec<Point>,
}

impl HandRegion {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Frame-to-region stage of the pipeline
pub struct HandRegionDetector {
    segmenter: SkinRegionSegmenter,
    counter: ConvexHullFingerCounter,
    scan_step: usize,
}

impl HandRegionDetector {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            segmenter: SkinRegionSegmenter::new(config.segmenter.clone()),
            counter: ConvexHullFingerCounter::new(config.fingers.clone(), &config.contour),
            scan_step: config.contour.scan_step,
        }
    }

    pub fn detect(&self, frame: &Frame) -> HandRegion {
        if frame.is_empty() {
            return HandRegion::none();
        }

        let segmentation = self.segmenter.segment(frame);
        if !self.segmenter.is_hand(&segmentation) {
            debug!(
                skin = segmentation.skin_pixels,
                scanned = segmentation.scanned_pixels,
                "no hand in frame"
            );
            return HandRegion::none();
        }

        let (Some(bounds), Some((cx, cy))) = (segmentation.bounds, segmentation.centroid_px()) else {
            return HandRegion::none();
        };

        let contour = extract_contour(&segmentation.mask, bounds, self.scan_step);
        let finger_count = self.counter.count(&contour, Point::new(cx, cy));

        let w = frame.width() as f32;
        let h = frame.height() as f32;
        let hand_area = segmentation.skin_fraction();
        let confidence = (0.45 + hand_area * 3.5 + finger_count as f32 * 0.08).min(0.95);

        let region = HandRegion {
            detected: true,
            confidence,
            centroid: Point::new(cx / w, cy / h),
            bounding_box: BoundingBox {
                x: bounds.min_x as f32 / w,
                y: bounds.min_y as f32 / h,
                width: (bounds.max_x - bounds.min_x) as f32 / w,
                height: (bounds.max_y - bounds.min_y) as f32 / h,
            },
            finger_count,
            contour,
        };

        debug!(
            fingers = region.finger_count,
            confidence = region.confidence,
            contour_points = region.contour.len(),
            "hand region"
        );
        region
    }
}

impl Default for HandRegionDetector {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

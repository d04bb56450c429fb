//! Lightweight whole-frame shape analysis
//!
//! Samples every 4th pixel with a stricter YCbCr skin test and reduces the
//! hand to a handful of shape metrics. Much cheaper than the contour path,
//! used by the motion/shape classifier.

use serde::{Deserialize, Serialize};

use super::frame::Frame;
use super::geometry::Point;
use super::segmentation::to_ycbcr;

pub const ANALYZER_STRIDE: usize = 4;

const MIN_SKIN_SAMPLES: usize = 10;

/// Band above the centroid treated as the finger area
const FINGER_BAND: f32 = 0.05;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeAnalysis {
    pub finger_count: u8,
    pub finger_states: [bool; 5],
    /// Normalized
    pub centroid: Point,
    /// Box width over height
    pub aspect_ratio: f32,
    /// Skin samples over scanned samples
    pub density: f32,
    /// Centroid displacement since the previous analysed frame
    pub motion: (f32, f32),
}

impl ShapeAnalysis {
    pub fn empty() -> Self {
        Self {
            finger_count: 0,
            finger_states: [false; 5],
            centroid: Point::new(0.5, 0.5),
            aspect_ratio: 1.0,
            density: 0.0,
            motion: (0.0, 0.0),
        }
    }

    pub fn motion_magnitude(&self) -> f32 {
        (self.motion.0 * self.motion.0 + self.motion.1 * self.motion.1).sqrt()
    }
}

/// Stricter skin test of the analyzer
pub fn is_skin_strict(r: u8, g: u8, b: u8) -> bool {
    let (y, cb, cr) = to_ycbcr(r as f32, g as f32, b as f32);
    y > 80.0 && cb > 77.0 && cb < 127.0 && cr > 133.0 && cr < 173.0
}

/// Finger states implied by a bare finger count, thumb folded below five
pub fn states_from_count(count: u8) -> [bool; 5] {
    match count {
        5 => [true; 5],
        4 => [false, true, true, true, true],
        3 => [false, true, true, true, false],
        2 => [false, true, true, false, false],
        1 => [false, true, false, false, false],
        _ => [false; 5],
    }
}

#[derive(Default)]
pub struct ShapeAnalyzer;

impl ShapeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyse one frame; `motion` is left at zero for the caller to fill
    pub fn analyze(&self, frame: &Frame) -> ShapeAnalysis {
        if frame.is_empty() {
            return ShapeAnalysis::empty();
        }

        let (w, h) = (frame.width() as f32, frame.height() as f32);
        let mut skin: Vec<Point> = Vec::new();
        for y in (0..frame.height()).step_by(ANALYZER_STRIDE) {
            for x in (0..frame.width()).step_by(ANALYZER_STRIDE) {
                let (r, g, b) = frame.rgb(x, y);
                if is_skin_strict(r, g, b) {
                    skin.push(Point::new(x as f32 / w, y as f32 / h));
                }
            }
        }

        if skin.len() < MIN_SKIN_SAMPLES {
            return ShapeAnalysis::empty();
        }

        let n = skin.len() as f32;
        let centroid = Point::new(
            skin.iter().map(|p| p.x).sum::<f32>() / n,
            skin.iter().map(|p| p.y).sum::<f32>() / n,
        );

        let (mut min_x, mut max_x, mut min_y, mut max_y) = (1.0f32, 0.0f32, 1.0f32, 0.0f32);
        for p in &skin {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let box_w = max_x - min_x;
        let box_h = max_y - min_y;
        let aspect_ratio = if box_h > 0.0 { box_w / box_h } else { 1.0 };

        let top: Vec<f32> = skin
            .iter()
            .filter(|p| p.y < centroid.y - FINGER_BAND)
            .map(|p| p.x)
            .collect();
        let spread = if top.len() > 5 {
            top.iter().copied().fold(f32::MIN, f32::max) - top.iter().copied().fold(f32::MAX, f32::min)
        } else {
            0.0
        };

        let density = n / ((w / ANALYZER_STRIDE as f32) * (h / ANALYZER_STRIDE as f32));

        let finger_count = if spread > 0.3 && aspect_ratio > 0.8 {
            5
        } else if spread > 0.2 {
            (spread * 10.0).round().clamp(0.0, 5.0) as u8
        } else if box_h > box_w * 1.5 {
            // Tall narrow box reads as a single pointing finger
            1
        } else {
            0
        };

        ShapeAnalysis {
            finger_count,
            finger_states: states_from_count(finger_count),
            centroid,
            aspect_ratio,
            density,
            motion: (0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIN: (u8, u8, u8) = (200, 140, 110);

    #[test]
    fn test_strict_skin() {
        assert!(is_skin_strict(SKIN.0, SKIN.1, SKIN.2));
        assert!(!is_skin_strict(40, 40, 40));
    }

    #[test]
    fn test_blank_frame_is_empty() {
        let frame = Frame::solid(64, 64, (0, 0, 0), 0.0);
        assert_eq!(ShapeAnalyzer::new().analyze(&frame), ShapeAnalysis::empty());
    }

    #[test]
    fn test_tall_narrow_blob_points() {
        let mut frame = Frame::solid(100, 100, (0, 0, 0), 0.0);
        frame.fill_rect(44, 10, 12, 80, SKIN);
        let analysis = ShapeAnalyzer::new().analyze(&frame);
        assert_eq!(analysis.finger_count, 1);
        assert_eq!(analysis.finger_states, [false, true, false, false, false]);
        assert!(analysis.aspect_ratio < 0.5);
    }

    #[test]
    fn test_wide_blob_is_open_hand() {
        let mut frame = Frame::solid(100, 100, (0, 0, 0), 0.0);
        frame.fill_rect(10, 20, 80, 60, SKIN);
        let analysis = ShapeAnalyzer::new().analyze(&frame);
        assert_eq!(analysis.finger_count, 5);
        assert_eq!(analysis.finger_states, [true; 5]);
        assert!((analysis.density - 0.48).abs() < 1e-4);
    }

    #[test]
    fn test_states_from_count() {
        assert_eq!(states_from_count(3), [false, true, true, true, false]);
        assert_eq!(states_from_count(0), [false; 5]);
    }
}

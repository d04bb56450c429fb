//! Synthetic 21-point hand skeleton
//!
//! Only the wrist and measured fingertips are anchored to the image; every
//! other joint is placed by interpolation. Topology follows the usual hand
//! model: wrist, then four joints per finger from knuckle to tip.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::region::{BoundingBox, HandRegion};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Tip index per finger, thumb first
pub const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// First joint index of finger `finger` (0 = thumb)
#[inline]
pub const fn finger_base(finger: usize) -> usize {
    1 + finger * 4
}

/// Spread of each finger from vertical, radians
const FINGER_ANGLES: [f32; 5] = [-0.45, -0.22, 0.0, 0.22, 0.45];

/// Finger length as a fraction of the box height
const FINGER_LENGTHS: [f32; 5] = [0.45, 0.65, 0.72, 0.65, 0.52];

const FOLDED_LENGTH: f32 = 0.35;

/// Wrist-to-tip fractions of the three inner joints
const JOINT_FRACTIONS: [f32; 3] = [0.35, 0.55, 0.75];

const WRIST_DEPTH: f32 = 0.92;

/// Minimum horizontal gap between fingertip candidates, fraction of box width
const TIP_SEPARATION: f32 = 0.1;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Normalized landmark; `z` is always 0 from 2D geometry
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn lerp(self, to: Landmark, t: f32) -> Self {
        Self {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            z: self.z + (to.z - self.z) * t,
        }
    }
}

pub type Skeleton = [Landmark; LANDMARK_COUNT];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// The camera image is mirrored, so a hand on the left of the frame is
    /// the signer's right hand
    pub fn from_centroid_x(x: f32) -> Self {
        if x < 0.5 {
            Handedness::Right
        } else {
            Handedness::Left
        }
    }
}

/// One analysed hand, landmarks already smoothed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    pub landmarks: Skeleton,
    pub score: f32,
    pub handedness: Handedness,
    pub bounding_box: BoundingBox,
    pub finger_count: u8,
}

// ============================================================================
// GENERATOR
// ============================================================================

#[derive(Default)]
pub struct SyntheticLandmarkGenerator;

impl SyntheticLandmarkGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build the skeleton for a detected region in a `width`×`height` frame
    ///
    /// Returns `None` for an undetected region.
    pub fn generate(&self, region: &HandRegion, width: usize, height: usize) -> Option<Skeleton> {
        if !region.detected || width == 0 || height == 0 {
            return None;
        }

        let (w, h) = (width as f32, height as f32);
        let bbox = region.bounding_box;
        let (cx, cy) = (region.centroid.x, region.centroid.y);
        let tips = fingertip_candidates(&region.contour, cy * h, bbox.width * w);
        let extended = region.finger_count as usize;

        let mut skeleton = [Landmark::default(); LANDMARK_COUNT];
        let wrist = Landmark::new(cx, bbox.y + WRIST_DEPTH * bbox.height, 0.0);
        skeleton[WRIST] = wrist;

        for finger in 0..5 {
            let tip = match tips.get(finger) {
                Some(p) if finger < extended => Landmark::new(p.x / w, p.y / h, 0.0),
                _ => {
                    let mut length = FINGER_LENGTHS[finger] * bbox.height;
                    if finger >= extended {
                        length *= FOLDED_LENGTH;
                    }
                    Landmark::new(
                        cx + FINGER_ANGLES[finger].sin() * bbox.width * 0.4,
                        cy - length,
                        0.0,
                    )
                }
            };

            let base = finger_base(finger);
            for (j, &t) in JOINT_FRACTIONS.iter().enumerate() {
                skeleton[base + j] = wrist.lerp(tip, t);
            }
            skeleton[base + 3] = tip;
        }

        Some(skeleton)
    }
}

/// Contour points above `centroid_y`, topmost first, thinned so no two are
/// closer than a tenth of the box width horizontally, then ordered left to
/// right. All values in pixels.
fn fingertip_candidates(contour: &[Point], centroid_y: f32, box_width_px: f32) -> Vec<Point> {
    let mut above: Vec<Point> = contour.iter().copied().filter(|p| p.y < centroid_y).collect();
    above.sort_by(|a, b| a.y.total_cmp(&b.y));

    let min_gap = box_width_px * TIP_SEPARATION;
    let mut tips: Vec<Point> = Vec::with_capacity(5);
    for p in above {
        if tips.len() == 5 {
            break;
        }
        if tips.iter().all(|t| (t.x - p.x).abs() >= min_gap) {
            tips.push(p);
        }
    }

    tips.sort_by(|a, b| a.x.total_cmp(&b.x));
    tips
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(finger_count: u8, contour: Vec<Point>) -> HandRegion {
        HandRegion {
            detected: true,
            confidence: 0.8,
            centroid: Point::new(0.5, 0.5),
            bounding_box: BoundingBox { x: 0.3, y: 0.2, width: 0.4, height: 0.6 },
            finger_count,
            contour,
        }
    }

    #[test]
    fn test_undetected_region_has_no_skeleton() {
        let gen = SyntheticLandmarkGenerator::new();
        assert!(gen.generate(&HandRegion::none(), 100, 100).is_none());
    }

    #[test]
    fn test_wrist_and_joint_interpolation() {
        let gen = SyntheticLandmarkGenerator::new();
        let skeleton = gen.generate(&region(0, Vec::new()), 100, 100).unwrap();

        assert_eq!(skeleton.len(), LANDMARK_COUNT);
        assert!((skeleton[WRIST].x - 0.5).abs() < 1e-6);
        assert!((skeleton[WRIST].y - (0.2 + 0.92 * 0.6)).abs() < 1e-6);

        let wrist = skeleton[WRIST];
        let tip = skeleton[INDEX_TIP];
        let pip = skeleton[INDEX_PIP];
        assert!((pip.x - (wrist.x + (tip.x - wrist.x) * 0.55)).abs() < 1e-6);
        assert!((pip.y - (wrist.y + (tip.y - wrist.y) * 0.55)).abs() < 1e-6);
        assert!(skeleton.iter().all(|l| l.z == 0.0));
    }

    #[test]
    fn test_folded_fingers_are_shorter() {
        let gen = SyntheticLandmarkGenerator::new();
        let open = gen.generate(&region(5, Vec::new()), 100, 100).unwrap();
        let closed = gen.generate(&region(0, Vec::new()), 100, 100).unwrap();

        // Middle finger: 0.72 of box height, folded to 35%
        assert!((open[MIDDLE_TIP].y - (0.5 - 0.72 * 0.6)).abs() < 1e-6);
        assert!((closed[MIDDLE_TIP].y - (0.5 - 0.72 * 0.6 * 0.35)).abs() < 1e-6);
        assert!((open[MIDDLE_TIP].x - 0.5).abs() < 1e-6);
        assert!(open[PINKY_TIP].x > open[THUMB_TIP].x);
    }

    #[test]
    fn test_measured_tips_used_for_extended_fingers() {
        let contour = vec![
            Point::new(40.0, 10.0),
            Point::new(41.0, 12.0),
            Point::new(60.0, 15.0),
            Point::new(50.0, 80.0),
        ];
        let gen = SyntheticLandmarkGenerator::new();
        let skeleton = gen.generate(&region(2, contour), 100, 100).unwrap();

        assert!((skeleton[THUMB_TIP].x - 0.40).abs() < 1e-6);
        assert!((skeleton[THUMB_TIP].y - 0.10).abs() < 1e-6);
        assert!((skeleton[INDEX_TIP].x - 0.60).abs() < 1e-6);
        assert!((skeleton[INDEX_TIP].y - 0.15).abs() < 1e-6);
        // Third finger falls back to a folded synthetic tip
        assert!((skeleton[MIDDLE_TIP].y - (0.5 - 0.72 * 0.6 * 0.35)).abs() < 1e-6);
    }

    #[test]
    fn test_candidates_thinned_and_sorted() {
        let contour = vec![
            Point::new(80.0, 5.0),
            Point::new(81.0, 6.0),
            Point::new(20.0, 8.0),
            Point::new(50.0, 9.0),
            Point::new(50.0, 90.0),
        ];
        let tips = fingertip_candidates(&contour, 50.0, 100.0);
        assert_eq!(
            tips,
            vec![Point::new(20.0, 8.0), Point::new(50.0, 9.0), Point::new(80.0, 5.0)]
        );
    }

    #[test]
    fn test_handedness_is_mirrored() {
        assert_eq!(Handedness::from_centroid_x(0.2), Handedness::Right);
        assert_eq!(Handedness::from_centroid_x(0.7), Handedness::Left);
    }
}

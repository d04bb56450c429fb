//! Detection module - frame to hand region to synthetic skeleton
//!
//! Re-exports only. All logic in submodules.

mod analyzer;
mod contour;
mod fingers;
mod frame;
mod geometry;
mod landmarks;
mod region;
mod segmentation;

pub use analyzer::{is_skin_strict, states_from_count, ShapeAnalysis, ShapeAnalyzer, ANALYZER_STRIDE};
pub use contour::extract_contour;
pub use fingers::{ConvexHullFingerCounter, MAX_FINGERS};
pub use frame::{Frame, PixelFormat, SkinMask};
pub use geometry::{convex_hull, cross, interior_angle_deg, point_to_segment_distance, Point};
pub use landmarks::*;
pub use region::{BoundingBox, HandRegion, HandRegionDetector};
pub use segmentation::{is_skin, to_ycbcr, PixelBounds, SkinRegionSegmenter, SkinSegmentation};

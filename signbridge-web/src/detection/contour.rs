//! Boundary extraction by edge scanning
//!
//! Scans inward from each side of the skin bounding box (top, right,
//! bottom, left) and keeps the first skin pixel hit on every scan line.
//! The result is an ordered point set running clockwise around the hand,
//! neither guaranteed convex nor closed.

use super::frame::SkinMask;
use super::geometry::Point;
use super::segmentation::PixelBounds;

/// Collect boundary points of the skin mask inside `bounds`
///
/// `scan_step` is rounded up to a multiple of the mask stride so scan
/// lines always fall on sampled pixels.
pub fn extract_contour(mask: &SkinMask, bounds: PixelBounds, scan_step: usize) -> Vec<Point> {
    let stride = mask.stride();
    let step = scan_step.max(1).div_ceil(stride) * stride;
    let PixelBounds { min_x, max_x, min_y, max_y } = bounds;

    let mut points = Vec::new();
    let mut hit = |x: usize, y: usize| {
        points.push(Point::new(x as f32, y as f32));
    };

    // Top edge, left to right
    for x in (min_x..=max_x).step_by(step) {
        if let Some(y) = (min_y..=max_y).step_by(stride).find(|&y| mask.get(x, y)) {
            hit(x, y);
        }
    }

    // Right edge, top to bottom
    for y in (min_y..=max_y).step_by(step) {
        if let Some(x) = (min_x..=max_x).rev().find(|&x| mask.get(x, y)) {
            hit(x, y);
        }
    }

    // Bottom edge, right to left
    for x in (min_x..=max_x).rev().step_by(step) {
        if let Some(y) = (min_y..=max_y).rev().find(|&y| mask.get(x, y)) {
            hit(x, y);
        }
    }

    // Left edge, bottom to top
    for y in (min_y..=max_y).rev().step_by(step) {
        if let Some(x) = (min_x..=max_x).step_by(stride).find(|&x| mask.get(x, y)) {
            hit(x, y);
        }
    }

    points
}

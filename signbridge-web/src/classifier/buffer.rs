//! Rolling centroid buffer for motion estimation
//!
//! Keeps the hand centroid of the last 10 analysed frames.

use crate::detection::Point;

/// Number of frames kept for motion estimation
pub const MOTION_BUFFER_SIZE: usize = 10;

/// Fixed-size ring of centroids in chronological order
pub struct MotionBuffer {
    data: [Point; MOTION_BUFFER_SIZE],

    /// Next slot to write
    write_index: usize,

    /// Whether the buffer has wrapped at least once
    filled: bool,
}

impl MotionBuffer {
    pub fn new() -> Self {
        Self {
            data: [Point::default(); MOTION_BUFFER_SIZE],
            write_index: 0,
            filled: false,
        }
    }

    pub fn push(&mut self, centroid: Point) {
        self.data[self.write_index] = centroid;
        self.write_index = (self.write_index + 1) % MOTION_BUFFER_SIZE;

        if self.write_index == 0 {
            self.filled = true;
        }
    }

    pub fn len(&self) -> usize {
        if self.filled {
            MOTION_BUFFER_SIZE
        } else {
            self.write_index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recently pushed centroid
    pub fn latest(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.write_index + MOTION_BUFFER_SIZE - 1) % MOTION_BUFFER_SIZE;
        Some(self.data[idx])
    }

    /// Displacement from the latest buffered centroid to `current`
    pub fn motion_to(&self, current: Point) -> (f32, f32) {
        self.latest()
            .map_or((0.0, 0.0), |prev| (current.x - prev.x, current.y - prev.y))
    }

    /// Oldest to newest
    pub fn to_vec(&self) -> Vec<Point> {
        let len = self.len();
        let start = if self.filled { self.write_index } else { 0 };
        (0..len).map(|i| self.data[(start + i) % MOTION_BUFFER_SIZE]).collect()
    }

    pub fn clear(&mut self) {
        self.data = [Point::default(); MOTION_BUFFER_SIZE];
        self.write_index = 0;
        self.filled = false;
    }
}

impl Default for MotionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_no_motion() {
        let buffer = MotionBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.motion_to(Point::new(0.3, 0.3)), (0.0, 0.0));
    }

    #[test]
    fn test_motion_from_latest() {
        let mut buffer = MotionBuffer::new();
        buffer.push(Point::new(0.1, 0.1));
        buffer.push(Point::new(0.2, 0.4));
        let (dx, dy) = buffer.motion_to(Point::new(0.5, 0.3));
        assert!((dx - 0.3).abs() < 1e-6);
        assert!((dy + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wraps_in_order() {
        let mut buffer = MotionBuffer::new();
        for i in 0..13 {
            buffer.push(Point::new(i as f32, 0.0));
        }
        assert_eq!(buffer.len(), MOTION_BUFFER_SIZE);
        let xs: Vec<f32> = buffer.to_vec().iter().map(|p| p.x).collect();
        assert_eq!(xs, (3..13).map(|i| i as f32).collect::<Vec<_>>());
        assert_eq!(buffer.latest(), Some(Point::new(12.0, 0.0)));

        buffer.clear();
        assert!(buffer.is_empty());
    }
}

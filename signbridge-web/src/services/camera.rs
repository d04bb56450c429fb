//! Camera source contract
//!
//! A `FrameSource` is acquired once, yields frames of a fixed size, and must
//! be released on every exit path. `CameraGuard` ties the release to scope.

use std::collections::VecDeque;

use tracing::{info, warn};

use crate::detection::Frame;
use crate::error::CameraError;

pub trait FrameSource {
    /// Open the device; returns the frame size
    fn acquire(&mut self) -> Result<(usize, usize), CameraError>;

    /// Latest frame, or `None` if nothing new is available
    fn next_frame(&mut self, now_ms: f64) -> Option<Frame>;

    /// Free the device; safe to call when not acquired
    fn release(&mut self);

    fn is_active(&self) -> bool;
}

/// Holds an acquired source and releases it on drop
pub struct CameraGuard<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
    width: usize,
    height: usize,
}

impl<'a, S: FrameSource + ?Sized> CameraGuard<'a, S> {
    /// Acquire `source`; on failure it is released before returning
    pub fn acquire(source: &'a mut S) -> Result<Self, CameraError> {
        match source.acquire() {
            Ok((width, height)) => {
                info!(width, height, "camera acquired");
                Ok(Self { source, width, height })
            }
            Err(e) => {
                warn!(error = %e, "camera acquisition failed");
                source.release();
                Err(e)
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn next_frame(&mut self, now_ms: f64) -> Option<Frame> {
        self.source.next_frame(now_ms)
    }
}

impl<S: FrameSource + ?Sized> Drop for CameraGuard<'_, S> {
    fn drop(&mut self) {
        self.source.release();
        info!("camera released");
    }
}

/// Scripted frame source for headless runs
///
/// Queued frames are returned in order; once the queue is empty every call
/// yields a black frame.
pub struct SyntheticCamera {
    width: usize,
    height: usize,
    queue: VecDeque<Frame>,
    failure: Option<CameraError>,
    active: bool,
    releases: usize,
}

impl SyntheticCamera {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            queue: VecDeque::new(),
            failure: None,
            active: false,
            releases: 0,
        }
    }

    /// A camera whose acquisition always fails with `error`
    pub fn failing(error: CameraError) -> Self {
        let mut camera = Self::new(0, 0);
        camera.failure = Some(error);
        camera
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.queue.push_back(frame);
    }

    /// How many times `release` has run
    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl FrameSource for SyntheticCamera {
    fn acquire(&mut self) -> Result<(usize, usize), CameraError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.active = true;
        Ok((self.width, self.height))
    }

    fn next_frame(&mut self, now_ms: f64) -> Option<Frame> {
        if !self.active {
            return None;
        }
        Some(match self.queue.pop_front() {
            Some(mut frame) => {
                frame.timestamp_ms = now_ms;
                frame
            }
            None => Frame::solid(self.width, self.height, (0, 0, 0), now_ms),
        })
    }

    fn release(&mut self) {
        self.active = false;
        self.releases += 1;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_guard_releases_on_drop() {
        let mut camera = SyntheticCamera::new(32, 24);
        {
            let mut guard = CameraGuard::acquire(&mut camera).unwrap();
            assert_eq!((guard.width(), guard.height()), (32, 24));
            let frame = guard.next_frame(10.0).unwrap();
            assert_eq!(frame.width(), 32);
            assert_eq!(frame.timestamp_ms, 10.0);
        }
        assert!(!camera.is_active());
        assert_eq!(camera.releases(), 1);
    }

    #[test]
    fn test_failed_acquire_still_releases() {
        let mut camera = SyntheticCamera::failing(CameraError::PermissionDenied);
        let result = CameraGuard::acquire(&mut camera).map(|_| ());
        assert_matches!(result, Err(CameraError::PermissionDenied));
        assert_eq!(camera.releases(), 1);
    }

    #[test]
    fn test_queued_frames_first() {
        let mut camera = SyntheticCamera::new(8, 8);
        let mut marked = Frame::solid(8, 8, (0, 0, 0), 0.0);
        marked.fill_rect(0, 0, 1, 1, (255, 0, 0));
        camera.push_frame(marked);

        assert!(camera.next_frame(0.0).is_none());
        camera.acquire().unwrap();
        assert_eq!(camera.next_frame(1.0).unwrap().rgb(0, 0), (255, 0, 0));
        assert_eq!(camera.next_frame(2.0).unwrap().rgb(0, 0), (0, 0, 0));
    }
}

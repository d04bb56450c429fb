//! Frame and skin mask containers

use crate::error::ValidationError;

/// Byte layout of a frame's pixel buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    /// Canvas `ImageData` layout
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// One captured video frame
#[derive(Clone, Debug)]
pub struct Frame {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
    /// Capture time in milliseconds
    pub timestamp_ms: f64,
}

impl Frame {
    pub fn new(
        width: usize,
        height: usize,
        format: PixelFormat,
        data: Vec<u8>,
        timestamp_ms: f64,
    ) -> Result<Self, ValidationError> {
        // Dimensions come from JS as u32 and can overflow a wasm32 usize
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(format.channels()));
        if expected != Some(data.len()) {
            return Err(ValidationError::FrameSize {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
            timestamp_ms,
        })
    }

    /// Frame filled with a single colour
    pub fn solid(width: usize, height: usize, rgb: (u8, u8, u8), timestamp_ms: f64) -> Self {
        let mut data = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
        }
        Self {
            width,
            height,
            format: PixelFormat::Rgba,
            data,
            timestamp_ms,
        }
    }

    /// Paint an axis-aligned rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, rgb: (u8, u8, u8)) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end {
                self.set_rgb(px, py, rgb);
            }
        }
    }

    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: (u8, u8, u8)) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * self.format.channels();
        self.data[idx] = rgb.0;
        self.data[idx + 1] = rgb.1;
        self.data[idx + 2] = rgb.2;
    }

    /// RGB sample at (x, y); alpha is ignored
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let idx = (y * self.width + x) * self.format.channels();
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Per-pixel skin classification for one frame
///
/// Only pixels on the scan stride are ever set.
#[derive(Clone, Debug)]
pub struct SkinMask {
    width: usize,
    height: usize,
    stride: usize,
    bits: Vec<bool>,
}

impl SkinMask {
    pub fn new(width: usize, height: usize, stride: usize) -> Self {
        Self {
            width,
            height,
            stride: stride.max(1),
            bits: vec![false; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.bits[y * self.width + x] = value;
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

//! Skin-colour segmentation
//!
//! A pixel is skin when the YCbCr test agrees with either the RGB ratio
//! test or the saturation test:
//!
//! ```text
//! skin = (rgb ∧ ycbcr) ∨ (ycbcr ∧ saturation)
//! ```

use super::frame::{Frame, SkinMask};
use crate::config::SegmenterConfig;

/// Luma / chroma of one RGB sample (BT.601, full range)
#[inline]
pub fn to_ycbcr(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
    (y, cb, cr)
}

/// Combined RGB / YCbCr / saturation skin test
pub fn is_skin(r: u8, g: u8, b: u8) -> bool {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);

    let rgb_skin = r > 95
        && g > 40
        && b > 20
        && r > g
        && r > b
        && (rf - gf).abs() > 15.0
        && rf - gf.min(bf) > 15.0;

    let (y, cb, cr) = to_ycbcr(rf, gf, bf);
    let ycbcr_skin = y > 60.0 && cb > 77.0 && cb < 135.0 && cr > 130.0 && cr < 180.0;
    if !ycbcr_skin {
        return false;
    }

    let max = r.max(g).max(b) as f32;
    let min = r.min(g).min(b) as f32;
    let saturation = if max > 0.0 { (max - min) / max } else { 0.0 };
    let saturation_skin = saturation > 0.15 && saturation < 0.75;

    rgb_skin || saturation_skin
}

/// Inclusive pixel extent of the skin pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

/// Raw result of one segmentation pass
#[derive(Clone, Debug)]
pub struct SkinSegmentation {
    pub mask: SkinMask,
    pub skin_pixels: usize,
    pub scanned_pixels: usize,
    /// `None` when no pixel was skin
    pub bounds: Option<PixelBounds>,
    sum_x: f64,
    sum_y: f64,
}

impl SkinSegmentation {
    /// Skin share of the scanned pixels
    pub fn skin_fraction(&self) -> f32 {
        if self.scanned_pixels == 0 {
            0.0
        } else {
            self.skin_pixels as f32 / self.scanned_pixels as f32
        }
    }

    /// Mean skin pixel position in pixels
    pub fn centroid_px(&self) -> Option<(f32, f32)> {
        if self.skin_pixels == 0 {
            return None;
        }
        let n = self.skin_pixels as f64;
        Some(((self.sum_x / n) as f32, (self.sum_y / n) as f32))
    }
}

/// Classifies every pixel on the scan stride as skin or not
pub struct SkinRegionSegmenter {
    config: SegmenterConfig,
}

impl SkinRegionSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Scan the frame and collect mask, centroid sums and extent
    pub fn segment(&self, frame: &Frame) -> SkinSegmentation {
        let stride = self.config.stride.max(1);
        let (width, height) = (frame.width(), frame.height());
        let mut mask = SkinMask::new(width, height, stride);

        let mut skin_pixels = 0usize;
        let mut scanned_pixels = 0usize;
        let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
        let mut bounds: Option<PixelBounds> = None;

        for y in (0..height).step_by(stride) {
            for x in (0..width).step_by(stride) {
                scanned_pixels += 1;
                let (r, g, b) = frame.rgb(x, y);
                if !is_skin(r, g, b) {
                    continue;
                }

                mask.set(x, y, true);
                skin_pixels += 1;
                sum_x += x as f64;
                sum_y += y as f64;

                bounds = Some(match bounds {
                    None => PixelBounds { min_x: x, max_x: x, min_y: y, max_y: y },
                    Some(b) => PixelBounds {
                        min_x: b.min_x.min(x),
                        max_x: b.max_x.max(x),
                        min_y: b.min_y.min(y),
                        max_y: b.max_y.max(y),
                    },
                });
            }
        }

        SkinSegmentation {
            mask,
            skin_pixels,
            scanned_pixels,
            bounds,
            sum_x,
            sum_y,
        }
    }

    /// Whether a segmentation holds enough skin to count as a hand
    pub fn is_hand(&self, segmentation: &SkinSegmentation) -> bool {
        segmentation.skin_pixels > 0
            && segmentation.skin_pixels as f32
                >= segmentation.scanned_pixels as f32 * self.config.min_skin_fraction
    }
}

impl Default for SkinRegionSegmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}

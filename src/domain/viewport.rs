//! The observing surface's size and pixel density

use super::geometry::{Rect, to_device_len};

/// Capabilities of the surface that is scrolled and snapshotted
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSpec {
    /// Visible width in CSS pixels
    pub width: f64,
    /// Visible height in CSS pixels
    pub height: f64,
    /// Device pixels per CSS pixel, at least 1
    pub pixel_ratio: f64,
}

impl ViewportSpec {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: pixel_ratio.max(1.0),
        }
    }

    /// Stride between tile origins once `overlap` is subtracted from each dimension
    pub fn effective_size(&self, overlap: f64) -> (f64, f64) {
        (self.width - overlap, self.height - overlap)
    }

    /// Whether `rect` can be captured with a single snapshot
    pub fn fits(&self, rect: &Rect) -> bool {
        rect.fits_within(self.width, self.height)
    }

    /// Device-pixel size of a region of `rect`'s extent
    pub fn device_size(&self, rect: &Rect) -> (u32, u32) {
        (
            to_device_len(rect.width, self.pixel_ratio),
            to_device_len(rect.height, self.pixel_ratio),
        )
    }
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self::new(1280.0, 800.0, 1.0)
    }
}

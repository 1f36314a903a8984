//! An in-process rendered page that can be scrolled and snapshotted
//!
//! `RenderedPage` holds the whole document as one raster at device-pixel
//! resolution and exposes a viewport over it through the host capability
//! traits. Scrolling clamps to the document bounds the way a browser does.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, anyhow};
use image::RgbaImage;

use crate::capture::{ScrollCapability, SnapshotCapability};
use crate::domain::{Point, ViewportSpec, to_device_len, to_device_px};
use crate::render::bitmap::encode_png;

pub struct RenderedPage {
    raster: RgbaImage,
    viewport: ViewportSpec,
    scroll: Mutex<Point>,
}

impl RenderedPage {
    /// Wrap a full-page raster. The raster is in device pixels.
    pub fn new(raster: RgbaImage, viewport: ViewportSpec) -> Self {
        Self {
            raster,
            viewport,
            scroll: Mutex::new(Point::default()),
        }
    }

    /// Load a full-page raster from an image file
    pub fn open(path: &Path, viewport: ViewportSpec) -> anyhow::Result<Self> {
        let raster = image::open(path)
            .with_context(|| format!("Failed to open page image: {}", path.display()))?
            .to_rgba8();
        log::debug!(
            "Loaded page {}x{} device px from {}",
            raster.width(),
            raster.height(),
            path.display()
        );
        Ok(Self::new(raster, viewport))
    }

    pub fn viewport(&self) -> ViewportSpec {
        self.viewport
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// Document size in CSS pixels
    pub fn document_size(&self) -> (f64, f64) {
        (
            f64::from(self.raster.width()) / self.viewport.pixel_ratio,
            f64::from(self.raster.height()) / self.viewport.pixel_ratio,
        )
    }

    /// Largest scroll offset that still keeps the viewport inside the document
    pub fn max_scroll(&self) -> Point {
        let (width, height) = self.document_size();
        Point::new(
            (width - self.viewport.width).max(0.0),
            (height - self.viewport.height).max(0.0),
        )
    }

    fn current_scroll(&self) -> anyhow::Result<Point> {
        self.scroll
            .lock()
            .map(|guard| *guard)
            .map_err(|_| anyhow!("page scroll state poisoned"))
    }

    /// The viewport's pixels at the current scroll offset
    ///
    /// Areas past the document edge stay transparent.
    pub fn visible(&self) -> anyhow::Result<RgbaImage> {
        let scroll = self.current_scroll()?;
        let ratio = self.viewport.pixel_ratio;
        let width = to_device_len(self.viewport.width, ratio);
        let height = to_device_len(self.viewport.height, ratio);

        let x = to_device_px(scroll.x, ratio).max(0) as u32;
        let y = to_device_px(scroll.y, ratio).max(0) as u32;
        let crop = image::imageops::crop_imm(&self.raster, x, y, width, height).to_image();

        let mut frame = RgbaImage::new(width, height);
        image::imageops::replace(&mut frame, &crop, 0, 0);
        Ok(frame)
    }
}

impl ScrollCapability for RenderedPage {
    fn scroll_to(&self, position: Point) -> anyhow::Result<()> {
        let max = self.max_scroll();
        let clamped = Point::new(position.x.clamp(0.0, max.x), position.y.clamp(0.0, max.y));
        let mut guard = self
            .scroll
            .lock()
            .map_err(|_| anyhow!("page scroll state poisoned"))?;
        *guard = clamped;
        Ok(())
    }

    fn scroll_position(&self) -> anyhow::Result<Point> {
        self.current_scroll()
    }
}

impl SnapshotCapability for RenderedPage {
    async fn capture_visible(&self) -> anyhow::Result<Option<Vec<u8>>> {
        let frame = self.visible()?;
        Ok(Some(encode_png(&frame)?))
    }
}

/// Raster whose pixel colour encodes its own coordinate, unique up to 4096x4096
#[cfg(test)]
pub(crate) fn coordinate_raster(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x / 256) + 16 * (y / 256)) as u8,
            255,
        ])
    })
}

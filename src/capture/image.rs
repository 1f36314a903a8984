//! Decoded raster of one captured tile

use anyhow::Context;
use image::RgbaImage;

use crate::domain::PixelRect;

/// A tile snapshot decoded to RGBA at device-pixel resolution
#[derive(Clone, Debug)]
pub struct TileImage {
    pub rgba: RgbaImage,
}

impl TileImage {
    /// Decode encoded snapshot bytes (PNG or any format `image` recognises)
    pub fn decode(raw: &[u8]) -> anyhow::Result<Self> {
        let rgba = image::load_from_memory(raw)
            .context("Failed to decode tile snapshot")?
            .to_rgba8();
        log::debug!("TileImage decoded: {}x{} pixels", rgba.width(), rgba.height());
        Ok(Self { rgba })
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Pixel bounds of the raster
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let tile = TileImage::decode(&bytes).unwrap();
        assert_eq!(tile.bounds(), PixelRect::new(0, 0, 3, 2));
        assert_eq!(tile.rgba.get_pixel(2, 1), &image::Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(TileImage::decode(b"not an image").is_err());
    }
}

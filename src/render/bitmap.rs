//! Final composed image and its PNG encoding

use std::io;

use image::RgbaImage;

/// Stitched output at device-pixel resolution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputBitmap {
    pub rgba: RgbaImage,
}

impl OutputBitmap {
    /// Fully transparent canvas of the given device-pixel size
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            rgba: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Encode as an 8-bit RGBA PNG
    pub fn encode_png(&self) -> anyhow::Result<Vec<u8>> {
        encode_png(&self.rgba)
    }
}

/// Encode any RGBA raster as an 8-bit PNG
pub fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, image)?;
    Ok(buffer)
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

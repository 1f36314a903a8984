//! Geometric types for capture regions and their device-pixel counterparts
//!
//! Two frames of reference live here: document space in CSS pixels (`Rect`,
//! `Point`, f64) and raster space in device pixels (`PixelRect`, i64).

use std::num::NonZeroU32;

/// A position in CSS pixels (document or viewport space)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`
    pub fn offset_from(&self, other: Point) -> Point {
        Point {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Clamp both coordinates to be non-negative
    pub fn clamp_non_negative(&self) -> Point {
        Point {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }
}

/// Axis-aligned region in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from origin and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle encloses no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert a viewport-relative rectangle to document space given the current scroll
    pub fn to_document(&self, scroll: Point) -> Rect {
        Rect {
            x: self.x + scroll.x,
            y: self.y + scroll.y,
            ..*self
        }
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Whether this rectangle fits inside a viewport of the given size
    ///
    /// Regions that fit are captured with a single snapshot instead of tiles.
    pub fn fits_within(&self, viewport_width: f64, viewport_height: f64) -> bool {
        self.height <= viewport_height && self.width <= viewport_width
    }

    /// Scale to device pixels, rounding each edge independently
    pub fn to_device(&self, pixel_ratio: f64) -> PixelRect {
        PixelRect::new(
            to_device_px(self.x, pixel_ratio),
            to_device_px(self.y, pixel_ratio),
            to_device_px(self.right(), pixel_ratio),
            to_device_px(self.bottom(), pixel_ratio),
        )
    }
}

/// Scale a CSS pixel coordinate to the nearest device pixel
#[inline]
pub fn to_device_px(css: f64, pixel_ratio: f64) -> i64 {
    (css * pixel_ratio).round() as i64
}

/// Scale a CSS pixel length to device pixels, never negative
#[inline]
pub fn to_device_len(css: f64, pixel_ratio: f64) -> u32 {
    (css * pixel_ratio).round().max(0.0) as u32
}

/// Region in device pixels, edges are half-open (`left..right`, `top..bottom`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl PixelRect {
    /// Create a new rectangle from edge coordinates
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin with the given size
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, i64::from(width), i64::from(height))
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: PixelRect) -> Option<PixelRect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(PixelRect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Translate the rectangle by the given offset
    pub fn translate(&self, x: i64, y: i64) -> PixelRect {
        PixelRect {
            left: self.left + x,
            top: self.top + y,
            right: self.right + x,
            bottom: self.bottom + y,
        }
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Convert to non-zero dimensions, `None` for empty or inverted rectangles
    pub fn dimensions(self) -> Option<RectDimension> {
        if self.width() <= 0 || self.height() <= 0 {
            return None;
        }
        let width = NonZeroU32::new(u32::try_from(self.width()).ok()?)?;
        let height = NonZeroU32::new(u32::try_from(self.height()).ok()?)?;
        Some(RectDimension { width, height })
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &PixelRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }
}

/// Non-zero dimensions of a rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectDimension {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl RectDimension {
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

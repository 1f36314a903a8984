//! Turning captured tiles into one bitmap
//!
//! This module contains:
//! - Crop and placement math shared by every capture path
//! - The stitcher that decodes and composites tiles
//! - The output bitmap and its PNG encoding

pub mod bitmap;
pub mod placement;
pub mod stitch;

pub use bitmap::OutputBitmap;
pub use stitch::{StitchReport, Stitched, stitch};

//! Capture document regions larger than one viewport
//!
//! A region is planned into overlapping viewport-sized tiles, each tile is
//! scrolled to and snapshotted through host capabilities, and the snapshots
//! are stitched into a single device-pixel bitmap.

pub mod capture;
pub mod config;
pub mod domain;
pub mod page;
pub mod render;
pub mod screenshot;

pub use capture::{
    CaptureOrchestrator, NoSuppression, ScrollCapability, SnapshotCapability, VisualSuppression,
};
pub use config::{SaveLocation, StitchConfig};
pub use domain::{CaptureResult, Point, Rect, TileDescriptor, ViewportSpec};
pub use page::RenderedPage;
pub use render::{OutputBitmap, StitchReport, Stitched};
pub use screenshot::{CaptureMode, RegionScreenshot, SavedScreenshot};

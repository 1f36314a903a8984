//! Tile planning and viewport capture
//!
//! This module consolidates:
//! - Tile planning over a document region (plan.rs)
//! - Host capability traits (host.rs)
//! - The serial scroll/settle/snapshot loop (orchestrator.rs)
//! - Decoded tile rasters (image.rs)

pub mod host;
pub mod image;
pub mod orchestrator;
pub mod plan;

pub use host::{NoSuppression, ScrollCapability, SnapshotCapability, VisualSuppression};
pub use orchestrator::CaptureOrchestrator;
pub use plan::{plan, plan_single};

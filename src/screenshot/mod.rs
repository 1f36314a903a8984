//! End-to-end region screenshots
//!
//! A region that fits the viewport is scrolled into view and captured once;
//! anything larger is planned into tiles. Both paths go through the same
//! orchestrator and stitcher, the single shot being a 1x1 grid without
//! overlap.

pub mod persist;

use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::capture::{
    CaptureOrchestrator, ScrollCapability, SnapshotCapability, VisualSuppression, plan,
    plan_single,
};
use crate::config::StitchConfig;
use crate::domain::{Rect, ViewportSpec};
use crate::render::{StitchReport, Stitched, stitch};
use persist::{PersistCapability, save_with_fallback, screenshot_filename};

/// How a region is going to be captured
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureMode {
    /// Region fits the viewport: one snapshot
    SingleShot,
    /// Region is larger than the viewport in at least one dimension
    Tiled,
}

impl CaptureMode {
    pub fn for_region(target: &Rect, viewport: &ViewportSpec) -> Self {
        if viewport.fits(target) {
            CaptureMode::SingleShot
        } else {
            CaptureMode::Tiled
        }
    }
}

/// A screenshot written to storage
#[derive(Clone, Debug)]
pub struct SavedScreenshot {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub report: StitchReport,
}

/// Captures document regions with a fixed configuration
#[derive(Clone, Debug, Default)]
pub struct RegionScreenshot {
    config: StitchConfig,
}

impl RegionScreenshot {
    pub fn new(config: StitchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    /// Capture `target` (document space, CSS px) into one bitmap
    ///
    /// The viewport and host UI are restored before stitching starts. Fails
    /// when the host delivered no tile at all.
    pub async fn capture<S, C, V>(
        &self,
        target: &Rect,
        viewport: &ViewportSpec,
        scroll: &S,
        snapshot: &C,
        suppression: &V,
    ) -> anyhow::Result<Stitched>
    where
        S: ScrollCapability,
        C: SnapshotCapability,
        V: VisualSuppression,
    {
        let mode = CaptureMode::for_region(target, viewport);
        let (tiles, orchestrator) = match mode {
            CaptureMode::SingleShot => (
                vec![plan_single(target, viewport)?],
                CaptureOrchestrator::new(self.config.single_shot_settle_delay()),
            ),
            CaptureMode::Tiled => (
                plan(target, viewport, self.config.overlap_px)?,
                CaptureOrchestrator::new(self.config.settle_delay()),
            ),
        };
        log::info!(
            "Capturing {}x{} at ({}, {}) as {mode:?} with {} tile(s)",
            target.width,
            target.height,
            target.x,
            target.y,
            tiles.len()
        );

        let results = orchestrator
            .capture(&tiles, scroll, snapshot, suppression)
            .await?;
        if results.is_empty() {
            bail!("No tile was captured out of {} planned", tiles.len());
        }
        stitch(results, tiles.len(), target, viewport).await
    }

    /// Capture `target`, encode it as PNG and save it
    ///
    /// `persist` is tried first; if it fails the file is written straight
    /// into `fallback_dir`.
    #[allow(clippy::too_many_arguments)]
    pub async fn capture_and_save<S, C, V, P>(
        &self,
        target: &Rect,
        viewport: &ViewportSpec,
        scroll: &S,
        snapshot: &C,
        suppression: &V,
        persist: &P,
        fallback_dir: &Path,
    ) -> anyhow::Result<SavedScreenshot>
    where
        S: ScrollCapability,
        C: SnapshotCapability,
        V: VisualSuppression,
        P: PersistCapability,
    {
        let Stitched { bitmap, report } = self
            .capture(target, viewport, scroll, snapshot, suppression)
            .await?;
        let png = bitmap.encode_png()?;
        let name = screenshot_filename(&self.config.filename_prefix);
        let path = save_with_fallback(persist, fallback_dir, &png, &name).await?;

        Ok(SavedScreenshot {
            path,
            width: bitmap.width(),
            height: bitmap.height(),
            report,
        })
    }
}

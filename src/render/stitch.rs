//! Compose captured tiles into one output bitmap
//!
//! Each tile is decoded on its own blocking task; the stitcher waits for all of
//! them before drawing anything. Drawing happens in plan order onto a canvas
//! of `target × pixel_ratio` device pixels. Tiles that fail to decode or whose
//! crop misses their raster leave a transparent gap and are counted in the
//! `StitchReport`, never turned into an error.

use anyhow::bail;
use futures::stream::{FuturesUnordered, StreamExt};
use image::imageops;

use super::bitmap::OutputBitmap;
use super::placement::place;
use crate::capture::image::TileImage;
use crate::domain::{CaptureResult, PixelRect, Point, Rect, TileDescriptor, ViewportSpec};

/// A tile whose snapshot decoded successfully
#[derive(Clone, Debug)]
pub struct DecodedTile {
    pub tile: TileDescriptor,
    pub actual_scroll: Point,
    pub image: TileImage,
}

/// What happened to each tile during stitching
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StitchReport {
    /// Tiles in the plan
    pub expected: usize,
    /// Tiles the orchestrator delivered
    pub captured: usize,
    /// Tiles drawn onto the canvas, clipped ones included
    pub drawn: usize,
    /// Drawn tiles whose crop was shrunk to fit their raster
    pub clipped: usize,
    /// Decoded tiles with nothing to draw
    pub skipped: usize,
    pub decode_failures: usize,
}

impl StitchReport {
    /// Every planned tile was drawn without clipping
    pub fn is_complete(&self) -> bool {
        self.drawn == self.expected && self.clipped == 0
    }
}

/// Stitched bitmap together with its diagnostics
#[derive(Clone, Debug)]
pub struct Stitched {
    pub bitmap: OutputBitmap,
    pub report: StitchReport,
}

/// Decode every capture concurrently, then composite them
///
/// `expected` is the number of tiles in the plan the results came from.
pub async fn stitch(
    results: Vec<CaptureResult>,
    expected: usize,
    target: &Rect,
    viewport: &ViewportSpec,
) -> anyhow::Result<Stitched> {
    let captured = results.len();

    let mut decodes: FuturesUnordered<_> = results
        .into_iter()
        .map(|result| {
            tokio::task::spawn_blocking(move || {
                let CaptureResult {
                    tile,
                    raw,
                    actual_scroll,
                } = result;
                match TileImage::decode(&raw) {
                    Ok(image) => Some(DecodedTile {
                        tile,
                        actual_scroll,
                        image,
                    }),
                    Err(err) => {
                        log::warn!("Tile ({}, {}) skipped: {err:#}", tile.row, tile.col);
                        None
                    }
                }
            })
        })
        .collect();

    // Join barrier: every decode finishes, successful or not, before drawing
    let mut decoded = Vec::with_capacity(captured);
    let mut decode_failures = 0;
    while let Some(joined) = decodes.next().await {
        match joined {
            Ok(Some(tile)) => decoded.push(tile),
            Ok(None) => decode_failures += 1,
            Err(err) => {
                log::warn!("Tile decode task failed: {err}");
                decode_failures += 1;
            }
        }
    }

    let mut stitched = composite(decoded, expected, target, viewport)?;
    stitched.report.captured = captured;
    stitched.report.decode_failures = decode_failures;

    let report = &stitched.report;
    if report.is_complete() {
        log::info!(
            "Stitched {} tiles into {}x{}",
            report.drawn,
            stitched.bitmap.width(),
            stitched.bitmap.height()
        );
    } else {
        log::warn!(
            "Stitched {}x{} with gaps: {}/{} tiles drawn ({} clipped, {} skipped, {} undecodable, {} not captured)",
            stitched.bitmap.width(),
            stitched.bitmap.height(),
            report.drawn,
            report.expected,
            report.clipped,
            report.skipped,
            report.decode_failures,
            report.expected.saturating_sub(report.captured)
        );
    }
    Ok(stitched)
}

/// Draw decoded tiles onto a fresh canvas in plan order
///
/// `captured` in the returned report is set to the number of tiles given.
pub fn composite(
    mut tiles: Vec<DecodedTile>,
    expected: usize,
    target: &Rect,
    viewport: &ViewportSpec,
) -> anyhow::Result<Stitched> {
    let (width, height) = viewport.device_size(target);
    if width == 0 || height == 0 {
        bail!(
            "target region {}x{} scales to an empty {width}x{height} bitmap",
            target.width,
            target.height
        );
    }

    let mut bitmap = OutputBitmap::blank(width, height);
    let output_bounds = PixelRect::from_size(width, height);
    let mut report = StitchReport {
        expected,
        captured: tiles.len(),
        ..Default::default()
    };

    tiles.sort_by_key(|decoded| decoded.tile.index());
    for decoded in &tiles {
        let tile = &decoded.tile;
        let Some(placement) = place(
            tile,
            decoded.actual_scroll,
            target,
            viewport.pixel_ratio,
            decoded.image.bounds(),
            output_bounds,
        ) else {
            log::warn!(
                "Tile ({}, {}) crop falls outside its {}x{} snapshot, skipped",
                tile.row,
                tile.col,
                decoded.image.width(),
                decoded.image.height()
            );
            report.skipped += 1;
            continue;
        };

        if placement.clipped {
            log::warn!(
                "Tile ({}, {}) crop clipped to its {}x{} snapshot",
                tile.row,
                tile.col,
                decoded.image.width(),
                decoded.image.height()
            );
            report.clipped += 1;
        }

        let source = placement.source;
        let patch = imageops::crop_imm(
            &decoded.image.rgba,
            source.left as u32,
            source.top as u32,
            source.width() as u32,
            source.height() as u32,
        )
        .to_image();
        imageops::replace(
            &mut bitmap.rgba,
            &patch,
            placement.dest.left,
            placement.dest.top,
        );
        report.drawn += 1;
    }

    Ok(Stitched { bitmap, report })
}

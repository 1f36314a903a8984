//! Tile planning: partition a document region into viewport-sized captures
//!
//! Tiles advance by the effective viewport size (viewport minus overlap). The
//! last row and column are pulled back so their far edge lines up with the
//! target's far edge, which keeps stride rounding from truncating the region.

use anyhow::bail;

use crate::domain::{Point, Rect, TileDescriptor, ViewportSpec};

/// Reject regions and viewports that cannot be tiled
fn check_geometry(target: &Rect, viewport: &ViewportSpec) -> anyhow::Result<()> {
    let values = [target.x, target.y, target.width, target.height];
    if values.iter().any(|v| !v.is_finite()) {
        bail!(
            "target region {}x{} at ({}, {}) is not finite",
            target.width,
            target.height,
            target.x,
            target.y
        );
    }
    let values = [viewport.width, viewport.height, viewport.pixel_ratio];
    if values.iter().any(|v| !v.is_finite()) {
        bail!(
            "viewport {}x{} at ratio {} is not finite",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
    }
    if target.is_empty() {
        bail!(
            "target region {}x{} has no area",
            target.width,
            target.height
        );
    }
    Ok(())
}

/// Plan the ordered, row-major grid of tiles covering `target`
pub fn plan(
    target: &Rect,
    viewport: &ViewportSpec,
    overlap: f64,
) -> anyhow::Result<Vec<TileDescriptor>> {
    check_geometry(target, viewport)?;
    if overlap.is_nan() || overlap < 0.0 {
        bail!("overlap must be non-negative, got {overlap}");
    }
    let (effective_width, effective_height) = viewport.effective_size(overlap);
    if effective_width <= 0.0 || effective_height <= 0.0 {
        bail!(
            "overlap {overlap} leaves no stride in a {}x{} viewport",
            viewport.width,
            viewport.height
        );
    }

    let cols = (target.width / effective_width).ceil() as u32;
    let rows = (target.height / effective_height).ceil() as u32;
    let half_overlap = overlap / 2.0;

    let mut tiles = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            let is_last_row = row == rows - 1;
            let is_last_col = col == cols - 1;

            let mut scroll_x = target.x + f64::from(col) * effective_width;
            if col > 0 {
                scroll_x -= half_overlap;
            }
            let mut scroll_y = target.y + f64::from(row) * effective_height;
            if row > 0 {
                scroll_y -= half_overlap;
            }

            if is_last_row {
                scroll_y = (target.bottom() - effective_height).max(0.0);
            }
            if is_last_col {
                scroll_x = (target.right() - effective_width).max(0.0);
            }

            tiles.push(TileDescriptor {
                row,
                col,
                scroll_target: Point::new(scroll_x, scroll_y).clamp_non_negative(),
                effective_width,
                effective_height,
                is_last_row,
                is_last_col,
                total_rows: rows,
                total_cols: cols,
            });
        }
    }

    log::debug!(
        "Planned {rows}x{cols} tiles (stride {effective_width}x{effective_height}) for {}x{} at ({}, {})",
        target.width,
        target.height,
        target.x,
        target.y
    );
    Ok(tiles)
}

/// Plan the single capture used when `target` fits in one viewport
///
/// The scroll target centres the region in the viewport. Stride equals the
/// viewport so the stitcher treats it as a zero-overlap 1x1 grid.
pub fn plan_single(target: &Rect, viewport: &ViewportSpec) -> anyhow::Result<TileDescriptor> {
    check_geometry(target, viewport)?;
    if !viewport.fits(target) {
        bail!(
            "target region {}x{} does not fit a {}x{} viewport",
            target.width,
            target.height,
            viewport.width,
            viewport.height
        );
    }

    let scroll_target = Point::new(
        target.x - (viewport.width - target.width) / 2.0,
        target.y - (viewport.height - target.height) / 2.0,
    )
    .clamp_non_negative();

    Ok(TileDescriptor {
        row: 0,
        col: 0,
        scroll_target,
        effective_width: viewport.width,
        effective_height: viewport.height,
        is_last_row: true,
        is_last_col: true,
        total_rows: 1,
        total_cols: 1,
    })
}

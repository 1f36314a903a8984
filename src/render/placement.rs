//! Per-tile crop and placement math shared by the tiled and single-shot paths
//!
//! Four frames are involved: document space (CSS px), the tile's viewport
//! (CSS px, offset by the actual scroll), the tile's raster (device px) and
//! the output canvas (device px, origin at the target's top-left).
//!
//! Every tile owns the slice of the target starting at `index * stride`. The
//! last row and column own everything up to the target's far edge, so the
//! slices tile the output exactly whether or not the stride divides the
//! target size.

use crate::domain::{PixelRect, Point, Rect, TileDescriptor, to_device_px};

/// Where one tile's pixels come from and where they land
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePlacement {
    /// Crop inside the tile raster (device px)
    pub source: PixelRect,
    /// Same-sized region of the output canvas (device px)
    pub dest: PixelRect,
    /// The crop had to be shrunk to fit the raster
    pub clipped: bool,
}

/// Span `[start, end)` along one axis of the target that a tile is responsible for
///
/// Spans are in CSS px relative to the target origin. The last tile is
/// anchored to the far edge: it never starts before `extent - stride`.
pub fn responsibility_span(index: u32, is_last: bool, stride: f64, extent: f64) -> (f64, f64) {
    let start = f64::from(index) * stride;
    if is_last {
        (start.max(extent - stride).clamp(0.0, extent), extent)
    } else {
        (start.min(extent), (f64::from(index + 1) * stride).min(extent))
    }
}

fn spans(tile: &TileDescriptor, target: &Rect) -> ((f64, f64), (f64, f64)) {
    let horizontal = responsibility_span(
        tile.col,
        tile.is_last_col,
        tile.effective_width,
        target.width,
    );
    let vertical = responsibility_span(
        tile.row,
        tile.is_last_row,
        tile.effective_height,
        target.height,
    );
    (horizontal, vertical)
}

/// Sub-rectangle of the target a tile contributes, relative to the target origin
pub fn destination(tile: &TileDescriptor, target: &Rect) -> Rect {
    let ((left, right), (top, bottom)) = spans(tile, target);
    Rect::new(left, top, right - left, bottom - top)
}

/// Device-pixel region of the output canvas a tile contributes
///
/// Edges are rounded from the span ends directly so neighbouring tiles share
/// the same device-pixel boundary.
pub fn device_destination(tile: &TileDescriptor, target: &Rect, pixel_ratio: f64) -> PixelRect {
    let ((left, right), (top, bottom)) = spans(tile, target);
    PixelRect::new(
        to_device_px(left, pixel_ratio),
        to_device_px(top, pixel_ratio),
        to_device_px(right, pixel_ratio),
        to_device_px(bottom, pixel_ratio),
    )
}

/// Compute the crop and canvas placement for a tile captured at `actual_scroll`
///
/// Returns `None` when nothing of the tile's slice is inside both the output
/// canvas and the tile raster.
pub fn place(
    tile: &TileDescriptor,
    actual_scroll: Point,
    target: &Rect,
    pixel_ratio: f64,
    image_bounds: PixelRect,
    output_bounds: PixelRect,
) -> Option<TilePlacement> {
    let dest = device_destination(tile, target, pixel_ratio).intersect(output_bounds)?;

    // Target origin inside this tile's raster
    let origin_in_tile = target.origin().offset_from(actual_scroll);
    let source = dest.translate(
        to_device_px(origin_in_tile.x, pixel_ratio),
        to_device_px(origin_in_tile.y, pixel_ratio),
    );

    let visible = source.intersect(image_bounds)?;
    let dest = PixelRect::new(
        dest.left + (visible.left - source.left),
        dest.top + (visible.top - source.top),
        dest.right - (source.right - visible.right),
        dest.bottom - (source.bottom - visible.bottom),
    );

    Some(TilePlacement {
        source: visible,
        dest,
        clipped: visible != source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::plan::{plan, plan_single};
    use crate::domain::ViewportSpec;

    fn device_destinations(target: &Rect, viewport: &ViewportSpec, overlap: f64) -> Vec<PixelRect> {
        plan(target, viewport, overlap)
            .unwrap()
            .iter()
            .map(|tile| device_destination(tile, target, viewport.pixel_ratio))
            .filter(|dest| dest.dimensions().is_some())
            .collect()
    }

    #[test]
    fn test_destinations_tile_output_exactly() {
        let cases = [
            (Rect::new(0.0, 0.0, 2000.0, 3000.0), ViewportSpec::new(1000.0, 800.0, 1.0)),
            (Rect::new(17.0, 230.0, 1901.0, 751.0), ViewportSpec::new(1000.0, 800.0, 1.0)),
            (Rect::new(0.0, 0.0, 1900.0, 1500.0), ViewportSpec::new(1000.0, 800.0, 2.0)),
            (Rect::new(3.5, 8.25, 2345.75, 4321.5), ViewportSpec::new(1280.0, 720.0, 1.25)),
            (Rect::new(0.0, 0.0, 300.0, 5000.0), ViewportSpec::new(390.0, 844.0, 3.0)),
        ];
        for (target, viewport) in cases {
            let (width, height) = viewport.device_size(&target);
            let output = PixelRect::from_size(width, height);
            let dests = device_destinations(&target, &viewport, 50.0);

            let area: i64 = dests.iter().map(|d| d.width() * d.height()).sum();
            assert_eq!(area, i64::from(width) * i64::from(height), "{target:?}");
            for (i, a) in dests.iter().enumerate() {
                assert!(output.contains(a), "{a:?} outside {output:?}");
                for b in &dests[i + 1..] {
                    assert!(a.intersect(*b).is_none(), "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_last_tile_anchored_to_far_edge() {
        let target = Rect::new(0.0, 0.0, 2000.0, 3000.0);
        let tiles = plan(&target, &ViewportSpec::new(1000.0, 800.0, 1.0), 50.0).unwrap();
        let last = tiles.iter().find(|t| t.is_last()).unwrap();
        let dest = destination(last, &target);
        assert_eq!(dest.right(), 2000.0);
        assert_eq!(dest.bottom(), 3000.0);
        assert_eq!((dest.x, dest.y), (1900.0, 2250.0));
    }

    #[test]
    fn test_place_uses_actual_scroll() {
        let target = Rect::new(100.0, 200.0, 2000.0, 3000.0);
        let viewport = ViewportSpec::new(1000.0, 800.0, 2.0);
        let tiles = plan(&target, &viewport, 50.0).unwrap();
        let image = PixelRect::from_size(2000, 1600);
        let output = PixelRect::from_size(4000, 6000);

        // Interior tile at its planned scroll: slice starts half an overlap into the raster
        let tile = tiles.iter().find(|t| t.row == 1 && t.col == 1).unwrap();
        let placed = place(tile, tile.scroll_target, &target, 2.0, image, output).unwrap();
        assert_eq!(placed.dest, PixelRect::new(1900, 1500, 3800, 3000));
        assert_eq!(placed.source, PixelRect::new(50, 50, 1950, 1550));
        assert!(!placed.clipped);

        // Same tile, but the host clamped the scroll 20px short vertically
        let clamped = Point::new(tile.scroll_target.x, tile.scroll_target.y - 20.0);
        let placed = place(tile, clamped, &target, 2.0, image, output).unwrap();
        assert_eq!(placed.source, PixelRect::new(50, 90, 1950, 1590));
        assert!(!placed.clipped);
        assert_eq!(placed.dest, PixelRect::new(1900, 1500, 3800, 3000));
    }

    #[test]
    fn test_place_clips_to_raster() {
        let target = Rect::new(0.0, 0.0, 500.0, 400.0);
        let viewport = ViewportSpec::new(1000.0, 800.0, 1.0);
        let tile = plan_single(&target, &viewport).unwrap();
        let output = PixelRect::from_size(500, 400);

        // Raster narrower than expected: only the first 300 columns exist
        let placed = place(&tile, Point::new(0.0, 0.0), &target, 1.0, PixelRect::from_size(300, 800), output)
            .unwrap();
        assert!(placed.clipped);
        assert_eq!(placed.source, PixelRect::new(0, 0, 300, 400));
        assert_eq!(placed.dest, PixelRect::new(0, 0, 300, 400));

        // Raster entirely off to the side of the slice
        let placed = place(&tile, Point::new(900.0, 0.0), &target, 1.0, PixelRect::from_size(300, 800), output);
        assert!(placed.is_none());
    }

    #[test]
    fn test_single_shot_crop_matches_centred_scroll() {
        let target = Rect::new(300.0, 2000.0, 400.0, 200.0);
        let viewport = ViewportSpec::new(1000.0, 800.0, 2.0);
        let tile = plan_single(&target, &viewport).unwrap();
        let placed = place(
            &tile,
            tile.scroll_target,
            &target,
            2.0,
            PixelRect::from_size(2000, 1600),
            PixelRect::from_size(800, 400),
        )
        .unwrap();
        assert_eq!(placed.dest, PixelRect::new(0, 0, 800, 400));
        assert_eq!(placed.source, PixelRect::new(600, 600, 1400, 1000));
    }
}

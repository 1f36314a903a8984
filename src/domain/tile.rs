//! Planned capture steps and their raw results

use super::geometry::Point;

/// One planned capture step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileDescriptor {
    /// Zero-based row index
    pub row: u32,
    /// Zero-based column index
    pub col: u32,
    /// Requested scroll offset, never negative
    pub scroll_target: Point,
    /// Horizontal stride between tile origins (CSS px)
    pub effective_width: f64,
    /// Vertical stride between tile origins (CSS px)
    pub effective_height: f64,
    pub is_last_row: bool,
    pub is_last_col: bool,
    pub total_rows: u32,
    pub total_cols: u32,
}

impl TileDescriptor {
    /// Position in row-major capture order
    pub fn index(&self) -> usize {
        self.row as usize * self.total_cols as usize + self.col as usize
    }

    pub fn is_first(&self) -> bool {
        self.row == 0 && self.col == 0
    }

    pub fn is_last(&self) -> bool {
        self.is_last_row && self.is_last_col
    }
}

/// Raw snapshot plus the planning context used to take it
///
/// `actual_scroll` is what the surface reported after settling and is the
/// offset every later crop is computed from, not `tile.scroll_target`.
#[derive(Clone, Debug)]
pub struct CaptureResult {
    pub tile: TileDescriptor,
    /// Encoded image bytes as returned by the snapshot capability
    pub raw: Vec<u8>,
    pub actual_scroll: Point,
}

impl CaptureResult {
    pub fn new(tile: TileDescriptor, raw: Vec<u8>, actual_scroll: Point) -> Self {
        Self {
            tile,
            raw,
            actual_scroll,
        }
    }
}

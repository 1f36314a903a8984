//! Pure domain types with minimal dependencies
//!
//! This module contains the value types shared by planning, capture and
//! stitching. Nothing here performs I/O.

pub mod geometry;
pub mod tile;
pub mod viewport;

pub use geometry::*;
pub use tile::*;
pub use viewport::*;

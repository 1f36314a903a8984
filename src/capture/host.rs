//! Capabilities the capture engine borrows from its host environment
//!
//! The host owns the viewport. These traits are the only way the engine
//! scrolls it, snapshots it or hides transient UI while it works. All methods
//! take `&self`; implementations that mutate state use interior mutability,
//! which lets one object serve as both scroll and snapshot capability.

use crate::domain::Point;

/// Moves the viewport over the document
pub trait ScrollCapability {
    /// Best-effort scroll. The host may clamp to the document bounds.
    fn scroll_to(&self, position: Point) -> anyhow::Result<()>;

    /// Offset the viewport currently shows
    fn scroll_position(&self) -> anyhow::Result<Point>;
}

/// Grabs the currently visible viewport as encoded image bytes
#[allow(async_fn_in_trait)]
pub trait SnapshotCapability {
    /// `Ok(None)` means the host produced no data for this call. Both that
    /// and `Err` (throttled, capture refused) drop the tile; the capture
    /// carries on with the next one.
    async fn capture_visible(&self) -> anyhow::Result<Option<Vec<u8>>>;
}

/// Host UI that must be hidden while snapshots are taken
///
/// The engine pairs every `suppress` with exactly one `restore`.
pub trait VisualSuppression {
    fn suppress(&self);
    fn restore(&self);
}

/// Suppression for hosts without transient UI
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSuppression;

impl VisualSuppression for NoSuppression {
    fn suppress(&self) {}
    fn restore(&self) {}
}

//! Sequential scroll, settle and snapshot loop over a tile plan
//!
//! The viewport is one shared resource, so tiles are captured strictly in plan
//! order and never concurrently. A `CaptureSession` guard records the scroll
//! position up front and puts it back, together with any suppressed host UI,
//! on every exit path including cancellation of the capture future.

use std::time::Duration;

use anyhow::Context;

use super::host::{ScrollCapability, SnapshotCapability, VisualSuppression};
use crate::domain::{CaptureResult, Point, TileDescriptor};

/// Per-tile settle delay used when none is configured
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Exclusive hold on the viewport for the duration of a capture
struct CaptureSession<'a, S: ScrollCapability, V: VisualSuppression> {
    scroll: &'a S,
    suppression: &'a V,
    original: Point,
    released: bool,
}

impl<'a, S: ScrollCapability, V: VisualSuppression> CaptureSession<'a, S, V> {
    fn begin(scroll: &'a S, suppression: &'a V) -> anyhow::Result<Self> {
        let original = scroll
            .scroll_position()
            .context("Failed to read scroll position before capture")?;
        suppression.suppress();
        Ok(Self {
            scroll,
            suppression,
            original,
            released: false,
        })
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.scroll.scroll_to(self.original) {
            log::error!(
                "Failed to restore scroll position ({}, {}): {err:?}",
                self.original.x,
                self.original.y
            );
        }
        self.suppression.restore();
    }
}

impl<S: ScrollCapability, V: VisualSuppression> Drop for CaptureSession<'_, S, V> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Drives the capture of planned tiles through host capabilities
#[derive(Clone, Copy, Debug)]
pub struct CaptureOrchestrator {
    settle_delay: Duration,
}

impl Default for CaptureOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl CaptureOrchestrator {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Capture every tile in `tiles`, in order
    ///
    /// Tiles whose snapshot fails or returns no data are left out of the
    /// result. Scroll errors abort the loop and are returned after the
    /// viewport has been restored.
    pub async fn capture<S, C, V>(
        &self,
        tiles: &[TileDescriptor],
        scroll: &S,
        snapshot: &C,
        suppression: &V,
    ) -> anyhow::Result<Vec<CaptureResult>>
    where
        S: ScrollCapability,
        C: SnapshotCapability,
        V: VisualSuppression,
    {
        let mut session = CaptureSession::begin(scroll, suppression)?;
        let outcome = self.capture_tiles(tiles, scroll, snapshot).await;
        session.release();

        match &outcome {
            Ok(results) => log::info!(
                "Captured {}/{} tiles, viewport restored",
                results.len(),
                tiles.len()
            ),
            Err(err) => log::error!("Capture aborted, viewport restored: {err:?}"),
        }
        outcome
    }

    async fn capture_tiles<S, C>(
        &self,
        tiles: &[TileDescriptor],
        scroll: &S,
        snapshot: &C,
    ) -> anyhow::Result<Vec<CaptureResult>>
    where
        S: ScrollCapability,
        C: SnapshotCapability,
    {
        let mut results = Vec::with_capacity(tiles.len());
        for tile in tiles {
            scroll.scroll_to(tile.scroll_target).with_context(|| {
                format!("Failed to scroll to tile ({}, {})", tile.row, tile.col)
            })?;

            tokio::time::sleep(self.settle_delay).await;

            let raw = match snapshot.capture_visible().await {
                Ok(raw) => raw,
                Err(err) => {
                    log::warn!(
                        "Snapshot failed for tile ({}, {}), dropped: {err:#}",
                        tile.row,
                        tile.col
                    );
                    continue;
                }
            };
            let actual_scroll = scroll.scroll_position().with_context(|| {
                format!("Failed to read scroll position for tile ({}, {})", tile.row, tile.col)
            })?;

            match raw {
                Some(raw) if !raw.is_empty() => {
                    log::debug!(
                        "Tile ({}, {}) captured at ({}, {}), target ({}, {})",
                        tile.row,
                        tile.col,
                        actual_scroll.x,
                        actual_scroll.y,
                        tile.scroll_target.x,
                        tile.scroll_target.y
                    );
                    results.push(CaptureResult::new(*tile, raw, actual_scroll));
                }
                _ => log::warn!("Tile ({}, {}) returned no image data, dropped", tile.row, tile.col),
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::plan::plan;
    use crate::domain::{Rect, ViewportSpec};
    use std::cell::{Cell, RefCell};

    /// Host that records calls and clamps scrolling to a document size
    struct FakeHost {
        position: Cell<Point>,
        max_scroll: Point,
        scrolls: RefCell<Vec<Point>>,
        snapshots: Cell<usize>,
        empty_at: Option<usize>,
        fail_at: Option<usize>,
        fail_scroll_at: Option<usize>,
        suppressed: Cell<u32>,
        restored: Cell<u32>,
    }

    impl FakeHost {
        fn new(max_scroll: Point) -> Self {
            Self {
                position: Cell::new(Point::new(12.0, 34.0)),
                max_scroll,
                scrolls: RefCell::new(Vec::new()),
                snapshots: Cell::new(0),
                empty_at: None,
                fail_at: None,
                fail_scroll_at: None,
                suppressed: Cell::new(0),
                restored: Cell::new(0),
            }
        }
    }

    impl ScrollCapability for FakeHost {
        fn scroll_to(&self, position: Point) -> anyhow::Result<()> {
            let n = self.scrolls.borrow().len();
            self.scrolls.borrow_mut().push(position);
            if self.fail_scroll_at == Some(n) {
                anyhow::bail!("tab closed");
            }
            self.position.set(Point::new(
                position.x.min(self.max_scroll.x),
                position.y.min(self.max_scroll.y),
            ));
            Ok(())
        }

        fn scroll_position(&self) -> anyhow::Result<Point> {
            Ok(self.position.get())
        }
    }

    impl SnapshotCapability for FakeHost {
        async fn capture_visible(&self) -> anyhow::Result<Option<Vec<u8>>> {
            let n = self.snapshots.get();
            self.snapshots.set(n + 1);
            if self.fail_at == Some(n) {
                anyhow::bail!("capture quota exceeded");
            }
            if self.empty_at == Some(n) {
                return Ok(None);
            }
            Ok(Some(vec![n as u8]))
        }
    }

    impl VisualSuppression for FakeHost {
        fn suppress(&self) {
            self.suppressed.set(self.suppressed.get() + 1);
        }

        fn restore(&self) {
            self.restored.set(self.restored.get() + 1);
        }
    }

    fn tiles() -> Vec<TileDescriptor> {
        let target = Rect::new(0.0, 0.0, 2000.0, 3000.0);
        plan(&target, &ViewportSpec::new(1000.0, 800.0, 1.0), 50.0).unwrap()
    }

    #[tokio::test]
    async fn test_capture_in_plan_order_and_restore() {
        let host = FakeHost::new(Point::new(5000.0, 5000.0));
        let tiles = tiles();
        let orchestrator = CaptureOrchestrator::new(Duration::ZERO);

        let results = orchestrator
            .capture(&tiles, &host, &host, &host)
            .await
            .unwrap();

        assert_eq!(results.len(), 12);
        for (result, tile) in results.iter().zip(&tiles) {
            assert_eq!(result.tile, *tile);
        }
        let scrolls = host.scrolls.borrow();
        assert_eq!(scrolls.len(), 13);
        assert_eq!(*scrolls.last().unwrap(), Point::new(12.0, 34.0));
        assert_eq!(host.position.get(), Point::new(12.0, 34.0));
        assert_eq!((host.suppressed.get(), host.restored.get()), (1, 1));
    }

    #[tokio::test]
    async fn test_actual_scroll_is_recorded() {
        // Document only scrolls to y = 2000, the last row asked for 2250
        let host = FakeHost::new(Point::new(5000.0, 2000.0));
        let results = CaptureOrchestrator::new(Duration::ZERO)
            .capture(&tiles(), &host, &host, &host)
            .await
            .unwrap();

        let last = results.iter().find(|r| r.tile.is_last()).unwrap();
        assert_eq!(last.tile.scroll_target.y, 2250.0);
        assert_eq!(last.actual_scroll.y, 2000.0);
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_dropped() {
        let mut host = FakeHost::new(Point::new(5000.0, 5000.0));
        host.empty_at = Some(4);
        let results = CaptureOrchestrator::new(Duration::ZERO)
            .capture(&tiles(), &host, &host, &host)
            .await
            .unwrap();

        assert_eq!(results.len(), 11);
        assert!(results.iter().all(|r| r.tile.index() != 4));
        assert_eq!(host.snapshots.get(), 12);
    }

    #[tokio::test]
    async fn test_failed_snapshot_is_dropped_and_capture_continues() {
        let mut host = FakeHost::new(Point::new(5000.0, 5000.0));
        host.fail_at = Some(2);
        let results = CaptureOrchestrator::new(Duration::ZERO)
            .capture(&tiles(), &host, &host, &host)
            .await
            .unwrap();

        assert_eq!(results.len(), 11);
        assert!(results.iter().all(|r| r.tile.index() != 2));
        assert_eq!(host.snapshots.get(), 12);
        assert_eq!(host.position.get(), Point::new(12.0, 34.0));
        assert_eq!((host.suppressed.get(), host.restored.get()), (1, 1));
    }

    #[tokio::test]
    async fn test_scroll_failure_aborts_and_restores_once() {
        let mut host = FakeHost::new(Point::new(5000.0, 5000.0));
        host.fail_scroll_at = Some(3);
        let err = CaptureOrchestrator::new(Duration::ZERO)
            .capture(&tiles(), &host, &host, &host)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("tab closed"));
        assert_eq!(host.snapshots.get(), 3);
        // Three tiles, the failed scroll, then the restore
        assert_eq!(host.scrolls.borrow().len(), 5);
        assert_eq!(host.position.get(), Point::new(12.0, 34.0));
        assert_eq!((host.suppressed.get(), host.restored.get()), (1, 1));
    }

    #[tokio::test]
    async fn test_cancelled_capture_restores() {
        let host = FakeHost::new(Point::new(5000.0, 5000.0));
        let tiles = tiles();
        let orchestrator = CaptureOrchestrator::new(Duration::from_secs(3600));

        let outcome = tokio::time::timeout(
            Duration::from_millis(10),
            orchestrator.capture(&tiles, &host, &host, &host),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(host.position.get(), Point::new(12.0, 34.0));
        assert_eq!((host.suppressed.get(), host.restored.get()), (1, 1));
    }
}

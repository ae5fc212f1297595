//! Per-item capture protocol
//!
//! Drives a `GalleryDriver` through the frame hand-off:
//! locate the frame, enter it and let it settle, step back out to resolve the
//! side panel (first item of a run only), re-enter and capture the frame root,
//! then return to the hosting page. Any failing step aborts the attempt; the
//! crawl loop owns the retry.

use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::config::WaitTimings;
use crate::gallery::GalleryDriver;

/// Protocol stage reached when an attempt fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    NavigatedToDetail,
    FrameLocated,
    FrameReady,
    SidePanelResolved,
    CaptureTaken,
    ReturnedToMainContext,
}

impl fmt::Display for CaptureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NavigatedToDetail => "navigated to detail",
            Self::FrameLocated => "frame located",
            Self::FrameReady => "frame ready",
            Self::SidePanelResolved => "side panel resolved",
            Self::CaptureTaken => "capture taken",
            Self::ReturnedToMainContext => "returned to main context",
        };
        f.write_str(name)
    }
}

/// A capture attempt that could not advance past `stage`
///
/// `stage` is the transition that failed, not the last one reached.
#[derive(Debug, Error)]
#[error("capture failed while reaching '{stage}': {source:#}")]
pub struct CaptureError {
    pub stage: CaptureStage,
    #[source]
    pub source: anyhow::Error,
}

/// Waits the capture protocol uses
#[derive(Debug, Clone, Copy)]
pub struct CaptureTimings {
    pub frame_timeout: Duration,
    pub frame_settle: Duration,
    pub side_panel_timeout: Duration,
}

impl From<&WaitTimings> for CaptureTimings {
    fn from(timings: &WaitTimings) -> Self {
        Self {
            frame_timeout: timings.element_timeout,
            frame_settle: timings.frame_settle,
            side_panel_timeout: timings.side_panel_timeout,
        }
    }
}

/// Run-scoped record of whether side-panel dismissal has been tried
///
/// Flips on the first attempt regardless of whether a panel was found.
#[derive(Debug, Default)]
pub struct SidePanelLatch {
    attempted: bool,
}

impl SidePanelLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once per latch
    pub fn take_attempt(&mut self) -> bool {
        !std::mem::replace(&mut self.attempted, true)
    }

    #[must_use]
    pub fn attempted(&self) -> bool {
        self.attempted
    }
}

/// Executes the capture protocol for one item
#[derive(Debug, Clone)]
pub struct SnapshotCapturer {
    timings: CaptureTimings,
}

impl SnapshotCapturer {
    #[must_use]
    pub fn new(timings: CaptureTimings) -> Self {
        Self { timings }
    }

    /// Capture the current detail page's frame root to `output`
    ///
    /// The driver must already be on the detail page. On failure the session
    /// is moved back to the hosting page on a best-effort basis.
    pub async fn capture<D>(
        &self,
        driver: &mut D,
        latch: &mut SidePanelLatch,
        output: &Path,
    ) -> Result<(), CaptureError>
    where
        D: GalleryDriver + ?Sized,
    {
        let result = self.run_protocol(driver, latch, output).await;
        if result.is_err()
            && let Err(e) = driver.exit_frame().await
        {
            trace!("Could not leave frame after failed capture: {}", e);
        }
        result
    }

    async fn run_protocol<D>(
        &self,
        driver: &mut D,
        latch: &mut SidePanelLatch,
        output: &Path,
    ) -> Result<(), CaptureError>
    where
        D: GalleryDriver + ?Sized,
    {
        driver
            .locate_frame(self.timings.frame_timeout)
            .await
            .map_err(at(CaptureStage::FrameLocated))?;
        trace!("Capture stage: {}", CaptureStage::FrameLocated);

        driver
            .enter_frame()
            .await
            .map_err(at(CaptureStage::FrameReady))?;
        // Embedded content gives no readiness signal
        tokio::time::sleep(self.timings.frame_settle).await;
        trace!("Capture stage: {}", CaptureStage::FrameReady);

        driver
            .exit_frame()
            .await
            .map_err(at(CaptureStage::SidePanelResolved))?;
        if latch.take_attempt() {
            match driver.dismiss_side_panel(self.timings.side_panel_timeout).await {
                Ok(true) => info!("Closed side panel"),
                Ok(false) => debug!("No side panel present"),
                Err(e) => debug!("Side panel dismissal failed: {:#}", e),
            }
        }
        trace!("Capture stage: {}", CaptureStage::SidePanelResolved);

        driver
            .enter_frame()
            .await
            .map_err(at(CaptureStage::CaptureTaken))?;
        driver
            .wait_for_frame_root(self.timings.frame_timeout)
            .await
            .map_err(at(CaptureStage::CaptureTaken))?;
        driver
            .capture_frame_root(output)
            .await
            .map_err(at(CaptureStage::CaptureTaken))?;
        trace!("Capture stage: {}", CaptureStage::CaptureTaken);

        driver
            .exit_frame()
            .await
            .map_err(at(CaptureStage::ReturnedToMainContext))?;
        trace!("Capture stage: {}", CaptureStage::ReturnedToMainContext);

        Ok(())
    }
}

fn at(stage: CaptureStage) -> impl FnOnce(anyhow::Error) -> CaptureError {
    move |source| CaptureError { stage, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_grants_a_single_attempt() {
        let mut latch = SidePanelLatch::new();
        assert!(!latch.attempted());
        assert!(latch.take_attempt());
        assert!(!latch.take_attempt());
        assert!(!latch.take_attempt());
        assert!(latch.attempted());
    }

    #[test]
    fn error_names_the_failed_stage() {
        let err = CaptureError {
            stage: CaptureStage::FrameLocated,
            source: anyhow::anyhow!("Timeout waiting for iframe"),
        };
        let message = err.to_string();
        assert!(message.contains("frame located"));
        assert!(message.contains("Timeout waiting for iframe"));
    }
}

//! Run state, per-item outcomes and errors for the crawl loop

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::capture::{CaptureError, SidePanelLatch};
use crate::extract::ExtractError;
use crate::persistence::GatewayError;

/// Session-level failure that ends the run
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to prepare staging directory: {0}")]
    Staging(#[source] std::io::Error),

    #[error("invalid listing URL for page {page}: {source:#}")]
    ListingUrl {
        page: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("browser session failed: {0:#}")]
    Session(#[source] anyhow::Error),
}

/// Why one capture → upload → insert attempt failed
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("refresh before retry failed: {0:#}")]
    Refresh(#[source] anyhow::Error),

    #[error("upload failed: {0}")]
    Upload(#[source] GatewayError),

    #[error("metadata insert failed: {0}")]
    Insert(#[source] GatewayError),
}

/// Why an item was skipped before any capture attempt
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("entry {index} missing after re-fetching the listing")]
    EntryMissing { index: usize },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("failed to open detail page: {0:#}")]
    Navigation(#[source] anyhow::Error),

    #[error("listing page could not be reloaded: {0:#}")]
    ListingUnavailable(#[source] anyhow::Error),
}

/// How processing of one qualifying entry ended
#[derive(Debug)]
pub enum ItemOutcome {
    Saved,
    SavedOnRetry,
    /// Both attempts failed; carries the second failure
    Failed(AttemptError),
    Skipped(SkipReason),
}

impl ItemOutcome {
    /// Whether the session navigated away from the listing for this item
    #[must_use]
    pub fn left_listing(&self) -> bool {
        !matches!(
            self,
            Self::Skipped(SkipReason::EntryMissing { .. } | SkipReason::Extract(_))
        )
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub pages_visited: u32,
    /// Listing pages that could not be loaded
    pub pages_failed: u32,
    pub entries_seen: usize,
    pub qualified: usize,
    pub saved: usize,
    pub saved_on_retry: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl CrawlSummary {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Saved => self.saved += 1,
            ItemOutcome::SavedOnRetry => {
                self.saved += 1;
                self.saved_on_retry += 1;
            }
            ItemOutcome::Failed(_) => self.failed += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pages: {} ({} failed), entries: {}, qualified: {}, saved: {} ({} on retry), failed: {}, skipped: {}",
            self.pages_visited,
            self.pages_failed,
            self.entries_seen,
            self.qualified,
            self.saved,
            self.saved_on_retry,
            self.failed,
            self.skipped
        )
    }
}

/// Mutable state scoped to one run
///
/// Created once per runner and never reset mid-run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub side_panel: SidePanelLatch,
    pub consent_handled: bool,
    epoch: u64,
}

impl RunContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new listing epoch; every earlier `EntryKey` becomes stale
    pub fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_saves_count_as_saved() {
        let mut summary = CrawlSummary::default();
        summary.record(&ItemOutcome::Saved);
        summary.record(&ItemOutcome::SavedOnRetry);
        summary.record(&ItemOutcome::Skipped(SkipReason::EntryMissing { index: 3 }));
        assert_eq!(summary.saved, 2);
        assert_eq!(summary.saved_on_retry, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn skips_before_navigation_stay_on_listing() {
        assert!(!ItemOutcome::Skipped(SkipReason::EntryMissing { index: 0 }).left_listing());
        assert!(
            ItemOutcome::Skipped(SkipReason::Navigation(anyhow::anyhow!("timeout"))).left_listing()
        );
        assert!(
            ItemOutcome::Skipped(SkipReason::ListingUnavailable(anyhow::anyhow!("timeout")))
                .left_listing()
        );
    }

    #[test]
    fn epochs_only_move_forward() {
        let mut context = RunContext::new();
        assert_eq!(context.next_epoch(), 1);
        assert_eq!(context.next_epoch(), 2);
    }
}

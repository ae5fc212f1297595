//! Core configuration types for capture runs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration struct for a capture run
///
/// Everything the crawl loop consumes is injected here at startup and treated
/// as constant for the lifetime of the run.
#[derive(Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Base URL of the storage/metadata backend (e.g. `https://xyz.supabase.co`)
    pub(crate) storage_url: Url,
    /// Service key sent with every backend request. Never serialized.
    #[serde(skip_serializing, default)]
    pub(crate) service_key: String,
    pub(crate) bucket: String,
    pub(crate) metadata_table: String,
    pub(crate) search_query: String,
    /// Origin listing and detail links are resolved against
    pub(crate) origin: Url,
    /// Inclusive favorite threshold
    pub(crate) min_favorites: u32,
    pub(crate) start_page: u32,
    pub(crate) end_page: u32,
    pub(crate) headless: bool,
    pub(crate) staging_dir: PathBuf,
    pub(crate) page_zoom: f64,
    pub(crate) timings: WaitTimings,
}

/// Every bounded wait and fixed delay used by a run
///
/// Element waits poll until the timeout; settle and recovery delays are plain
/// sleeps because the embedded visualization exposes no readiness signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaitTimings {
    /// Primary element waits: listing container, rendering frame, frame body
    pub element_timeout: Duration,
    /// Cookie-consent prompt wait
    pub consent_timeout: Duration,
    /// "Close side panel" button wait
    pub side_panel_timeout: Duration,
    /// Sleep inside the frame before capture
    pub frame_settle: Duration,
    /// Sleep after opening a detail page
    pub detail_settle: Duration,
    /// Sleep after refreshing a detail page before the retry
    pub recovery_delay: Duration,
    /// Upper bound for `goto` + load on any navigation
    pub navigation_timeout: Duration,
}

impl Default for WaitTimings {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_secs(30),
            consent_timeout: Duration::from_secs(5),
            side_panel_timeout: Duration::from_secs(1),
            frame_settle: Duration::from_secs(8),
            detail_settle: Duration::from_secs(1),
            recovery_delay: Duration::from_secs(3),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

impl WaitTimings {
    /// All delays zeroed and waits shortened, for driving fakes in tests
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            element_timeout: Duration::from_millis(50),
            consent_timeout: Duration::from_millis(10),
            side_panel_timeout: Duration::from_millis(10),
            frame_settle: Duration::ZERO,
            detail_settle: Duration::ZERO,
            recovery_delay: Duration::ZERO,
            navigation_timeout: Duration::from_millis(50),
        }
    }
}

impl fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("storage_url", &self.storage_url.as_str())
            .field("service_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("metadata_table", &self.metadata_table)
            .field("search_query", &self.search_query)
            .field("origin", &self.origin.as_str())
            .field("min_favorites", &self.min_favorites)
            .field("pages", &(self.start_page..=self.end_page))
            .field("headless", &self.headless)
            .field("staging_dir", &self.staging_dir)
            .field("page_zoom", &self.page_zoom)
            .field("timings", &self.timings)
            .finish()
    }
}

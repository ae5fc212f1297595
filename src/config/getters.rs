//! Getter methods for `CaptureConfig`

use std::ops::RangeInclusive;
use std::path::Path;
use url::Url;

use super::types::{CaptureConfig, WaitTimings};

impl CaptureConfig {
    #[must_use]
    pub fn storage_url(&self) -> &Url {
        &self.storage_url
    }

    #[must_use]
    pub fn service_key(&self) -> &str {
        &self.service_key
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[must_use]
    pub fn metadata_table(&self) -> &str {
        &self.metadata_table
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    #[must_use]
    pub fn min_favorites(&self) -> u32 {
        self.min_favorites
    }

    /// Inclusive page range, always ascending and starting at 1 or later
    #[must_use]
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start_page..=self.end_page
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    #[must_use]
    pub fn page_zoom(&self) -> f64 {
        self.page_zoom
    }

    #[must_use]
    pub fn timings(&self) -> &WaitTimings {
        &self.timings
    }
}

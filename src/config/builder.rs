//! Type-safe builder for `CaptureConfig` using the typestate pattern
//!
//! The storage backend and the bucket are required; the builder only exposes
//! `build()` once both have been supplied.

use crate::utils::{
    DEFAULT_END_PAGE, DEFAULT_METADATA_TABLE, DEFAULT_MIN_FAVORITES, DEFAULT_ORIGIN,
    DEFAULT_PAGE_ZOOM, DEFAULT_SEARCH_QUERY, DEFAULT_STAGING_DIR, DEFAULT_START_PAGE,
    is_valid_url,
};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::error::ConfigError;
use super::types::{CaptureConfig, WaitTimings};

// Type states for the builder
pub struct WithStorage;
pub struct Complete;

pub struct CaptureConfigBuilder<State = ()> {
    pub(crate) storage_url: Option<String>,
    pub(crate) service_key: Option<String>,
    pub(crate) bucket: Option<String>,
    pub(crate) metadata_table: String,
    pub(crate) search_query: String,
    pub(crate) origin: String,
    pub(crate) min_favorites: u32,
    pub(crate) start_page: u32,
    pub(crate) end_page: u32,
    pub(crate) headless: bool,
    pub(crate) staging_dir: PathBuf,
    pub(crate) page_zoom: f64,
    pub(crate) timings: WaitTimings,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for CaptureConfigBuilder<()> {
    fn default() -> Self {
        Self {
            storage_url: None,
            service_key: None,
            bucket: None,
            metadata_table: DEFAULT_METADATA_TABLE.to_string(),
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            min_favorites: DEFAULT_MIN_FAVORITES,
            start_page: DEFAULT_START_PAGE,
            end_page: DEFAULT_END_PAGE,
            headless: true,
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            page_zoom: DEFAULT_PAGE_ZOOM,
            timings: WaitTimings::default(),
            _phantom: PhantomData,
        }
    }
}

impl CaptureConfig {
    /// Create a builder for configuring a `CaptureConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CaptureConfigBuilder<()> {
        CaptureConfigBuilder::default()
    }
}

impl<State> CaptureConfigBuilder<State> {
    fn transition<Next>(self) -> CaptureConfigBuilder<Next> {
        CaptureConfigBuilder {
            storage_url: self.storage_url,
            service_key: self.service_key,
            bucket: self.bucket,
            metadata_table: self.metadata_table,
            search_query: self.search_query,
            origin: self.origin,
            min_favorites: self.min_favorites,
            start_page: self.start_page,
            end_page: self.end_page,
            headless: self.headless,
            staging_dir: self.staging_dir,
            page_zoom: self.page_zoom,
            timings: self.timings,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn metadata_table(mut self, table: impl Into<String>) -> Self {
        self.metadata_table = table.into();
        self
    }

    #[must_use]
    pub fn search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Origin used to build listing URLs and resolve relative detail links
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Minimum favorite count; entries exactly at the threshold qualify
    #[must_use]
    pub fn min_favorites(mut self, min: u32) -> Self {
        self.min_favorites = min;
        self
    }

    /// Inclusive listing page range
    #[must_use]
    pub fn pages(mut self, start: u32, end: u32) -> Self {
        self.start_page = start;
        self.end_page = end;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    #[must_use]
    pub fn page_zoom(mut self, zoom: f64) -> Self {
        self.page_zoom = zoom;
        self
    }

    #[must_use]
    pub fn timings(mut self, timings: WaitTimings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn element_timeout(mut self, timeout: Duration) -> Self {
        self.timings.element_timeout = timeout;
        self
    }

    #[must_use]
    pub fn frame_settle(mut self, settle: Duration) -> Self {
        self.timings.frame_settle = settle;
        self
    }
}

impl CaptureConfigBuilder<()> {
    /// Storage backend base URL and service key
    pub fn storage(
        mut self,
        url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> CaptureConfigBuilder<WithStorage> {
        self.storage_url = Some(url.into());
        self.service_key = Some(service_key.into());
        self.transition()
    }
}

impl CaptureConfigBuilder<WithStorage> {
    pub fn bucket(mut self, bucket: impl Into<String>) -> CaptureConfigBuilder<Complete> {
        self.bucket = Some(bucket.into());
        self.transition()
    }
}

// Build method only available when all required fields are set
impl CaptureConfigBuilder<Complete> {
    pub fn build(self) -> Result<CaptureConfig, ConfigError> {
        let storage_url = self.storage_url.unwrap_or_default();
        if !is_valid_url(&storage_url) {
            return Err(ConfigError::Invalid(format!(
                "storage URL '{storage_url}' is not an http(s) URL"
            )));
        }
        let storage_url = parse_url(&storage_url)?;

        let service_key = self.service_key.unwrap_or_default();
        if service_key.trim().is_empty() {
            return Err(ConfigError::Invalid("service key is empty".into()));
        }

        let bucket = self.bucket.unwrap_or_default();
        if bucket.trim().is_empty() {
            return Err(ConfigError::Invalid("bucket name is empty".into()));
        }

        if self.metadata_table.trim().is_empty() {
            return Err(ConfigError::Invalid("metadata table is empty".into()));
        }

        if self.search_query.trim().is_empty() {
            return Err(ConfigError::Invalid("search query is empty".into()));
        }

        if !is_valid_url(&self.origin) {
            return Err(ConfigError::Invalid(format!(
                "origin '{}' is not an http(s) URL",
                self.origin
            )));
        }
        let origin = parse_url(&self.origin)?;

        if self.start_page == 0 {
            return Err(ConfigError::Invalid("pages are 1-indexed; start page is 0".into()));
        }
        if self.start_page > self.end_page {
            return Err(ConfigError::Invalid(format!(
                "page range {}..={} is empty",
                self.start_page, self.end_page
            )));
        }

        if !(self.page_zoom > 0.0 && self.page_zoom <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "page zoom {} must be in (0, 1]",
                self.page_zoom
            )));
        }

        Ok(CaptureConfig {
            storage_url,
            service_key,
            bucket,
            metadata_table: self.metadata_table,
            search_query: self.search_query.trim().to_string(),
            origin,
            min_favorites: self.min_favorites,
            start_page: self.start_page,
            end_page: self.end_page,
            headless: self.headless,
            staging_dir: self.staging_dir,
            page_zoom: self.page_zoom,
            timings: self.timings,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid(format!("'{raw}': {e}")))
}

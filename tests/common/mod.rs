//! Shared fixtures for the vizcapture test suite: a scripted gallery session
//! and in-memory storage backends

#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use vizcapture::config::{CaptureConfig, WaitTimings};
use vizcapture::gallery::{EntryMarkup, GalleryDriver};
use vizcapture::persistence::{GatewayError, MetadataRecord, MetadataStore, ObjectStore};

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-frame";

/// Config pointing at nothing real, with every wait collapsed
pub fn test_config(staging_dir: &Path, start: u32, end: u32, threshold: u32) -> CaptureConfig {
    CaptureConfig::builder()
        .storage("http://localhost:54321", "test-service-key")
        .bucket("dashboards")
        .staging_dir(staging_dir)
        .pages(start, end)
        .min_favorites(threshold)
        .timings(WaitTimings::immediate())
        .build()
        .expect("test config is valid")
}

/// A listing card with a favorite tooltip
pub fn card(title: &str, favorites: u32) -> EntryMarkup {
    EntryMarkup {
        title: Some(title.to_string()),
        href: Some(detail_path(title)),
        author: Some(format!("{title} Author")),
        favorite_tooltip: Some(format!("{favorites} Favorites")),
        markup: Some(format!(
            r#"<div class="_listItem_6uimr_62"><button data-tooltip-content="{favorites} Favorites"></button></div>"#
        )),
    }
}

/// Relative detail href the fake uses for a title
pub fn detail_path(title: &str) -> String {
    format!("/app/profile/tester/viz/{}", title.replace(' ', "_"))
}

/// Absolute detail URL the runner will navigate to for a title
pub fn detail_url(title: &str) -> String {
    format!("https://public.tableau.com{}", detail_path(title))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    OpenListing(u32),
    AcceptConsent,
    WaitForListing,
    ListingEntries,
    OpenDetail(String),
    PrepareDetail,
    Refresh,
    LocateFrame,
    EnterFrame,
    ExitFrame,
    DismissSidePanel,
    WaitForFrameRoot,
    Capture(PathBuf),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Blank,
    Listing(u32),
    Detail(String),
}

/// Scripted `GalleryDriver`
///
/// Listings are keyed by page number. Capture failures are keyed by detail URL
/// and consumed one per attempt.
#[derive(Debug)]
pub struct FakeGallery {
    listings: HashMap<u32, Vec<EntryMarkup>>,
    capture_failures: HashMap<String, u32>,
    locate_failures: HashMap<String, u32>,
    listing_wait_failures: Vec<usize>,
    listing_waits: usize,
    pub side_panel_present: bool,
    pub consent_present: bool,
    location: Location,
    inside_frame: bool,
    calls: Vec<Call>,
}

impl Default for FakeGallery {
    fn default() -> Self {
        Self {
            listings: HashMap::new(),
            capture_failures: HashMap::new(),
            locate_failures: HashMap::new(),
            listing_wait_failures: Vec::new(),
            listing_waits: 0,
            side_panel_present: true,
            consent_present: true,
            location: Location::Blank,
            inside_frame: false,
            calls: Vec::new(),
        }
    }
}

impl FakeGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, page: u32, entries: Vec<EntryMarkup>) -> Self {
        self.listings.insert(page, entries);
        self
    }

    /// Make the next `times` captures of `title`'s detail page fail
    pub fn fail_capture(mut self, title: &str, times: u32) -> Self {
        self.capture_failures.insert(detail_url(title), times);
        self
    }

    /// Make the next `times` frame lookups on `title`'s detail page time out
    pub fn fail_locate(mut self, title: &str, times: u32) -> Self {
        self.locate_failures.insert(detail_url(title), times);
        self
    }

    /// Make the `nth` listing wait of the session (1-based) time out
    pub fn fail_listing_wait(mut self, nth: usize) -> Self {
        self.listing_wait_failures.push(nth);
        self
    }

    /// Put the session on a detail page without recording a call
    pub fn at_detail(mut self, title: &str) -> Self {
        self.location = Location::Detail(detail_url(title));
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn opened_details(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::OpenDetail(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn opened_listings(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::OpenListing(page) => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn captured_paths(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Capture(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn current_detail(&self) -> Result<String> {
        match &self.location {
            Location::Detail(url) => Ok(url.clone()),
            other => bail!("not on a detail page: {other:?}"),
        }
    }

    fn consume(failures: &mut HashMap<String, u32>, url: &str) -> bool {
        match failures.get_mut(url) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

fn page_param(url: &str) -> Result<u32> {
    let parsed = Url::parse(url)?;
    let page = parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .ok_or_else(|| anyhow!("listing URL without page parameter: {url}"))?;
    Ok(page.1.parse()?)
}

#[async_trait]
impl GalleryDriver for FakeGallery {
    async fn open_listing(&mut self, url: &str) -> Result<()> {
        let page = page_param(url)?;
        self.calls.push(Call::OpenListing(page));
        self.location = Location::Listing(page);
        self.inside_frame = false;
        Ok(())
    }

    async fn accept_consent(&mut self, _timeout: Duration) -> Result<bool> {
        self.calls.push(Call::AcceptConsent);
        Ok(std::mem::replace(&mut self.consent_present, false))
    }

    async fn wait_for_listing(&mut self, timeout: Duration) -> Result<()> {
        self.calls.push(Call::WaitForListing);
        self.listing_waits += 1;
        if self.listing_wait_failures.contains(&self.listing_waits) {
            bail!("Timeout waiting for listing container after {timeout:?}");
        }
        match self.location {
            Location::Listing(page) if self.listings.contains_key(&page) => Ok(()),
            _ => bail!("Timeout waiting for listing container after {timeout:?}"),
        }
    }

    async fn listing_entries(&mut self) -> Result<Vec<EntryMarkup>> {
        self.calls.push(Call::ListingEntries);
        match self.location {
            Location::Listing(page) => Ok(self.listings.get(&page).cloned().unwrap_or_default()),
            ref other => bail!("not on a listing page: {other:?}"),
        }
    }

    async fn open_detail(&mut self, url: &str) -> Result<()> {
        self.calls.push(Call::OpenDetail(url.to_string()));
        self.location = Location::Detail(url.to_string());
        self.inside_frame = false;
        Ok(())
    }

    async fn prepare_detail(&mut self, _zoom: f64) -> Result<()> {
        self.calls.push(Call::PrepareDetail);
        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        self.calls.push(Call::Refresh);
        self.inside_frame = false;
        Ok(())
    }

    async fn locate_frame(&mut self, timeout: Duration) -> Result<()> {
        self.calls.push(Call::LocateFrame);
        let url = self.current_detail()?;
        if Self::consume(&mut self.locate_failures, &url) {
            bail!("Timeout waiting for '#embedded-viz-wrapper iframe' after {timeout:?}");
        }
        Ok(())
    }

    async fn enter_frame(&mut self) -> Result<()> {
        self.calls.push(Call::EnterFrame);
        self.current_detail()?;
        self.inside_frame = true;
        Ok(())
    }

    async fn exit_frame(&mut self) -> Result<()> {
        self.calls.push(Call::ExitFrame);
        self.inside_frame = false;
        Ok(())
    }

    async fn dismiss_side_panel(&mut self, _timeout: Duration) -> Result<bool> {
        self.calls.push(Call::DismissSidePanel);
        if self.inside_frame {
            bail!("side panel lives on the hosting page");
        }
        Ok(std::mem::replace(&mut self.side_panel_present, false))
    }

    async fn wait_for_frame_root(&mut self, _timeout: Duration) -> Result<()> {
        self.calls.push(Call::WaitForFrameRoot);
        if !self.inside_frame {
            bail!("frame root queried from the hosting page");
        }
        Ok(())
    }

    async fn capture_frame_root(&mut self, output: &Path) -> Result<()> {
        self.calls.push(Call::Capture(output.to_path_buf()));
        if !self.inside_frame {
            bail!("capture requested from the hosting page");
        }
        let url = self.current_detail()?;
        if Self::consume(&mut self.capture_failures, &url) {
            // A partial file must still be cleaned up by the caller
            std::fs::write(output, b"partial")?;
            bail!("Failed to capture frame: renderer crashed");
        }
        std::fs::write(output, FAKE_PNG)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.calls.push(Call::Close);
        self.location = Location::Blank;
        Ok(())
    }
}

/// Object store keeping uploads in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryObjects {
    pub objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub uploads: Arc<Mutex<u32>>,
    failures: Arc<Mutex<u32>>,
}

impl MemoryObjects {
    pub fn failing(times: u32) -> Self {
        let store = Self::default();
        *store.failures.lock().unwrap() = times;
        store
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn upload_count(&self) -> u32 {
        *self.uploads.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn upload(
        &self,
        bucket: &str,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), GatewayError> {
        assert_eq!(content_type, "image/png");
        *self.uploads.lock().unwrap() += 1;

        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(GatewayError::Status {
                operation: "storage upload",
                status: 503,
                body: "storage unavailable".into(),
            });
        }

        self.objects
            .lock()
            .unwrap()
            .insert(format!("{bucket}/{object_path}"), bytes);
        Ok(())
    }
}

/// Metadata table keeping rows in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadata {
    pub rows: Arc<Mutex<Vec<(String, MetadataRecord)>>>,
    failures: Arc<Mutex<u32>>,
}

impl MemoryMetadata {
    pub fn failing(times: u32) -> Self {
        let store = Self::default();
        *store.failures.lock().unwrap() = times;
        store
    }

    pub fn records(&self) -> Vec<MetadataRecord> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|record| record.dashboard_name)
            .collect()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadata {
    async fn insert(&self, table: &str, record: &MetadataRecord) -> Result<(), GatewayError> {
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(GatewayError::Status {
                operation: "metadata insert",
                status: 500,
                body: "insert rejected".into(),
            });
        }
        drop(failures);

        self.rows
            .lock()
            .unwrap()
            .push((table.to_string(), record.clone()));
        Ok(())
    }
}

/// Files left behind in the staging directory
pub fn staged_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(_) => Vec::new(),
    }
}

//! The crawl loop
//!
//! Pages are visited in ascending order. Each page is scanned once to decide
//! which entries qualify, then every qualifying entry is re-located in a fresh
//! read of the listing, captured, uploaded and recorded, with one retry after a
//! refresh when any of those three steps fails.

use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::crawl_types::{
    AttemptError, CrawlError, CrawlSummary, ItemOutcome, RunContext, SkipReason,
};
use crate::capture::{CaptureArtifact, CaptureTimings, SnapshotCapturer};
use crate::config::CaptureConfig;
use crate::extract::{EntryDetails, ListingEntry, extract_details, scan_entry};
use crate::filter::{QualifyingEntry, qualify};
use crate::gallery::{GalleryDriver, ListingPage};
use crate::persistence::{GatewayError, MetadataRecord, MetadataStore, ObjectStore};
use crate::utils::{LOG_NAME_WIDTH, SCREENSHOT_CONTENT_TYPE, listing_url, safe_truncate_chars};

/// Drives one gallery session over the configured page range
pub struct CrawlRunner<D, S, M> {
    config: CaptureConfig,
    driver: D,
    objects: S,
    metadata: M,
    capturer: SnapshotCapturer,
    context: RunContext,
}

impl<D, S, M> CrawlRunner<D, S, M>
where
    D: GalleryDriver,
    S: ObjectStore,
    M: MetadataStore,
{
    pub fn new(config: CaptureConfig, driver: D, objects: S, metadata: M) -> Self {
        let capturer = SnapshotCapturer::new(CaptureTimings::from(config.timings()));
        Self {
            config,
            driver,
            objects,
            metadata,
            capturer,
            context: RunContext::new(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Process every page in the range, then close the session
    ///
    /// The session is closed even when the loop stops on an error.
    pub async fn run(&mut self) -> Result<CrawlSummary, CrawlError> {
        let result = self.crawl_pages().await;

        if let Err(e) = self.driver.close().await {
            if result.is_ok() {
                return Err(CrawlError::Session(e));
            }
            warn!("Failed to close browser session: {:#}", e);
        }

        if let Ok(summary) = &result {
            info!("Run complete - {}", summary);
        }
        result
    }

    async fn crawl_pages(&mut self) -> Result<CrawlSummary, CrawlError> {
        tokio::fs::create_dir_all(self.config.staging_dir())
            .await
            .map_err(CrawlError::Staging)?;

        let mut summary = CrawlSummary::default();
        let pages = self.config.pages();
        info!(
            "Scraping pages {} to {} (threshold: {} favorites)",
            pages.start(),
            pages.end(),
            self.config.min_favorites()
        );

        for page in pages {
            let url = listing_url(self.config.origin(), self.config.search_query(), page)
                .map_err(|source| CrawlError::ListingUrl { page, source })?;

            info!("{}", "=".repeat(60));
            info!("PAGE {}", page);
            info!("{}", "=".repeat(60));

            self.crawl_page(page, &url, &mut summary).await;
        }

        Ok(summary)
    }

    async fn crawl_page(&mut self, page: u32, url: &Url, summary: &mut CrawlSummary) {
        if let Err(e) = self.load_listing(url).await {
            warn!("Skipping page {}: {:#}", page, e);
            summary.pages_failed += 1;
            return;
        }
        summary.pages_visited += 1;

        let listing = match self.read_listing(page).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Skipping page {}: {:#}", page, e);
                summary.pages_failed += 1;
                return;
            }
        };
        info!("Found {} total dashboards on page", listing.len());
        summary.entries_seen += listing.len();

        let entries = self.scan_listing(&listing);
        let qualifying = qualify(&entries, self.config.min_favorites());
        summary.qualified += qualifying.len();

        info!(
            "{} dashboards meet criteria (>= {} favorites)",
            qualifying.len(),
            self.config.min_favorites()
        );
        if qualifying.is_empty() {
            info!("Skipping to next page");
            return;
        }

        let mut on_listing = true;
        for entry in &qualifying {
            if !on_listing {
                if let Err(e) = self.load_listing(url).await {
                    let outcome = ItemOutcome::Skipped(SkipReason::ListingUnavailable(e));
                    log_outcome(&entry.name, &outcome);
                    summary.record(&outcome);
                    continue;
                }
                on_listing = true;
            }

            let outcome = self.process_entry(page, entry).await;
            log_outcome(&entry.name, &outcome);
            summary.record(&outcome);

            if outcome.left_listing()
                && let Err(e) = self.load_listing(url).await
            {
                warn!(
                    "Could not return to listing page {}, retrying before the next entry: {:#}",
                    page, e
                );
                on_listing = false;
            }
        }
    }

    /// Navigate to a listing page and wait for its container
    ///
    /// The cookie prompt is handled on the session's first listing load only.
    async fn load_listing(&mut self, url: &Url) -> anyhow::Result<()> {
        self.driver.open_listing(url.as_str()).await?;

        if !self.context.consent_handled {
            self.context.consent_handled = true;
            match self
                .driver
                .accept_consent(self.config.timings().consent_timeout)
                .await
            {
                Ok(true) => info!("Accepted cookies"),
                Ok(false) => debug!("No cookie-consent prompt"),
                Err(e) => debug!("Cookie-consent prompt not dismissed: {:#}", e),
            }
        }

        self.driver
            .wait_for_listing(self.config.timings().element_timeout)
            .await
    }

    /// Read the listing's cards into a new epoch
    async fn read_listing(&mut self, page: u32) -> anyhow::Result<ListingPage> {
        let entries = self.driver.listing_entries().await?;
        let epoch = self.context.next_epoch();
        Ok(ListingPage {
            page,
            epoch,
            entries,
        })
    }

    fn scan_listing(&self, listing: &ListingPage) -> Vec<ListingEntry> {
        let threshold = self.config.min_favorites();
        let mut scanned = Vec::with_capacity(listing.len());

        for (index, markup) in listing.entries.iter().enumerate() {
            match scan_entry(index, markup) {
                Ok(entry) => {
                    let mark = if entry.favorites.meets(threshold) { "✓" } else { "✗" };
                    info!(
                        "  {} [{}] {:<width$} | Favorites: {}",
                        mark,
                        index + 1,
                        safe_truncate_chars(&entry.name, LOG_NAME_WIDTH),
                        entry.favorites,
                        width = LOG_NAME_WIDTH
                    );
                    if entry.favorites.is_degraded() {
                        debug!("Entry {} favorites read as {:?}", index, entry.favorites);
                    }
                    scanned.push(entry);
                }
                Err(e) => warn!("  ! Error checking dashboard {}: {}", index, e),
            }
        }

        scanned
    }

    async fn process_entry(&mut self, page: u32, entry: &QualifyingEntry) -> ItemOutcome {
        let listing = match self.read_listing(page).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Failed to re-read listing: {:#}", e);
                return ItemOutcome::Skipped(SkipReason::EntryMissing { index: entry.index });
            }
        };

        let Some(markup) = listing.entry(listing.key(entry.index)) else {
            return ItemOutcome::Skipped(SkipReason::EntryMissing { index: entry.index });
        };

        let details = match extract_details(markup, self.config.origin()) {
            Ok(details) => details,
            Err(e) => return ItemOutcome::Skipped(e.into()),
        };
        if details.name != entry.name {
            warn!(
                "Entry {} changed from '{}' to '{}' since the listing scan",
                entry.index, entry.name, details.name
            );
        }

        info!("Capturing: {}", details.name);
        info!("  Author: {}", details.author);
        info!("  Favorites: {}", entry.favorites);
        info!("  Link: {}", details.link);

        if let Err(e) = self.open_detail(&details.link).await {
            return ItemOutcome::Skipped(SkipReason::Navigation(e));
        }

        let artifact = CaptureArtifact::new(self.config.staging_dir());
        let outcome = self
            .capture_with_retry(&details, entry.favorites, &artifact)
            .await;

        if let Err(e) = artifact.discard().await {
            warn!(
                "Failed to remove staged capture {}: {}",
                artifact.local_path().display(),
                e
            );
        }

        outcome
    }

    /// Navigate to the detail page, let it settle, zoom it and strip its chrome
    async fn open_detail(&mut self, link: &Url) -> anyhow::Result<()> {
        self.driver.open_detail(link.as_str()).await?;
        sleep_if_nonzero(self.config.timings().detail_settle).await;

        if let Err(e) = self.driver.prepare_detail(self.config.page_zoom()).await {
            warn!("Could not prepare detail page layout: {:#}", e);
        }
        Ok(())
    }

    async fn capture_with_retry(
        &mut self,
        details: &EntryDetails,
        favorites: u32,
        artifact: &CaptureArtifact,
    ) -> ItemOutcome {
        let first = match self.attempt(details, favorites, artifact).await {
            Ok(()) => return ItemOutcome::Saved,
            Err(e) => e,
        };
        warn!("Error capturing dashboard: {}", first);
        info!("Retrying...");

        if let Err(e) = self.driver.refresh().await {
            return ItemOutcome::Failed(AttemptError::Refresh(e));
        }
        sleep_if_nonzero(self.config.timings().recovery_delay).await;

        match self.attempt(details, favorites, artifact).await {
            Ok(()) => ItemOutcome::SavedOnRetry,
            Err(e) => ItemOutcome::Failed(e),
        }
    }

    /// Capture, upload, insert; the record is only written after the upload
    async fn attempt(
        &mut self,
        details: &EntryDetails,
        favorites: u32,
        artifact: &CaptureArtifact,
    ) -> Result<(), AttemptError> {
        self.capturer
            .capture(
                &mut self.driver,
                &mut self.context.side_panel,
                artifact.local_path(),
            )
            .await?;

        let bytes = artifact
            .read_bytes()
            .await
            .map_err(|e| AttemptError::Upload(GatewayError::from(e)))?;

        self.objects
            .upload(
                self.config.bucket(),
                artifact.remote_path(),
                bytes,
                SCREENSHOT_CONTENT_TYPE,
            )
            .await
            .map_err(AttemptError::Upload)?;

        let record = MetadataRecord {
            id: artifact.id(),
            dashboard_name: details.name.clone(),
            dashboard_link: details.link.to_string(),
            dashboard_author: details.author.clone(),
            bucket_path: artifact.remote_path().to_string(),
            favorite_count: i64::from(favorites),
        };

        self.metadata
            .insert(self.config.metadata_table(), &record)
            .await
            .map_err(AttemptError::Insert)?;

        if let Some(url) = self
            .objects
            .public_url(self.config.bucket(), artifact.remote_path())
        {
            info!("  Stored at {}", url);
        }
        Ok(())
    }
}

fn log_outcome(name: &str, outcome: &ItemOutcome) {
    match outcome {
        ItemOutcome::Saved => info!("Saved to storage: {}", name),
        ItemOutcome::SavedOnRetry => info!("Retry successful: {}", name),
        ItemOutcome::Failed(e) => warn!("Retry failed for '{}': {}", name, e),
        ItemOutcome::Skipped(reason) => warn!("Skipped '{}': {}", name, reason),
    }
}

async fn sleep_if_nonzero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

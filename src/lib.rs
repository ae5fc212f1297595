pub mod browser_setup;
pub mod capture;
pub mod config;
pub mod crawl_engine;
pub mod extract;
pub mod filter;
pub mod gallery;
pub mod persistence;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use capture::{CaptureArtifact, CaptureError, CaptureStage, SidePanelLatch, SnapshotCapturer};
pub use config::{CaptureConfig, ConfigError, WaitTimings};
pub use crawl_engine::{CrawlError, CrawlRunner, CrawlSummary, ItemOutcome, RunContext};
pub use extract::{FavoriteReading, read_favorites};
pub use filter::{QualifyingEntry, qualify};
pub use gallery::{ChromeGallery, GalleryDriver};
pub use persistence::{MetadataRecord, MetadataStore, ObjectStore, SupabaseGateway};

/// Launch a browser session and run the full capture loop against Supabase
pub async fn capture_gallery(config: CaptureConfig) -> anyhow::Result<CrawlSummary> {
    let gateway = SupabaseGateway::new(config.storage_url().clone(), config.service_key())?;
    let driver = ChromeGallery::launch(&config).await?;

    let mut runner = CrawlRunner::new(config, driver, gateway.clone(), gateway);
    Ok(runner.run().await?)
}

// Gallery capture binary
//
// Reads its configuration from the environment, walks the configured listing
// pages and stores qualifying visualizations in Supabase.

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vizcapture::{CaptureConfig, capture_gallery};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with(fmt::layer())
        .init();

    let config = CaptureConfig::from_env()?;
    info!(
        "Capturing '{}' pages {:?} into bucket '{}'",
        config.search_query(),
        config.pages(),
        config.bucket()
    );

    match capture_gallery(config).await {
        Ok(summary) => info!("SCRAPING COMPLETE: {}", summary),
        Err(e) => error!("Capture run stopped: {:#}", e),
    }

    Ok(())
}

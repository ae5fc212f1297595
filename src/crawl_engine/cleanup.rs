//! Browser and profile cleanup at the end of a session

use anyhow::Result;
use chromiumoxide::Browser;
use std::path::Path;
use tracing::{debug, warn};

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

/// Close the browser, wait for its process to exit, then remove its profile
///
/// Every step runs even if an earlier one failed; failures are collected.
pub async fn cleanup_browser_and_data(browser: &mut Browser, chrome_data_dir: &Path) -> Result<CleanupResult> {
    let mut errors = Vec::new();

    debug!(target: "vizcapture::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "vizcapture::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    // Chrome holds profile file locks until the process is gone
    debug!(target: "vizcapture::cleanup", "Waiting for browser process to exit");
    if let Err(e) = browser.wait().await {
        warn!(target: "vizcapture::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    debug!(target: "vizcapture::cleanup", "Removing Chrome profile {}", chrome_data_dir.display());
    match tokio::fs::remove_dir_all(chrome_data_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(target: "vizcapture::cleanup", "Failed to remove Chrome profile: {e}");
            errors.push(format!("Directory cleanup failed: {e}"));
        }
    }

    if errors.is_empty() {
        Ok(CleanupResult::Success)
    } else {
        Ok(CleanupResult::PartialFailure(errors))
    }
}

//! The browsing-session seam used by the crawl loop and the capturer
//!
//! `GalleryDriver` exposes exactly the primitive steps the capture protocol
//! needs. The chromiumoxide implementation lives in `chrome.rs`; tests drive
//! the loop through a scripted implementation.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Raw markup read from one listing card
///
/// Every field is optional: the gallery's card layout varies between
/// featured, hidden-author and deleted-profile entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMarkup {
    /// Inner text of the title anchor
    pub title: Option<String>,
    /// `href` attribute of the title anchor, relative or absolute
    pub href: Option<String>,
    /// Inner text of the author label
    pub author: Option<String>,
    /// Favorite toggle tooltip, e.g. `"12 Favorites"`
    pub favorite_tooltip: Option<String>,
    /// Card `outerHTML`, used as the favorite-count fallback source
    pub markup: Option<String>,
}

/// Position of an entry inside one load of a listing page
///
/// Indices are only meaningful inside the epoch they were read in. Any
/// navigation away from the listing ends the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub epoch: u64,
    pub index: usize,
}

/// Entries read from the listing during one epoch
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub page: u32,
    pub epoch: u64,
    pub entries: Vec<EntryMarkup>,
}

impl ListingPage {
    #[must_use]
    pub fn key(&self, index: usize) -> EntryKey {
        EntryKey {
            epoch: self.epoch,
            index,
        }
    }

    /// Look up an entry, rejecting keys issued by another epoch
    #[must_use]
    pub fn entry(&self, key: EntryKey) -> Option<&EntryMarkup> {
        if key.epoch != self.epoch {
            return None;
        }
        self.entries.get(key.index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One automated browsing session over the gallery
///
/// Calls are strictly sequential. Frame methods move the session between the
/// hosting page and the embedded visualization's document; every other method
/// expects the session to be on the hosting page.
#[async_trait]
pub trait GalleryDriver: Send {
    /// Navigate the session to a listing URL
    async fn open_listing(&mut self, url: &str) -> Result<()>;

    /// Click the cookie-consent accept button if it shows up within `timeout`
    ///
    /// Returns whether a prompt was dismissed. Absence is `Ok(false)`.
    async fn accept_consent(&mut self, timeout: Duration) -> Result<bool>;

    /// Wait until the listing container is present
    async fn wait_for_listing(&mut self, timeout: Duration) -> Result<()>;

    /// Enumerate the cards currently in the listing
    async fn listing_entries(&mut self) -> Result<Vec<EntryMarkup>>;

    /// Navigate to a detail page
    async fn open_detail(&mut self, url: &str) -> Result<()>;

    /// Zoom the page and remove navigation and marketing chrome
    async fn prepare_detail(&mut self, zoom: f64) -> Result<()>;

    /// Reload the current page
    async fn refresh(&mut self) -> Result<()>;

    /// Wait for the embedded rendering frame to exist
    async fn locate_frame(&mut self, timeout: Duration) -> Result<()>;

    /// Switch into the located frame's document
    async fn enter_frame(&mut self) -> Result<()>;

    /// Switch back to the hosting page. Idempotent.
    async fn exit_frame(&mut self) -> Result<()>;

    /// Click the side panel's close button if it shows up within `timeout`
    ///
    /// Returns whether the panel was closed. Absence is `Ok(false)`.
    async fn dismiss_side_panel(&mut self, timeout: Duration) -> Result<bool>;

    /// Wait for the frame's root content element
    async fn wait_for_frame_root(&mut self, timeout: Duration) -> Result<()>;

    /// Write a PNG of the frame root's rendered bounds to `output`
    async fn capture_frame_root(&mut self, output: &Path) -> Result<()>;

    /// End the session and release the browser
    async fn close(&mut self) -> Result<()>;
}

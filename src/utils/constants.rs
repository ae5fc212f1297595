//! Shared configuration constants for vizcapture
//!
//! Default values used by the config builder and the crawl loop, kept in one
//! place so the binary, the builder and the tests agree on them.

/// Origin every listing and detail link is resolved against
pub const DEFAULT_ORIGIN: &str = "https://public.tableau.com";

/// Gallery search phrase used when no override is configured
pub const DEFAULT_SEARCH_QUERY: &str = "superstore sales";

/// Minimum favorite count for an entry to be captured (inclusive)
pub const DEFAULT_MIN_FAVORITES: u32 = 5;

/// First listing page visited (pages are 1-indexed)
pub const DEFAULT_START_PAGE: u32 = 1;

/// Last listing page visited (inclusive)
pub const DEFAULT_END_PAGE: u32 = 10;

/// Metadata table receiving one row per saved capture
pub const DEFAULT_METADATA_TABLE: &str = "metadata";

/// Local directory where captures are staged before upload
pub const DEFAULT_STAGING_DIR: &str = "tmp/screenshots";

/// CSS zoom applied to detail pages before capture
///
/// 0.85 fits most published dashboards inside a 1920x1080 window without
/// triggering the responsive (phone) layout.
pub const DEFAULT_PAGE_ZOOM: f64 = 0.85;

/// Remote folder inside the bucket that holds captures
pub const SCREENSHOT_PREFIX: &str = "screenshots";

/// Content type sent with every upload
pub const SCREENSHOT_CONTENT_TYPE: &str = "image/png";

/// Characters of the entry name shown in per-entry listing log lines
pub const LOG_NAME_WIDTH: usize = 50;

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

//! Detail extraction for listing cards
//!
//! Works on `EntryMarkup` snapshots so extraction never touches the browser
//! and never fails past its boundary for favorite counts.

pub mod details;
pub mod favorites;

pub use details::{EntryDetails, ExtractError, ListingEntry, extract_details, scan_entry};
pub use favorites::{FavoriteReading, MissReason, UNKNOWN_FAVORITES, read_favorites};

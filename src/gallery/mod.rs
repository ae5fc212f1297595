//! The public visualization gallery: selectors, the session seam and its
//! chromiumoxide implementation.

pub mod chrome;
pub mod driver;
pub mod page_helpers;
pub mod selectors;

pub use chrome::ChromeGallery;
pub use driver::{EntryKey, EntryMarkup, GalleryDriver, ListingPage};

//! Crawl Engine Module
//!
//! The page/entry loop plus the session plumbing it relies on: navigation
//! timeouts and browser teardown.

pub mod cleanup;
pub mod crawl_types;
pub mod page_timeout;
pub mod runner;

pub use cleanup::{CleanupResult, cleanup_browser_and_data};
pub use crawl_types::{
    AttemptError, CrawlError, CrawlSummary, ItemOutcome, RunContext, SkipReason,
};
pub use page_timeout::with_page_timeout;
pub use runner::CrawlRunner;

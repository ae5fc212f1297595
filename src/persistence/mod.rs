//! Remote object storage and metadata-table seams
//!
//! The crawl loop only needs two calls: put an image, insert a row. Both are
//! traits so the loop can be exercised against in-memory stores.

pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

pub use supabase::SupabaseGateway;

/// Failure talking to the storage backend
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid gateway URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to read staged capture: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode metadata record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Row written once per successfully uploaded capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub id: Uuid,
    pub dashboard_name: String,
    pub dashboard_link: String,
    pub dashboard_author: String,
    pub bucket_path: String,
    /// `-1` when the count could not be read
    pub favorite_count: i64,
}

/// Content store accepting whole objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `object_path`, replacing any existing object
    async fn upload(
        &self,
        bucket: &str,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), GatewayError>;

    /// Publicly reachable URL for an object, when the store has one
    fn public_url(&self, _bucket: &str, _object_path: &str) -> Option<Url> {
        None
    }
}

/// Append-only metadata table
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn insert(&self, table: &str, record: &MetadataRecord) -> Result<(), GatewayError>;
}

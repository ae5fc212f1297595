//! Supabase storage + PostgREST gateway over reqwest

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{GatewayError, MetadataRecord, MetadataStore, ObjectStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for one Supabase project, cheap to clone
#[derive(Clone)]
pub struct SupabaseGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl fmt::Debug for SupabaseGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseGateway")
            .field("base_url", &self.base_url.as_str())
            .field("service_key", &"<redacted>")
            .finish()
    }
}

impl SupabaseGateway {
    pub fn new(base_url: Url, service_key: impl Into<String>) -> anyhow::Result<Self> {
        let service_key = service_key.into();

        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(&service_key)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Public URL of an object in a public bucket
    pub fn public_object_url(&self, bucket: &str, object_path: &str) -> Result<Url, GatewayError> {
        self.endpoint(&format!("storage/v1/object/public/{bucket}/{object_path}"))
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        // Keep any path prefix on the project URL
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path)?)
    }
}

async fn check_status(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<(), GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ObjectStore for SupabaseGateway {
    async fn upload(
        &self,
        bucket: &str,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), GatewayError> {
        const OPERATION: &str = "storage upload";

        let url = self.endpoint(&format!("storage/v1/object/{bucket}/{object_path}"))?;
        debug!("Uploading {} bytes to {}", bytes.len(), url);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                operation: OPERATION,
                source,
            })?;

        check_status(OPERATION, response).await
    }

    fn public_url(&self, bucket: &str, object_path: &str) -> Option<Url> {
        self.public_object_url(bucket, object_path).ok()
    }
}

#[async_trait]
impl MetadataStore for SupabaseGateway {
    async fn insert(&self, table: &str, record: &MetadataRecord) -> Result<(), GatewayError> {
        const OPERATION: &str = "metadata insert";

        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let body = serde_json::to_vec(record)?;
        debug!("Inserting metadata row {} into {}", record.id, table);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                operation: OPERATION,
                source,
            })?;

        check_status(OPERATION, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_project_path_prefix() {
        let gateway =
            SupabaseGateway::new(Url::parse("http://localhost:54321/proxy").unwrap(), "k").unwrap();
        assert_eq!(
            gateway.endpoint("rest/v1/metadata").unwrap().as_str(),
            "http://localhost:54321/proxy/rest/v1/metadata"
        );
        assert_eq!(
            gateway
                .public_object_url("shots", "screenshots/a.png")
                .unwrap()
                .as_str(),
            "http://localhost:54321/proxy/storage/v1/object/public/shots/screenshots/a.png"
        );
    }

    #[test]
    fn debug_redacts_key() {
        let gateway =
            SupabaseGateway::new(Url::parse("https://x.supabase.co").unwrap(), "secret-key")
                .unwrap();
        assert!(!format!("{gateway:?}").contains("secret-key"));
    }
}

//! Timeout wrapper for browser operations
//!
//! CDP calls such as `goto` can hang indefinitely on streaming pages or a
//! wedged renderer; every navigation in the session goes through this.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Run `operation` with an explicit timeout
///
/// Distinguishes the timeout case from the operation's own failure in the
/// error message so logs show which one happened.
pub async fn with_page_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("{operation_name} timeout after {timeout:?}")),
    }
}

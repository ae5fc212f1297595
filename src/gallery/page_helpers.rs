//! Polling helpers over chromiumoxide `Page` and `Element`
//!
//! `page.wait_for_navigation()` returns once the HTTP response arrives, but the
//! gallery renders its cards and frames with JavaScript afterwards. These
//! helpers poll the DOM at a fixed interval until an element (or a script
//! condition) shows up or the timeout expires.

use anyhow::{Result, anyhow};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Wait for `selector` to match, failing after `timeout`
pub async fn wait_for_element(page: &Page, selector: &str, timeout: Duration) -> Result<Element> {
    let start = Instant::now();

    loop {
        match page.find_element(selector).await {
            Ok(element) => {
                debug!("'{}' present after {:?}", selector, start.elapsed());
                return Ok(element);
            }
            Err(_) if start.elapsed() >= timeout => {
                let url = get_page_url_with_fallback(page).await;
                return Err(anyhow!(
                    "Timeout waiting for '{selector}' after {timeout:?}. Page URL: {url}"
                ));
            }
            Err(_) => tokio::time::sleep(POLL_INTERVAL).await,
        }
    }
}

/// Wait for an element that may legitimately never appear
///
/// Returns `None` once `timeout` expires instead of an error.
pub async fn find_optional(page: &Page, selector: &str, timeout: Duration) -> Option<Element> {
    match wait_for_element(page, selector, timeout).await {
        Ok(element) => Some(element),
        Err(e) => {
            trace!("Optional element absent: {}", e);
            None
        }
    }
}

/// Poll a boolean JavaScript expression until it evaluates to `true`
pub async fn wait_for_condition(
    page: &Page,
    expression: &str,
    timeout: Duration,
    what: &str,
) -> Result<()> {
    let start = Instant::now();

    loop {
        if evaluate_bool(page, expression).await {
            debug!("{} after {:?}", what, start.elapsed());
            return Ok(());
        }

        if start.elapsed() >= timeout {
            let url = get_page_url_with_fallback(page).await;
            return Err(anyhow!("Timeout waiting for {what} after {timeout:?}. Page URL: {url}"));
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Evaluate an expression expected to return a boolean; any failure is `false`
pub async fn evaluate_bool(page: &Page, expression: &str) -> bool {
    match page.evaluate(expression).await {
        Ok(result) => result.into_value::<bool>().unwrap_or(false),
        Err(e) => {
            trace!("Evaluation failed: {}", e);
            false
        }
    }
}

/// Get page URL with diagnostic fallback
///
/// Returns `"about:blank"` on any failure for clear diagnostics.
pub async fn get_page_url_with_fallback(page: &Page) -> String {
    match page.url().await {
        Ok(Some(url)) => url,
        Ok(None) => {
            trace!("Page URL is None (page not yet navigated)");
            "about:blank".to_string()
        }
        Err(e) => {
            trace!("Failed to get page URL (browser communication error): {}", e);
            "about:blank".to_string()
        }
    }
}

/// Inner text of the first `selector` match below `element`, trimmed
pub async fn child_text(element: &Element, selector: &str) -> Option<String> {
    let child = element.find_element(selector).await.ok()?;
    child
        .inner_text()
        .await
        .ok()
        .flatten()
        .map(|text| text.trim().to_string())
}

/// Attribute of the first `selector` match below `element`
pub async fn child_attribute(element: &Element, selector: &str, attribute: &str) -> Option<String> {
    let child = element.find_element(selector).await.ok()?;
    child.attribute(attribute).await.ok().flatten()
}

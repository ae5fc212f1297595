//! URL helpers for the gallery listing and its detail links.

use anyhow::{Context, Result};
use url::Url;

/// Build the search listing URL for a 1-indexed page number.
///
/// The query is percent-encoded into the path segment the gallery expects,
/// e.g. `https://public.tableau.com/app/search/vizzes/superstore%20sales?page=2`.
pub fn listing_url(origin: &Url, query: &str, page: u32) -> Result<Url> {
    let path = format!("app/search/vizzes/{}", urlencoding::encode(query.trim()));
    let mut url = origin
        .join(&path)
        .with_context(|| format!("Failed to build listing URL for query '{query}'"))?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string());
    Ok(url)
}

/// Resolve a link from page markup against the gallery origin.
///
/// Absolute hrefs pass through unchanged; relative and root-relative hrefs are
/// joined onto `base`. Non-http(s) results are rejected.
pub fn resolve_link(base: &Url, href: &str) -> Result<Url> {
    let href = href.trim();
    if href.is_empty() {
        anyhow::bail!("Link href is empty");
    }

    let resolved = base
        .join(href)
        .with_context(|| format!("Failed to resolve link '{href}' against {base}"))?;

    if !matches!(resolved.scheme(), "http" | "https") {
        anyhow::bail!("Link '{href}' resolved to unsupported scheme '{}'", resolved.scheme());
    }

    Ok(resolved)
}

/// Check if a URL is a valid http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

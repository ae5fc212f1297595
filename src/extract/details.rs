//! Name, author and link extraction for listing cards

use thiserror::Error;
use tracing::warn;
use url::Url;

use super::favorites::{FavoriteReading, read_favorites};
use crate::gallery::EntryMarkup;
use crate::utils::resolve_link;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("entry has no title element")]
    MissingTitle,

    #[error("entry '{0}' has no detail link")]
    MissingLink(String),

    #[error("entry '{name}' has an unusable link '{href}': {reason}")]
    BadLink {
        name: String,
        href: String,
        reason: String,
    },
}

/// What the listing pass needs from a card: position, name, favorites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub index: usize,
    pub name: String,
    pub favorites: FavoriteReading,
}

/// What the capture pass needs from a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetails {
    pub name: String,
    pub link: Url,
    pub author: String,
}

/// Read name and favorite count for the listing pass
pub fn scan_entry(index: usize, markup: &EntryMarkup) -> Result<ListingEntry, ExtractError> {
    Ok(ListingEntry {
        index,
        name: entry_name(markup)?,
        favorites: read_favorites(markup.favorite_tooltip.as_deref(), markup.markup.as_deref()),
    })
}

/// Read name, absolute link and author for the capture pass
///
/// A missing author is tolerated (the gallery hides it for some profiles);
/// a missing title or link is not.
pub fn extract_details(markup: &EntryMarkup, origin: &Url) -> Result<EntryDetails, ExtractError> {
    let name = entry_name(markup)?;

    let href = markup
        .href
        .as_deref()
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or_else(|| ExtractError::MissingLink(name.clone()))?;

    let link = resolve_link(origin, href).map_err(|e| ExtractError::BadLink {
        name: name.clone(),
        href: href.to_string(),
        reason: format!("{e:#}"),
    })?;

    let author = match markup.author.as_deref().map(str::trim) {
        Some(author) if !author.is_empty() => author.to_string(),
        _ => {
            warn!("Entry '{}' has no author label", name);
            String::new()
        }
    };

    Ok(EntryDetails { name, link, author })
}

fn entry_name(markup: &EntryMarkup) -> Result<String, ExtractError> {
    markup
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .ok_or(ExtractError::MissingTitle)
}

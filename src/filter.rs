//! Qualification filter: which listing entries get captured

use crate::extract::ListingEntry;

/// A listing entry that met the favorite threshold
///
/// `index` is the entry's position in the listing; it is the only way to find
/// the entry again after navigating away and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingEntry {
    pub index: usize,
    pub name: String,
    pub favorites: u32,
}

/// Keep entries whose favorite count is at least `threshold`, in listing order
///
/// Pure; unknown counts never qualify.
#[must_use]
pub fn qualify(entries: &[ListingEntry], threshold: u32) -> Vec<QualifyingEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            let count = entry.favorites.count()?;
            (count >= threshold).then(|| QualifyingEntry {
                index: entry.index,
                name: entry.name.clone(),
                favorites: count,
            })
        })
        .collect()
}

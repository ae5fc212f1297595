//! Favorite-count reading for listing cards
//!
//! Two tiers: the favorite toggle's tooltip attribute, then a scan of the
//! card's raw markup. A card with neither yields `FavoriteReading::Unknown`,
//! which never meets any threshold.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Sentinel reported for an unknown count where a plain integer is needed
pub const UNKNOWN_FAVORITES: i64 = -1;

static TOOLTIP_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)").expect("Invalid favorite count regex")
});

/// Markup fallbacks, most specific first
static MARKUP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"data-tooltip-content="(\d+)\s+Favou?rites?""#,
        r#"data-tooltip-content=&quot;(\d+)\s+Favou?rites?&quot;"#,
        r#"data-tooltip-content=&#34;(\d+)\s+Favou?rites?&#34;"#,
        r#"data-tooltip-content='(\d+)\s+Favou?rites?'"#,
        r"(\d+)\s+Favou?rites?",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid favorite count regex"))
    .collect()
});

/// Where a favorite count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteReading {
    /// Read from the favorite toggle's tooltip
    Tooltip(u32),
    /// Recovered from the card markup
    Markup(u32),
    /// No count available
    Unknown(MissReason),
}

/// Why a count could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Neither a tooltip nor markup was available
    NoSource,
    /// Sources were present but no pattern matched
    NoMatch,
    /// A number matched but does not fit a `u32`
    OutOfRange,
}

impl FavoriteReading {
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Tooltip(n) | Self::Markup(n) => Some(*n),
            Self::Unknown(_) => None,
        }
    }

    /// Count as a plain integer, `-1` when unknown
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.count().map_or(UNKNOWN_FAVORITES, i64::from)
    }

    /// Inclusive threshold check; unknown never qualifies
    #[must_use]
    pub fn meets(&self, threshold: u32) -> bool {
        self.count().is_some_and(|n| n >= threshold)
    }

    /// True when the primary tooltip source was not used
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Tooltip(_))
    }
}

impl fmt::Display for FavoriteReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count() {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "{UNKNOWN_FAVORITES}"),
        }
    }
}

/// Read a favorite count from a card's tooltip and markup
///
/// Never fails: every miss degrades to `FavoriteReading::Unknown`.
#[must_use]
pub fn read_favorites(tooltip: Option<&str>, markup: Option<&str>) -> FavoriteReading {
    let mut reason = MissReason::NoSource;

    if let Some(tooltip) = tooltip {
        match leading_number(&TOOLTIP_NUMBER, tooltip) {
            Some(Ok(n)) => return FavoriteReading::Tooltip(n),
            Some(Err(())) => reason = MissReason::OutOfRange,
            None => reason = MissReason::NoMatch,
        }
    }

    if let Some(markup) = markup {
        for pattern in MARKUP_PATTERNS.iter() {
            match leading_number(pattern, markup) {
                Some(Ok(n)) => return FavoriteReading::Markup(n),
                Some(Err(())) => reason = MissReason::OutOfRange,
                None => {}
            }
        }
        if reason == MissReason::NoSource {
            reason = MissReason::NoMatch;
        }
    }

    FavoriteReading::Unknown(reason)
}

fn leading_number(pattern: &Regex, haystack: &str) -> Option<Result<u32, ()>> {
    let digits = pattern.captures(haystack)?.get(1)?.as_str();
    Some(digits.parse::<u32>().map_err(|_| ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_wins_over_markup() {
        let reading = read_favorites(Some("12 Favorites"), Some("<b>99 Favorites</b>"));
        assert_eq!(reading, FavoriteReading::Tooltip(12));
        assert!(!reading.is_degraded());
    }

    #[test]
    fn unknown_prints_sentinel() {
        let reading = read_favorites(None, None);
        assert_eq!(reading.to_string(), "-1");
        assert_eq!(reading.as_i64(), -1);
        assert!(!reading.meets(0));
    }
}

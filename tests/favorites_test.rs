//! Favorite-count reading over assorted card markup

use proptest::prelude::*;
use vizcapture::extract::{FavoriteReading, MissReason, UNKNOWN_FAVORITES, read_favorites};

#[test]
fn tooltip_leading_number_is_used() {
    assert_eq!(
        read_favorites(Some("42 Favorites"), None),
        FavoriteReading::Tooltip(42)
    );
    assert_eq!(
        read_favorites(Some("1 Favorite"), None),
        FavoriteReading::Tooltip(1)
    );
}

#[test]
fn markup_fallback_covers_quote_and_spelling_variants() {
    let cases = [
        (r#"<button data-tooltip-content="17 Favorites">"#, 17),
        (r#"<button data-tooltip-content="1 Favorite">"#, 1),
        (r#"<button data-tooltip-content="8 Favourites">"#, 8),
        ("data-tooltip-content=&quot;23 Favorites&quot;", 23),
        ("data-tooltip-content=&#34;5 Favourite&#34;", 5),
        ("<button data-tooltip-content='9 Favorites'>", 9),
        ("<span>31 Favorites</span>", 31),
    ];

    for (markup, expected) in cases {
        assert_eq!(
            read_favorites(None, Some(markup)),
            FavoriteReading::Markup(expected),
            "markup: {markup}"
        );
    }
}

#[test]
fn tooltip_without_number_falls_back_to_markup() {
    let reading = read_favorites(Some("Add to Favorites"), Some("<i>6 Favorites</i>"));
    assert_eq!(reading, FavoriteReading::Markup(6));
    assert!(reading.is_degraded());
}

#[test]
fn misses_are_distinguished() {
    assert_eq!(
        read_favorites(None, None),
        FavoriteReading::Unknown(MissReason::NoSource)
    );
    assert_eq!(
        read_favorites(Some("Favorite"), Some("<div>views: many</div>")),
        FavoriteReading::Unknown(MissReason::NoMatch)
    );
    assert_eq!(
        read_favorites(Some("99999999999 Favorites"), None),
        FavoriteReading::Unknown(MissReason::OutOfRange)
    );
}

#[test]
fn unknown_reports_sentinel_and_never_qualifies() {
    let reading = read_favorites(None, Some(""));
    assert_eq!(reading.as_i64(), UNKNOWN_FAVORITES);
    assert!(!reading.meets(0));
}

proptest! {
    #[test]
    fn arbitrary_input_never_panics(tooltip in proptest::option::of(".*"), markup in proptest::option::of(".*")) {
        let reading = read_favorites(tooltip.as_deref(), markup.as_deref());
        prop_assert!(reading.as_i64() >= UNKNOWN_FAVORITES);
    }

    #[test]
    fn markup_variants_yield_the_count(
        n in 0u32..1_000_000,
        word in prop::sample::select(vec!["Favorite", "Favorites", "Favourite", "Favourites"]),
        quote in prop::sample::select(vec!["\"", "&quot;", "&#34;", "'"]),
    ) {
        let markup = format!("<button data-tooltip-content={quote}{n} {word}{quote}></button>");
        prop_assert_eq!(read_favorites(None, Some(&markup)), FavoriteReading::Markup(n));
    }

    #[test]
    fn tooltip_count_round_trips(n in 0u32..=u32::MAX) {
        let tooltip = format!("{n} Favorites");
        prop_assert_eq!(read_favorites(Some(&tooltip), None).count(), Some(n));
    }
}

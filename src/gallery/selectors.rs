//! DOM selectors and injected scripts for the public visualization gallery
//!
//! The gallery ships CSS-module class names with build hashes. They change
//! when the site redeploys, so every selector lives here.

/// Wrapper around the search result list
pub const LIST_CONTAINER_SELECTOR: &str = "._listContainer_6uimr_22";

/// One search result card
pub const LIST_ITEM_SELECTOR: &str = "._listItem_6uimr_62";

/// Title anchor inside a card (text = name, href = detail link)
pub const TITLE_SELECTOR: &str = "._title_1o7u1_130";

/// Author label inside a card
pub const AUTHOR_SELECTOR: &str = "._author_1o7u1_143";

/// Favorite toggle carrying e.g. `data-tooltip-content="12 Favorites"`
pub const FAVORITE_BUTTON_SELECTOR: &str = "button[data-tooltip-content*='Favorite']";

/// Attribute holding the favorite tooltip text
pub const FAVORITE_TOOLTIP_ATTR: &str = "data-tooltip-content";

/// OneTrust "Accept all" button
pub const CONSENT_ACCEPT_SELECTOR: &str = "#onetrust-accept-btn-handler";

/// Embedded rendering frame on a detail page
pub const VIZ_FRAME_SELECTOR: &str = "#embedded-viz-wrapper iframe";

/// "Explore Vizzes" side panel close button
pub const SIDE_PANEL_CLOSE_SELECTOR: &str = "button[aria-label='Close Side Panel']";

/// Strips navigation and marketing chrome from a detail page.
pub const STRIP_PAGE_CHROME_JS: &str = r#"
(() => {
    let removed = 0;
    const drop = (selector) => document.querySelectorAll(selector).forEach(el => { el.remove(); removed++; });
    drop('[class*="_navBar_"], nav, header');
    drop('[class*="_banner_"], [data-testid="marketingBanner"]');
    drop('[class*="_nav_"]');
    return removed;
})()
"#;

/// Applies a CSS zoom to the hosting page body.
#[must_use]
pub fn zoom_js(zoom: f64) -> String {
    format!("(() => {{ document.body.style.zoom = '{zoom}'; return true; }})()")
}

/// True once the embedded frame's document is reachable from the host page.
#[must_use]
pub fn frame_document_js() -> String {
    format!(
        "(() => {{ const f = document.querySelector(\"{VIZ_FRAME_SELECTOR}\"); \
         try {{ return !!(f && f.contentDocument); }} catch (e) {{ return false; }} }})()"
    )
}

/// True once the embedded frame's root content element exists.
#[must_use]
pub fn frame_root_js() -> String {
    format!(
        "(() => {{ const f = document.querySelector(\"{VIZ_FRAME_SELECTOR}\"); \
         try {{ return !!(f && f.contentDocument && f.contentDocument.body); }} \
         catch (e) {{ return false; }} }})()"
    )
}

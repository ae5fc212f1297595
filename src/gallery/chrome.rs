//! chromiumoxide implementation of `GalleryDriver`
//!
//! One browser, one page, driven strictly sequentially. chromiumoxide has no
//! frame switching, so the "inside the frame" context is tracked here and
//! frame-level queries are evaluated against the frame's `contentDocument`
//! from the hosting page (reachable because the browser is launched with web
//! security and site isolation disabled).

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::driver::{EntryMarkup, GalleryDriver};
use super::page_helpers::{
    child_attribute, child_text, evaluate_bool, find_optional, wait_for_condition,
    wait_for_element,
};
use super::selectors::{
    AUTHOR_SELECTOR, CONSENT_ACCEPT_SELECTOR, FAVORITE_BUTTON_SELECTOR, FAVORITE_TOOLTIP_ATTR,
    LIST_CONTAINER_SELECTOR, LIST_ITEM_SELECTOR, SIDE_PANEL_CLOSE_SELECTOR, STRIP_PAGE_CHROME_JS,
    TITLE_SELECTOR, VIZ_FRAME_SELECTOR, frame_document_js, frame_root_js, zoom_js,
};
use crate::browser_setup::launch_browser;
use crate::config::CaptureConfig;
use crate::crawl_engine::cleanup::{CleanupResult, cleanup_browser_and_data};
use crate::crawl_engine::page_timeout::with_page_timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameContext {
    /// No frame located since the last navigation
    Absent,
    /// Frame located; session is on the hosting page
    Located,
    /// Session is inside the frame's document
    Inside,
}

pub struct ChromeGallery {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: PathBuf,
    page: Page,
    navigation_timeout: Duration,
    frame: FrameContext,
    closed: bool,
}

impl ChromeGallery {
    /// Launch Chromium and open the single page the session drives
    pub async fn launch(config: &CaptureConfig) -> Result<Self> {
        let navigation_timeout = config.timings().navigation_timeout;
        let launched = launch_browser(config.headless(), navigation_timeout).await?;

        let page = launched
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create session page")?;

        info!("Browser session ready");

        Ok(Self {
            browser: launched.browser,
            handler: launched.handler,
            user_data_dir: launched.user_data_dir,
            page,
            navigation_timeout,
            frame: FrameContext::Absent,
            closed: false,
        })
    }

    async fn navigate(&mut self, url: &str, operation: &str) -> Result<()> {
        self.frame = FrameContext::Absent;
        let page = self.page.clone();
        with_page_timeout(
            async move {
                page.goto(url)
                    .await
                    .with_context(|| format!("Failed to navigate to {url}"))?;
                page.wait_for_navigation()
                    .await
                    .with_context(|| format!("Failed waiting for {url} to load"))?;
                Ok(())
            },
            self.navigation_timeout,
            operation,
        )
        .await
    }

    fn require_inside(&self, operation: &str) -> Result<()> {
        if self.frame != FrameContext::Inside {
            bail!("{operation} requires the session to be inside the visualization frame");
        }
        Ok(())
    }

    async fn read_entry(card: &Element) -> EntryMarkup {
        let title = child_text(card, TITLE_SELECTOR).await;
        let href = child_attribute(card, TITLE_SELECTOR, "href").await;
        let author = child_text(card, AUTHOR_SELECTOR).await;
        let favorite_tooltip =
            child_attribute(card, FAVORITE_BUTTON_SELECTOR, FAVORITE_TOOLTIP_ATTR).await;
        let markup = card.outer_html().await.ok().flatten();

        EntryMarkup {
            title,
            href,
            author,
            favorite_tooltip,
            markup,
        }
    }
}

#[async_trait]
impl GalleryDriver for ChromeGallery {
    async fn open_listing(&mut self, url: &str) -> Result<()> {
        debug!("Opening listing {}", url);
        self.navigate(url, "Listing navigation").await
    }

    async fn accept_consent(&mut self, timeout: Duration) -> Result<bool> {
        match find_optional(&self.page, CONSENT_ACCEPT_SELECTOR, timeout).await {
            Some(button) => {
                button
                    .click()
                    .await
                    .context("Failed to click cookie-consent button")?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn wait_for_listing(&mut self, timeout: Duration) -> Result<()> {
        wait_for_element(&self.page, LIST_CONTAINER_SELECTOR, timeout)
            .await
            .map(|_| ())
    }

    async fn listing_entries(&mut self) -> Result<Vec<EntryMarkup>> {
        let cards = self
            .page
            .find_elements(LIST_ITEM_SELECTOR)
            .await
            .context("Failed to enumerate listing cards")?;

        let mut entries = Vec::with_capacity(cards.len());
        for card in &cards {
            entries.push(Self::read_entry(card).await);
        }
        Ok(entries)
    }

    async fn open_detail(&mut self, url: &str) -> Result<()> {
        self.navigate(url, "Detail navigation").await
    }

    async fn prepare_detail(&mut self, zoom: f64) -> Result<()> {
        let zoom_script = zoom_js(zoom);
        self.page
            .evaluate(zoom_script.as_str())
            .await
            .context("Failed to apply page zoom")?;

        let removed = self
            .page
            .evaluate(STRIP_PAGE_CHROME_JS)
            .await
            .context("Failed to strip page chrome")?
            .into_value::<u64>()
            .unwrap_or(0);
        debug!("Removed {} navigation/banner elements", removed);
        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        self.frame = FrameContext::Absent;
        let page = self.page.clone();
        with_page_timeout(
            async move {
                page.reload().await.context("Failed to reload page")?;
                page.wait_for_navigation()
                    .await
                    .context("Failed waiting for reload")?;
                Ok(())
            },
            self.navigation_timeout,
            "Page refresh",
        )
        .await
    }

    async fn locate_frame(&mut self, timeout: Duration) -> Result<()> {
        wait_for_element(&self.page, VIZ_FRAME_SELECTOR, timeout).await?;
        self.frame = FrameContext::Located;
        Ok(())
    }

    async fn enter_frame(&mut self) -> Result<()> {
        match self.frame {
            FrameContext::Absent => bail!("No visualization frame located on this page"),
            FrameContext::Inside => Ok(()),
            FrameContext::Located => {
                if !evaluate_bool(&self.page, &frame_document_js()).await {
                    bail!("Visualization frame document is not accessible");
                }
                self.frame = FrameContext::Inside;
                Ok(())
            }
        }
    }

    async fn exit_frame(&mut self) -> Result<()> {
        if self.frame == FrameContext::Inside {
            self.frame = FrameContext::Located;
        }
        Ok(())
    }

    async fn dismiss_side_panel(&mut self, timeout: Duration) -> Result<bool> {
        if self.frame == FrameContext::Inside {
            bail!("Side panel lives on the hosting page; exit the frame first");
        }

        match find_optional(&self.page, SIDE_PANEL_CLOSE_SELECTOR, timeout).await {
            Some(button) => {
                button
                    .click()
                    .await
                    .context("Failed to click side panel close button")?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn wait_for_frame_root(&mut self, timeout: Duration) -> Result<()> {
        self.require_inside("Waiting for the frame root")?;
        wait_for_condition(&self.page, &frame_root_js(), timeout, "frame body").await
    }

    async fn capture_frame_root(&mut self, output: &Path) -> Result<()> {
        self.require_inside("Capturing the frame root")?;

        // The frame element's box is exactly the frame body's rendered bounds
        let frame = self
            .page
            .find_element(VIZ_FRAME_SELECTOR)
            .await
            .context("Visualization frame disappeared before capture")?;

        let png = frame
            .screenshot(CaptureScreenshotFormat::Png)
            .await
            .map_err(|e| anyhow!("Failed to capture frame: {e}"))?;

        if png.is_empty() {
            bail!("Frame capture returned an empty image");
        }

        tokio::fs::write(output, &png)
            .await
            .with_context(|| format!("Failed to write capture to {}", output.display()))?;

        debug!("Captured {} bytes to {}", png.len(), output.display());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        info!("Closing browser session");
        let result = cleanup_browser_and_data(&mut self.browser, &self.user_data_dir).await?;
        self.handler.abort();

        if let CleanupResult::PartialFailure(errors) = result {
            warn!("Browser cleanup incomplete: {}", errors.join("; "));
        }
        Ok(())
    }
}

impl Drop for ChromeGallery {
    fn drop(&mut self) {
        if !self.closed {
            warn!("ChromeGallery dropped without close() - aborting handler task");
            self.handler.abort();
        }
    }
}

//! One Chromium browser driving a single crawl

use anyhow::{Context, Result, anyhow};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::{Browser, Page};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use super::cache::ResultCache;
use super::markdown::render_variants;
use super::page_timeout::with_page_timeout;
use super::scripts::{
    METADATA_SCRIPT, READY_STATE_SCRIPT, REMOVE_OVERLAYS_SCRIPT, SCROLL_STEP_SCRIPT,
    SCROLL_TOP_SCRIPT, selector_html_script,
};
use crate::config::{BrowserConfig, RunConfig};
use crate::engine::{EngineSession, MarkdownOutput, RawCrawlResult, Screenshot};
use crate::error::{CrawlError, CrawlResult};
use crate::extraction::LlmExtractor;

/// Upper bound on viewport-sized scroll steps during a full-page scan
const MAX_SCROLL_STEPS: usize = 50;

/// Page content captured before extraction
struct RenderedPage {
    html: String,
    metadata: Map<String, Value>,
    screenshot: Option<Vec<u8>>,
}

/// Session owning a launched browser, its CDP handler task and its profile directory
pub struct ChromiumSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    profile_dir: PathBuf,
    browser_config: BrowserConfig,
    cache: ResultCache,
    extractor: LlmExtractor,
}

impl ChromiumSession {
    pub(super) fn new(
        browser: Browser,
        handler: JoinHandle<()>,
        profile_dir: PathBuf,
        browser_config: BrowserConfig,
        cache: ResultCache,
        extractor: LlmExtractor,
    ) -> Self {
        Self {
            browser: Some(browser),
            handler: Some(handler),
            profile_dir,
            browser_config,
            cache,
            extractor,
        }
    }

    async fn render(&self, browser: &Browser, url: &Url, config: &RunConfig) -> Result<RenderedPage> {
        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create page")?;

        let rendered = self.render_on(&page, url, config).await;

        if let Err(e) = page.close().await {
            debug!("Failed to close page for {url}: {e}");
        }
        rendered
    }

    async fn render_on(&self, page: &Page, url: &Url, config: &RunConfig) -> Result<RenderedPage> {
        page.execute(
            SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(self.browser_config.viewport_width))
                .height(i64::from(self.browser_config.viewport_height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(anyhow::Error::msg)?,
        )
        .await
        .context("Failed to set viewport")?;

        let started = Instant::now();
        with_page_timeout(
            async {
                page.goto(url.as_str())
                    .await
                    .map_err(|e| anyhow!("{e}"))?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| anyhow!("{e}"))?;
                Ok(())
            },
            config.page_timeout,
            "Page navigation",
        )
        .await?;

        let remaining = config.page_timeout.saturating_sub(started.elapsed());
        wait_for_page_load(page, remaining, config.wait_for_images).await;

        if config.scan_full_page {
            scroll_full_page(page, config.scroll_delay).await;
        }

        if config.remove_overlay_elements {
            match page.evaluate(REMOVE_OVERLAYS_SCRIPT).await {
                Ok(result) => debug!(
                    "Removed {} overlay elements from {url}",
                    result.into_value::<u64>().unwrap_or(0)
                ),
                Err(e) => warn!("Overlay removal failed for {url}: {e}"),
            }
        }

        let html = match config.css_selector.as_deref() {
            Some(selector) => page
                .evaluate(selector_html_script(selector))
                .await
                .map_err(|e| anyhow!("Selector evaluation failed: {e}"))?
                .into_value::<Option<String>>()
                .map_err(|e| anyhow!("Selector result unreadable: {e}"))?
                .ok_or_else(|| anyhow!("No elements match css_selector '{selector}'"))?,
            None => page.content().await.context("Failed to read page content")?,
        };

        let metadata = match page.evaluate(METADATA_SCRIPT).await {
            Ok(result) => result
                .into_value::<Map<String, Value>>()
                .map(|m| m.into_iter().filter(|(_, v)| !v.is_null()).collect())
                .unwrap_or_default(),
            Err(e) => {
                warn!("Metadata extraction failed for {url}: {e}");
                Map::new()
            }
        };

        let screenshot = if config.screenshot {
            let params = CaptureScreenshotParams {
                format: Some(CaptureScreenshotFormat::Png),
                capture_beyond_viewport: Some(true),
                ..Default::default()
            };
            Some(
                page.screenshot(params)
                    .await
                    .map_err(|e| anyhow!("Failed to capture screenshot: {e}"))?,
            )
        } else {
            None
        };

        Ok(RenderedPage {
            html,
            metadata,
            screenshot,
        })
    }
}

/// Poll readiness until the document is complete, giving up quietly at `max_wait`
async fn wait_for_page_load(page: &Page, max_wait: Duration, wait_for_images: bool) {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(100);

    loop {
        if start.elapsed() >= max_wait {
            warn!("Timeout waiting for page load, proceeding anyway");
            return;
        }

        if let Ok(result) = page.evaluate(READY_STATE_SCRIPT).await
            && let Ok(value) = result.into_value::<Value>()
        {
            let complete = value.get("readyState").and_then(Value::as_str) == Some("complete");
            let body = value.get("bodyExists").and_then(Value::as_bool).unwrap_or(false);
            let images = value.get("imagesLoaded").and_then(Value::as_bool).unwrap_or(false);

            if complete && body && (images || !wait_for_images) {
                debug!("Page ready after {:.2}s", start.elapsed().as_secs_f64());
                return;
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Scroll to the bottom one viewport at a time so lazy content loads, then back to the top
async fn scroll_full_page(page: &Page, delay: Duration) {
    for _ in 0..MAX_SCROLL_STEPS {
        match page.evaluate(SCROLL_STEP_SCRIPT).await {
            Ok(result) => {
                if result.into_value::<bool>().unwrap_or(true) {
                    break;
                }
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                debug!("Scroll step failed: {e}");
                break;
            }
        }
    }
    if let Err(e) = page.evaluate(SCROLL_TOP_SCRIPT).await {
        debug!("Scroll reset failed: {e}");
    }
}

#[async_trait::async_trait]
impl EngineSession for ChromiumSession {
    async fn run(&mut self, url: &Url, config: &RunConfig) -> CrawlResult<RawCrawlResult> {
        if let Some(hit) = self.cache.lookup(url, config) {
            info!("Cache hit for {url}");
            return Ok(hit);
        }

        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| CrawlError::Execution("browser session already closed".into()))?;

        let RenderedPage {
            html,
            metadata,
            screenshot,
        } = self.render(browser, url, config).await?;

        // htmd and scraper parse the whole document; keep that off the async workers
        let filter = config.content_filter.clone();
        let threshold = config.word_count_threshold;
        let (html, variants) = tokio::task::spawn_blocking(move || {
            let variants = render_variants(&html, filter.as_ref(), threshold);
            (html, variants)
        })
        .await
        .map_err(|e| CrawlError::Execution(format!("Markdown rendering task failed: {e}")))?;
        let variants = variants.map_err(|e| CrawlError::Parsing(format!("{e:#}")))?;

        let extracted_content = match config.extraction_strategy.as_ref() {
            Some(strategy) => {
                let source = variants
                    .fit_markdown
                    .as_deref()
                    .filter(|md| !md.trim().is_empty())
                    .or(variants.raw_markdown.as_deref())
                    .unwrap_or_default();
                Some(self.extractor.extract(strategy, url.as_str(), source).await?)
            }
            None => None,
        };

        let result = RawCrawlResult {
            url: url.to_string(),
            markdown: Some(MarkdownOutput::Variants(variants)),
            html: Some(html),
            metadata: Some(metadata),
            extracted_content,
            screenshot: screenshot.map(Screenshot::Bytes),
            success: true,
            error_message: None,
            status_code: None,
        };

        self.cache.store(url, config, &result);
        Ok(result)
    }

    async fn close(&mut self) -> CrawlResult<()> {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {e}");
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        if self.profile_dir.exists()
            && let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await
        {
            warn!(
                "Failed to remove browser profile {}: {e}",
                self.profile_dir.display()
            );
        }

        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // close() normally ran already; this only covers abandoned sessions
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

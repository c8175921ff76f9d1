//! Builders for browser and run configuration
//!
//! Both builders are pure: no I/O, no environment access. Everything they need
//! arrives as arguments, which keeps them trivially testable.

use std::time::Duration;

use super::types::{BrowserConfig, CacheMode, RunConfig};
use crate::content_filter::ContentFilter;
use crate::extraction::ExtractionStrategy;
use crate::schema::CrawlRequest;
use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_WORD_COUNT_THRESHOLD, PAGE_TIMEOUT_SECS, VIEWPORT_HEIGHT,
    VIEWPORT_WIDTH,
};

/// Fixed browser configuration for the life of the process
#[must_use]
pub fn build_browser_config(headless: bool) -> BrowserConfig {
    BrowserConfig {
        headless,
        viewport_width: VIEWPORT_WIDTH,
        viewport_height: VIEWPORT_HEIGHT,
        user_agent: CHROME_USER_AGENT.to_string(),
    }
}

/// Fresh run configuration for one request
#[must_use]
pub fn build_run_config(
    request: &CrawlRequest,
    content_filter: Option<ContentFilter>,
    extraction_strategy: Option<ExtractionStrategy>,
) -> RunConfig {
    let cache_mode = if request.bypass_cache {
        CacheMode::Bypass
    } else {
        CacheMode::Enabled
    };

    RunConfig::builder()
        .cache_mode(cache_mode)
        .css_selector(request.css_selector().map(str::to_string))
        .word_count_threshold(request.word_count_threshold())
        .screenshot(request.screenshot)
        .content_filter(content_filter)
        .extraction_strategy(extraction_strategy)
        .build()
}

/// Fluent builder for [`RunConfig`]
///
/// Defaults: cache enabled, 120 s page timeout, full-page scan with image
/// waiting, overlay removal on, no filter, no extraction.
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self {
            config: RunConfig {
                cache_mode: CacheMode::Enabled,
                css_selector: None,
                word_count_threshold: usize::try_from(DEFAULT_WORD_COUNT_THRESHOLD).unwrap_or(10),
                screenshot: true,
                page_timeout: Duration::from_secs(PAGE_TIMEOUT_SECS),
                scan_full_page: true,
                scroll_delay: Duration::from_millis(200),
                wait_for_images: true,
                remove_overlay_elements: true,
                content_filter: None,
                extraction_strategy: None,
            },
        }
    }
}

impl RunConfig {
    /// Create a builder for configuring a `RunConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }
}

impl RunConfigBuilder {
    #[must_use]
    pub fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.config.cache_mode = mode;
        self
    }

    #[must_use]
    pub fn css_selector(mut self, selector: Option<String>) -> Self {
        self.config.css_selector = selector;
        self
    }

    #[must_use]
    pub fn word_count_threshold(mut self, words: usize) -> Self {
        self.config.word_count_threshold = words;
        self
    }

    #[must_use]
    pub fn screenshot(mut self, enabled: bool) -> Self {
        self.config.screenshot = enabled;
        self
    }

    #[must_use]
    pub fn page_timeout(mut self, timeout: Duration) -> Self {
        self.config.page_timeout = timeout;
        self
    }

    #[must_use]
    pub fn scan_full_page(mut self, enabled: bool) -> Self {
        self.config.scan_full_page = enabled;
        self
    }

    #[must_use]
    pub fn wait_for_images(mut self, enabled: bool) -> Self {
        self.config.wait_for_images = enabled;
        self
    }

    #[must_use]
    pub fn remove_overlay_elements(mut self, enabled: bool) -> Self {
        self.config.remove_overlay_elements = enabled;
        self
    }

    #[must_use]
    pub fn content_filter(mut self, filter: Option<ContentFilter>) -> Self {
        self.config.content_filter = filter;
        self
    }

    #[must_use]
    pub fn extraction_strategy(mut self, strategy: Option<ExtractionStrategy>) -> Self {
        self.config.extraction_strategy = strategy;
        self
    }

    #[must_use]
    pub fn build(self) -> RunConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_filter::PruningFilter;
    use url::Url;

    fn request() -> CrawlRequest {
        CrawlRequest::new(Url::parse("https://example.com").expect("valid url"))
    }

    #[test]
    fn browser_config_is_fixed() {
        let config = build_browser_config(true);
        assert!(config.headless);
        assert_eq!((config.viewport_width, config.viewport_height), (1920, 1080));
        assert!(config.user_agent.contains("Chrome/"));
        assert_eq!(config, build_browser_config(true));
    }

    #[test]
    fn bypass_cache_maps_to_bypass_mode() {
        let mut req = request();
        assert_eq!(build_run_config(&req, None, None).cache_mode, CacheMode::Bypass);

        req.bypass_cache = false;
        assert_eq!(build_run_config(&req, None, None).cache_mode, CacheMode::Enabled);
    }

    #[test]
    fn run_config_mirrors_request_and_fixes_timing() {
        let mut req = request();
        req.screenshot = false;
        req.css_selector = Some("main article".into());
        req.word_count_threshold = 25;

        let filter = Some(ContentFilter::Pruning(PruningFilter::default()));
        let config = build_run_config(&req, filter.clone(), None);

        assert!(!config.screenshot);
        assert_eq!(config.css_selector.as_deref(), Some("main article"));
        assert_eq!(config.word_count_threshold, 25);
        assert_eq!(config.page_timeout, Duration::from_secs(120));
        assert!(config.scan_full_page);
        assert!(config.wait_for_images);
        assert!(config.remove_overlay_elements);
        assert_eq!(config.content_filter, filter);
        assert!(config.extraction_strategy.is_none());
    }

    #[test]
    fn blank_selector_is_dropped() {
        let mut req = request();
        req.css_selector = Some("  ".into());
        assert!(build_run_config(&req, None, None).css_selector.is_none());
    }
}

//! Browser-level and run-level configuration handed to the automation engine

use serde::Serialize;
use std::time::Duration;

use crate::content_filter::ContentFilter;
use crate::extraction::ExtractionStrategy;

/// Session-level browser settings, built once and shared read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
}

/// Whether a crawl may be answered from, and stored into, the result cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Read and write the cache
    Enabled,
    /// Neither read nor write; always fetch fresh
    Bypass,
}

/// Per-crawl options passed to the engine alongside the url
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub cache_mode: CacheMode,
    pub css_selector: Option<String>,
    /// Plain-text paragraphs shorter than this are dropped from the markdown
    pub word_count_threshold: usize,
    pub screenshot: bool,
    /// Budget for page readiness (navigation plus load)
    pub page_timeout: Duration,
    /// Scroll through the whole document so lazy content renders
    pub scan_full_page: bool,
    /// Pause between scroll steps while scanning
    pub scroll_delay: Duration,
    pub wait_for_images: bool,
    /// Strip cookie banners, modals and other fixed overlays before capture
    pub remove_overlay_elements: bool,
    pub content_filter: Option<ContentFilter>,
    #[serde(skip)]
    pub extraction_strategy: Option<ExtractionStrategy>,
}

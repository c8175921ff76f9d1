//! In-process result cache shared by every session of one engine

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use url::Url;

use crate::config::{CacheMode, RunConfig};
use crate::engine::RawCrawlResult;

/// LRU cache of successful crawl results
///
/// Keyed by everything that shapes the output: url, selector, word threshold,
/// filter and extraction. A cached result without a screenshot never answers
/// a request that wants one, and hits for runs without one come back bare.
#[derive(Debug, Clone)]
pub struct ResultCache {
    entries: Arc<Mutex<LruCache<String, RawCrawlResult>>>,
}

impl ResultCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            ))),
        }
    }

    /// Cached result for this run, honouring the cache mode
    #[must_use]
    pub fn lookup(&self, url: &Url, config: &RunConfig) -> Option<RawCrawlResult> {
        if config.cache_mode == CacheMode::Bypass {
            return None;
        }
        let key = cache_key(url, config);
        let mut hit = self.entries.lock().get(&key).cloned()?;
        if config.screenshot && hit.screenshot.is_none() {
            return None;
        }
        if !config.screenshot {
            hit.screenshot = None;
        }
        Some(hit)
    }

    /// Remember a successful result; bypass runs and failures are not stored
    pub fn store(&self, url: &Url, config: &RunConfig, result: &RawCrawlResult) {
        if config.cache_mode == CacheMode::Bypass || !result.success {
            return;
        }
        self.entries.lock().put(cache_key(url, config), result.clone());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cache_key(url: &Url, config: &RunConfig) -> String {
    let filter = config
        .content_filter
        .as_ref()
        .and_then(|f| serde_json::to_string(f).ok())
        .unwrap_or_default();
    let extraction = config
        .extraction_strategy
        .as_ref()
        .map(|s| format!("{}|{}|{}", s.provider, s.instruction, s.schema))
        .unwrap_or_default();

    format!(
        "{url}|{}|{}|{filter}|{extraction}",
        config.css_selector.as_deref().unwrap_or_default(),
        config.word_count_threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Screenshot;

    fn url() -> Url {
        Url::parse("https://example.com/page").expect("valid url")
    }

    fn result() -> RawCrawlResult {
        RawCrawlResult {
            url: url().to_string(),
            success: true,
            html: Some("<p>cached</p>".into()),
            screenshot: Some(Screenshot::Bytes(vec![1, 2, 3])),
            ..RawCrawlResult::default()
        }
    }

    #[test]
    fn enabled_mode_reads_and_writes() {
        let cache = ResultCache::new(8);
        let config = RunConfig::builder().cache_mode(CacheMode::Enabled).build();

        assert!(cache.lookup(&url(), &config).is_none());
        cache.store(&url(), &config, &result());
        assert_eq!(cache.lookup(&url(), &config), Some(result()));
    }

    #[test]
    fn bypass_mode_neither_reads_nor_writes() {
        let cache = ResultCache::new(8);
        let enabled = RunConfig::builder().cache_mode(CacheMode::Enabled).build();
        let bypass = RunConfig::builder().cache_mode(CacheMode::Bypass).build();

        cache.store(&url(), &bypass, &result());
        assert!(cache.is_empty());

        cache.store(&url(), &enabled, &result());
        assert!(cache.lookup(&url(), &bypass).is_none());
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = ResultCache::new(8);
        let config = RunConfig::builder().cache_mode(CacheMode::Enabled).build();
        let failed = RawCrawlResult {
            success: false,
            ..result()
        };
        cache.store(&url(), &config, &failed);
        assert!(cache.is_empty());
    }

    #[test]
    fn selector_changes_the_key() {
        let cache = ResultCache::new(8);
        let plain = RunConfig::builder().cache_mode(CacheMode::Enabled).build();
        let scoped = RunConfig::builder()
            .cache_mode(CacheMode::Enabled)
            .css_selector(Some("main".into()))
            .build();

        cache.store(&url(), &plain, &result());
        assert!(cache.lookup(&url(), &scoped).is_none());
    }

    #[test]
    fn hits_drop_the_screenshot_when_none_was_requested() {
        let cache = ResultCache::new(8);
        let with_shot = RunConfig::builder().cache_mode(CacheMode::Enabled).build();
        let no_shot = RunConfig::builder()
            .cache_mode(CacheMode::Enabled)
            .screenshot(false)
            .build();

        cache.store(&url(), &with_shot, &result());
        let hit = cache.lookup(&url(), &no_shot).expect("cached");
        assert!(hit.screenshot.is_none());
        assert_eq!(hit.html, result().html);

        let again = cache.lookup(&url(), &with_shot).expect("still cached");
        assert!(again.screenshot.is_some());
    }

    #[test]
    fn screenshot_requests_skip_entries_without_one() {
        let cache = ResultCache::new(8);
        let no_shot = RunConfig::builder()
            .cache_mode(CacheMode::Enabled)
            .screenshot(false)
            .build();
        let with_shot = RunConfig::builder().cache_mode(CacheMode::Enabled).build();

        let bare = RawCrawlResult {
            screenshot: None,
            ..result()
        };
        cache.store(&url(), &no_shot, &bare);
        assert!(cache.lookup(&url(), &no_shot).is_some());
        assert!(cache.lookup(&url(), &with_shot).is_none());
    }
}

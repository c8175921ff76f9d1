//! Test utilities shared by the crawl service integration tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

use crawl_service::{
    AutomationEngine, BrowserConfig, CrawlError, CrawlRequest, CrawlResult, CrawlService,
    EngineSession, MarkdownOutput, MarkdownVariants, RawCrawlResult, RunConfig, Screenshot,
    ServiceSettings,
};

type Script = dyn Fn(&Url, &RunConfig) -> CrawlResult<RawCrawlResult> + Send + Sync;

/// Counters shared between a [`MockEngine`] and the sessions it launches
#[derive(Default)]
pub struct EngineStats {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub active: AtomicUsize,
    pub peak: AtomicUsize,
    pub last_run_config: Mutex<Option<RunConfig>>,
}

/// Scripted engine: every run answers through `script` after `delay`
pub struct MockEngine {
    script: Arc<Script>,
    delay: Duration,
    fail_launch: bool,
    pub stats: Arc<EngineStats>,
}

#[allow(dead_code)]
impl MockEngine {
    pub fn new(
        script: impl Fn(&Url, &RunConfig) -> CrawlResult<RawCrawlResult> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Arc::new(script),
            delay: Duration::ZERO,
            fail_launch: false,
            stats: Arc::new(EngineStats::default()),
        }
    }

    /// Engine returning [`sample_result`] for every url
    pub fn succeeding() -> Self {
        Self::new(|url, _| Ok(sample_result(url)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_launch() -> Self {
        let mut engine = Self::succeeding();
        engine.fail_launch = true;
        engine
    }
}

#[async_trait]
impl AutomationEngine for MockEngine {
    async fn launch(&self, _config: &BrowserConfig) -> CrawlResult<Box<dyn EngineSession>> {
        if self.fail_launch {
            return Err(CrawlError::Execution("browser failed to start".into()));
        }
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            script: Arc::clone(&self.script),
            delay: self.delay,
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct MockSession {
    script: Arc<Script>,
    delay: Duration,
    stats: Arc<EngineStats>,
}

#[async_trait]
impl EngineSession for MockSession {
    async fn run(&mut self, url: &Url, config: &RunConfig) -> CrawlResult<RawCrawlResult> {
        let now = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak.fetch_max(now, Ordering::SeqCst);
        *self.stats.last_run_config.lock() = Some(config.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let outcome = (self.script)(url, config);

        self.stats.active.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn close(&mut self) -> CrawlResult<()> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A successful engine result with every field populated
#[allow(dead_code)]
pub fn sample_result(url: &Url) -> RawCrawlResult {
    let mut metadata = serde_json::Map::new();
    metadata.insert("title".into(), serde_json::json!("Example Domain"));

    RawCrawlResult {
        url: url.to_string(),
        markdown: Some(MarkdownOutput::Variants(MarkdownVariants {
            raw_markdown: Some("# Example Domain\n\nFull page text.".into()),
            fit_markdown: Some("# Example Domain".into()),
        })),
        html: Some("<html><body><h1>Example Domain</h1></body></html>".into()),
        metadata: Some(metadata),
        extracted_content: None,
        screenshot: Some(Screenshot::Base64("iVBORw0KGgo=".into())),
        success: true,
        error_message: None,
        status_code: Some(200),
    }
}

/// Settings with no credential and screenshot post-processing off
#[allow(dead_code)]
pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        process_screenshots: false,
        ..ServiceSettings::default()
    }
}

#[allow(dead_code)]
pub fn service_with(engine: MockEngine) -> (CrawlService, Arc<EngineStats>) {
    let stats = Arc::clone(&engine.stats);
    (CrawlService::new(test_settings(), Arc::new(engine)), stats)
}

#[allow(dead_code)]
pub fn request(url: &str) -> CrawlRequest {
    CrawlRequest::new(Url::parse(url).expect("valid test url"))
}

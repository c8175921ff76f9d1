//! The crawl pipeline: admit, configure, execute, normalize
//!
//! [`CrawlService::crawl`] is the single failure boundary. Whatever goes wrong
//! after admission comes back as a well-formed failure response. The pipeline
//! runs on its own task, so a caller that stops waiting (a dropped HTTP
//! connection) never cancels it halfway: the browser session is still closed
//! and the admission slot is released when the permit drops.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::{BrowserConfig, ServiceSettings, build_browser_config, build_run_config};
use crate::content_filter::select_content_filter;
use crate::engine::AutomationEngine;
use crate::error::{CrawlError, CrawlResult};
use crate::executor::CrawlExecutor;
use crate::extraction::select_extraction_strategy;
use crate::gate::ConcurrencyGate;
use crate::normalizer::ResultNormalizer;
use crate::schema::{CrawlRequest, CrawlResponse};

/// Shared, dependency-injected crawl service
#[derive(Debug, Clone)]
pub struct CrawlService {
    browser_config: Arc<BrowserConfig>,
    gate: ConcurrencyGate,
    executor: CrawlExecutor,
    normalizer: ResultNormalizer,
    settings: Arc<ServiceSettings>,
}

impl CrawlService {
    #[must_use]
    pub fn new(settings: ServiceSettings, engine: Arc<dyn AutomationEngine>) -> Self {
        info!(
            max_concurrent = settings.max_concurrent_crawls,
            headless = settings.headless,
            filter_policy = %settings.filter_policy,
            provider = %settings.llm.provider,
            "Crawl service configured"
        );

        Self {
            browser_config: Arc::new(build_browser_config(settings.headless)),
            gate: ConcurrencyGate::new(settings.max_concurrent_crawls),
            executor: CrawlExecutor::new(engine),
            normalizer: ResultNormalizer::new(settings.process_screenshots),
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    #[must_use]
    pub fn browser_config(&self) -> &BrowserConfig {
        &self.browser_config
    }

    /// Crawl one page; never fails, failures are encoded in the response
    pub async fn crawl(&self, request: CrawlRequest) -> CrawlResponse {
        let url = request.url.clone();
        let service = self.clone();
        let task = tokio::spawn(async move { service.crawl_inner(&request).await });

        let outcome = task
            .await
            .unwrap_or_else(|e| Err(CrawlError::Execution(format!("crawl task failed: {e}"))));

        match outcome {
            Ok(response) => {
                info!(url = %url, "Crawl succeeded");
                response
            }
            Err(e) => {
                error!(url = %url, kind = e.kind(), "Crawl failed: {e}");
                CrawlResponse::failure(&e)
            }
        }
    }

    async fn crawl_inner(&self, request: &CrawlRequest) -> CrawlResult<CrawlResponse> {
        let _permit = self.gate.acquire().await?;
        debug!(url = %request.url, stage = "admitted", in_flight = self.gate.in_flight());

        let content_filter = select_content_filter(request, self.settings.filter_policy);
        let extraction = select_extraction_strategy(request, &self.settings.llm);
        let run_config = build_run_config(request, content_filter, extraction);
        debug!(
            url = %request.url,
            stage = "configured",
            cache_mode = ?run_config.cache_mode,
            filter = run_config.content_filter.is_some(),
            extraction = run_config.extraction_strategy.is_some(),
        );

        let raw = self
            .executor
            .run(&request.url, &self.browser_config, &run_config)
            .await?;
        debug!(url = %request.url, stage = "executed", success = raw.success);

        // screenshot re-encoding is CPU bound
        let normalizer = self.normalizer;
        let response = tokio::task::spawn_blocking(move || normalizer.normalize(raw))
            .await
            .map_err(|e| CrawlError::Execution(format!("normalization task failed: {e}")))??;
        debug!(url = %request.url, stage = "normalized");

        Ok(response)
    }
}

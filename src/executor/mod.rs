//! Runs one crawl inside an exclusively-owned engine session
//!
//! The session is closed on every exit path, success or failure. A close
//! failure is logged and never masks the crawl outcome.

use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::config::{BrowserConfig, RunConfig};
use crate::engine::{AutomationEngine, RawCrawlResult};
use crate::error::CrawlResult;

#[derive(Clone)]
pub struct CrawlExecutor {
    engine: Arc<dyn AutomationEngine>,
}

impl std::fmt::Debug for CrawlExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlExecutor").finish_non_exhaustive()
    }
}

impl CrawlExecutor {
    #[must_use]
    pub fn new(engine: Arc<dyn AutomationEngine>) -> Self {
        Self { engine }
    }

    /// Launch a session, run the url through it, and always close it
    pub async fn run(
        &self,
        url: &Url,
        browser_config: &BrowserConfig,
        run_config: &RunConfig,
    ) -> CrawlResult<RawCrawlResult> {
        let mut session = self.engine.launch(browser_config).await?;
        debug!("Engine session opened for {url}");

        let outcome = session.run(url, run_config).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close engine session for {url}: {e}");
        } else {
            debug!("Engine session closed for {url}");
        }

        outcome
    }
}

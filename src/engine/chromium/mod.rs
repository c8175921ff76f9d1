//! Chromium-backed automation engine
//!
//! Every crawl gets its own browser process with a throwaway profile
//! directory, torn down by [`EngineSession::close`]. Results are shared across
//! sessions through an in-process LRU cache.

pub mod cache;
pub mod launcher;
pub mod markdown;
pub mod page_timeout;
pub mod scripts;
pub mod session;

pub use cache::ResultCache;
pub use launcher::{download_managed_browser, find_browser_executable, launch_browser};
pub use session::ChromiumSession;

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::config::BrowserConfig;
use crate::engine::{AutomationEngine, EngineSession};
use crate::error::CrawlResult;
use crate::extraction::LlmExtractor;
use crate::utils::RESULT_CACHE_CAPACITY;

#[derive(Debug, Clone)]
pub struct ChromiumEngine {
    cache: ResultCache,
    extractor: LlmExtractor,
}

impl Default for ChromiumEngine {
    fn default() -> Self {
        Self::new(LlmExtractor::new())
    }
}

impl ChromiumEngine {
    #[must_use]
    pub fn new(extractor: LlmExtractor) -> Self {
        Self {
            cache: ResultCache::new(RESULT_CACHE_CAPACITY),
            extractor,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

fn session_profile_dir() -> PathBuf {
    std::env::temp_dir().join(format!("crawl_service_chrome_{}", uuid::Uuid::new_v4()))
}

#[async_trait]
impl AutomationEngine for ChromiumEngine {
    async fn launch(&self, config: &BrowserConfig) -> CrawlResult<Box<dyn EngineSession>> {
        let profile_dir = session_profile_dir();
        let (browser, handler) = match launch_browser(config, &profile_dir).await {
            Ok(launched) => launched,
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&profile_dir).await;
                return Err(e.into());
            }
        };
        info!("Browser session started (profile {})", profile_dir.display());

        Ok(Box::new(ChromiumSession::new(
            browser,
            handler,
            profile_dir,
            config.clone(),
            self.cache.clone(),
            self.extractor.clone(),
        )))
    }
}

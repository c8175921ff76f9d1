//! Contract with the browser-automation engine
//!
//! The pipeline only sees these two traits: an [`AutomationEngine`] that
//! launches one [`EngineSession`] per crawl, and the session that renders a
//! single url. The bundled implementation drives Chromium through
//! chromiumoxide; tests plug in scripted engines.

pub mod chromium;
pub mod types;

pub use chromium::ChromiumEngine;
pub use types::{MarkdownOutput, MarkdownVariants, RawCrawlResult, Screenshot};

use async_trait::async_trait;
use url::Url;

use crate::config::{BrowserConfig, RunConfig};
use crate::error::CrawlResult;

/// Factory for browser sessions
#[async_trait]
pub trait AutomationEngine: Send + Sync {
    /// Start a session configured with the shared browser settings
    async fn launch(&self, config: &BrowserConfig) -> CrawlResult<Box<dyn EngineSession>>;
}

/// One exclusively-owned browser session
#[async_trait]
pub trait EngineSession: Send {
    /// Fetch, render and post-process a single page
    async fn run(&mut self, url: &Url, config: &RunConfig) -> CrawlResult<RawCrawlResult>;

    /// Tear the session down; called exactly once on every exit path
    async fn close(&mut self) -> CrawlResult<()>;
}

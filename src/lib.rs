pub mod config;
pub mod content_filter;
pub mod engine;
pub mod error;
pub mod executor;
pub mod extraction;
pub mod gate;
pub mod normalizer;
pub mod schema;
pub mod server;
pub mod service;
pub mod utils;

pub use config::{
    BrowserConfig, CacheMode, LlmSettings, RunConfig, RunConfigBuilder, ServiceSettings,
    build_browser_config, build_run_config,
};
pub use content_filter::{ContentFilter, FilterPolicy, select_content_filter};
pub use engine::{
    AutomationEngine, ChromiumEngine, EngineSession, MarkdownOutput, MarkdownVariants,
    RawCrawlResult, Screenshot,
};
pub use error::{CrawlError, CrawlResult};
pub use executor::CrawlExecutor;
pub use extraction::{ExtractionStrategy, LlmExtractor, select_extraction_strategy};
pub use gate::{ConcurrencyGate, CrawlPermit};
pub use normalizer::ResultNormalizer;
pub use schema::{CrawlRequest, CrawlResponse, RequestValidationError};
pub use server::router;
pub use service::CrawlService;

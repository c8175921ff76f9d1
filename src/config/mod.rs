//! Configuration for the crawl service
//!
//! Two layers: the process-lifetime [`BrowserConfig`] plus [`ServiceSettings`]
//! read once at startup, and the per-request [`RunConfig`] assembled fresh for
//! every crawl.

// Sub-modules
pub mod builder;
pub mod settings;
pub mod types;

// Re-exports for public API
pub use builder::{RunConfigBuilder, build_browser_config, build_run_config};
pub use settings::{LlmSettings, ServiceSettings};
pub use types::{BrowserConfig, CacheMode, RunConfig};

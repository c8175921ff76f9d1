use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::utils::DEFAULT_WORD_COUNT_THRESHOLD;

/// Reasons a crawl request is refused before it reaches the pipeline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestValidationError {
    #[error("word_count_threshold must be non-negative, got {0}")]
    NegativeWordCountThreshold(i64),

    #[error("url scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("url has no host: {0}")]
    MissingHost(String),
}

/// Caller-supplied description of what to fetch and how to process it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub url: Url,

    #[serde(default = "default_word_count_threshold")]
    pub word_count_threshold: i64,

    #[serde(default)]
    pub css_selector: Option<String>,

    #[serde(default = "default_true")]
    pub screenshot: bool,

    #[serde(default = "default_true")]
    pub bypass_cache: bool,

    #[serde(default = "default_true")]
    pub smart_mode: bool,

    /// Natural-language description of the data to extract
    #[serde(default)]
    pub instruction: Option<String>,

    /// Per-request credential for the extraction provider
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// Replaces the default item-list schema when extraction is requested
    #[serde(default)]
    pub extraction_schema: Option<Map<String, Value>>,
}

fn default_word_count_threshold() -> i64 {
    DEFAULT_WORD_COUNT_THRESHOLD
}

fn default_true() -> bool {
    true
}

impl CrawlRequest {
    /// Request with every optional field at its default
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            word_count_threshold: DEFAULT_WORD_COUNT_THRESHOLD,
            css_selector: None,
            screenshot: true,
            bypass_cache: true,
            smart_mode: true,
            instruction: None,
            api_token: None,
            extraction_schema: None,
        }
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.word_count_threshold < 0 {
            return Err(RequestValidationError::NegativeWordCountThreshold(
                self.word_count_threshold,
            ));
        }

        match self.url.scheme() {
            "http" | "https" => {}
            other => return Err(RequestValidationError::UnsupportedScheme(other.to_string())),
        }

        if self.url.host_str().is_none_or(str::is_empty) {
            return Err(RequestValidationError::MissingHost(self.url.to_string()));
        }

        Ok(())
    }

    /// The instruction, if one was given with visible content
    #[must_use]
    pub fn instruction(&self) -> Option<&str> {
        self.instruction
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The CSS selector, ignoring blank values
    #[must_use]
    pub fn css_selector(&self) -> Option<&str> {
        self.css_selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Threshold as an unsigned count; only meaningful after [`Self::validate`]
    #[must_use]
    pub fn word_count_threshold(&self) -> usize {
        usize::try_from(self.word_count_threshold).unwrap_or(0)
    }
}

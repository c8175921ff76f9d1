//! Raw result shape produced by an engine session
//!
//! Fields mirror what rendering engines commonly hand back: markdown may be a
//! plain string or a raw/fit pair, extracted content may be text or JSON, and
//! screenshots may arrive as base64 text or raw bytes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Markdown as produced by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkdownOutput {
    Plain(String),
    Variants(MarkdownVariants),
}

/// Filtered and unfiltered renderings of the same page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownVariants {
    #[serde(default)]
    pub raw_markdown: Option<String>,
    #[serde(default)]
    pub fit_markdown: Option<String>,
}

impl fmt::Display for MarkdownVariants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_markdown.as_deref().unwrap_or_default())
    }
}

impl fmt::Display for MarkdownOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(s) => f.write_str(s),
            Self::Variants(v) => v.fmt(f),
        }
    }
}

/// Captured page image
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Screenshot {
    Base64(String),
    Bytes(Vec<u8>),
}

impl fmt::Debug for Screenshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(s) => write!(f, "Screenshot::Base64({} chars)", s.len()),
            Self::Bytes(b) => write!(f, "Screenshot::Bytes({} bytes)", b.len()),
        }
    }
}

/// Everything one engine run reports back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCrawlResult {
    pub url: String,
    #[serde(default)]
    pub markdown: Option<MarkdownOutput>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default)]
    pub extracted_content: Option<Value>,
    #[serde(default)]
    pub screenshot: Option<Screenshot>,
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

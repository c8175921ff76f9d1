//! Maps an engine's raw result onto the stable response contract
//!
//! Engines disagree on shapes: markdown may be plain or a raw/fit pair,
//! extracted content may be text, JSON text or structured JSON, screenshots
//! may be bytes or base64. Everything here is total except the engine's own
//! failure report, which is surfaced as [`CrawlError::Reported`].

pub mod screenshot;

pub use screenshot::compact_screenshot;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::debug;

use crate::engine::{MarkdownOutput, RawCrawlResult, Screenshot};
use crate::error::{CrawlError, CrawlResult};
use crate::schema::CrawlResponse;
use crate::utils::HTML_PREVIEW_CHARS;

/// Fallback message when an engine reports failure without one
pub const DEFAULT_FAILURE_MESSAGE: &str = "crawl failed";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultNormalizer {
    /// Downscale and re-encode screenshots
    pub process_screenshots: bool,
}

impl ResultNormalizer {
    #[must_use]
    pub fn new(process_screenshots: bool) -> Self {
        Self {
            process_screenshots,
        }
    }

    pub fn normalize(&self, raw: RawCrawlResult) -> CrawlResult<CrawlResponse> {
        if !raw.success {
            let message = raw
                .error_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            return Err(CrawlError::Reported(message));
        }

        Ok(CrawlResponse {
            markdown: select_markdown(raw.markdown.as_ref()),
            html: Some(truncate_html(raw.html.as_deref())),
            screenshot_base64: raw
                .screenshot
                .map(|shot| self.encode_screenshot(shot)),
            metadata: raw.metadata.unwrap_or_default(),
            extracted_content: normalize_extracted(raw.extracted_content),
            success: true,
            error_message: None,
        })
    }

    fn encode_screenshot(&self, shot: Screenshot) -> String {
        if !self.process_screenshots {
            return match shot {
                Screenshot::Base64(text) => text,
                Screenshot::Bytes(bytes) => STANDARD.encode(bytes),
            };
        }

        match shot {
            Screenshot::Bytes(bytes) => {
                STANDARD.encode(compact_screenshot(&bytes).unwrap_or(bytes))
            }
            Screenshot::Base64(text) => match STANDARD.decode(text.trim()) {
                Ok(bytes) => compact_screenshot(&bytes).map_or(text, |jpeg| STANDARD.encode(jpeg)),
                Err(e) => {
                    debug!("Screenshot is not valid base64, passing through: {e}");
                    text
                }
            },
        }
    }
}

/// Fit rendering if non-empty, then raw if non-empty, then the plain string form
#[must_use]
pub fn select_markdown(markdown: Option<&MarkdownOutput>) -> String {
    match markdown {
        None => String::new(),
        Some(MarkdownOutput::Plain(text)) => text.clone(),
        Some(MarkdownOutput::Variants(variants)) => [&variants.fit_markdown, &variants.raw_markdown]
            .into_iter()
            .flatten()
            .find(|md| !md.is_empty())
            .cloned()
            .unwrap_or_else(|| variants.to_string()),
    }
}

/// First [`HTML_PREVIEW_CHARS`] characters, never splitting a character
#[must_use]
pub fn truncate_html(html: Option<&str>) -> String {
    html.map(|h| h.chars().take(HTML_PREVIEW_CHARS).collect())
        .unwrap_or_default()
}

/// Extracted content as transport text
///
/// JSON text is parsed and pretty-printed; text that is not JSON is kept
/// verbatim. A lone `items` key is unwrapped to its list.
#[must_use]
pub fn normalize_extracted(value: Option<Value>) -> Option<String> {
    let value = match value? {
        Value::Null => return None,
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => parsed,
            _ => return Some(text),
        },
        other => other,
    };

    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("items") => {
            map.remove("items").unwrap_or(Value::Null)
        }
        other => other,
    };

    Some(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CrawlError;

/// Stable response contract returned for every crawl, successful or not
///
/// `success == false` implies `error_message` is set and every content field
/// holds its empty default; `success == true` implies `error_message` is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlResponse {
    pub markdown: String,
    pub html: Option<String>,
    pub screenshot_base64: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub extracted_content: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl CrawlResponse {
    /// Uniform failure shape for any error raised after admission
    #[must_use]
    pub fn failure(err: &CrawlError) -> Self {
        Self {
            markdown: String::new(),
            html: None,
            screenshot_base64: None,
            metadata: Map::new(),
            extracted_content: None,
            success: false,
            error_message: Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_carries_only_the_error_message() {
        let resp = CrawlResponse::failure(&CrawlError::Execution("timeout".into()));

        assert!(!resp.success);
        assert_eq!(resp.error_message.as_deref(), Some("Execution error: timeout"));
        assert_eq!(resp.markdown, "");
        assert!(resp.html.is_none());
        assert!(resp.screenshot_base64.is_none());
        assert!(resp.metadata.is_empty());
        assert!(resp.extracted_content.is_none());
    }

    #[test]
    fn failure_serializes_nulls_explicitly() {
        let resp = CrawlResponse::failure(&CrawlError::Configuration("bad".into()));
        let json = serde_json::to_value(&resp).expect("serializes");

        assert_eq!(json["html"], Value::Null);
        assert_eq!(json["extracted_content"], Value::Null);
        assert_eq!(json["metadata"], Value::Object(Map::new()));
    }
}

//! Builds the extraction strategy attached to a run configuration
//!
//! The strategy is only a description (instruction, schema, credential);
//! the engine executes it after the page has been rendered.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::config::LlmSettings;
use crate::schema::CrawlRequest;
use crate::utils::{EXTRACTION_FORMAT_HINT, SENTINEL_API_TOKEN};

/// One extracted record in the default target schema
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedItem {
    /// Position of the record on the page, starting at 0
    pub index: i64,
    /// Free-form key/value payload chosen by the model
    pub content: BTreeMap<String, Value>,
}

/// Default target schema: a list of indexed records under `items`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedItems {
    pub items: Vec<ExtractedItem>,
}

/// JSON schema of [`ExtractedItems`]
#[must_use]
pub fn default_schema() -> Value {
    schemars::schema_for!(ExtractedItems).to_value()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Answer must follow the attached schema
    #[default]
    Schema,
    /// Free-form semantic blocks
    Block,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "schema" => Ok(Self::Schema),
            "block" | "blocks" => Ok(Self::Block),
            other => Err(format!("unknown extraction mode '{other}' (expected 'schema' or 'block')")),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => f.write_str("schema"),
            Self::Block => f.write_str("block"),
        }
    }
}

/// Everything the engine needs to run one LLM extraction
#[derive(Clone, Serialize)]
pub struct ExtractionStrategy {
    /// `provider/model`, e.g. `openai/gpt-4o-mini`
    pub provider: String,
    #[serde(skip)]
    pub api_token: String,
    pub base_url: Option<String>,
    pub instruction: String,
    pub schema: Value,
    pub mode: ExtractionMode,
}

impl fmt::Debug for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionStrategy")
            .field("provider", &self.provider)
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("instruction", &self.instruction)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ExtractionStrategy {
    /// True when no real credential was found while building the strategy
    #[must_use]
    pub fn uses_sentinel_token(&self) -> bool {
        self.api_token == SENTINEL_API_TOKEN
    }
}

/// Build the extraction strategy for a request, or `None` when no instruction was given
///
/// A missing credential never fails here: the sentinel token is used and the
/// provider rejects it at execution time.
#[must_use]
pub fn select_extraction_strategy(
    request: &CrawlRequest,
    llm: &LlmSettings,
) -> Option<ExtractionStrategy> {
    let instruction = request.instruction()?;

    let api_token = request
        .api_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| llm.api_key.clone())
        .unwrap_or_else(|| {
            warn!(
                url = %request.url,
                provider = %llm.provider,
                "No LLM credential in request or environment; extraction will use a placeholder token"
            );
            SENTINEL_API_TOKEN.to_string()
        });

    let schema = request
        .extraction_schema
        .clone()
        .filter(|s| !s.is_empty())
        .map_or_else(default_schema, Value::Object);

    Some(ExtractionStrategy {
        provider: llm.provider.clone(),
        api_token,
        base_url: llm.base_url.clone(),
        instruction: format!("{instruction}\n\n{EXTRACTION_FORMAT_HINT}"),
        schema,
        mode: llm.mode,
    })
}

//! OpenAI-compatible chat-completions client used for structured extraction

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use super::strategy::{ExtractionMode, ExtractionStrategy};
use crate::error::{CrawlError, CrawlResult};
use crate::utils::{EXTRACTION_MAX_INPUT_CHARS, EXTRACTION_TIMEOUT_SECS};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Runs an [`ExtractionStrategy`] against page content
#[derive(Debug, Clone)]
pub struct LlmExtractor {
    client: reqwest::Client,
}

impl Default for LlmExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmExtractor {
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(EXTRACTION_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Ask the provider for structured data extracted from `content`
    ///
    /// Answers that are not valid JSON come back as a JSON string so the
    /// caller still sees what the model said.
    pub async fn extract(
        &self,
        strategy: &ExtractionStrategy,
        url: &str,
        content: &str,
    ) -> CrawlResult<Value> {
        let (provider, model) = split_provider(&strategy.provider);
        let base_url = match strategy.base_url.as_deref() {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => default_base_url(provider)
                .ok_or_else(|| {
                    CrawlError::Configuration(format!(
                        "unknown extraction provider '{provider}' and no base url configured"
                    ))
                })?
                .to_string(),
        };

        let content: String = content.chars().take(EXTRACTION_MAX_INPUT_CHARS).collect();
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: system_prompt(strategy),
                },
                ChatMessage {
                    role: "user".into(),
                    content: format!("URL: {url}\n\nPage content:\n{content}"),
                },
            ],
            temperature: 0.0,
            response_format: (strategy.mode == ExtractionMode::Schema)
                .then(|| json!({ "type": "json_object" })),
        };

        debug!(provider, model, url, chars = content.len(), "Calling extraction provider");

        let response = self
            .client
            .post(format!("{base_url}/chat/completions"))
            .bearer_auth(&strategy.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CrawlError::Extraction(format!("request to {provider} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CrawlError::Extraction(format!(
                "provider returned {status}: {}",
                text.trim()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CrawlError::Parsing(format!("unreadable provider response: {e}")))?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CrawlError::Extraction("provider returned no choices".into()))?;

        info!(provider, model, url, "Extraction completed");

        Ok(serde_json::from_str(strip_code_fence(&answer)).unwrap_or(Value::String(answer)))
    }
}

fn system_prompt(strategy: &ExtractionStrategy) -> String {
    match strategy.mode {
        ExtractionMode::Schema => format!(
            "You extract structured data from web pages.\n{}\n\nThe answer must be a JSON object matching this JSON schema:\n{}",
            strategy.instruction, strategy.schema
        ),
        ExtractionMode::Block => format!(
            "You split web pages into semantic blocks.\n{}",
            strategy.instruction
        ),
    }
}

/// `provider/model`; a bare name is treated as an OpenAI model
fn split_provider(provider: &str) -> (&str, &str) {
    match provider.split_once('/') {
        Some((provider, model)) => (provider, model),
        None => ("openai", provider),
    }
}

fn default_base_url(provider: &str) -> Option<&'static str> {
    match provider.to_ascii_lowercase().as_str() {
        "openai" => Some("https://api.openai.com/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "deepseek" => Some("https://api.deepseek.com/v1"),
        _ => None,
    }
}

/// Models sometimes wrap JSON in a ```json fence despite instructions
fn strip_code_fence(answer: &str) -> &str {
    let trimmed = answer.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

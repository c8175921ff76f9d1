//! Process settings read from the environment at startup

use anyhow::{Context, Result, anyhow};
use std::net::SocketAddr;

use crate::content_filter::FilterPolicy;
use crate::extraction::ExtractionMode;
use crate::utils::{DEFAULT_LLM_PROVIDER, DEFAULT_MAX_CONCURRENT_CRAWLS};

/// Extraction provider settings
#[derive(Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// `provider/model`
    pub provider: String,
    /// Environment-level credential, consulted when a request carries none
    pub api_key: Option<String>,
    /// Overrides the provider's default OpenAI-compatible endpoint
    pub base_url: Option<String>,
    pub mode: ExtractionMode,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            api_key: None,
            base_url: None,
            mode: ExtractionMode::default(),
        }
    }
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Everything the service reads from its environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub bind_addr: SocketAddr,
    pub headless: bool,
    pub max_concurrent_crawls: usize,
    pub filter_policy: FilterPolicy,
    /// Downscale and re-encode screenshots before they leave the service
    pub process_screenshots: bool,
    pub llm: LlmSettings,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            headless: true,
            max_concurrent_crawls: DEFAULT_MAX_CONCURRENT_CRAWLS,
            filter_policy: FilterPolicy::default(),
            process_screenshots: true,
            llm: LlmSettings::default(),
        }
    }
}

impl ServiceSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let bind_addr = match get("CRAWL_SERVICE_BIND") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("CRAWL_SERVICE_BIND is not a socket address: {addr}"))?,
            None => defaults.bind_addr,
        };

        let headless = match get("CRAWL_SERVICE_HEADLESS") {
            Some(v) => parse_bool("CRAWL_SERVICE_HEADLESS", &v)?,
            None => defaults.headless,
        };

        let max_concurrent_crawls = match get("CRAWL_SERVICE_MAX_CONCURRENT") {
            Some(v) => {
                let n: usize = v
                    .parse()
                    .with_context(|| format!("CRAWL_SERVICE_MAX_CONCURRENT is not a number: {v}"))?;
                if n == 0 {
                    return Err(anyhow!("CRAWL_SERVICE_MAX_CONCURRENT must be at least 1"));
                }
                n
            }
            None => defaults.max_concurrent_crawls,
        };

        let filter_policy = match get("CRAWL_SERVICE_FILTER_POLICY") {
            Some(v) => v.parse().map_err(|e: String| anyhow!(e))?,
            None => defaults.filter_policy,
        };

        let process_screenshots = match get("CRAWL_SERVICE_PROCESS_SCREENSHOTS") {
            Some(v) => parse_bool("CRAWL_SERVICE_PROCESS_SCREENSHOTS", &v)?,
            None => defaults.process_screenshots,
        };

        let mode = match get("LLM_EXTRACTION_MODE") {
            Some(v) => v.parse().map_err(|e: String| anyhow!(e))?,
            None => defaults.llm.mode,
        };

        let llm = LlmSettings {
            provider: get("LLM_PROVIDER").unwrap_or(defaults.llm.provider),
            api_key: get("LLM_API_KEY").or_else(|| get("OPENAI_API_KEY")),
            base_url: get("LLM_BASE_URL"),
            mode,
        };

        Ok(Self {
            bind_addr,
            headless,
            max_concurrent_crawls,
            filter_policy,
            process_screenshots,
            llm,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{key} must be a boolean, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let settings = ServiceSettings::from_lookup(lookup(&[])).expect("defaults load");
        assert_eq!(settings, ServiceSettings::default());
        assert_eq!(settings.max_concurrent_crawls, 3);
        assert_eq!(settings.llm.provider, "openai/gpt-4o-mini");
    }

    #[test]
    fn overrides_are_applied() {
        let settings = ServiceSettings::from_lookup(lookup(&[
            ("CRAWL_SERVICE_BIND", "0.0.0.0:9000"),
            ("CRAWL_SERVICE_HEADLESS", "false"),
            ("CRAWL_SERVICE_FILTER_POLICY", "query"),
            ("LLM_PROVIDER", "groq/llama-3.1-8b-instant"),
            ("OPENAI_API_KEY", "sk-openai"),
        ]))
        .expect("valid overrides");

        assert_eq!(settings.bind_addr.port(), 9000);
        assert!(!settings.headless);
        assert_eq!(settings.filter_policy, FilterPolicy::QueryRelevance);
        assert_eq!(settings.llm.provider, "groq/llama-3.1-8b-instant");
        assert_eq!(settings.llm.api_key.as_deref(), Some("sk-openai"));
    }

    #[test]
    fn llm_api_key_takes_precedence_over_openai_key() {
        let settings = ServiceSettings::from_lookup(lookup(&[
            ("LLM_API_KEY", "sk-llm"),
            ("OPENAI_API_KEY", "sk-openai"),
        ]))
        .expect("valid");
        assert_eq!(settings.llm.api_key.as_deref(), Some("sk-llm"));
    }

    #[test]
    fn extraction_mode_is_read_from_the_environment() {
        let settings = ServiceSettings::from_lookup(lookup(&[("LLM_EXTRACTION_MODE", "block")]))
            .expect("valid");
        assert_eq!(settings.llm.mode, ExtractionMode::Block);
        assert_eq!(ServiceSettings::default().llm.mode, ExtractionMode::Schema);
        assert!(ServiceSettings::from_lookup(lookup(&[("LLM_EXTRACTION_MODE", "prose")])).is_err());
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(ServiceSettings::from_lookup(lookup(&[("CRAWL_SERVICE_MAX_CONCURRENT", "0")])).is_err());
        assert!(ServiceSettings::from_lookup(lookup(&[("CRAWL_SERVICE_HEADLESS", "maybe")])).is_err());
        assert!(ServiceSettings::from_lookup(lookup(&[("CRAWL_SERVICE_BIND", "nope")])).is_err());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let llm = LlmSettings {
            api_key: Some("sk-hidden".into()),
            ..LlmSettings::default()
        };
        assert!(!format!("{llm:?}").contains("sk-hidden"));
    }
}

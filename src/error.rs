//! Failure causes for a single crawl.
//!
//! Internally every stage reports a tagged [`CrawlError`]; at the service
//! boundary all of them flatten into the same failure response
//! (see [`crate::schema::CrawlResponse::failure`]).

/// Custom error type for crawl operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum CrawlError {
    /// Missing or unusable settings detected while assembling a crawl
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Navigation, render or network failure inside the automation engine
    #[error("Execution error: {0}")]
    Execution(String),

    /// The extraction provider failed or returned an unusable answer
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Engine output could not be decoded
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// The engine finished but reported the crawl as unsuccessful
    #[error("{0}")]
    Reported(String),
}

impl CrawlError {
    /// Short label used in structured log fields
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Execution(_) => "execution",
            Self::Extraction(_) => "extraction",
            Self::Parsing(_) => "parsing",
            Self::Reported(_) => "reported",
        }
    }
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain
        Self::Execution(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_errors_keep_their_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Page navigation failed");
        let crawl_err = CrawlError::from(err);

        assert_eq!(crawl_err.kind(), "execution");
        assert_eq!(
            crawl_err.to_string(),
            "Execution error: Page navigation failed: connection refused"
        );
    }

    #[test]
    fn reported_errors_display_the_engine_message_verbatim() {
        let err = CrawlError::Reported("net::ERR_NAME_NOT_RESOLVED".to_string());
        assert_eq!(err.to_string(), "net::ERR_NAME_NOT_RESOLVED");
    }
}

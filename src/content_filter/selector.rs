//! Policy choosing which content filter, if any, shapes a crawl's markdown

use std::fmt;
use std::str::FromStr;

use super::{Bm25Filter, ContentFilter, PruningFilter};
use crate::schema::CrawlRequest;

/// Which filter family the service uses when filtering is requested
///
/// Exactly one family is active per crawl; the two are never stacked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterPolicy {
    /// Prune low-relevance blocks whenever `smart_mode` is set
    #[default]
    Pruning,
    /// Score blocks against the instruction when one is given,
    /// otherwise behave like [`FilterPolicy::Pruning`]
    QueryRelevance,
}

impl FromStr for FilterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pruning" | "prune" => Ok(Self::Pruning),
            "query" | "bm25" | "query_relevance" => Ok(Self::QueryRelevance),
            other => Err(format!("unknown filter policy '{other}' (expected 'pruning' or 'query')")),
        }
    }
}

impl fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pruning => f.write_str("pruning"),
            Self::QueryRelevance => f.write_str("query"),
        }
    }
}

/// Pick the filter for one request; `None` means markdown keeps the full page text
#[must_use]
pub fn select_content_filter(request: &CrawlRequest, policy: FilterPolicy) -> Option<ContentFilter> {
    match (policy, request.instruction()) {
        (FilterPolicy::QueryRelevance, Some(query)) => {
            Some(ContentFilter::QueryRelevance(Bm25Filter::new(query)))
        }
        _ if request.smart_mode => Some(ContentFilter::Pruning(PruningFilter::default())),
        _ => None,
    }
}

//! Markdown-shaping content filters
//!
//! A filter decides which blocks of the rendered page survive into the
//! "fit" markdown rendering. The raw rendering is always produced unfiltered.

pub mod blocks;
pub mod bm25;
pub mod pruning;
pub mod selector;

pub use blocks::{ContentBlock, extract_blocks};
pub use bm25::Bm25Filter;
pub use pruning::PruningFilter;
pub use selector::{FilterPolicy, select_content_filter};

use serde::Serialize;

/// Filter attached to a run configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentFilter {
    Pruning(PruningFilter),
    QueryRelevance(Bm25Filter),
}

impl ContentFilter {
    /// Outer HTML of every retained block, in document order
    #[must_use]
    pub fn filter_html(&self, html: &str) -> Vec<String> {
        let blocks = extract_blocks(html);
        let kept = match self {
            Self::Pruning(filter) => filter.apply(&blocks),
            Self::QueryRelevance(filter) => filter.apply(&blocks),
        };
        kept.into_iter().map(|b| b.html.clone()).collect()
    }
}

//! Query-relevance filtering with Okapi BM25 over content blocks

use serde::Serialize;
use std::collections::HashMap;

use super::blocks::ContentBlock;
use crate::utils::BM25_THRESHOLD;

const K1: f64 = 1.2;
const B: f64 = 0.75;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "that", "the", "this", "to", "was", "with", "all", "any", "each", "me", "my", "page",
    "extract", "get", "find", "list", "return", "give",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bm25Filter {
    pub query: String,
    pub threshold: f64,
}

impl Bm25Filter {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            threshold: BM25_THRESHOLD,
        }
    }

    /// Score every block against the query; output is index-aligned with `blocks`
    #[must_use]
    pub fn scores(&self, blocks: &[ContentBlock]) -> Vec<f64> {
        let query_terms = tokenize(&self.query);
        if blocks.is_empty() || query_terms.is_empty() {
            return vec![0.0; blocks.len()];
        }

        let docs: Vec<Vec<String>> = blocks.iter().map(|b| tokenize(&b.text)).collect();
        let n = docs.len() as f64;
        let avg_len = docs.iter().map(Vec::len).sum::<usize>() as f64 / n;

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_default() += 1;
            }
        }

        docs.iter()
            .map(|doc| {
                let len = doc.len() as f64;
                query_terms
                    .iter()
                    .map(|term| {
                        let tf = doc.iter().filter(|t| *t == term).count() as f64;
                        if tf == 0.0 {
                            return 0.0;
                        }
                        let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
                        let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                        let norm = if avg_len > 0.0 { len / avg_len } else { 1.0 };
                        idf * (tf * (K1 + 1.0)) / (tf + K1 * (1.0 - B + B * norm))
                    })
                    .sum()
            })
            .collect()
    }

    #[must_use]
    pub fn apply<'a>(&self, blocks: &'a [ContentBlock]) -> Vec<&'a ContentBlock> {
        self.scores(blocks)
            .into_iter()
            .zip(blocks)
            .filter(|(score, _)| *score >= self.threshold)
            .map(|(_, block)| block)
            .collect()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_filter::blocks::extract_blocks;

    #[test]
    fn ranks_matching_blocks_above_unrelated_ones() {
        let blocks = extract_blocks(
            "<p>Pricing starts at ten dollars per month for the basic plan.</p>
             <p>Our team loves hiking on weekends.</p>
             <p>The enterprise plan pricing is negotiated per seat.</p>",
        );
        let filter = Bm25Filter::new("extract the pricing for each plan");
        let scores = filter.scores(&blocks);

        assert!(scores[0] > scores[1]);
        assert!(scores[2] > scores[1]);
        assert_eq!(scores[1], 0.0);

        let kept = filter.apply(&blocks);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn stopword_only_query_keeps_nothing() {
        let blocks = extract_blocks("<p>Anything at all here.</p>");
        let filter = Bm25Filter::new("extract all of the page");
        assert!(filter.apply(&blocks).is_empty());
    }
}

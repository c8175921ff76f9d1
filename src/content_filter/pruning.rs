//! Relevance pruning: drop blocks whose combined score falls below a threshold

use serde::Serialize;

use super::blocks::ContentBlock;
use crate::utils::{PRUNING_MIN_WORDS, PRUNING_THRESHOLD};

const WEIGHT_TEXT_DENSITY: f64 = 0.4;
const WEIGHT_LINK_DENSITY: f64 = 0.2;
const WEIGHT_TAG: f64 = 0.2;
const WEIGHT_CONTEXT: f64 = 0.1;
const WEIGHT_LENGTH: f64 = 0.1;

/// Multiplier applied to blocks found under navigation chrome
const BOILERPLATE_PENALTY: f64 = 0.5;

/// Words at which the length component saturates
const LENGTH_SATURATION_WORDS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PruningFilter {
    pub threshold: f64,
    pub min_word_threshold: usize,
}

impl Default for PruningFilter {
    fn default() -> Self {
        Self {
            threshold: PRUNING_THRESHOLD,
            min_word_threshold: PRUNING_MIN_WORDS,
        }
    }
}

impl PruningFilter {
    /// Weighted score in 0.0..=1.0
    #[must_use]
    pub fn score(&self, block: &ContentBlock) -> f64 {
        let length = ((1.0 + block.word_count as f64).ln() / (1.0 + LENGTH_SATURATION_WORDS).ln()).min(1.0);
        let context = if block.boilerplate { 0.0 } else { 1.0 };

        let score = WEIGHT_TEXT_DENSITY * block.text_density()
            + WEIGHT_LINK_DENSITY * (1.0 - block.link_density)
            + WEIGHT_TAG * tag_weight(&block.tag)
            + WEIGHT_CONTEXT * context
            + WEIGHT_LENGTH * length;

        if block.boilerplate {
            score * BOILERPLATE_PENALTY
        } else {
            score
        }
    }

    /// Headings are exempt from the word minimum so retained sections keep their titles.
    #[must_use]
    pub fn retains(&self, block: &ContentBlock) -> bool {
        let enough_words = block.is_heading() || block.word_count >= self.min_word_threshold;
        enough_words && self.score(block) >= self.threshold
    }

    #[must_use]
    pub fn apply<'a>(&self, blocks: &'a [ContentBlock]) -> Vec<&'a ContentBlock> {
        blocks.iter().filter(|b| self.retains(b)).collect()
    }
}

fn tag_weight(tag: &str) -> f64 {
    match tag {
        "p" | "pre" | "blockquote" => 1.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => 0.9,
        "li" | "figcaption" | "summary" => 0.6,
        _ => 0.5,
    }
}

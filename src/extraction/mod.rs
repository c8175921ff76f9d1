//! Structured extraction: strategy selection and the provider call.

pub mod llm;
pub mod strategy;

pub use llm::LlmExtractor;
pub use strategy::{
    ExtractedItem, ExtractedItems, ExtractionMode, ExtractionStrategy, default_schema,
    select_extraction_strategy,
};

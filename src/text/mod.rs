// file: src/text/mod.rs
// description: tokenization, stopwords and the linguistic analyzer seam
// reference: internal module structure

pub mod analyzer;
pub mod stopwords;
pub mod tokenizer;

pub use analyzer::{RuleBasedAnalyzer, TextAnalyzer};
pub use stopwords::StopwordFilter;
pub use tokenizer::TokenSet;

// file: src/summarizer/mod.rs
// description: extractive summarizer module exports
// reference: internal module structure

pub mod boilerplate;
pub mod scorer;
pub mod summary;

pub use boilerplate::BoilerplateFilter;
pub use scorer::{ScoredSentence, TermFrequencies, select_top, score_sentences};
pub use summary::{Summarizer, finalize_summary};

// file: src/extractor/mod.rs
// description: entity extraction module exports
// reference: internal module structure

pub mod entities;

pub use entities::{EntityCounts, EntityExtractor};

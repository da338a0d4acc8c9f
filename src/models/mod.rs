// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod duplicate;

pub use document::{Document, DocumentRecord};
pub use duplicate::DuplicatePair;

// file: src/models/duplicate.rs
// description: near-duplicate pair model with canonical ordering
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Two documents whose estimated Jaccard similarity cleared the threshold.
///
/// The pair is unordered; `doc1` always holds the lexicographically
/// smaller id so output is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub doc1: String,
    pub doc2: String,
    pub similarity: f64,
}

impl DuplicatePair {
    pub fn new(a: &str, b: &str, similarity: f64) -> Self {
        let (doc1, doc2) = if a <= b { (a, b) } else { (b, a) };
        Self {
            doc1: doc1.to_string(),
            doc2: doc2.to_string(),
            similarity,
        }
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.doc1, &self.doc2)
    }

    pub fn involves(&self, id: &str) -> bool {
        self.doc1 == id || self.doc2 == id
    }

    /// Ordering used for reports: by id pair.
    pub fn cmp_ids(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

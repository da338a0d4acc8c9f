// file: src/dedup/mod.rs
// description: near-duplicate detection engine module exports
// reference: internal module structure

pub mod detector;
pub mod lsh;
pub mod minhash;

pub use detector::{DuplicateDetector, find_duplicates};
pub use lsh::{LshIndex, LshParams};
pub use minhash::{MinHashSignature, MinHasher};

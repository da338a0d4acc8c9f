// file: src/repository/mod.rs
// description: corpus discovery module exports
// reference: Internal module structure

pub mod scanner;

pub use scanner::{FileScanner, ScannedFile};

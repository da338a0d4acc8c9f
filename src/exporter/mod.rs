// file: src/exporter/mod.rs
// description: report export module exports
// reference: internal module structure

pub mod json;
pub mod markdown;

pub use json::{ExportManifest, JsonExporter};
pub use markdown::MarkdownReport;

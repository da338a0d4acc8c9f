// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

//! Document corpus inventory: per-document extractive summaries, corpus-wide
//! noun-phrase counts and MinHash/LSH near-duplicate detection.

pub mod config;
pub mod dedup;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod repository;
pub mod summarizer;
pub mod text;
pub mod utils;

pub use config::{
    BoilerplateRule, Config, DedupConfig, IngestionConfig, OutputConfig, SummaryConfig,
};
pub use dedup::{
    DuplicateDetector, LshIndex, LshParams, MinHashSignature, MinHasher, find_duplicates,
};
pub use error::{InventoryError, Result};
pub use exporter::{ExportManifest, JsonExporter, MarkdownReport};
pub use extractor::{EntityCounts, EntityExtractor};
pub use models::{Document, DocumentRecord, DuplicatePair};
pub use parser::{DocumentFormat, extract_text};
pub use pipeline::{
    DuplicateScan, FileProcessor, InventoryOrchestrator, InventoryReport, PipelineStats,
    ProgressTracker,
};
pub use repository::{FileScanner, ScannedFile};
pub use summarizer::{BoilerplateFilter, Summarizer};
pub use text::{RuleBasedAnalyzer, StopwordFilter, TextAnalyzer, TokenSet};
pub use utils::{PerformanceMetrics, StageTimer, Validator};

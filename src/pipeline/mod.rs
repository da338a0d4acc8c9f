// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod processor;
mod progress;

pub use orchestrator::{DuplicateScan, InventoryOrchestrator, InventoryReport};
pub use processor::FileProcessor;
pub use progress::{PipelineStats, ProgressTracker};

// file: src/pipeline/orchestrator.rs
// description: coordinates corpus scanning, parsing, analysis and export
// reference: orchestrates asynchronous ingestion workflow

use crate::config::Config;
use crate::dedup::DuplicateDetector;
use crate::error::{InventoryError, Result};
use crate::exporter::{JsonExporter, MarkdownReport};
use crate::extractor::{EntityCounts, EntityExtractor};
use crate::models::{Document, DocumentRecord, DuplicatePair};
use crate::pipeline::processor::FileProcessor;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::repository::{FileScanner, ScannedFile};
use crate::text::StopwordFilter;
use crate::utils::{PerformanceMetrics, StageTimer};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Everything one inventory run produced.
#[derive(Debug, Clone)]
pub struct InventoryReport {
    /// Parsed documents in scan order.
    pub records: Vec<DocumentRecord>,
    pub duplicates: Vec<DuplicatePair>,
    pub entities: EntityCounts,
    pub stats: PipelineStats,
}

/// Result of a duplicates-only pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateScan {
    /// Documents parsed successfully.
    pub documents: usize,
    pub duplicates: Vec<DuplicatePair>,
}

pub struct InventoryOrchestrator {
    config: Config,
    source: PathBuf,
    processor: Arc<FileProcessor>,
    max_concurrent_tasks: usize,
    show_progress: bool,
}

impl InventoryOrchestrator {
    pub fn new(config: Config, source: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let processor = Arc::new(FileProcessor::new(config.summary.clone())?);
        let max_concurrent_tasks = config.ingestion.parallel_workers.max(1);

        Ok(Self {
            config,
            source: source.into(),
            processor,
            max_concurrent_tasks,
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Full run: collect, then write the JSON files and the markdown report
    /// into the configured output directory.
    pub async fn run(&self) -> Result<InventoryReport> {
        let report = self.collect().await?;

        let output_dir = self.config.output.directory.clone();
        let pretty = self.config.output.pretty_json;
        let top_entities = self.config.output.top_entities;
        let export_report = report.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let exporter = JsonExporter::new(&output_dir, pretty)?;
            exporter.export(&export_report)?;
            MarkdownReport::new(top_entities).write(&export_report, exporter.output_dir())?;
            Ok(())
        })
        .await
        .map_err(|e| InventoryError::Validation(format!("Export task failed: {}", e)))??;

        Ok(report)
    }

    /// Scan, parse, extract entities and detect duplicates without writing
    /// anything.
    pub async fn collect(&self) -> Result<InventoryReport> {
        info!("Starting content inventory of {}", self.source.display());

        let files = self.scan_files().await?;
        let discovered = files.len();

        let progress = Arc::new(if self.show_progress {
            ProgressTracker::new(discovered)
        } else {
            ProgressTracker::hidden(discovered)
        });

        info!(
            "Parsing {} files with {} concurrent tasks...",
            discovered, self.max_concurrent_tasks
        );
        let parse_timer = StageTimer::start("parse");
        let records = self
            .process_files(files, progress.clone(), FileProcessor::process)
            .await;
        let parse_metrics = parse_timer.finish(records.len());
        progress.finish();

        let documents: Vec<Document> = records.iter().map(|r| r.document.clone()).collect();
        let config = self.config.clone();

        let (entities, duplicates, analysis_metrics) =
            tokio::task::spawn_blocking(move || analyze(&config, &documents))
                .await
                .map_err(|e| InventoryError::Validation(format!("Analysis task failed: {}", e)))??;

        let mut stats = progress.get_stats();
        stats.files_discovered = discovered;
        stats.total_words = records.iter().map(|r| r.document.word_count).sum();
        stats.duplicate_pairs = duplicates.len();
        stats.distinct_entities = entities.len();
        stats.stages.push(parse_metrics);
        stats.stages.extend(analysis_metrics);

        self.log_final_stats(&stats);

        Ok(InventoryReport {
            records,
            duplicates,
            entities,
            stats,
        })
    }

    /// Scan and parse, then detect near-duplicates only. Documents are not
    /// summarized and entities are not extracted.
    pub async fn find_duplicates(&self) -> Result<DuplicateScan> {
        info!("Scanning {} for near-duplicates", self.source.display());

        let files = self.scan_files().await?;
        let progress = Arc::new(if self.show_progress {
            ProgressTracker::new(files.len())
        } else {
            ProgressTracker::hidden(files.len())
        });

        let documents = self
            .process_files(files, progress.clone(), FileProcessor::parse)
            .await;
        progress.finish();

        let dedup_config = self.config.dedup.clone();
        let documents_scanned = documents.len();
        let duplicates = tokio::task::spawn_blocking(move || -> Result<Vec<DuplicatePair>> {
            DuplicateDetector::new(&dedup_config)?.find_duplicates(&documents)
        })
        .await
        .map_err(|e| InventoryError::Validation(format!("Duplicate task failed: {}", e)))??;

        Ok(DuplicateScan {
            documents: documents_scanned,
            duplicates,
        })
    }

    async fn scan_files(&self) -> Result<Vec<ScannedFile>> {
        let source = self.source.clone();
        let ingestion_config = self.config.ingestion.clone();

        tokio::task::spawn_blocking(move || {
            let scanner = FileScanner::new(ingestion_config);
            scanner.scan_directory(&source)
        })
        .await
        .map_err(|e| InventoryError::Validation(format!("File scanning task failed: {}", e)))?
    }

    /// Runs `task` on every file. Failed files are logged and left out; the
    /// rest keep scan order.
    async fn process_files<T, F>(
        &self,
        files: Vec<ScannedFile>,
        progress: Arc<ProgressTracker>,
        task: F,
    ) -> Vec<T>
    where
        T: Send + 'static,
        F: Fn(&FileProcessor, &ScannedFile) -> Result<T> + Copy + Send + 'static,
    {
        let processor = self.processor.clone();

        let tasks = files.into_iter().enumerate().map(|(position, file)| {
            let processor = processor.clone();
            let progress = progress.clone();

            async move {
                let file_size = file.size;
                let file_path = file.relative_path.clone();
                let processed =
                    tokio::task::spawn_blocking(move || task(processor.as_ref(), &file)).await;

                match processed {
                    Ok(Ok(output)) => {
                        progress.inc_files_processed();
                        progress.add_bytes_processed(file_size);
                        Some((position, output))
                    }
                    Ok(Err(e)) => {
                        progress.inc_files_failed();
                        warn!("Failed to process file {}: {}", file_path, e);
                        None
                    }
                    Err(e) => {
                        progress.inc_files_failed();
                        error!("Processing task for {} panicked: {}", file_path, e);
                        None
                    }
                }
            }
        });

        let mut results: Vec<(usize, T)> = stream::iter(tasks)
            .buffer_unordered(self.max_concurrent_tasks)
            .filter_map(|result| async move { result })
            .collect()
            .await;

        results.sort_by_key(|(position, _)| *position);
        results.into_iter().map(|(_, output)| output).collect()
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Inventory Summary ===");
        info!("Duration: {:.2} seconds", stats.duration_secs);
        info!("Files discovered: {}", stats.files_discovered);
        info!("Files processed: {}", stats.files_processed);
        info!("Files failed: {}", stats.files_failed);
        info!("Success rate: {:.2}%", stats.success_rate());
        info!("Total words: {}", stats.total_words);
        info!("Distinct entities: {}", stats.distinct_entities);
        info!("Duplicate pairs: {}", stats.duplicate_pairs);
        info!(
            "Processing speed: {:.2} files/sec",
            stats.files_per_second()
        );
        info!(
            "Throughput: {:.2} MB/sec",
            stats.bytes_per_second() / 1_048_576.0
        );
        for stage in &stats.stages {
            info!("Stage {}", stage.format());
        }
        info!("=========================");
    }
}

type Analysis = (EntityCounts, Vec<DuplicatePair>, Vec<PerformanceMetrics>);

fn analyze(config: &Config, documents: &[Document]) -> Result<Analysis> {
    let entity_timer = StageTimer::start("entities");
    let extractor = EntityExtractor::new(StopwordFilter::new(&config.summary.stopword_language));
    let entities = extractor.extract(documents);
    let entity_metrics = entity_timer.finish(documents.len());

    let dedup_timer = StageTimer::start("duplicates");
    let detector = DuplicateDetector::new(&config.dedup)?;
    let duplicates = detector.find_duplicates(documents)?;
    let dedup_metrics = dedup_timer.finish(documents.len());

    Ok((entities, duplicates, vec![entity_metrics, dedup_metrics]))
}

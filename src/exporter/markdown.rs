// file: src/exporter/markdown.rs
// description: human readable markdown summary of an inventory run

use crate::error::{InventoryError, Result};
use crate::pipeline::InventoryReport;
use crate::utils::Validator;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "report.md";

const SUMMARY_PREVIEW_CHARS: usize = 280;

pub struct MarkdownReport {
    top_entities: usize,
}

impl MarkdownReport {
    pub fn new(top_entities: usize) -> Self {
        Self { top_entities }
    }

    pub fn render(&self, report: &InventoryReport) -> String {
        let total_words: usize = report.records.iter().map(|r| r.document.word_count).sum();

        let mut out = String::new();
        let _ = writeln!(out, "# Content Inventory Summary\n");
        let _ = writeln!(out, "- **Total Files:** {}", report.records.len());
        let _ = writeln!(out, "- **Total Words:** {}", total_words);
        let _ = writeln!(out, "- **Duplicate Pairs:** {}", report.duplicates.len());
        let _ = writeln!(out, "- **Distinct Entities:** {}", report.entities.len());
        if report.stats.files_failed > 0 {
            let _ = writeln!(out, "- **Failed Files:** {}", report.stats.files_failed);
        }

        let _ = writeln!(out, "\n## Top {} Entities\n", self.top_entities);
        let top = report.entities.most_common(self.top_entities);
        if top.is_empty() {
            let _ = writeln!(out, "_No entities extracted._");
        }
        for (phrase, count) in top {
            let _ = writeln!(out, "- {}: {}", phrase, count);
        }

        let _ = writeln!(out, "\n## Duplicate Pairs\n");
        if report.duplicates.is_empty() {
            let _ = writeln!(out, "_No near-duplicates above the threshold._");
        } else {
            let _ = writeln!(out, "| Document 1 | Document 2 | Similarity |");
            let _ = writeln!(out, "| --- | --- | --- |");
            for pair in &report.duplicates {
                let _ = writeln!(
                    out,
                    "| {} | {} | {:.3} |",
                    escape_cell(&pair.doc1),
                    escape_cell(&pair.doc2),
                    pair.similarity
                );
            }
        }

        let _ = writeln!(out, "\n## Documents\n");
        for record in &report.records {
            let _ = writeln!(
                out,
                "### {}\n\n_{} words_\n\n{}\n",
                record.id(),
                record.document.word_count,
                Validator::truncate_text(&record.summary, SUMMARY_PREVIEW_CHARS)
            );
        }

        out
    }

    pub fn write(&self, report: &InventoryReport, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(REPORT_FILE);
        fs::write(&path, self.render(report)).map_err(|source| InventoryError::FileOperation {
            path: path.clone(),
            source,
        })?;

        info!("Markdown report written to {}", path.display());
        Ok(path)
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

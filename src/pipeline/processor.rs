// file: src/pipeline/processor.rs
// description: converts scanned files into summarized document records
// reference: reads, extracts text, builds the document and its summary

use crate::config::SummaryConfig;
use crate::error::{InventoryError, Result};
use crate::models::{Document, DocumentRecord};
use crate::parser::extract_text;
use crate::repository::ScannedFile;
use crate::summarizer::Summarizer;
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct FileProcessor {
    summarizer: Summarizer,
}

impl FileProcessor {
    pub fn new(config: SummaryConfig) -> Result<Self> {
        Ok(Self {
            summarizer: Summarizer::new(config)?,
        })
    }

    /// Reads and extracts the document text without summarizing it.
    pub fn parse(&self, scanned_file: &ScannedFile) -> Result<Document> {
        debug!("Parsing file: {}", scanned_file.relative_path);

        let content = self.read_file_content(&scanned_file.path)?;
        let text = extract_text(&scanned_file.path, &content)?;

        Ok(Document::new(
            scanned_file.relative_path.clone(),
            scanned_file.path.display().to_string(),
            text,
        ))
    }

    pub fn process(&self, scanned_file: &ScannedFile) -> Result<DocumentRecord> {
        let document = self.parse(scanned_file)?;
        let summary = self.summarizer.summarize_document(&document);

        debug!(
            "Parsed {} ({} words, {} summary chars)",
            document.id,
            document.word_count,
            summary.len()
        );

        Ok(DocumentRecord {
            document,
            size_bytes: scanned_file.size,
            modified: scanned_file.modified,
            summary,
        })
    }

    /// Invalid UTF-8 is replaced rather than rejected.
    fn read_file_content(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|source| InventoryError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

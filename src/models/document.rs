// file: src/models/document.rs
// description: corpus document model and its reported record
// reference: internal data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed corpus document. The id is unique within one corpus run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub path: String,
    pub text: String,
    pub word_count: usize,
}

impl Document {
    pub fn new(id: impl Into<String>, path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = text.split_whitespace().count();

        Self {
            id: id.into(),
            path: path.into(),
            text,
            word_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A document together with its file metadata and derived summary, as reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(flatten)]
    pub document: Document,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
    pub summary: String,
}

impl DocumentRecord {
    pub fn id(&self) -> &str {
        &self.document.id
    }
}

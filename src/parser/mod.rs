// file: src/parser/mod.rs
// description: document text extraction by file format
// reference: internal module structure

pub mod markdown;
pub mod markup;
pub mod normalizer;

pub use markdown::MarkdownParser;
pub use markup::MarkupStripper;
pub use normalizer::TextNormalizer;

use crate::error::{InventoryError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Markup,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "txt" | "text" => Some(Self::PlainText),
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" | "xhtml" | "xml" => Some(Self::Markup),
            _ => None,
        }
    }
}

/// Plain text of a file's content, chosen by its extension.
pub fn extract_text(path: &Path, content: &str) -> Result<String> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| InventoryError::Parse {
        file: path.display().to_string(),
        message: "unsupported document format".to_string(),
    })?;

    let content = TextNormalizer::new().normalize(content);
    let text = match format {
        DocumentFormat::PlainText => content,
        DocumentFormat::Markdown => MarkdownParser::new().to_plain_text(&content),
        DocumentFormat::Markup => MarkupStripper::new().strip(&content),
    };

    Ok(text)
}

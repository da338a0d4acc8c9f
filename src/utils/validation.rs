// file: src/utils/validation.rs
// description: input validation for command line arguments and paths
// reference: input validation patterns

use crate::error::{InventoryError, Result};
use crate::parser::DocumentFormat;
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            InventoryError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(InventoryError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(InventoryError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(InventoryError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// The directory may not exist yet, but must not be an existing file.
    pub fn validate_output_directory(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(InventoryError::Validation(format!(
                "Output path exists and is not a directory: {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn validate_supported_format(path: &Path) -> Result<()> {
        match DocumentFormat::from_path(path) {
            Some(_) => Ok(()),
            None => Err(InventoryError::Validation(format!(
                "Unsupported document format: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_threshold(threshold: f64) -> Result<()> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(InventoryError::Validation(format!(
                "Similarity threshold must be in (0, 1), got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// Cuts at a char boundary and appends an ellipsis.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.md");
        fs::write(&file_path, "test").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(temp.path()).is_err());
        assert!(Validator::validate_file_path(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_output_directory() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("taken");
        fs::write(&file_path, "x").unwrap();

        assert!(Validator::validate_output_directory(temp.path()).is_ok());
        assert!(Validator::validate_output_directory(&temp.path().join("new")).is_ok());
        assert!(Validator::validate_output_directory(&file_path).is_err());
    }

    #[test]
    fn test_validate_supported_format() {
        assert!(Validator::validate_supported_format(Path::new("a.md")).is_ok());
        assert!(Validator::validate_supported_format(Path::new("a.xml")).is_ok());
        assert!(Validator::validate_supported_format(Path::new("a.docx")).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(Validator::validate_threshold(0.8).is_ok());
        assert!(Validator::validate_threshold(0.0).is_err());
        assert!(Validator::validate_threshold(1.0).is_err());
        assert!(Validator::validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a..."
        );
        assert_eq!(Validator::truncate_text("ééééé", 2), "éé...");
    }
}

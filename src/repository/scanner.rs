// file: src/repository/scanner.rs
// description: Directory walking and corpus file discovery with filtering
// reference: https://docs.rs/walkdir

use crate::config::IngestionConfig;
use crate::error::{InventoryError, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub struct FileScanner {
    config: IngestionConfig,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Forward-slash path relative to the scan root; used as the document id.
    pub relative_path: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl FileScanner {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    /// Supported files under `root`, sorted by relative path.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        if !root.is_dir() {
            return Err(InventoryError::Validation(format!(
                "source is not a directory: {}",
                root.display()
            )));
        }

        info!("Scanning directory: {}", root.display());
        let max_size = (self.config.max_file_size_mb * 1024 * 1024) as u64;
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false).into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative_path = relative_id(root, path);

            if self.should_skip(&relative_path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            if !self.is_supported(path) {
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                warn!("Skipping file without metadata: {}", path.display());
                continue;
            };

            let size = metadata.len();
            if size > max_size {
                debug!(
                    "Skipping large file ({} MB): {}",
                    size / 1024 / 1024,
                    path.display()
                );
                continue;
            }

            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative_path,
                size,
                modified,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        if files.is_empty() {
            warn!("No supported files found in {}", root.display());
        } else {
            info!("Found {} supported files", files.len());
        }
        Ok(files)
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                self.config
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(e))
            })
            .unwrap_or(false)
    }

    /// `*.ext` matches a suffix, `name*` a prefix anywhere in the path, and
    /// anything else a substring.
    fn should_skip(&self, relative_path: &str) -> bool {
        self.config.skip_patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                relative_path.ends_with(suffix)
            } else if let Some(prefix) = pattern.strip_suffix('*') {
                relative_path.contains(prefix)
            } else {
                relative_path.contains(pattern.as_str())
            }
        })
    }
}

fn relative_id(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> IngestionConfig {
        IngestionConfig {
            parallel_workers: 1,
            extensions: vec!["txt".to_string(), "md".to_string(), "html".to_string()],
            skip_patterns: vec![".git/".to_string(), "*.tmp.txt".to_string(), "draft*".to_string()],
            max_file_size_mb: 1,
        }
    }

    #[test]
    fn test_scan_directory_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("policies/hr")).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("zeta.txt"), "z").unwrap();
        fs::write(temp.path().join("alpha.MD"), "# a").unwrap();
        fs::write(temp.path().join("policies/hr/leave.html"), "<p>x</p>").unwrap();
        fs::write(temp.path().join("scan.pdf"), "%PDF").unwrap();
        fs::write(temp.path().join("scratch.tmp.txt"), "t").unwrap();
        fs::write(temp.path().join("draft-notes.txt"), "d").unwrap();
        fs::write(temp.path().join(".git/config"), "[core]").unwrap();

        let scanner = FileScanner::new(config());
        let files = scanner.scan_directory(temp.path()).unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

        assert_eq!(ids, vec!["alpha.MD", "policies/hr/leave.html", "zeta.txt"]);
        assert_eq!(files[2].size, 1);
        assert!(files[2].modified.is_some());
    }

    #[test]
    fn test_size_cap() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.txt"), vec![b'a'; 1024 * 1024 + 1]).unwrap();
        fs::write(temp.path().join("small.txt"), "ok").unwrap();

        let files = FileScanner::new(config()).scan_directory(temp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "small.txt");
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = FileScanner::new(config()).scan_directory(&temp.path().join("absent"));
        assert!(matches!(result, Err(InventoryError::Validation(_))));
    }

    #[test]
    fn test_skip_patterns() {
        let scanner = FileScanner::new(config());

        assert!(scanner.should_skip("a/b.tmp.txt"));
        assert!(scanner.should_skip(".git/config"));
        assert!(scanner.should_skip("notes/draft-2.md"));
        assert!(!scanner.should_skip("policies/leave.md"));
    }
}

// file: src/exporter/json.rs
// description: json export of the inventory, duplicate pairs and entity counts

use crate::error::{InventoryError, Result};
use crate::pipeline::{InventoryReport, PipelineStats};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const INVENTORY_FILE: &str = "inventory.json";
pub const DUPLICATES_FILE: &str = "duplicates.json";
pub const ENTITIES_FILE: &str = "entities.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct EntityEntry<'a> {
    phrase: &'a str,
    count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub version: String,
    pub total_documents: usize,
    pub duplicate_pairs: usize,
    pub distinct_entities: usize,
    pub files: Vec<String>,
    pub stats: PipelineStats,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| InventoryError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir, pretty })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export(&self, report: &InventoryReport) -> Result<ExportManifest> {
        info!("Starting JSON export to {}", self.output_dir.display());

        let entities: Vec<EntityEntry> = report
            .entities
            .most_common(report.entities.len())
            .into_iter()
            .map(|(phrase, count)| EntityEntry { phrase, count })
            .collect();

        let files = vec![
            self.write_json(INVENTORY_FILE, &report.records)?,
            self.write_json(DUPLICATES_FILE, &report.duplicates)?,
            self.write_json(ENTITIES_FILE, &entities)?,
        ];

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            total_documents: report.records.len(),
            duplicate_pairs: report.duplicates.len(),
            distinct_entities: report.entities.len(),
            files,
            stats: report.stats.clone(),
        };
        self.write_json(MANIFEST_FILE, &manifest)?;

        info!(
            "Export complete: {} documents, {} duplicate pairs, {} entities",
            manifest.total_documents, manifest.duplicate_pairs, manifest.distinct_entities
        );
        Ok(manifest)
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let path = self.output_dir.join(name);
        fs::write(&path, json).map_err(|source| InventoryError::FileOperation {
            path: path.clone(),
            source,
        })?;

        Ok(name.to_string())
    }
}

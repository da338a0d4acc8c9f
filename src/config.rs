// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{InventoryError, Result};
use dotenvy::dotenv;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on worker threads for parsing and signature generation.
pub const MAX_WORKERS: usize = 8;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub parallel_workers: usize,
    pub extensions: Vec<String>,
    pub skip_patterns: Vec<String>,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DedupConfig {
    pub num_permutations: usize,
    pub similarity_threshold: f64,
    pub seed: u64,
    /// Explicit band count; derived from the threshold when unset.
    pub bands: Option<usize>,
    pub rows: Option<usize>,
    pub parallel_workers: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub max_sentences: usize,
    pub min_informative_words: usize,
    pub max_informative_words: usize,
    pub min_words_for_summarization: usize,
    pub fallback_sentences: usize,
    pub stopword_language: String,
    pub boilerplate_rules: Vec<BoilerplateRule>,
    pub residual_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BoilerplateRule {
    pub pattern: String,
    #[serde(default = "default_replacement")]
    pub replacement: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub pretty_json: bool,
    pub top_entities: usize,
}

fn default_replacement() -> String {
    " ".to_string()
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_WORKERS)
}

impl BoilerplateRule {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: default_replacement(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            parallel_workers: default_workers(),
            extensions: ["txt", "md", "markdown", "html", "htm", "xml"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_patterns: vec![".git/".to_string(), "*.tmp".to_string()],
            max_file_size_mb: 10,
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            num_permutations: 128,
            similarity_threshold: 0.8,
            seed: 1,
            bands: None,
            rows: None,
            parallel_workers: default_workers(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_sentences: 7,
            min_informative_words: 8,
            max_informative_words: 40,
            min_words_for_summarization: 50,
            fallback_sentences: 3,
            stopword_language: "en".to_string(),
            boilerplate_rules: default_boilerplate_rules(),
            residual_pattern: r"(?i)(table|appendix|figure|continued|copyright)".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./inventory"),
            pretty_json: true,
            top_entities: 50,
        }
    }
}

/// Recurring procedural artifacts of policy documents.
pub fn default_boilerplate_rules() -> Vec<BoilerplateRule> {
    [
        r"continued on next page",
        r"summary of document changes",
        r"issue version number.*",
        r"published date.*",
        r"data classification.*",
        r"contact your supervisor",
        r"stop –",
        r"uncontrolled when printed",
        r"appendix [a-z]",
        r"©\d{4}",
        r"\btable \d+\b",
        r"\bfigure \d+\b",
        r"next review due.*",
        r"definitions/abbreviations",
        r"document purpose",
        r"overview, continued",
    ]
    .iter()
    .map(|p| BoilerplateRule::new(p))
    .collect()
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CONTENT_INVENTORY")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| InventoryError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| InventoryError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.ingestion.parallel_workers == 0 || self.dedup.parallel_workers == 0 {
            return Err(InventoryError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        self.dedup.validate()?;
        self.summary.validate()?;

        Ok(())
    }
}

impl DedupConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_permutations == 0 {
            return Err(InventoryError::Config(
                "num_permutations must be greater than 0".to_string(),
            ));
        }

        if !(self.similarity_threshold > 0.0 && self.similarity_threshold < 1.0) {
            return Err(InventoryError::Config(format!(
                "similarity_threshold must be in (0, 1), got {}",
                self.similarity_threshold
            )));
        }

        match (self.bands, self.rows) {
            (None, None) => {}
            (Some(b), Some(r)) if b > 0 && r > 0 && b * r == self.num_permutations => {}
            (Some(b), Some(r)) => {
                return Err(InventoryError::Config(format!(
                    "bands ({}) x rows ({}) must equal num_permutations ({})",
                    b, r, self.num_permutations
                )));
            }
            _ => {
                return Err(InventoryError::Config(
                    "bands and rows must be set together".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_sentences == 0 {
            return Err(InventoryError::Config(
                "max_sentences must be greater than 0".to_string(),
            ));
        }

        if self.fallback_sentences == 0 {
            return Err(InventoryError::Config(
                "fallback_sentences must be greater than 0".to_string(),
            ));
        }

        if self.min_informative_words > self.max_informative_words {
            return Err(InventoryError::Config(format!(
                "min_informative_words ({}) exceeds max_informative_words ({})",
                self.min_informative_words, self.max_informative_words
            )));
        }

        for rule in &self.boilerplate_rules {
            Regex::new(&rule.pattern)?;
        }
        Regex::new(&self.residual_pattern)?;

        Ok(())
    }
}

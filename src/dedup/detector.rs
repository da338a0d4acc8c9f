// file: src/dedup/detector.rs
// description: corpus-level near-duplicate detection over MinHash signatures and an LSH index
// reference: signature -> insert all -> query all -> verify -> emit

use crate::config::DedupConfig;
use crate::dedup::lsh::{LshIndex, LshParams};
use crate::dedup::minhash::{MinHashSignature, MinHasher};
use crate::error::{InventoryError, Result};
use crate::models::{Document, DuplicatePair};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

pub struct DuplicateDetector {
    hasher: MinHasher,
    params: LshParams,
    threshold: f64,
    workers: usize,
}

impl DuplicateDetector {
    pub fn new(config: &DedupConfig) -> Result<Self> {
        config.validate()?;

        let params = match (config.bands, config.rows) {
            (Some(bands), Some(rows)) => LshParams::new(bands, rows)?,
            _ => LshParams::optimal(config.similarity_threshold, config.num_permutations)?,
        };

        Ok(Self {
            hasher: MinHasher::new(config.num_permutations, config.seed)?,
            params,
            threshold: config.similarity_threshold,
            workers: config.parallel_workers.max(1),
        })
    }

    pub fn with_threshold(threshold: f64) -> Result<Self> {
        Self::new(&DedupConfig {
            similarity_threshold: threshold,
            ..DedupConfig::default()
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn params(&self) -> LshParams {
        self.params
    }

    fn pool(&self) -> Result<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| InventoryError::Config(format!("worker pool: {}", e)))
    }

    /// One signature per document, in corpus order.
    pub fn signatures(&self, corpus: &[Document]) -> Result<Vec<MinHashSignature>> {
        let pool = self.pool()?;
        Ok(pool.install(|| {
            corpus
                .par_iter()
                .map(|doc| self.hasher.signature_for_text(&doc.text))
                .collect()
        }))
    }

    pub fn build_index(&self, corpus: &[Document]) -> Result<LshIndex> {
        let signatures = self.signatures(corpus)?;
        let mut index = LshIndex::new(self.params);
        for (doc, signature) in corpus.iter().zip(signatures) {
            index.insert(doc.id.as_str(), signature)?;
        }
        Ok(index)
    }

    /// Scored pairs above the threshold, each unordered pair once, sorted
    /// by `(doc1, doc2)`.
    pub fn find_duplicates(&self, corpus: &[Document]) -> Result<Vec<DuplicatePair>> {
        info!(
            "Detecting near-duplicates in {} documents (k={}, b={}, r={}, t={:.2})",
            corpus.len(),
            self.hasher.num_permutations(),
            self.params.bands,
            self.params.rows,
            self.threshold
        );

        let index = self.build_index(corpus)?;
        debug!("LSH index holds {} buckets", index.bucket_count());

        let pool = self.pool()?;
        let per_doc: Vec<Vec<DuplicatePair>> = pool.install(|| {
            corpus
                .par_iter()
                .map(|doc| self.verify_candidates(&index, &doc.id))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut pairs: Vec<DuplicatePair> = per_doc.into_iter().flatten().collect();
        pairs.sort_by(|a, b| a.cmp_ids(b));
        pairs.dedup_by(|a, b| a.key() == b.key());

        info!("Detected {} duplicate pairs", pairs.len());
        Ok(pairs)
    }

    fn verify_candidates(&self, index: &LshIndex, id: &str) -> Result<Vec<DuplicatePair>> {
        let Some(signature) = index.signature(id) else {
            return Ok(Vec::new());
        };

        let mut pairs = Vec::new();
        for candidate in index.candidates(id)? {
            // Collisions are symmetric; the smaller id emits the pair.
            if candidate <= id {
                continue;
            }
            let Some(other) = index.signature(candidate) else {
                continue;
            };
            let similarity = signature.similarity(other)?;
            if similarity >= self.threshold {
                pairs.push(DuplicatePair::new(id, candidate, similarity));
            }
        }
        Ok(pairs)
    }
}

/// Runs detection with default settings at the given threshold.
pub fn find_duplicates(corpus: &[Document], threshold: f64) -> Result<Vec<DuplicatePair>> {
    DuplicateDetector::with_threshold(threshold)?.find_duplicates(corpus)
}

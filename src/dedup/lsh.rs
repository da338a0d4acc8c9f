// file: src/dedup/lsh.rs
// description: banded locality-sensitive hashing index over MinHash signatures
// reference: Leskovec, Rajaraman, Ullman - Mining of Massive Datasets, ch. 3.4

use crate::dedup::minhash::MinHashSignature;
use crate::error::{InventoryError, Result};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

const INTEGRATION_STEPS: usize = 1000;
const FALSE_POSITIVE_WEIGHT: f64 = 0.5;
const FALSE_NEGATIVE_WEIGHT: f64 = 0.5;

/// Band/row split of a signature: `bands * rows == k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LshParams {
    pub bands: usize,
    pub rows: usize,
}

impl LshParams {
    pub fn new(bands: usize, rows: usize) -> Result<Self> {
        if bands == 0 || rows == 0 {
            return Err(InventoryError::InvalidParameter(
                "bands and rows must be >= 1".to_string(),
            ));
        }
        Ok(Self { bands, rows })
    }

    /// Picks the exact split of `num_permutations` that minimizes the
    /// equally weighted false-positive and false-negative areas under the
    /// collision curve around `threshold`.
    pub fn optimal(threshold: f64, num_permutations: usize) -> Result<Self> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(InventoryError::InvalidParameter(format!(
                "threshold must be in (0, 1), got {}",
                threshold
            )));
        }
        if num_permutations == 0 {
            return Err(InventoryError::InvalidParameter(
                "num_permutations must be greater than 0".to_string(),
            ));
        }

        let mut best: Option<(f64, Self)> = None;
        for bands in (1..=num_permutations).filter(|b| num_permutations % b == 0) {
            let params = Self {
                bands,
                rows: num_permutations / bands,
            };
            let error = FALSE_POSITIVE_WEIGHT * params.false_positive_area(threshold)
                + FALSE_NEGATIVE_WEIGHT * params.false_negative_area(threshold);

            if best.is_none_or(|(e, _)| error < e) {
                best = Some((error, params));
            }
        }

        // num_permutations >= 1 always has the divisor 1
        let (error, params) = best.ok_or_else(|| {
            InventoryError::InvalidParameter("no band split available".to_string())
        })?;

        debug!(
            "LSH split for t={:.2}, k={}: b={} r={} (weighted error {:.4})",
            threshold, num_permutations, params.bands, params.rows, error
        );

        Ok(params)
    }

    pub fn num_permutations(&self) -> usize {
        self.bands * self.rows
    }

    /// Probability that two documents with Jaccard `s` share at least one band.
    pub fn collision_probability(&self, s: f64) -> f64 {
        1.0 - (1.0 - s.powi(self.rows as i32)).powi(self.bands as i32)
    }

    /// Similarity at which the collision curve is steepest, `(1/b)^(1/r)`.
    pub fn threshold_estimate(&self) -> f64 {
        (1.0 / self.bands as f64).powf(1.0 / self.rows as f64)
    }

    pub fn false_positive_area(&self, threshold: f64) -> f64 {
        integrate(|s| self.collision_probability(s), 0.0, threshold)
    }

    pub fn false_negative_area(&self, threshold: f64) -> f64 {
        integrate(|s| 1.0 - self.collision_probability(s), threshold, 1.0)
    }
}

fn integrate(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    let step = (b - a) / INTEGRATION_STEPS as f64;
    (0..INTEGRATION_STEPS)
        .map(|i| f(a + (i as f64 + 0.5) * step))
        .sum::<f64>()
        * step
}

/// FNV-1a over the little-endian bytes of one band's rows.
fn hash_band(rows: &[u64]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    let mut state = OFFSET;
    for value in rows {
        for byte in value.to_le_bytes() {
            state ^= byte as u64;
            state = state.wrapping_mul(PRIME);
        }
    }
    state
}

fn band_hashes(rows: usize, signature: &MinHashSignature) -> impl Iterator<Item = u64> + '_ {
    signature.values().chunks(rows).map(hash_band)
}

/// Banded LSH index.
///
/// Buckets are a flat table indexed by band; each band maps a band hash to
/// the slots of the documents that produced it. Documents and their
/// signatures live in parallel arenas addressed by slot. Insert everything
/// first, then query through shared references.
#[derive(Debug)]
pub struct LshIndex {
    params: LshParams,
    buckets: Vec<HashMap<u64, Vec<usize>>>,
    ids: Vec<String>,
    slots: HashMap<String, usize>,
    signatures: Vec<MinHashSignature>,
}

impl LshIndex {
    pub fn new(params: LshParams) -> Self {
        Self {
            params,
            buckets: (0..params.bands).map(|_| HashMap::new()).collect(),
            ids: Vec::new(),
            slots: HashMap::new(),
            signatures: Vec::new(),
        }
    }

    pub fn with_threshold(threshold: f64, num_permutations: usize) -> Result<Self> {
        Ok(Self::new(LshParams::optimal(threshold, num_permutations)?))
    }

    pub fn params(&self) -> LshParams {
        self.params
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of non-empty buckets across all bands.
    pub fn bucket_count(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    pub fn signature(&self, id: &str) -> Option<&MinHashSignature> {
        self.slots.get(id).map(|&slot| &self.signatures[slot])
    }

    fn check_length(&self, signature: &MinHashSignature) -> Result<()> {
        let expected = self.params.num_permutations();
        if signature.len() != expected {
            return Err(InventoryError::SignatureLength {
                expected,
                got: signature.len(),
            });
        }
        Ok(())
    }

    pub fn insert(&mut self, id: impl Into<String>, signature: MinHashSignature) -> Result<()> {
        let id = id.into();
        self.check_length(&signature)?;

        if self.slots.contains_key(&id) {
            return Err(InventoryError::InvalidParameter(format!(
                "document id already indexed: {}",
                id
            )));
        }

        let slot = self.ids.len();
        for (band, hash) in band_hashes(self.params.rows, &signature).enumerate() {
            self.buckets[band].entry(hash).or_default().push(slot);
        }

        self.slots.insert(id.clone(), slot);
        self.ids.push(id);
        self.signatures.push(signature);
        Ok(())
    }

    fn colliding_slots(&self, signature: &MinHashSignature) -> BTreeSet<usize> {
        let mut candidates = BTreeSet::new();
        for (band, hash) in band_hashes(self.params.rows, signature).enumerate() {
            if let Some(slots) = self.buckets[band].get(&hash) {
                candidates.extend(slots.iter().copied());
            }
        }
        candidates
    }

    /// Ids of every indexed document sharing at least one band with
    /// `signature`, sorted.
    pub fn query(&self, signature: &MinHashSignature) -> Result<Vec<&str>> {
        self.check_length(signature)?;

        let mut ids: Vec<&str> = self
            .colliding_slots(signature)
            .into_iter()
            .map(|slot| self.ids[slot].as_str())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Candidates for an indexed document, itself excluded.
    pub fn candidates(&self, id: &str) -> Result<Vec<&str>> {
        let slot = *self.slots.get(id).ok_or_else(|| {
            InventoryError::InvalidParameter(format!("document id not indexed: {}", id))
        })?;

        let mut ids: Vec<&str> = self
            .colliding_slots(&self.signatures[slot])
            .into_iter()
            .filter(|&other| other != slot)
            .map(|other| self.ids[other].as_str())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::minhash::MinHasher;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_optimal_split_tracks_threshold() {
        assert_eq!(LshParams::optimal(0.5, 128).unwrap(), LshParams { bands: 32, rows: 4 });
        assert_eq!(LshParams::optimal(0.8, 128).unwrap(), LshParams { bands: 8, rows: 16 });
        assert_eq!(LshParams::optimal(0.9, 128).unwrap(), LshParams { bands: 4, rows: 32 });
    }

    #[test]
    fn test_optimal_split_covers_signature() {
        for k in [16, 64, 100, 128, 256] {
            for t in [0.3, 0.5, 0.7, 0.9] {
                let params = LshParams::optimal(t, k).unwrap();
                assert_eq!(params.num_permutations(), k);
            }
        }
    }

    #[test]
    fn test_optimal_rejects_bad_threshold() {
        assert!(LshParams::optimal(0.0, 128).is_err());
        assert!(LshParams::optimal(1.0, 128).is_err());
        assert!(LshParams::optimal(0.5, 0).is_err());
    }

    #[test]
    fn test_collision_curve() {
        let params = LshParams::new(32, 4).unwrap();
        assert_eq!(params.collision_probability(0.0), 0.0);
        assert_eq!(params.collision_probability(1.0), 1.0);
        assert!(params.collision_probability(0.6) > 0.95);
        assert!(params.collision_probability(0.1) < 0.01);
        assert!((params.threshold_estimate() - 0.42).abs() < 0.01);
    }

    #[test]
    fn test_more_rows_fewer_false_positives() {
        let wide = LshParams::new(32, 4).unwrap();
        let tall = LshParams::new(8, 16).unwrap();
        assert!(tall.false_positive_area(0.8) < wide.false_positive_area(0.8));
        assert!(wide.false_negative_area(0.8) < tall.false_negative_area(0.8));
    }

    #[test]
    fn test_insert_and_query() {
        let hasher = MinHasher::new(128, 1).unwrap();
        let mut index = LshIndex::new(LshParams::new(32, 4).unwrap());

        let base = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let near = "alpha beta gamma delta epsilon zeta eta theta iota lambda";
        let far = "completely unrelated text about shipping invoices";

        index.insert("base", hasher.signature_for_text(base)).unwrap();
        index.insert("near", hasher.signature_for_text(near)).unwrap();
        index.insert("far", hasher.signature_for_text(far)).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.candidates("base").unwrap(), vec!["near"]);
        assert_eq!(index.candidates("far").unwrap(), Vec::<&str>::new());

        let hits = index.query(&hasher.signature_for_text(base)).unwrap();
        assert_eq!(hits, vec!["base", "near"]);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let mut index = LshIndex::new(LshParams::new(8, 16).unwrap());
        let short = MinHasher::new(64, 1).unwrap().signature_for_text("a b c");

        assert!(matches!(
            index.insert("doc", short.clone()),
            Err(InventoryError::SignatureLength {
                expected: 128,
                got: 64
            })
        ));
        assert!(index.query(&short).is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let hasher = MinHasher::new(128, 1).unwrap();
        let mut index = LshIndex::with_threshold(0.8, 128).unwrap();
        index.insert("doc", hasher.signature_for_text("a b")).unwrap();
        assert!(index.insert("doc", hasher.signature_for_text("c d")).is_err());
        assert!(index.candidates("missing").is_err());
    }

    #[test]
    fn test_identical_inputs_identical_buckets() {
        let hasher = MinHasher::new(128, 1).unwrap();
        let build = || {
            let mut index = LshIndex::with_threshold(0.5, 128).unwrap();
            for (id, text) in [("a", "one two three"), ("b", "one two four"), ("c", "five six")] {
                index.insert(id, hasher.signature_for_text(text)).unwrap();
            }
            index
        };

        let first = build();
        let second = build();
        assert_eq!(first.buckets, second.buckets);
        assert_eq!(first.bucket_count(), second.bucket_count());
    }
}

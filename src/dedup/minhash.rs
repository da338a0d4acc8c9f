// file: src/dedup/minhash.rs
// description: MinHash signatures over token sets with an explicit affine hash family
// reference: https://en.wikipedia.org/wiki/MinHash

//! Each of the `k` hash functions is `h_i(x) = (a_i * x + b_i) mod p` with
//! `p = 2^61 - 1`, applied to a 64-bit digest of the token. The `(a_i, b_i)`
//! pairs are drawn once per [`MinHasher`] from a SplitMix64 stream, so a
//! given `(k, seed)` always yields the same family.

use crate::error::{InventoryError, Result};
use crate::text::TokenSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Mersenne prime `2^61 - 1`, the modulus of the hash family.
pub const MERSENNE_PRIME: u64 = (1 << 61) - 1;

/// Slot value of an empty token set. Lies outside `[0, p)` so it never
/// matches a slot of a non-empty set.
pub const EMPTY_SLOT: u64 = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Permutation {
    a: u64,
    b: u64,
}

impl Permutation {
    #[inline]
    fn apply(&self, x: u64) -> u64 {
        let v = (self.a as u128) * (x as u128) + self.b as u128;
        (v % MERSENNE_PRIME as u128) as u64
    }
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// 64-bit token digest: the first eight bytes of SHA-256, little endian.
#[inline]
pub fn token_hash(token: &str) -> u64 {
    let digest = Sha256::digest(token.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Generates fixed-length MinHash signatures.
#[derive(Debug, Clone)]
pub struct MinHasher {
    seed: u64,
    permutations: Vec<Permutation>,
}

impl MinHasher {
    pub fn new(num_permutations: usize, seed: u64) -> Result<Self> {
        if num_permutations == 0 {
            return Err(InventoryError::InvalidParameter(
                "num_permutations must be greater than 0".to_string(),
            ));
        }

        let mut rng = SplitMix64::new(seed);
        let permutations = (0..num_permutations)
            .map(|_| {
                let a = rng.next_u64() % (MERSENNE_PRIME - 1) + 1;
                let b = rng.next_u64() % MERSENNE_PRIME;
                Permutation { a, b }
            })
            .collect();

        Ok(Self { seed, permutations })
    }

    pub fn num_permutations(&self) -> usize {
        self.permutations.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn signature(&self, tokens: &TokenSet) -> MinHashSignature {
        let hashes: Vec<u64> = tokens.iter().map(token_hash).collect();
        self.signature_from_hashes(&hashes)
    }

    pub fn signature_for_text(&self, text: &str) -> MinHashSignature {
        self.signature(&TokenSet::from_text(text))
    }

    fn signature_from_hashes(&self, hashes: &[u64]) -> MinHashSignature {
        let values = self
            .permutations
            .iter()
            .map(|perm| {
                hashes
                    .iter()
                    .map(|&x| perm.apply(x))
                    .min()
                    .unwrap_or(EMPTY_SLOT)
            })
            .collect();

        MinHashSignature { values }
    }
}

/// Per-permutation minima of one document's token set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinHashSignature {
    values: Vec<u64>,
}

impl MinHashSignature {
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when the signature was built from an empty token set.
    pub fn is_empty_set(&self) -> bool {
        self.values.iter().all(|&v| v == EMPTY_SLOT)
    }

    /// Estimated Jaccard similarity: the fraction of matching slots.
    ///
    /// A signature of an empty set scores 0 against everything, itself
    /// included.
    pub fn similarity(&self, other: &Self) -> Result<f64> {
        if self.values.len() != other.values.len() {
            return Err(InventoryError::SignatureLength {
                expected: self.values.len(),
                got: other.values.len(),
            });
        }

        if self.values.is_empty() || self.is_empty_set() || other.is_empty_set() {
            return Ok(0.0);
        }

        let matches = self
            .values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a == b)
            .count();

        Ok(matches as f64 / self.values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_set(lo: usize, hi: usize) -> TokenSet {
        (lo..hi).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn test_zero_permutations_rejected() {
        assert!(MinHasher::new(0, 1).is_err());
    }

    #[test]
    fn test_signature_length() {
        for k in [1, 16, 128, 256] {
            let hasher = MinHasher::new(k, 1).unwrap();
            let sig = hasher.signature_for_text("some words here");
            assert_eq!(sig.len(), k);
        }
    }

    #[test]
    fn test_hash_family_is_valid_and_distinct() {
        let hasher = MinHasher::new(128, 7).unwrap();
        for perm in &hasher.permutations {
            assert!(perm.a >= 1 && perm.a < MERSENNE_PRIME);
            assert!(perm.b < MERSENNE_PRIME);
        }
        let distinct: std::collections::HashSet<_> =
            hasher.permutations.iter().map(|p| (p.a, p.b)).collect();
        assert_eq!(distinct.len(), 128);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let text = "the quick brown fox jumps over the lazy dog";
        let s1 = MinHasher::new(64, 1).unwrap().signature_for_text(text);
        let s2 = MinHasher::new(64, 1).unwrap().signature_for_text(text);
        assert_eq!(s1, s2);

        let s3 = MinHasher::new(64, 2).unwrap().signature_for_text(text);
        assert_ne!(s1, s3);
    }

    #[test]
    fn test_case_and_order_insensitive() {
        let hasher = MinHasher::new(32, 1).unwrap();
        let s1 = hasher.signature_for_text("Alpha beta GAMMA");
        let s2 = hasher.signature_for_text("gamma alpha Beta beta");
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_slots_stay_below_modulus() {
        let hasher = MinHasher::new(128, 1).unwrap();
        let sig = hasher.signature(&range_set(0, 50));
        assert!(sig.values().iter().all(|&v| v < MERSENNE_PRIME));
    }

    #[test]
    fn test_empty_set_sentinel() {
        let hasher = MinHasher::new(128, 1).unwrap();
        let empty = hasher.signature_for_text("   ");
        let other = hasher.signature_for_text("not empty");

        assert_eq!(empty.len(), 128);
        assert!(empty.is_empty_set());
        assert!(empty.values().iter().all(|&v| v == EMPTY_SLOT));
        assert_eq!(empty.similarity(&other).unwrap(), 0.0);
        assert_eq!(other.similarity(&empty).unwrap(), 0.0);
        assert_eq!(empty.similarity(&empty).unwrap(), 0.0);
    }

    #[test]
    fn test_identical_sets_score_one() {
        let hasher = MinHasher::new(128, 1).unwrap();
        let a = hasher.signature(&range_set(0, 40));
        let b = hasher.signature(&range_set(0, 40));
        assert_eq!(a.similarity(&b).unwrap(), 1.0);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let a = MinHasher::new(64, 1).unwrap().signature_for_text("a b c");
        let b = MinHasher::new(128, 1).unwrap().signature_for_text("a b c");
        assert!(matches!(
            a.similarity(&b),
            Err(InventoryError::SignatureLength {
                expected: 64,
                got: 128
            })
        ));
    }

    #[test]
    fn test_estimate_tracks_exact_jaccard() {
        let hasher = MinHasher::new(128, 1).unwrap();
        let cases = [(0, 100, 50, 150), (0, 100, 10, 110), (0, 200, 100, 300), (0, 100, 90, 190)];

        for (lo1, hi1, lo2, hi2) in cases {
            let a = range_set(lo1, hi1);
            let b = range_set(lo2, hi2);
            let exact = a.jaccard(&b);
            let estimate = hasher
                .signature(&a)
                .similarity(&hasher.signature(&b))
                .unwrap();
            assert!(
                (estimate - exact).abs() <= 0.1,
                "estimate {estimate} too far from exact {exact}"
            );
        }
    }

    #[test]
    fn test_error_shrinks_with_more_permutations() {
        let a = range_set(0, 300);
        let b = range_set(100, 400);
        let exact = a.jaccard(&b);

        let mean_error = |k: usize| {
            (1..=8u64)
                .map(|seed| {
                    let hasher = MinHasher::new(k, seed).unwrap();
                    let est = hasher
                        .signature(&a)
                        .similarity(&hasher.signature(&b))
                        .unwrap();
                    (est - exact).abs()
                })
                .sum::<f64>()
                / 8.0
        };

        assert!(mean_error(512) < mean_error(8));
    }
}

// file: src/text/tokenizer.rs
// description: whitespace shingling of document text into distinct lowercased tokens
// reference: set-based shingling for MinHash

use std::collections::HashSet;

/// Distinct lowercased whitespace-delimited tokens of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: HashSet<String>,
}

impl TokenSet {
    pub fn from_text(text: &str) -> Self {
        let tokens = text
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Exact Jaccard similarity `|A ∩ B| / |A ∪ B|`; two empty sets score 0.
    pub fn jaccard(&self, other: &Self) -> f64 {
        let union = self.tokens.union(&other.tokens).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = self.tokens.intersection(&other.tokens).count();
        intersection as f64 / union as f64
    }
}

impl<S: AsRef<str>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercased_distinct_tokens() {
        let set = TokenSet::from_text("The cat and THE dog\tand the\nbird");
        assert_eq!(set.len(), 5);
        assert!(set.contains("the"));
        assert!(set.contains("bird"));
        assert!(!set.contains("The"));
    }

    #[test]
    fn test_punctuation_stays_attached() {
        let set = TokenSet::from_text("end. end");
        assert_eq!(set.len(), 2);
        assert!(set.contains("end."));
    }

    #[test]
    fn test_empty_text() {
        assert!(TokenSet::from_text("").is_empty());
        assert!(TokenSet::from_text("  \n ").is_empty());
    }

    #[test]
    fn test_exact_jaccard() {
        let a: TokenSet = ["a", "b", "c", "d"].into_iter().collect();
        let b: TokenSet = ["a", "b", "c", "e"].into_iter().collect();
        assert!((a.jaccard(&b) - 0.6).abs() < 1e-12);
        assert_eq!(TokenSet::default().jaccard(&TokenSet::default()), 0.0);
    }
}

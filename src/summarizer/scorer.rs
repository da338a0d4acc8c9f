// file: src/summarizer/scorer.rs
// description: normalized term-frequency table and length-normalized sentence scoring
// reference: Luhn-style frequency weighting for extractive summaries

use crate::text::StopwordFilter;
use std::collections::HashMap;

/// Non-stopword term frequencies scaled so the most frequent term is 1.0.
#[derive(Debug, Clone, Default)]
pub struct TermFrequencies {
    weights: HashMap<String, f64>,
}

impl TermFrequencies {
    pub fn build<'a>(words: impl IntoIterator<Item = &'a str>, stopwords: &StopwordFilter) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for word in words {
            let word = word.to_lowercase();
            if stopwords.is_stopword(&word) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }

        let max = counts.values().copied().max().unwrap_or(0);
        if max == 0 {
            return Self::default();
        }

        let weights = counts
            .into_iter()
            .map(|(word, count)| (word, count as f64 / max as f64))
            .collect();

        Self { weights }
    }

    pub fn weight(&self, word: &str) -> f64 {
        self.weights
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence<'a> {
    /// Position among the informative sentences.
    pub index: usize,
    pub text: &'a str,
    pub score: f64,
}

/// Mean term weight per sentence. Sentences with no weighted term are dropped.
pub fn score_sentences<'a, F>(
    sentences: &[&'a str],
    frequencies: &TermFrequencies,
    words: F,
) -> Vec<ScoredSentence<'a>>
where
    F: Fn(&'a str) -> Vec<&'a str>,
{
    sentences
        .iter()
        .enumerate()
        .filter_map(|(index, &text)| {
            let tokens = words(text);
            if tokens.is_empty() {
                return None;
            }
            let total: f64 = tokens.iter().map(|t| frequencies.weight(t)).sum();
            if total <= 0.0 {
                return None;
            }
            Some(ScoredSentence {
                index,
                text,
                score: total / tokens.len() as f64,
            })
        })
        .collect()
}

/// The `limit` best sentences by score (ties to the earlier one), returned
/// in document order.
pub fn select_top<'a>(mut scored: Vec<ScoredSentence<'a>>, limit: usize) -> Vec<ScoredSentence<'a>> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
    scored.truncate(limit);
    scored.sort_by_key(|s| s.index);
    scored
}

// file: src/extractor/entities.rs
// description: corpus-wide noun-phrase frequency extraction
// reference: stopword/verb-delimited phrase chunking with plural folding

use crate::models::Document;
use crate::text::{RuleBasedAnalyzer, StopwordFilter, TextAnalyzer};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub const MAX_PHRASE_WORDS: usize = 4;

lazy_static! {
    static ref CLAUSE_BREAK: Regex =
        Regex::new(r#"[,;:()\[\]"“”/|]"#).expect("CLAUSE_BREAK regex is valid");
}

/// Phrase frequencies across a corpus, keyed by normalized phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCounts {
    counts: BTreeMap<String, usize>,
}

impl EntityCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, phrase: impl Into<String>) {
        *self.counts.entry(phrase.into()).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: EntityCounts) {
        for (phrase, count) in other.counts {
            *self.counts.entry(phrase).or_insert(0) += count;
        }
    }

    pub fn get(&self, phrase: &str) -> usize {
        self.counts.get(phrase).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Highest counts first; equal counts in phrase order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(phrase, &count)| (phrase.as_str(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(phrase, &count)| (phrase.as_str(), count))
    }
}

pub struct EntityExtractor {
    analyzer: Arc<dyn TextAnalyzer>,
    stopwords: StopwordFilter,
}

impl EntityExtractor {
    pub fn new(stopwords: StopwordFilter) -> Self {
        Self {
            analyzer: Arc::new(RuleBasedAnalyzer::new()),
            stopwords,
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn extract(&self, corpus: &[Document]) -> EntityCounts {
        info!("Extracting noun phrases from {} documents", corpus.len());

        let mut counts = EntityCounts::new();
        for doc in corpus.iter().filter(|d| !d.is_empty()) {
            for phrase in self.phrases(&doc.text) {
                counts.add(phrase);
            }
        }

        info!("Extracted {} distinct phrases", counts.len());
        counts
    }

    /// Phrases in text order. A phrase is a run of alphabetic words that are
    /// neither stopwords nor verbs; punctuation and sentence ends close a run.
    pub fn phrases(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();

        for sentence in self.analyzer.sentences(text) {
            for clause in CLAUSE_BREAK.split(sentence) {
                let mut run: Vec<String> = Vec::new();
                for word in self.analyzer.words(clause) {
                    if self.is_phrase_word(word) {
                        run.push(normalize_word(word));
                    } else {
                        flush_run(&mut run, &mut phrases);
                    }
                }
                flush_run(&mut run, &mut phrases);
            }
        }

        phrases
    }

    fn is_phrase_word(&self, word: &str) -> bool {
        word.chars().all(char::is_alphabetic)
            && !self.stopwords.is_stopword(word)
            && !self.analyzer.is_verb(word)
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(StopwordFilter::default())
    }
}

fn flush_run(run: &mut Vec<String>, phrases: &mut Vec<String>) {
    for chunk in run.chunks(MAX_PHRASE_WORDS) {
        let phrase = chunk.join(" ");
        if phrase.chars().count() > 1 {
            phrases.push(phrase);
        }
    }
    run.clear();
}

/// Lowercases and folds regular plurals to the singular.
pub fn normalize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    let len = lower.chars().count();

    if len > 4 && lower.ends_with("ies") {
        return format!("{}y", &lower[..lower.len() - 3]);
    }

    if len > 3
        && lower.ends_with('s')
        && !(lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is"))
    {
        return lower[..lower.len() - 1].to_string();
    }

    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(StopwordFilter::from_list(&[
            "the", "a", "an", "and", "of", "to", "for", "by", "in", "on", "every", "their",
        ]))
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Policies"), "policy");
        assert_eq!(normalize_word("claims"), "claim");
        assert_eq!(normalize_word("process"), "process");
        assert_eq!(normalize_word("status"), "status");
        assert_eq!(normalize_word("analysis"), "analysis");
        assert_eq!(normalize_word("bus"), "bus");
        assert_eq!(normalize_word("ties"), "tie");
    }

    #[test]
    fn test_phrases_split_on_verbs_and_stopwords() {
        let phrases = extractor().phrases("Claims officers review travel expense claims.");
        assert_eq!(phrases, vec!["claim officer", "travel expense claim"]);
    }

    #[test]
    fn test_phrases_split_on_punctuation_and_sentences() {
        let phrases =
            extractor().phrases("Managers review budgets, invoices and receipts. Auditors report.");
        assert_eq!(phrases, vec!["manager", "budget", "invoice", "receipt", "auditor"]);
    }

    #[test]
    fn test_long_runs_are_chunked() {
        let phrases = extractor().phrases("Alpha beta gamma delta epsilon zeta");
        assert_eq!(phrases, vec!["alpha beta gamma delta", "epsilon zeta"]);
    }

    #[test]
    fn test_single_characters_and_numbers_dropped() {
        let phrases = extractor().phrases("Form x in 2024 applies to staff.");
        assert_eq!(phrases, vec!["form x", "staff"]);

        let phrases = extractor().phrases("x 7 y");
        assert!(phrases.is_empty());
    }

    #[test]
    fn test_extract_counts_across_corpus() {
        let corpus = vec![
            Document::new("a.txt", "a.txt", "Expense claims require receipts."),
            Document::new("b.txt", "b.txt", "Every expense claim requires their receipt."),
            Document::new("c.txt", "c.txt", "   "),
        ];

        let counts = extractor().extract(&corpus);
        assert_eq!(counts.get("expense claim"), 2);
        assert_eq!(counts.get("receipt"), 2);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_non_ascii_whitespace_before_abbreviation() {
        let corpus = vec![Document::new(
            "memo.txt",
            "memo.txt",
            "Staff\u{a0}Dr. Smith reviews policies.",
        )];

        let counts = extractor().extract(&corpus);
        assert_eq!(counts.get("staff dr smith"), 1);
        assert_eq!(counts.get("policy"), 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_common_ordering() {
        let mut counts = EntityCounts::new();
        for phrase in ["budget", "audit", "budget", "claim", "audit", "zone"] {
            counts.add(phrase);
        }

        assert_eq!(
            counts.most_common(3),
            vec![("audit", 2), ("budget", 2), ("claim", 1)]
        );
        assert_eq!(counts.most_common(10).len(), 4);
    }

    #[test]
    fn test_merge_and_serialize() {
        let mut left = EntityCounts::new();
        left.add("claim");
        let mut right = EntityCounts::new();
        right.add("claim");
        right.add("policy");
        left.merge(right);

        assert_eq!(left.get("claim"), 2);
        let json = serde_json::to_string(&left).unwrap();
        assert_eq!(json, r#"{"claim":2,"policy":1}"#);
    }
}

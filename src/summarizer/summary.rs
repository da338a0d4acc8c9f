// file: src/summarizer/summary.rs
// description: extractive summarizer tuned for procedural and policy documents
// reference: clean -> segment -> filter informative -> score -> select -> finalize

use crate::config::SummaryConfig;
use crate::error::Result;
use crate::models::Document;
use crate::summarizer::boilerplate::{BoilerplateFilter, collapse_whitespace};
use crate::summarizer::scorer::{TermFrequencies, score_sentences, select_top};
use crate::text::{RuleBasedAnalyzer, StopwordFilter, TextAnalyzer};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

lazy_static! {
    static ref SPACE_BEFORE_PUNCT: Regex =
        Regex::new(r"\s+([.,;:!?])").expect("SPACE_BEFORE_PUNCT regex is valid");
}

pub struct Summarizer {
    config: SummaryConfig,
    filter: BoilerplateFilter,
    residual: Regex,
    stopwords: StopwordFilter,
    analyzer: Arc<dyn TextAnalyzer>,
}

impl Summarizer {
    pub fn new(config: SummaryConfig) -> Result<Self> {
        config.validate()?;

        let filter = BoilerplateFilter::new(&config.boilerplate_rules)?;
        let residual = Regex::new(&config.residual_pattern)?;
        let stopwords = StopwordFilter::new(&config.stopword_language);

        Ok(Self {
            config,
            filter,
            residual,
            stopwords,
            analyzer: Arc::new(RuleBasedAnalyzer::new()),
        })
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Short texts come back trimmed and otherwise untouched. Anything longer
    /// yields at most `max_sentences` sentences in document order.
    pub fn summarize(&self, text: &str) -> String {
        if text.split_whitespace().count() < self.config.min_words_for_summarization {
            return text.trim().to_string();
        }

        let mut cleaned = self.filter.clean(text);
        if self.analyzer.sentences(&cleaned).is_empty() {
            debug!("Boilerplate rules consumed the whole text; keeping unmatched sentences");
            cleaned = self.unmatched_sentences(text);
        }
        let sentences = self.analyzer.sentences(&cleaned);

        let informative: Vec<&str> = sentences
            .iter()
            .copied()
            .filter(|s| self.is_informative(s))
            .collect();

        if informative.is_empty() {
            debug!("No informative sentences found; using fallback summary");
            let take = sentences
                .len()
                .min(self.config.fallback_sentences)
                .min(self.config.max_sentences);
            return finalize_summary(&sentences[..take].join(" "));
        }

        let frequencies = TermFrequencies::build(self.analyzer.words(&cleaned), &self.stopwords);
        let scored = score_sentences(&informative, &frequencies, |s| self.analyzer.words(s));

        if scored.is_empty() {
            debug!("No weighted terms in informative sentences; using leading sentences");
            let take = informative.len().min(self.config.max_sentences);
            return finalize_summary(&informative[..take].join(" "));
        }

        let selected: Vec<&str> = select_top(scored, self.config.max_sentences)
            .into_iter()
            .map(|s| s.text)
            .collect();

        finalize_summary(&selected.join(" "))
    }

    pub fn summarize_document(&self, document: &Document) -> String {
        self.summarize(&document.text)
    }

    /// Raw sentences that no boilerplate rule touches, joined.
    fn unmatched_sentences(&self, text: &str) -> String {
        let collapsed = collapse_whitespace(text);
        self.analyzer
            .sentences(&collapsed)
            .into_iter()
            .filter(|sentence| !self.filter.matches(sentence))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_informative(&self, sentence: &str) -> bool {
        let words = self.analyzer.words(sentence);
        if words.len() < self.config.min_informative_words
            || words.len() > self.config.max_informative_words
        {
            return false;
        }

        if !words.iter().any(|w| self.analyzer.is_verb(w)) {
            return false;
        }

        !self.residual.is_match(sentence)
    }
}

/// Single-paragraph polish: no space before punctuation, single spaces,
/// terminal punctuation and a capitalized first letter.
pub fn finalize_summary(text: &str) -> String {
    let text = SPACE_BEFORE_PUNCT.replace_all(text, "$1");
    let mut text = collapse_whitespace(&text);
    if text.is_empty() {
        return text;
    }

    if !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POLICY_SENTENCES: [&str; 6] = [
        "Claims officers review each claim within five working days of receipt.",
        "The claim record is updated by the claims officer after every review.",
        "Parking permits are issued by the facilities desk on the ground floor.",
        "Every claim is checked against the policy before the claim is paid.",
        "Canteen opening hours are posted on the notice board near the entrance.",
        "Staff must attach the receipt and the claim form when they submit a claim.",
    ];

    fn policy_text() -> String {
        let (head, tail) = POLICY_SENTENCES.split_at(3);
        format!(
            "{}\nContinued on next page\n{}",
            head.join(" "),
            tail.join(" ")
        )
    }

    fn summarizer(max_sentences: usize) -> Summarizer {
        Summarizer::new(SummaryConfig {
            max_sentences,
            ..SummaryConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_short_text_returned_unchanged() {
        let text = "  Page 2 of 9. Continued on next page.  ";
        assert_eq!(summarizer(7).summarize(text), "Page 2 of 9. Continued on next page.");
        assert_eq!(summarizer(7).summarize(""), "");
    }

    #[test]
    fn test_selects_top_sentences_in_document_order() {
        let stopwords = StopwordFilter::from_list(&[
            "the", "a", "an", "and", "of", "to", "is", "are", "for", "by", "on", "in", "with",
            "each",
        ]);
        let summary = summarizer(2).with_stopwords(stopwords).summarize(&policy_text());

        assert_eq!(
            summary,
            "Claims officers review each claim within five working days of receipt. \
             Every claim is checked against the policy before the claim is paid."
        );
    }

    #[test]
    fn test_boilerplate_removed_and_bounded() {
        let text = policy_text();
        let engine = summarizer(3);
        let summary = engine.summarize(&text);

        assert!(!summary.to_lowercase().contains("continued on next page"));

        let sentences = RuleBasedAnalyzer::new().sentences(&summary);
        assert!(!sentences.is_empty());
        assert!(sentences.len() <= 3);

        let positions: Vec<usize> = sentences
            .iter()
            .map(|s| text.find(s).expect("summary sentence comes from the source"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_fallback_when_nothing_informative() {
        let text = (0..20)
            .map(|i| format!("Record number {i}."))
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(
            summarizer(7).summarize(&text),
            "Record number 0. Record number 1. Record number 2."
        );
    }

    #[test]
    fn test_fallback_respects_max_sentences() {
        let text = (0..20)
            .map(|i| format!("Record number {i}."))
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(summarizer(1).summarize(&text), "Record number 0.");
        assert_eq!(
            summarizer(2).summarize(&text),
            "Record number 0. Record number 1."
        );
    }

    #[test]
    fn test_greedy_rule_never_brings_boilerplate_back() {
        let text = format!(
            "Issue version number 3. {}",
            (0..30)
                .map(|i| format!("Record number {i}."))
                .collect::<Vec<_>>()
                .join(" ")
        );

        let summary = summarizer(7).summarize(&text);
        assert_eq!(summary, "Record number 0. Record number 1. Record number 2.");
        assert!(!summary.to_lowercase().contains("issue version number"));
    }

    #[test]
    fn test_everything_boilerplate_gives_empty_summary() {
        let text = (0..20)
            .map(|i| format!("Published date {i} of the register."))
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(summarizer(7).summarize(&text), "");
    }

    #[test]
    fn test_fallback_when_every_token_is_a_stopword() {
        let text = (0..6)
            .map(|i| format!("The staff have reviewed form {i} and the notes again today."))
            .collect::<Vec<_>>()
            .join(" ");
        let stopwords = StopwordFilter::from_list(&[
            "the", "staff", "have", "reviewed", "form", "and", "notes", "again", "today", "0",
            "1", "2", "3", "4", "5",
        ]);

        assert_eq!(
            summarizer(2).with_stopwords(stopwords).summarize(&text),
            "The staff have reviewed form 0 and the notes again today. \
             The staff have reviewed form 1 and the notes again today."
        );
    }

    #[test]
    fn test_residual_headings_are_not_selected() {
        let mut sentences: Vec<String> = POLICY_SENTENCES.iter().map(|s| s.to_string()).collect();
        sentences.push(
            "The claim claim claim summary below is continued from the previous claim page."
                .to_string(),
        );
        let summary = summarizer(7).summarize(&sentences.join(" "));

        assert!(!summary.contains("previous claim page"));
    }

    #[test]
    fn test_finalize_summary() {
        assert_eq!(
            finalize_summary("  the form  , once signed ,is filed "),
            "The form, once signed,is filed."
        );
        assert_eq!(finalize_summary("Already done!"), "Already done!");
        assert_eq!(finalize_summary("   "), "");
    }

    #[test]
    fn test_summarize_document() {
        let doc = Document::new("policy.txt", "/corpus/policy.txt", policy_text());
        let engine = summarizer(7);
        assert_eq!(engine.summarize_document(&doc), engine.summarize(&doc.text));
    }
}

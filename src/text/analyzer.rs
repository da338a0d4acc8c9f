// file: src/text/analyzer.rs
// description: linguistic collaborator seam with a rule-based default implementation
// reference: sentence segmentation and coarse verb detection heuristics

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WORD_TOKEN: Regex =
        Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("WORD_TOKEN regex is valid");
}

/// Sentence segmentation, word tokenization and verb detection.
///
/// The summarizer and entity extractor only see text through this trait, so
/// a full NLP backend can replace [`RuleBasedAnalyzer`] without touching
/// the scoring code.
pub trait TextAnalyzer: Send + Sync {
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str>;

    /// Word tokens in order; punctuation is dropped.
    fn words<'a>(&self, text: &'a str) -> Vec<&'a str>;

    fn is_verb(&self, word: &str) -> bool;
}

pub struct RuleBasedAnalyzer {
    abbreviations: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
}

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        let abbreviations = [
            "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc",
            "ltd", "co", "no", "fig", "approx", "dept", "est",
        ]
        .into_iter()
        .collect();

        let verbs = [
            "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had",
            "do", "does", "did", "can", "could", "will", "would", "shall", "should", "may",
            "might", "must", "make", "makes", "made", "use", "uses", "take", "takes", "took",
            "give", "gives", "gave", "get", "gets", "got", "go", "goes", "went", "see", "sees",
            "saw", "know", "knows", "knew", "keep", "keeps", "kept", "let", "lets", "put",
            "puts", "set", "sets", "say", "says", "said", "send", "sends", "sent", "find",
            "finds", "found", "tell", "tells", "told", "become", "becomes", "became", "leave",
            "leaves", "left", "hold", "holds", "held", "bring", "brings", "brought", "begin",
            "begins", "began", "run", "runs", "ran", "write", "writes", "wrote", "read",
            "reads", "pay", "pays", "paid", "meet", "meets", "met", "include", "includes",
            "provide", "provides", "require", "requires", "ensure", "ensures", "contain",
            "contains", "describe", "describes", "explain", "explains", "apply", "applies",
            "allow", "allows", "need", "needs", "support", "supports", "review", "reviews",
            "report", "reports", "follow", "follows", "help", "helps", "show", "shows",
            "remain", "remains", "seem", "seems", "appear", "appears", "store", "stores",
            "check", "checks", "complete", "completes", "record", "records", "manage",
            "manages", "create", "creates", "define", "defines", "outline", "outlines",
        ]
        .into_iter()
        .collect();

        Self {
            abbreviations,
            verbs,
        }
    }

    fn is_abbreviation(&self, text: &str, period_idx: usize) -> bool {
        let start = text[..period_idx]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = text[start..period_idx].trim_start_matches(['(', '"', '\'']);

        if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
            return true;
        }

        self.abbreviations.contains(word.to_lowercase().as_str())
    }
}

impl Default for RuleBasedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’')
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '\'' | '(' | '[' | '“' | '‘')
}

impl TextAnalyzer for RuleBasedAnalyzer {
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (idx, c) = chars[i];
            if !is_terminator(c) {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
                j += 1;
            }

            let followed_by_space = j < chars.len() && chars[j].1.is_whitespace();
            let mut k = j;
            while k < chars.len() && chars[k].1.is_whitespace() {
                k += 1;
            }

            let boundary = followed_by_space
                && k < chars.len()
                && opens_sentence(chars[k].1)
                && !(c == '.' && self.is_abbreviation(text, idx));

            if boundary {
                let end = chars[j].0;
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = chars[k].0;
                i = k;
            } else {
                i = j;
            }
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }

        sentences
    }

    fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        WORD_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
    }

    fn is_verb(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        if self.verbs.contains(lower.as_str()) {
            return true;
        }

        if !lower.chars().all(char::is_alphabetic) {
            return false;
        }

        let len = lower.chars().count();
        (len >= 5 && (lower.ends_with("ed") || lower.ends_with("ing")))
            || (len >= 6
                && (lower.ends_with("ize") || lower.ends_with("ise") || lower.ends_with("ify")))
    }
}

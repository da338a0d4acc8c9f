// file: src/text/stopwords.rs
// description: stopword filtering backed by the stop-words lists
// reference: https://docs.rs/stop-words

use std::collections::HashSet;
use stop_words::{LANGUAGE, get};

/// A case-insensitive stopword set.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordFilter {
    /// Supported languages: en, de, fr, es, it, pt, nl. Anything else falls back to English.
    pub fn new(language: &str) -> Self {
        let lang = match language.to_lowercase().as_str() {
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            _ => LANGUAGE::English,
        };

        Self {
            stopwords: get(lang).iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.insert(word.to_lowercase());
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}

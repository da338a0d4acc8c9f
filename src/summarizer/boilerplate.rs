// file: src/summarizer/boilerplate.rs
// description: ordered, data-driven rule table that strips recurring boilerplate
// reference: https://docs.rs/regex

use crate::config::BoilerplateRule;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("WHITESPACE regex is valid");
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    replacement: String,
}

/// Applies boilerplate rules in order, case-insensitively.
#[derive(Debug, Clone)]
pub struct BoilerplateFilter {
    rules: Vec<CompiledRule>,
}

impl BoilerplateFilter {
    pub fn new(rules: &[BoilerplateRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    pattern: RegexBuilder::new(&rule.pattern)
                        .case_insensitive(true)
                        .build()?,
                    replacement: rule.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True when any rule matches somewhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.rules.iter().any(|rule| rule.pattern.is_match(text))
    }

    /// Collapses whitespace, applies every rule, collapses again.
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = collapse_whitespace(text);
        for rule in &self.rules {
            cleaned = rule
                .pattern
                .replace_all(&cleaned, rule.replacement.as_str())
                .into_owned();
        }
        collapse_whitespace(&cleaned)
    }
}

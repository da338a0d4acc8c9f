// file: src/parser/markup.rs
// description: HTML and XML tag stripping with entity decoding
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").expect("COMMENT regex is valid");

    static ref SCRIPT_STYLE: Regex = Regex::new(
        r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>"
    ).expect("SCRIPT_STYLE regex is valid");

    static ref CDATA: Regex =
        Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("CDATA regex is valid");

    static ref BLOCK_TAG: Regex = Regex::new(
        r"(?i)</?(?:p|div|br|li|ul|ol|h[1-6]|tr|td|th|table|section|article|header|footer|title|blockquote|para|item|entry)\b[^>]*>"
    ).expect("BLOCK_TAG regex is valid");

    static ref TAG: Regex = Regex::new(r"<[^>]*>").expect("TAG regex is valid");

    static ref ENTITY: Regex =
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("ENTITY regex is valid");

    static ref HORIZONTAL_SPACE: Regex =
        Regex::new(r"[ \t\u{a0}]+").expect("HORIZONTAL_SPACE regex is valid");
}

pub struct MarkupStripper;

impl MarkupStripper {
    pub fn new() -> Self {
        Self
    }

    /// Visible text, one line per block element.
    pub fn strip(&self, content: &str) -> String {
        let text = COMMENT.replace_all(content, "");
        let text = SCRIPT_STYLE.replace_all(&text, "");
        let text = CDATA.replace_all(&text, "$1");
        let text = BLOCK_TAG.replace_all(&text, "\n");
        let text = TAG.replace_all(&text, " ");
        let text = ENTITY.replace_all(&text, |caps: &Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        });

        text.lines()
            .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for MarkupStripper {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "–",
        "mdash" => "—",
        "hellip" => "…",
        "copy" => "©",
        "reg" => "®",
        "lsquo" => "‘",
        "rsquo" => "’",
        "ldquo" => "“",
        "rdquo" => "”",
        _ => return None,
    };
    Some(decoded.to_string())
}

// file: src/parser/markdown.rs
// description: markdown to plain text with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    /// Prose of the document: one line per block, code blocks, raw HTML and
    /// frontmatter dropped.
    pub fn to_plain_text(&self, content: &str) -> String {
        let body = strip_frontmatter(content);
        let parser = Parser::new_ext(body, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);

        let mut plain_text = String::new();
        let mut in_code_block = false;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                }
                Event::End(
                    TagEnd::Paragraph
                    | TagEnd::Heading(_)
                    | TagEnd::Item
                    | TagEnd::BlockQuote(_)
                    | TagEnd::TableRow
                    | TagEnd::TableHead,
                ) => {
                    plain_text.push('\n');
                }
                Event::End(TagEnd::TableCell) => {
                    plain_text.push(' ');
                }
                Event::Text(text) | Event::Code(text) if !in_code_block => {
                    plain_text.push_str(&text);
                }
                Event::SoftBreak => {
                    plain_text.push(' ');
                }
                Event::HardBreak => {
                    plain_text.push('\n');
                }
                _ => {}
            }
        }

        plain_text.trim().to_string()
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops a leading `---` delimited metadata block.
fn strip_frontmatter(content: &str) -> &str {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return content;
    };

    match rest.find("\n---") {
        Some(end) => {
            let after = &rest[end + 4..];
            after.split_once('\n').map(|(_, body)| body).unwrap_or("")
        }
        None => content,
    }
}

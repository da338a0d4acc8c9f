// file: src/parser/normalizer.rs
// description: text normalization applied to every extracted document
// reference: line ending and blank line normalization

pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, content: &str) -> String {
        let content = content.trim_start_matches('\u{feff}');
        let content = self.normalize_line_endings(content);
        let content = self.strip_control_chars(&content);
        self.normalize_line_breaks(&content)
    }

    fn normalize_line_endings(&self, content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }

    fn strip_control_chars(&self, content: &str) -> String {
        content
            .chars()
            .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
            .collect()
    }

    /// Trailing spaces removed and runs of blank lines reduced to one.
    fn normalize_line_breaks(&self, content: &str) -> String {
        let mut result = Vec::new();
        let mut blank_run = false;

        for line in content.lines().map(str::trim_end) {
            if line.is_empty() {
                if !blank_run && !result.is_empty() {
                    result.push(line);
                }
                blank_run = true;
            } else {
                result.push(line);
                blank_run = false;
            }
        }

        while result.last().is_some_and(|l| l.is_empty()) {
            result.pop();
        }

        result.join("\n")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

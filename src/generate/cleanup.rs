//! Markdown stripping for generated text.
//!
//! Models answer in Markdown no matter how firmly the instructions forbid it;
//! a Word run renders that markup literally. This pass flattens the common
//! constructs into plain text: headings lose their hashes, emphasis markers
//! are dropped, list markers become bullet characters, fenced code blocks are
//! unwrapped and table rows collapse into bulleted lines.
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").unwrap());
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:\w+)?\n?(.*?)\n?```").unwrap());
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());
static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|[-:\s|]+\|$").unwrap());

/// Flatten Markdown markup into Word-ready plain text.
pub fn strip_markdown(text: &str) -> String {
    let text = flatten_tables(text);
    let text = HEADING.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = LIST_MARKER.replace_all(&text, "• ");
    let text = CODE_FENCE.replace_all(&text, "$1");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Turn `| a | b |` table rows into `• a - b` lines, dropping separator rows.
fn flatten_tables(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('|') {
            if TABLE_SEPARATOR.is_match(trimmed) {
                continue;
            }
            let cells: Vec<&str> = trimmed
                .split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect();
            if !cells.is_empty() {
                lines.push(format!(" • {}", cells.join(" - ")));
                continue;
            }
        }
        lines.push(line.to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_emphasis_removed() {
        let cleaned = strip_markdown("## Resumen\nTexto **clave** con *énfasis*.");
        assert_eq!(cleaned, "Resumen\nTexto clave con énfasis.");
    }

    #[test]
    fn test_list_markers_become_bullets() {
        let cleaned = strip_markdown("- uno\n* dos\n+ tres");
        assert_eq!(cleaned, "• uno\n• dos\n• tres");
    }

    #[test]
    fn test_code_fence_unwrapped() {
        let cleaned = strip_markdown("```json\n{\"a\": 1}\n```");
        assert_eq!(cleaned, "{\"a\": 1}");
    }

    #[test]
    fn test_table_rows_flattened() {
        let cleaned = strip_markdown("| Fase | Semanas |\n|------|---------|\n| Uno | 4 |");
        assert_eq!(cleaned, "• Fase - Semanas\n • Uno - 4");
    }

    #[test]
    fn test_blank_runs_collapsed() {
        let cleaned = strip_markdown("a\n\n\n\nb");
        assert_eq!(cleaned, "a\n\nb");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markdown("párrafo corrido"), "párrafo corrido");
    }
}

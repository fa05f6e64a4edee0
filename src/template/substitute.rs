//! Placeholder substitution in paragraphs and table cells.
use crate::docx::{Document, Paragraph, RunStyle, XmlTree};
use memchr::memmem;

/// Literal substring containment test for a placeholder token.
#[inline]
pub(crate) fn contains_token(haystack: &str, token: &str) -> bool {
    memmem::find(haystack.as_bytes(), token.as_bytes()).is_some()
}

/// Replace a placeholder in a single paragraph.
///
/// The check runs against the paragraph's concatenated text, so a token
/// whose characters are split across runs still matches: substitution always
/// operates on the full text and rewrites the paragraph as one styled run,
/// replacing every occurrence of the token. Returns `false` without touching
/// the paragraph when the token is absent.
pub fn replace_in_paragraph(
    tree: &mut XmlTree,
    paragraph: &Paragraph,
    token: &str,
    replacement: &str,
    style: &RunStyle,
) -> bool {
    let text = paragraph.text(tree);
    if !contains_token(&text, token) {
        return false;
    }

    let full_text = text.replace(token, replacement);
    paragraph.rewrite(tree, &full_text, style);
    true
}

/// Replace a placeholder across every table in the document.
///
/// Walks tables, rows, cells and cell paragraphs in document order and
/// applies [`replace_in_paragraph`] to each. Returns the number of
/// paragraphs rewritten.
pub fn replace_in_tables(
    document: &mut Document,
    token: &str,
    replacement: &str,
    style: &RunStyle,
) -> usize {
    let mut replaced = 0;

    for table in document.tables() {
        for row in table.rows(document.tree()) {
            for cell in row.cells(document.tree()) {
                for paragraph in cell.paragraphs(document.tree()) {
                    if replace_in_paragraph(
                        document.tree_mut(),
                        &paragraph,
                        token,
                        replacement,
                        style,
                    ) {
                        replaced += 1;
                    }
                }
            }
        }
    }

    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_fixture::docx_bytes;

    fn single_paragraph(text_runs: &[&str]) -> (Document, Paragraph) {
        let runs: String = text_runs
            .iter()
            .map(|t| format!("<w:r><w:t xml:space=\"preserve\">{t}</w:t></w:r>"))
            .collect();
        let doc = Document::from_bytes(&docx_bytes(&format!("<w:p>{runs}</w:p>"))).unwrap();
        let para = doc.paragraphs()[0];
        (doc, para)
    }

    #[test]
    fn test_absent_token_is_noop() {
        let (mut doc, para) = single_paragraph(&["Nada ", "que ver"]);
        let before = para.text(doc.tree());
        let run_count = para.runs(doc.tree()).len();

        let hit = replace_in_paragraph(doc.tree_mut(), &para, "[X]", "Y", &RunStyle::body());

        assert!(!hit);
        assert_eq!(para.text(doc.tree()), before);
        assert_eq!(para.runs(doc.tree()).len(), run_count);
    }

    #[test]
    fn test_all_occurrences_replaced_into_one_run() {
        let (mut doc, para) = single_paragraph(&["A [X] B [X] C"]);

        let hit = replace_in_paragraph(doc.tree_mut(), &para, "[X]", "Y", &RunStyle::body());

        assert!(hit);
        assert_eq!(para.text(doc.tree()), "A Y B Y C");
        assert_eq!(para.runs(doc.tree()).len(), 1);
    }

    #[test]
    fn test_token_split_across_runs() {
        let (mut doc, para) = single_paragraph(&["Inicio [RES", "UMEN] fin"]);

        let hit = replace_in_paragraph(doc.tree_mut(), &para, "[RESUMEN]", "R", &RunStyle::body());

        assert!(hit);
        assert_eq!(para.text(doc.tree()), "Inicio R fin");
    }

    #[test]
    fn test_table_count_matches_hit_cells() {
        // 4 rows x 3 cells, token in exactly 3 cells.
        let mut rows = String::new();
        for row in 0..4 {
            rows.push_str("<w:tr>");
            for col in 0..3 {
                let text = if (row + col) % 4 == 0 { "[X]" } else { "-" };
                rows.push_str(&format!(
                    "<w:tc><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:tc>"
                ));
            }
            rows.push_str("</w:tr>");
        }
        let mut doc =
            Document::from_bytes(&docx_bytes(&format!("<w:tbl>{rows}</w:tbl>"))).unwrap();

        let replaced = replace_in_tables(&mut doc, "[X]", "Y", &RunStyle::table());

        assert_eq!(replaced, 3);
        let table = doc.tables()[0];
        assert_eq!(table.rows(doc.tree())[0].cells(doc.tree())[0].text(doc.tree()), "Y");
    }

    #[test]
    fn test_table_without_token() {
        let mut doc = Document::from_bytes(&docx_bytes(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>fijo</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        ))
        .unwrap();

        assert_eq!(replace_in_tables(&mut doc, "[X]", "Y", &RunStyle::table()), 0);
    }
}

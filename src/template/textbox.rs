//! Placeholder substitution inside floating text boxes.
//!
//! Text rendered inside a drawn shape lives under a `txbxContent` container
//! in the raw markup and never shows up in the body's paragraph or table
//! views, so this pass works on the tree directly.
use super::substitute::contains_token;
use crate::docx::{Document, NodeId};

/// Replace a placeholder in text-box content, with a structural fallback.
///
/// Primary pass: every paragraph element in the document (tree order) has
/// its descendant `w:t` texts concatenated; when the concatenation contains
/// the token and the paragraph's immediate parent is a `txbxContent`
/// container, all recorded text nodes are blanked and the first one receives
/// the fully replaced string. Counts one per paragraph.
///
/// Fallback pass, only when the primary pass matched nothing at all for this
/// token: any single `w:t` under a body run whose own text contains the
/// token intact is replaced in place, counting one per text node. This
/// catches placeholders typed as one unsplit run outside any text box.
///
/// A token split across text nodes outside a text box is found by neither
/// pass and stays unresolved; that is deliberate.
pub fn replace_in_text_boxes(document: &mut Document, token: &str, replacement: &str) -> usize {
    let mut replaced = 0;

    let Some(root) = document.tree().document_element() else {
        return 0;
    };
    let paragraphs: Vec<NodeId> = document
        .tree()
        .descendants(root)
        .into_iter()
        .filter(|&id| document.tree().is_element(id, "p"))
        .collect();

    for paragraph in paragraphs {
        let (text_nodes, full_text) = {
            let tree = document.tree();
            let mut nodes = Vec::new();
            let mut text = String::new();
            for id in tree.descendants(paragraph) {
                if tree.is_element(id, "t") {
                    let t = tree.element_text(id);
                    if !t.is_empty() {
                        text.push_str(&t);
                        nodes.push(id);
                    }
                }
            }
            (nodes, text)
        };

        if text_nodes.is_empty() || !contains_token(&full_text, token) {
            continue;
        }
        let in_text_box = document
            .tree()
            .parent(paragraph)
            .is_some_and(|parent| document.tree().is_element(parent, "txbxContent"));
        if !in_text_box {
            continue;
        }

        let new_text = full_text.replace(token, replacement);
        let tree = document.tree_mut();
        for &node in &text_nodes {
            tree.set_element_text(node, "");
        }
        tree.set_element_text(text_nodes[0], &new_text);
        replaced += 1;
    }

    if replaced == 0 {
        replaced = replace_in_single_runs(document, token, replacement);
    }

    replaced
}

/// Direct in-place replacement in any body text node containing the whole token.
fn replace_in_single_runs(document: &mut Document, token: &str, replacement: &str) -> usize {
    let mut replaced = 0;

    let body = document.body();
    let runs: Vec<NodeId> = document
        .tree()
        .descendants(body)
        .into_iter()
        .filter(|&id| document.tree().is_element(id, "r"))
        .collect();

    for run in runs {
        let text_nodes: Vec<NodeId> = document
            .tree()
            .descendants(run)
            .into_iter()
            .filter(|&id| document.tree().is_element(id, "t"))
            .collect();
        for node in text_nodes {
            let text = document.tree().element_text(node);
            if contains_token(&text, token) {
                let new_text = text.replace(token, replacement);
                document.tree_mut().set_element_text(node, &new_text);
                replaced += 1;
            }
        }
    }

    replaced
}

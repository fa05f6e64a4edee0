//! Table, Row and Cell views for Word documents.
use super::paragraph::Paragraph;
use super::xml::{NodeId, XmlTree};

/// A table in a Word document (`<w:tbl>`).
///
/// Tables contain rows, which contain cells, which contain paragraphs. Like
/// [`Paragraph`], these are id-handles over the owning tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    node: NodeId,
}

/// A table row (`<w:tr>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    node: NodeId,
}

/// A table cell (`<w:tc>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    node: NodeId,
}

impl Table {
    pub(crate) fn new(node: NodeId) -> Self {
        Self { node }
    }

    /// The underlying `<w:tbl>` node.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Rows in document order.
    pub fn rows(&self, tree: &XmlTree) -> Vec<Row> {
        tree.children(self.node)
            .iter()
            .copied()
            .filter(|&child| tree.is_element(child, "tr"))
            .map(|node| Row { node })
            .collect()
    }
}

impl Row {
    /// Cells in document order.
    pub fn cells(&self, tree: &XmlTree) -> Vec<Cell> {
        tree.children(self.node)
            .iter()
            .copied()
            .filter(|&child| tree.is_element(child, "tc"))
            .map(|node| Cell { node })
            .collect()
    }
}

impl Cell {
    /// Paragraphs directly inside this cell, in document order.
    ///
    /// Only direct `w:p` children count; a nested table's paragraphs belong
    /// to that table's own cells.
    pub fn paragraphs(&self, tree: &XmlTree) -> Vec<Paragraph> {
        tree.children(self.node)
            .iter()
            .copied()
            .filter(|&child| tree.is_element(child, "p"))
            .map(Paragraph::new)
            .collect()
    }

    /// Concatenated text of the cell's paragraphs.
    pub fn text(&self, tree: &XmlTree) -> String {
        let mut out = String::new();
        for para in self.paragraphs(tree) {
            out.push_str(&para.text(tree));
        }
        out
    }
}

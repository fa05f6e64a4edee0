//! Paragraph view and the single-run rewriter.
use super::xml::{NodeId, XmlTree, escape_xml};

/// Font family and size applied to rewritten runs.
///
/// Substitution never preserves per-run formatting: a rewritten paragraph
/// always ends up as one run carrying this style.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStyle {
    /// Font family, applied to the ascii, hAnsi and cs slots.
    pub font: String,
    /// Size in points. WordprocessingML stores half-points, so .5 sizes are exact.
    pub size_pt: f32,
}

impl RunStyle {
    /// Font used by the proposal templates.
    pub const DEFAULT_FONT: &'static str = "Arial Nova Cond";

    pub fn new(font: impl Into<String>, size_pt: f32) -> Self {
        Self {
            font: font.into(),
            size_pt,
        }
    }

    /// Style for body paragraphs.
    pub fn body() -> Self {
        Self::new(Self::DEFAULT_FONT, 11.5)
    }

    /// Style for table cell paragraphs.
    pub fn table() -> Self {
        Self::new(Self::DEFAULT_FONT, 12.0)
    }

    /// Size in half-points, the unit of `w:sz`.
    pub fn half_points(&self) -> u32 {
        (self.size_pt * 2.0).round() as u32
    }
}

impl Default for RunStyle {
    fn default() -> Self {
        Self::body()
    }
}

/// A paragraph in a Word document.
///
/// A lightweight handle to a `<w:p>` element; all reads and edits go through
/// the owning [`XmlTree`], so view state cannot drift from the raw markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph {
    node: NodeId,
}

impl Paragraph {
    pub(crate) fn new(node: NodeId) -> Self {
        Self { node }
    }

    /// The underlying `<w:p>` node.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Concatenated run-level text of this paragraph, in document order.
    ///
    /// Only direct `w:t` children of the paragraph's direct `w:r` children
    /// count. Text nested deeper, such as inside a `w:drawing` anchoring a
    /// text box, belongs to that structure and is not part of the paragraph's
    /// own text.
    pub fn text(&self, tree: &XmlTree) -> String {
        let mut out = String::new();
        for run in self.runs(tree) {
            for &child in tree.children(run) {
                if tree.is_element(child, "t") {
                    out.push_str(&tree.element_text(child));
                }
            }
        }
        out
    }

    /// Direct `w:r` children of this paragraph.
    pub fn runs(&self, tree: &XmlTree) -> Vec<NodeId> {
        tree.children(self.node)
            .iter()
            .copied()
            .filter(|&child| tree.is_element(child, "r"))
            .collect()
    }

    /// Replace the paragraph's runs with a single styled run.
    ///
    /// Every existing `w:r` child is dropped (their formatting with them);
    /// non-run children such as `w:pPr` stay in place. The new run carries
    /// the given style and `new_text` verbatim, with `xml:space="preserve"`
    /// so leading/trailing whitespace survives. Empty text yields an empty
    /// run.
    pub fn rewrite(&self, tree: &mut XmlTree, new_text: &str, style: &RunStyle) {
        let kept: Vec<NodeId> = tree
            .children(self.node)
            .iter()
            .copied()
            .filter(|&child| !tree.is_element(child, "r"))
            .collect();
        tree.set_children(self.node, kept);

        let run = build_run(tree, new_text, style);
        tree.append_child(self.node, run);
    }
}

/// Build a detached `<w:r>` with explicit font and size properties.
fn build_run(tree: &mut XmlTree, text: &str, style: &RunStyle) -> NodeId {
    let font = escape_xml(&style.font);
    let half_points = style.half_points().to_string();

    let run = tree.new_element("w:r", Vec::new());

    let properties = tree.new_element("w:rPr", Vec::new());
    let fonts = tree.new_element(
        "w:rFonts",
        vec![
            ("w:ascii".to_string(), font.clone()),
            ("w:hAnsi".to_string(), font.clone()),
            ("w:cs".to_string(), font),
        ],
    );
    let size = tree.new_element("w:sz", vec![("w:val".to_string(), half_points.clone())]);
    let size_cs = tree.new_element("w:szCs", vec![("w:val".to_string(), half_points)]);
    tree.append_child(properties, fonts);
    tree.append_child(properties, size);
    tree.append_child(properties, size_cs);
    tree.append_child(run, properties);

    let t = tree.new_element(
        "w:t",
        vec![("xml:space".to_string(), "preserve".to_string())],
    );
    tree.set_element_text(t, text);
    tree.append_child(run, t);

    run
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_tree(inner: &str) -> (XmlTree, Paragraph) {
        let xml = format!("<w:body><w:p>{inner}</w:p></w:body>");
        let tree = XmlTree::parse(xml.as_bytes()).unwrap();
        let body = tree.document_element().unwrap();
        let p = tree.children(body)[0];
        (tree, Paragraph::new(p))
    }

    #[test]
    fn test_text_concatenates_runs() {
        let (tree, para) = paragraph_tree(
            "<w:r><w:t>Hola </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>mundo</w:t></w:r>",
        );
        assert_eq!(para.text(&tree), "Hola mundo");
        assert_eq!(para.runs(&tree).len(), 2);
    }

    #[test]
    fn test_text_excludes_drawing_nested_runs() {
        let (tree, para) = paragraph_tree(concat!(
            "<w:r><w:t>fuera</w:t></w:r>",
            "<w:r><w:drawing><wp:anchor><wps:txbx><w:txbxContent>",
            "<w:p><w:r><w:t>[DENTRO]</w:t></w:r></w:p>",
            "</w:txbxContent></wps:txbx></wp:anchor></w:drawing></w:r>",
        ));
        // Text inside the anchored text box is not paragraph text.
        assert_eq!(para.text(&tree), "fuera");
    }

    #[test]
    fn test_rewrite_single_styled_run() {
        let (mut tree, para) = paragraph_tree("<w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r>");
        para.rewrite(&mut tree, "nuevo texto", &RunStyle::body());

        assert_eq!(para.runs(&tree).len(), 1);
        assert_eq!(para.text(&tree), "nuevo texto");

        let xml = String::from_utf8(tree.serialize()).unwrap();
        assert!(xml.contains("w:ascii=\"Arial Nova Cond\""));
        assert!(xml.contains("<w:sz w:val=\"23\"/>"));
        assert!(xml.contains("xml:space=\"preserve\""));
    }

    #[test]
    fn test_rewrite_keeps_paragraph_properties() {
        let (mut tree, para) =
            paragraph_tree("<w:pPr><w:jc w:val=\"center\"/></w:pPr><w:r><w:t>x</w:t></w:r>");
        para.rewrite(&mut tree, "y", &RunStyle::table());

        let xml = String::from_utf8(tree.serialize()).unwrap();
        assert!(xml.contains("<w:jc w:val=\"center\"/>"));
        assert!(xml.contains("<w:sz w:val=\"24\"/>"));
    }

    #[test]
    fn test_rewrite_empty_text_gives_empty_run() {
        let (mut tree, para) = paragraph_tree("<w:r><w:t>x</w:t></w:r>");
        para.rewrite(&mut tree, "", &RunStyle::default());

        assert_eq!(para.runs(&tree).len(), 1);
        assert_eq!(para.text(&tree), "");
    }

    #[test]
    fn test_half_points() {
        assert_eq!(RunStyle::body().half_points(), 23);
        assert_eq!(RunStyle::table().half_points(), 24);
    }
}

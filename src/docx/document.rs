//! The main document: package, markup tree, and object views.
use super::package::{DOCUMENT_PART, Package};
use super::paragraph::Paragraph;
use super::table::Table;
use super::xml::{NodeId, XmlTree};
use crate::error::{Error, Result};
use std::path::Path;

/// A Word document open for templating.
///
/// Owns the OPC [`Package`] and the parsed [`XmlTree`] of
/// `word/document.xml`. The paragraph and table accessors return handles
/// into that tree, so structured edits and raw-tree edits always see the
/// same state. A document lives for exactly one resolution pass: construct,
/// mutate, serialize, discard.
///
/// # Example
///
/// ```rust,no_run
/// use proforma::docx::Document;
///
/// let mut doc = Document::open("template.docx")?;
/// for para in doc.paragraphs() {
///     println!("{}", para.text(doc.tree()));
/// }
/// let bytes = doc.to_bytes()?;
/// # Ok::<(), proforma::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    tree: XmlTree,
    body: NodeId,
}

impl Document {
    /// Parse a document from .docx bytes.
    ///
    /// # Errors
    ///
    /// Fails when the bytes are not a ZIP package, the main document part is
    /// missing, its markup is malformed, or the part is not a
    /// `w:document`/`w:body` structure.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(data)?;
        let xml = package
            .part(DOCUMENT_PART)
            .ok_or_else(|| Error::PartNotFound(DOCUMENT_PART.to_string()))?;
        let tree = XmlTree::parse(xml)?;

        let root = tree
            .document_element()
            .ok_or_else(|| Error::InvalidTemplate("document part has no root element".into()))?;
        if !tree.is_element(root, "document") {
            return Err(Error::InvalidTemplate(format!(
                "expected w:document root, got {}",
                tree.name(root).unwrap_or("?")
            )));
        }
        let body = tree
            .children(root)
            .iter()
            .copied()
            .find(|&child| tree.is_element(child, "body"))
            .ok_or_else(|| Error::InvalidTemplate("missing w:body".into()))?;

        Ok(Self {
            package,
            tree,
            body,
        })
    }

    /// Open a document from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Top-level paragraphs of the body, in document order.
    ///
    /// Paragraphs inside tables or text boxes are not included; those are
    /// reached through [`Document::tables`] and the raw tree respectively.
    pub fn paragraphs(&self) -> Vec<Paragraph> {
        self.tree
            .children(self.body)
            .iter()
            .copied()
            .filter(|&child| self.tree.is_element(child, "p"))
            .map(Paragraph::new)
            .collect()
    }

    /// Top-level tables of the body, in document order.
    pub fn tables(&self) -> Vec<Table> {
        self.tree
            .children(self.body)
            .iter()
            .copied()
            .filter(|&child| self.tree.is_element(child, "tbl"))
            .map(Table::new)
            .collect()
    }

    /// The raw markup tree.
    #[inline]
    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    /// Mutable access to the raw markup tree.
    #[inline]
    pub fn tree_mut(&mut self) -> &mut XmlTree {
        &mut self.tree
    }

    /// The `w:body` node.
    #[inline]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The underlying package.
    #[inline]
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Serialize the document to finished .docx bytes.
    ///
    /// Writes the current tree state back into `word/document.xml`; every
    /// other part is emitted exactly as it came in.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let xml = self.tree.serialize();
        self.package.set_part(DOCUMENT_PART, xml);
        self.package.to_bytes()
    }

    /// Save the document to a file path.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Word (.docx) document model.
///
/// This module reads a template package, exposes the three views the
/// substitution passes need, and serializes the result:
/// - `Package`: the OPC (ZIP) container; foreign parts pass through untouched
/// - `Document`: the parsed `word/document.xml` with its `w:body`
/// - `Paragraph`/`Table`: object views over body children
/// - `XmlTree`: the raw markup tree the views project over, for content
///   (like floating text boxes) the object views cannot reach
///
/// # Example
///
/// ```rust,no_run
/// use proforma::docx::{Document, RunStyle};
///
/// let mut doc = Document::open("template.docx")?;
///
/// // Object views
/// for table in doc.tables() {
///     for row in table.rows(doc.tree()) {
///         for cell in row.cells(doc.tree()) {
///             println!("{}", cell.text(doc.tree()));
///         }
///     }
/// }
///
/// // Rewrite a paragraph as one styled run
/// let para = doc.paragraphs()[0];
/// para.rewrite(doc.tree_mut(), "texto final", &RunStyle::body());
/// # Ok::<(), proforma::Error>(())
/// ```
pub mod document;
pub mod package;
pub mod paragraph;
pub mod table;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_fixture;

pub use document::Document;
pub use package::{DOCUMENT_PART, Package};
pub use paragraph::{Paragraph, RunStyle};
pub use table::{Cell, Row, Table};
pub use xml::{NodeId, XmlTree};

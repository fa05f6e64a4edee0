/// Template placeholder substitution.
///
/// The engine locates literal bracketed tokens across three structurally
/// different regions of a Word document and replaces them with generated
/// text:
/// - plain body paragraphs (`substitute::replace_in_paragraph`)
/// - table cells (`substitute::replace_in_tables`)
/// - floating text boxes, which are invisible to the object views and are
///   edited through the raw tree (`textbox::replace_in_text_boxes`)
///
/// `resolver::Resolver` orchestrates the three passes per placeholder and
/// enforces the one success criterion: at least one replacement across the
/// whole table, or the resolution fails.
///
/// # Example
///
/// ```rust,no_run
/// use proforma::docx::Document;
/// use proforma::template::{PlaceholderTable, resolve_all};
///
/// let mut doc = Document::open("template.docx")?;
/// let table = PlaceholderTable::new()
///     .with("[RESUMEN]", |_prompt: &str| -> proforma::Result<Option<String>> {
///         Ok(Some("Resumen ejecutivo...".to_string()))
///     });
/// let total = resolve_all(&mut doc, "prompt del cliente", &table)?;
/// println!("{total} reemplazos");
/// # Ok::<(), proforma::Error>(())
/// ```
pub mod resolver;
pub mod substitute;
pub mod textbox;

pub use resolver::{PlaceholderTable, Resolver, SectionSource, resolve_all};
pub use substitute::{replace_in_paragraph, replace_in_tables};
pub use textbox::replace_in_text_boxes;

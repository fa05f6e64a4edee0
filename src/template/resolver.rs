//! Placeholder resolution: one generated section per token, three passes per
//! placeholder.
use super::substitute::{replace_in_paragraph, replace_in_tables};
use super::textbox::replace_in_text_boxes;
use crate::docx::{Document, RunStyle};
use crate::error::{Error, Result};

/// Produces the replacement text for one placeholder.
///
/// `Ok(None)` (or an empty string) means the section has nothing to say and
/// the placeholder is skipped; an `Err` aborts the whole resolution.
pub trait SectionSource {
    fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

impl<F> SectionSource for F
where
    F: Fn(&str) -> Result<Option<String>>,
{
    fn generate(&self, prompt: &str) -> Result<Option<String>> {
        self(prompt)
    }
}

/// Ordered mapping from placeholder token to its section source.
///
/// Entries resolve in insertion order. Tokens are literal bracketed markers
/// (`[RESUMEN]`), matched as plain substrings.
#[derive(Default)]
pub struct PlaceholderTable {
    entries: Vec<(String, Box<dyn SectionSource>)>,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; resolution order follows insertion order.
    pub fn insert(&mut self, token: impl Into<String>, source: impl SectionSource + 'static) {
        self.entries.push((token.into(), Box::new(source)));
    }

    /// Builder-style [`PlaceholderTable::insert`].
    pub fn with(mut self, token: impl Into<String>, source: impl SectionSource + 'static) -> Self {
        self.insert(token, source);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn SectionSource)> {
        self.entries
            .iter()
            .map(|(token, source)| (token.as_str(), source.as_ref()))
    }
}

/// The placeholder resolution engine.
///
/// For each table entry, in order: generate the section text, then apply the
/// paragraph, table and text-box substitution passes, accumulating a total
/// replacement count. Placeholders are processed strictly one at a time:
/// the text-box fallback is conditioned on a global zero-match state for the
/// current token and must not observe another token's matches.
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Style applied when rewriting body paragraphs.
    pub body_style: RunStyle,
    /// Style applied when rewriting table cell paragraphs.
    pub table_style: RunStyle,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            body_style: RunStyle::body(),
            table_style: RunStyle::table(),
        }
    }
}

impl Resolver {
    pub fn new(body_style: RunStyle, table_style: RunStyle) -> Self {
        Self {
            body_style,
            table_style,
        }
    }

    /// Resolve every placeholder in the document.
    ///
    /// Returns the total number of replacements across all placeholders.
    ///
    /// # Errors
    ///
    /// - [`Error::Section`] when a source fails; resolution aborts
    ///   immediately and the error names the offending token.
    /// - [`Error::NoChanges`] when no placeholder produced any replacement,
    ///   which signals drift between template and placeholder table.
    ///
    /// A source returning nothing is not an error: the placeholder is
    /// skipped with a warning and contributes zero to the total.
    pub fn resolve(
        &self,
        document: &mut Document,
        prompt: &str,
        table: &PlaceholderTable,
    ) -> Result<usize> {
        let mut total = 0;

        for (token, source) in table.iter() {
            let generated = source.generate(prompt).map_err(|e| Error::Section {
                token: token.to_string(),
                source: Box::new(e),
            })?;

            let text = match generated {
                Some(text) if !text.is_empty() => text,
                _ => {
                    log::warn!("placeholder {token}: no content generated, skipping");
                    continue;
                },
            };

            let mut count = 0;
            for paragraph in document.paragraphs() {
                if replace_in_paragraph(
                    document.tree_mut(),
                    &paragraph,
                    token,
                    &text,
                    &self.body_style,
                ) {
                    count += 1;
                }
            }
            count += replace_in_tables(document, token, &text, &self.table_style);
            count += replace_in_text_boxes(document, token, &text);

            log::debug!("placeholder {token}: {count} replacement(s)");
            total += count;
        }

        if total == 0 {
            return Err(Error::NoChanges);
        }
        Ok(total)
    }
}

/// Resolve with the default styles. See [`Resolver::resolve`].
pub fn resolve_all(
    document: &mut Document,
    prompt: &str,
    table: &PlaceholderTable,
) -> Result<usize> {
    Resolver::default().resolve(document, prompt, table)
}

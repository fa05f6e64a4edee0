//! Proforma - business proposal generation from Word templates
//!
//! This library turns a `.docx` proposal template full of bracketed
//! placeholders (`[RESUMEN]`, `[EQUIPO]`, ...) into a finished document:
//! each placeholder is resolved to generated text and substituted wherever
//! it appears, in body paragraphs, table cells or floating text boxes.
//!
//! # Features
//!
//! - **DOCX engine**: OPC package reader/writer plus a mutable document
//!   tree; every part except the main document is carried through untouched
//! - **Substitution**: placeholders are matched on concatenated paragraph
//!   text, so tokens split across runs by the editor still resolve
//! - **Section generation**: pluggable text generators per placeholder,
//!   with an Azure OpenAI chat-completions client behind the `client` feature
//! - **Storage**: template source and output sink traits, implemented for
//!   Azure Blob Storage with locally signed SAS download URLs
//!
//! # Example - Substituting placeholders in a template
//!
//! ```no_run
//! use proforma::docx::Document;
//! use proforma::template::{PlaceholderTable, resolve_all};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::open("Plantilla-Propuesta.docx")?;
//!
//! let table = PlaceholderTable::new().with(
//!     "[RESUMEN]",
//!     |_prompt: &str| -> proforma::Result<Option<String>> {
//!         Ok(Some("Resumen ejecutivo del proyecto...".to_string()))
//!     },
//! );
//!
//! let replacements = resolve_all(&mut doc, "propuesta para Acme Corp", &table)?;
//! println!("{replacements} replacement(s)");
//! doc.save("Propuesta-Acme.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - The full pipeline
//!
//! ```no_run
//! use proforma::generate::openai::OpenAiClient;
//! use proforma::generate::sections::standard_table;
//! use proforma::pipeline::Pipeline;
//! use proforma::storage::blob::BlobStore;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(
//!     BlobStore::from_env("propia")?,
//!     BlobStore::from_env("propia")?,
//! );
//! let table = standard_table(Arc::new(OpenAiClient::from_env()?));
//!
//! let proposal = pipeline.run("# Plan de migración\npara Acme Corp", &table)?;
//! println!("download: {}", proposal.url);
//! # Ok(())
//! # }
//! ```

/// DOCX package and document model
///
/// An OPC (ZIP) package reader/writer and a mutable XML tree over the main
/// document part, with paragraph and table views projected on top of it.
pub mod docx;

pub mod error;

/// Section content generation
///
/// Chat-message text generation, prompt fact extraction and the standard
/// proposal section table.
pub mod generate;

/// The end-to-end proposal pipeline
pub mod pipeline;

/// Template input and document output backends
pub mod storage;

/// Placeholder location and substitution
pub mod template;

pub use error::{Error, Result};

// Re-export the types most callers need
pub use docx::Document;
pub use pipeline::{Pipeline, Proposal};
pub use template::{PlaceholderTable, Resolver, resolve_all};

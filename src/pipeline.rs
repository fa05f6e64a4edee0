//! End-to-end proposal generation.
use crate::docx::Document;
use crate::error::{Error, Result};
use crate::generate::prompt::ProposalInfo;
use crate::storage::{OutputSink, TemplateSource};
use crate::template::{PlaceholderTable, Resolver};
use chrono::Local;
use serde::Serialize;

/// How long the returned download URL stays valid.
const SIGNED_URL_TTL_MINUTES: u32 = 24 * 60;

/// Summary of one generated proposal.
#[derive(Debug, Clone, Serialize)]
pub struct Proposal {
    pub document_id: String,
    pub filename: String,
    /// Full object name under the output prefix.
    pub blob_name: String,
    /// Time-limited download URL.
    pub url: String,
    pub company: String,
    pub date: String,
    pub title: String,
    /// Total placeholder replacements made in the document.
    pub replacements: usize,
}

/// Template in, finished document out.
///
/// `run` is the whole flow: fetch the template, resolve every placeholder
/// against the prompt, store the result and sign a download URL.
///
/// # Example
///
/// ```rust,no_run
/// use proforma::generate::openai::OpenAiClient;
/// use proforma::generate::sections::standard_table;
/// use proforma::pipeline::Pipeline;
/// use proforma::storage::blob::BlobStore;
/// use std::sync::Arc;
///
/// let pipeline = Pipeline::new(
///     BlobStore::from_env("propia")?,
///     BlobStore::from_env("propia")?,
/// );
/// let table = standard_table(Arc::new(OpenAiClient::from_env()?));
/// let proposal = pipeline.run("# Propuesta\npara Acme Corp...", &table)?;
/// println!("{}", proposal.url);
/// # Ok::<(), proforma::Error>(())
/// ```
pub struct Pipeline<T, S> {
    template: T,
    sink: S,
    resolver: Resolver,
}

impl<T: TemplateSource, S: OutputSink> Pipeline<T, S> {
    pub fn new(template: T, sink: S) -> Self {
        Self {
            template,
            sink,
            resolver: Resolver::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Generate one proposal from `prompt`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyPrompt`] for a blank prompt; otherwise whatever the
    /// template source, resolver or sink report. Nothing is stored unless
    /// resolution succeeded.
    pub fn run(&self, prompt: &str, table: &PlaceholderTable) -> Result<Proposal> {
        if prompt.trim().is_empty() {
            return Err(Error::EmptyPrompt);
        }

        let document_id = format!("{:08x}", rand::random::<u32>());
        log::info!("proposal {document_id}: starting");

        let template = self.template.fetch()?;
        let mut document = Document::from_bytes(&template)?;
        let info = ProposalInfo::extract(prompt);

        let replacements = self.resolver.resolve(&mut document, prompt, table)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!(
            "Propuesta_{}_{document_id}_{timestamp}.docx",
            sanitize_company(&info.company)
        );

        let bytes = document.to_bytes()?;
        let blob_name = self.sink.store(&filename, &bytes)?;
        let url = self.sink.signed_url(&blob_name, SIGNED_URL_TTL_MINUTES)?;
        log::info!("proposal {document_id}: {replacements} replacement(s), stored as {blob_name}");

        Ok(Proposal {
            document_id,
            filename,
            blob_name,
            url,
            company: info.company,
            date: info.date,
            title: info.title,
            replacements,
        })
    }
}

/// Company name as it may appear in a filename: word characters, spaces and
/// hyphens only, at most 20 characters.
fn sanitize_company(company: &str) -> String {
    company
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect::<String>()
        .trim()
        .chars()
        .take(20)
        .collect()
}

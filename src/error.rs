//! Unified error types for the proforma library.
//!
//! A single error enum covers the whole generation path, from unpacking the
//! template to signing the published URL, so callers can report which stage
//! failed without juggling per-module error types.
use thiserror::Error;

/// Main error type for proforma operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Package part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Template is not a usable Word document
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// The request prompt was missing or blank
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// Text generation failed
    #[error("Generator error: {0}")]
    Generator(String),

    /// A section source failed while resolving one placeholder.
    ///
    /// Aborts the whole resolution; the token identifies which entry failed.
    #[error("Section generation failed for {token}: {source}")]
    Section {
        token: String,
        #[source]
        source: Box<Error>,
    },

    /// No placeholder produced any change in the document.
    ///
    /// Signals drift between the template and the placeholder table.
    #[error("No changes were applied to the document")]
    NoChanges,

    /// Storage collaborator error (template fetch, upload, URL signing)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for proforma operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

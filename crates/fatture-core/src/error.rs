//! Error types for the fatture-core library.

use thiserror::Error;

/// Main error type for the fatture library.
#[derive(Error, Debug)]
pub enum FattureError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Repository/state persistence error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invoice generation error.
    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to loading and persisting the repository state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the state document.
    #[error("failed to read state: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to persist the state document.
    #[error("failed to persist state: {0}")]
    Persist(#[source] std::io::Error),

    /// The state document could not be decoded.
    #[error("corrupt state document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors related to invoice generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// No ready match exists for the requested case id.
    #[error("no ready match for case {0}")]
    NoMatch(String),

    /// The matched purchase order has no PO number to key the invoice on.
    #[error("purchase order has no PO number")]
    MissingPoNumber,

    /// Rendering the invoice document failed.
    #[error("failed to render invoice: {0}")]
    Render(String),

    /// Writing the rendered invoice file failed.
    #[error("failed to write invoice file: {0}")]
    Write(#[source] std::io::Error),

    /// Committing the updated state failed; nothing was retired.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for the fatture library.
pub type Result<T> = std::result::Result<T, FattureError>;

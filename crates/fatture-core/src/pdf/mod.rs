//! PDF processing module.

mod extractor;
mod tables;

pub use extractor::PdfExtractor;
pub use tables::{Table, TableRow};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract table-row records from the entire PDF, one table per page.
    fn extract_tables(&self) -> Result<Vec<Table>>;
}

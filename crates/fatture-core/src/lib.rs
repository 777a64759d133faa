//! Core library for supplier document reconciliation.
//!
//! This crate provides:
//! - PDF processing (text extraction and table-row recovery)
//! - Document classification (estimate vs. purchase order)
//! - Rule-based field extraction for both document kinds
//! - A repository with an atomically persisted state mirror
//! - Case-id matching of estimates against purchase orders
//! - Invoice generation with gap-free, year-partitioned numbering

pub mod error;
pub mod invoice;
pub mod matching;
pub mod models;
pub mod parse;
pub mod pdf;
pub mod store;

pub use error::{FattureError, GenerateError, PdfError, Result, StoreError};
pub use invoice::{BatchOutcome, InvoiceGenerator};
pub use matching::{compute_matches, MatchPair, MatchReport, Stats};
pub use models::{
    AppConfig, Estimate, GeneratedInvoice, InvoiceCategory, LineItem, PurchaseOrder, StoreData,
};
pub use parse::{classify, parse_estimate, parse_purchase_order, DocumentKind};
pub use pdf::{PdfExtractor, PdfProcessor, Table, TableRow};
pub use store::{IngestOutcome, IngestStatus, JsonFileStore, MemoryStore, Repository, StateStore};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    /// Full flow: ingest both documents, match, generate, and verify that
    /// the pair is retired and the case cannot reopen.
    #[test]
    fn reconciliation_end_to_end() {
        let mut repo = Repository::open(MemoryStore::new()).unwrap();

        let estimate_text = "PREVENTIVO\nPratica Hertz: 1001\nTarga: AB123CDT\n";
        let mut row = vec![String::new(); 25];
        row[1] = "Sostituzione frizione".to_string();
        row[19] = "1".to_string();
        row[20] = "1000,00".to_string();
        row[24] = "1000,00".to_string();
        let tables = vec![vec![row]];

        let outcome = repo.ingest_text(estimate_text, &tables, "prev_1001.pdf").unwrap();
        assert!(matches!(
            outcome,
            IngestOutcome::Estimate { status: IngestStatus::Added, .. }
        ));

        let po_text = "PURCHASE ORDER # 12345\nWD: 1001\nPlate Number: AB123CD\n";
        let outcome = repo.ingest_text(po_text, &[], "po_12345.pdf").unwrap();
        assert!(matches!(
            outcome,
            IngestOutcome::PurchaseOrder { status: IngestStatus::Added, .. }
        ));

        let report = compute_matches(repo.data());
        assert_eq!(report.matches.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let generator = InvoiceGenerator::new(dir.path());
        let record = generator.generate(&mut repo, "1001").unwrap();

        assert_eq!(record.numero_fattura, 1);
        assert_eq!(record.tipo, InvoiceCategory::Mechanical);
        assert_eq!(record.totale, Decimal::from_str("1220.00").unwrap());

        // The pair is retired and no natural key is both active and invoiced.
        assert!(repo.data().preventivi.is_empty());
        assert!(repo.data().purchase_orders.is_empty());
        assert!(repo.data().is_po_invoiced("12345"));

        // Re-uploading either document reports "already invoiced".
        let outcome = repo.ingest_text(estimate_text, &tables, "prev_1001.pdf").unwrap();
        assert!(matches!(
            outcome,
            IngestOutcome::Estimate { status: IngestStatus::AlreadyInvoiced, .. }
        ));
        let outcome = repo.ingest_text(po_text, &[], "po_12345.pdf").unwrap();
        assert!(matches!(
            outcome,
            IngestOutcome::PurchaseOrder { status: IngestStatus::AlreadyInvoiced, .. }
        ));
        assert!(repo.data().preventivi.is_empty());
        assert!(repo.data().purchase_orders.is_empty());
    }
}

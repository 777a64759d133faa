//! The repository: shared state, the ingestion gate, and administration
//! operations. Every mutation builds the next state document, persists it,
//! and only then replaces the in-memory copy, so a crash between
//! operations never loses a committed one.

use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::models::document::{Estimate, GeneratedInvoice, MailboxState, PurchaseOrder, StoreData};
use crate::parse::{classify, parse_estimate, parse_purchase_order, DocumentKind};
use crate::pdf::{PdfExtractor, PdfProcessor, Table};

use super::StateStore;

/// How an ingested document was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    /// New record inserted into the active collection.
    Added,
    /// Same natural key already active; nothing inserted.
    Duplicate,
    /// Natural key already has an issued invoice; nothing inserted.
    AlreadyInvoiced,
}

/// Result of an ingestion, carrying the parsed record when one exists.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Text matched neither document marker; no state action taken.
    Unrecognized,
    /// An estimate was parsed.
    Estimate {
        status: IngestStatus,
        record: Box<Estimate>,
    },
    /// A purchase order was parsed.
    PurchaseOrder {
        status: IngestStatus,
        record: Box<PurchaseOrder>,
    },
}

/// Shared repository over a durable state store.
pub struct Repository<S: StateStore> {
    store: S,
    data: StoreData,
}

impl<S: StateStore> Repository<S> {
    /// Open the repository, loading the persisted state.
    pub fn open(store: S) -> Result<Self> {
        let data = store.load()?;
        Ok(Self { store, data })
    }

    /// Current state.
    pub fn data(&self) -> &StoreData {
        &self.data
    }

    /// Persist `next` and make it the current state. The in-memory copy is
    /// only replaced after the mirror write succeeds.
    pub(crate) fn commit(&mut self, next: StoreData) -> std::result::Result<(), StoreError> {
        self.store.save(&next)?;
        self.data = next;
        Ok(())
    }

    /// Ingest a raw PDF document.
    pub fn ingest(&mut self, bytes: &[u8], filename: &str) -> Result<IngestOutcome> {
        let mut extractor = PdfExtractor::new();
        extractor.load(bytes)?;
        let text = extractor.extract_text()?;

        let tables = match classify(&text) {
            Some(DocumentKind::Estimate) => extractor.extract_tables().unwrap_or_else(|e| {
                warn!("Table recovery failed for {}: {}", filename, e);
                Vec::new()
            }),
            _ => Vec::new(),
        };

        self.ingest_text(&text, &tables, filename)
    }

    /// Ingest pre-extracted text and tables. The gate guarantees no two
    /// active records share a natural key and no invoiced case reopens.
    pub fn ingest_text(
        &mut self,
        text: &str,
        tables: &[Table],
        filename: &str,
    ) -> Result<IngestOutcome> {
        match classify(text) {
            Some(DocumentKind::Estimate) => {
                let record = parse_estimate(text, tables, filename);

                if record
                    .pratica_hertz
                    .as_deref()
                    .is_some_and(|p| self.data.is_pratica_invoiced(p))
                {
                    info!("Estimate {} already invoiced, not reopening", filename);
                    return Ok(IngestOutcome::Estimate {
                        status: IngestStatus::AlreadyInvoiced,
                        record: Box::new(record),
                    });
                }

                if self
                    .data
                    .preventivi
                    .iter()
                    .any(|p| p.pratica_hertz == record.pratica_hertz)
                {
                    return Ok(IngestOutcome::Estimate {
                        status: IngestStatus::Duplicate,
                        record: Box::new(record),
                    });
                }

                let mut next = self.data.clone();
                next.preventivi.push(record.clone());
                self.commit(next)?;
                info!("Ingested estimate {} (case {:?})", filename, record.pratica_hertz);

                Ok(IngestOutcome::Estimate {
                    status: IngestStatus::Added,
                    record: Box::new(record),
                })
            }
            Some(DocumentKind::PurchaseOrder) => {
                let record = parse_purchase_order(text, filename);

                if record
                    .po_number
                    .as_deref()
                    .is_some_and(|po| self.data.is_po_invoiced(po))
                {
                    info!("Purchase order {} already invoiced, not reopening", filename);
                    return Ok(IngestOutcome::PurchaseOrder {
                        status: IngestStatus::AlreadyInvoiced,
                        record: Box::new(record),
                    });
                }

                if self
                    .data
                    .purchase_orders
                    .iter()
                    .any(|p| p.po_number == record.po_number)
                {
                    return Ok(IngestOutcome::PurchaseOrder {
                        status: IngestStatus::Duplicate,
                        record: Box::new(record),
                    });
                }

                let mut next = self.data.clone();
                next.purchase_orders.push(record.clone());
                self.commit(next)?;
                info!("Ingested purchase order {} (PO {:?})", filename, record.po_number);

                Ok(IngestOutcome::PurchaseOrder {
                    status: IngestStatus::Added,
                    record: Box::new(record),
                })
            }
            None => Ok(IngestOutcome::Unrecognized),
        }
    }

    /// Delete one active document by kind and id. Returns whether a record
    /// was removed.
    pub fn delete_document(&mut self, kind: DocumentKind, id: &str) -> Result<bool> {
        let mut next = self.data.clone();
        let before = match kind {
            DocumentKind::Estimate => {
                let before = next.preventivi.len();
                next.preventivi.retain(|p| p.id != id);
                before - next.preventivi.len()
            }
            DocumentKind::PurchaseOrder => {
                let before = next.purchase_orders.len();
                next.purchase_orders.retain(|p| p.id != id);
                before - next.purchase_orders.len()
            }
        };

        if before == 0 {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Remove all active documents; issued invoices are untouched.
    pub fn clear_active(&mut self) -> Result<()> {
        let mut next = self.data.clone();
        next.preventivi.clear();
        next.purchase_orders.clear();
        self.commit(next)?;
        Ok(())
    }

    /// Remove one issued invoice by filename, returning its record.
    pub fn remove_invoice(&mut self, filename: &str) -> Result<Option<GeneratedInvoice>> {
        let Some(pos) = self
            .data
            .fatture_generate
            .iter()
            .position(|f| f.filename == filename)
        else {
            return Ok(None);
        };

        let mut next = self.data.clone();
        let record = next.fatture_generate.remove(pos);
        self.commit(next)?;
        Ok(Some(record))
    }

    /// Remove all issued invoices, returning their records.
    pub fn remove_all_invoices(&mut self) -> Result<Vec<GeneratedInvoice>> {
        let mut next = self.data.clone();
        let removed = std::mem::take(&mut next.fatture_generate);
        self.commit(next)?;
        Ok(removed)
    }

    /// Manually override the numbering counters within the current year.
    pub fn set_numbering(&mut self, last_number_hg: u32, last_number_hm: u32) -> Result<()> {
        let mut next = self.data.clone();
        next.config.last_number_hg = last_number_hg;
        next.config.last_number_hm = last_number_hm;
        self.commit(next)?;
        Ok(())
    }

    /// Update the mailbox filters used by the external poller.
    pub fn set_mailbox_filters(
        &mut self,
        email: String,
        password: String,
        mittente_filtro: String,
        oggetto_filtro: String,
    ) -> Result<()> {
        let mut next = self.data.clone();
        next.email_config = MailboxState {
            email,
            password,
            mittente_filtro,
            oggetto_filtro,
            ..next.email_config
        };
        self.commit(next)?;
        Ok(())
    }

    /// Whether the poller has already pulled this PO number.
    pub fn is_po_downloaded(&self, po_number: &str) -> bool {
        self.data
            .email_config
            .po_scaricati
            .iter()
            .any(|p| p == po_number)
    }

    /// Record a PO number as pulled from the mailbox. Returns false when it
    /// was already recorded.
    pub fn record_downloaded_po(&mut self, po_number: &str) -> Result<bool> {
        if self.is_po_downloaded(po_number) {
            return Ok(false);
        }
        let mut next = self.data.clone();
        next.email_config.po_scaricati.push(po_number.to_string());
        next.email_config.ultimo_controllo = Some(crate::models::document::now_timestamp());
        self.commit(next)?;
        Ok(true)
    }

    /// Forget all pulled PO numbers so the poller reconsiders the mailbox.
    pub fn reset_downloaded_pos(&mut self) -> Result<()> {
        let mut next = self.data.clone();
        next.email_config.po_scaricati.clear();
        self.commit(next)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::InvoiceCategory;
    use crate::store::{JsonFileStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn repo() -> Repository<MemoryStore> {
        Repository::open(MemoryStore::new()).unwrap()
    }

    fn estimate_text(pratica: &str) -> String {
        format!("PREVENTIVO\nPratica Hertz: {}\nTarga: AB123CDT\n", pratica)
    }

    fn po_text(po: &str, pratica: &str) -> String {
        format!("PURCHASE ORDER # {}\nWD: {}\nPlate Number: AB123CD\n", po, pratica)
    }

    fn invoiced(po_number: &str, pratica: &str) -> GeneratedInvoice {
        GeneratedInvoice {
            po_number: po_number.to_string(),
            targa: "AB123CD".to_string(),
            pratica_hertz: Some(pratica.to_string()),
            filename: format!("Fatt_001_PO_{}_AB123CD.xml", po_number),
            numero_fattura: 1,
            tipo: InvoiceCategory::Mechanical,
            totale: Decimal::from(122),
            data_po: None,
            data_generazione: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn ingest_inserts_new_estimate() {
        let mut repo = repo();
        let outcome = repo
            .ingest_text(&estimate_text("1001"), &[], "prev.pdf")
            .unwrap();

        assert!(matches!(
            outcome,
            IngestOutcome::Estimate { status: IngestStatus::Added, .. }
        ));
        assert_eq!(repo.data().preventivi.len(), 1);
    }

    #[test]
    fn reingest_same_case_is_a_noop() {
        let mut repo = repo();
        repo.ingest_text(&estimate_text("1001"), &[], "a.pdf").unwrap();
        let outcome = repo.ingest_text(&estimate_text("1001"), &[], "b.pdf").unwrap();

        assert!(matches!(
            outcome,
            IngestOutcome::Estimate { status: IngestStatus::Duplicate, .. }
        ));
        assert_eq!(repo.data().preventivi.len(), 1);
    }

    #[test]
    fn invoiced_case_never_reopens() {
        let mut repo = repo();
        let mut next = repo.data().clone();
        next.fatture_generate.push(invoiced("12345", "1001"));
        repo.commit(next).unwrap();

        let outcome = repo.ingest_text(&estimate_text("1001"), &[], "a.pdf").unwrap();
        assert!(matches!(
            outcome,
            IngestOutcome::Estimate { status: IngestStatus::AlreadyInvoiced, .. }
        ));
        assert!(repo.data().preventivi.is_empty());

        let outcome = repo.ingest_text(&po_text("12345", "1001"), &[], "b.pdf").unwrap();
        assert!(matches!(
            outcome,
            IngestOutcome::PurchaseOrder { status: IngestStatus::AlreadyInvoiced, .. }
        ));
        assert!(repo.data().purchase_orders.is_empty());
    }

    #[test]
    fn unrecognized_text_takes_no_state_action() {
        let mut repo = repo();
        let outcome = repo.ingest_text("delivery note", &[], "x.pdf").unwrap();

        assert!(matches!(outcome, IngestOutcome::Unrecognized));
        assert!(repo.data().preventivi.is_empty());
        assert!(repo.data().purchase_orders.is_empty());
    }

    #[test]
    fn purchase_orders_deduplicate_by_po_number() {
        let mut repo = repo();
        repo.ingest_text(&po_text("12345", "1001"), &[], "a.pdf").unwrap();
        let outcome = repo.ingest_text(&po_text("12345", "1002"), &[], "b.pdf").unwrap();

        assert!(matches!(
            outcome,
            IngestOutcome::PurchaseOrder { status: IngestStatus::Duplicate, .. }
        ));
        assert_eq!(repo.data().purchase_orders.len(), 1);
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let mut repo = Repository::open(JsonFileStore::new(&path)).unwrap();
            repo.ingest_text(&estimate_text("1001"), &[], "a.pdf").unwrap();
            repo.set_numbering(2, 5).unwrap();
        }

        let repo = Repository::open(JsonFileStore::new(&path)).unwrap();
        assert_eq!(repo.data().preventivi.len(), 1);
        assert_eq!(repo.data().config.last_number_hg, 2);
        assert_eq!(repo.data().config.last_number_hm, 5);
    }

    #[test]
    fn delete_document_removes_by_id() {
        let mut repo = repo();
        repo.ingest_text(&estimate_text("1001"), &[], "a.pdf").unwrap();
        let id = repo.data().preventivi[0].id.clone();

        assert!(repo.delete_document(DocumentKind::Estimate, &id).unwrap());
        assert!(repo.data().preventivi.is_empty());
        assert!(!repo.delete_document(DocumentKind::Estimate, &id).unwrap());
    }

    #[test]
    fn clear_active_keeps_invoices() {
        let mut repo = repo();
        repo.ingest_text(&estimate_text("1001"), &[], "a.pdf").unwrap();
        let mut next = repo.data().clone();
        next.fatture_generate.push(invoiced("99", "2002"));
        repo.commit(next).unwrap();

        repo.clear_active().unwrap();
        assert!(repo.data().preventivi.is_empty());
        assert_eq!(repo.data().fatture_generate.len(), 1);
    }

    #[test]
    fn remove_invoice_by_filename() {
        let mut repo = repo();
        let record = invoiced("12345", "1001");
        let filename = record.filename.clone();
        let mut next = repo.data().clone();
        next.fatture_generate.push(record);
        repo.commit(next).unwrap();

        let removed = repo.remove_invoice(&filename).unwrap();
        assert_eq!(removed.unwrap().po_number, "12345");
        assert!(repo.data().fatture_generate.is_empty());
        assert!(repo.remove_invoice(&filename).unwrap().is_none());
    }

    #[test]
    fn downloaded_po_bookkeeping_dedups() {
        let mut repo = repo();
        assert!(repo.record_downloaded_po("12345").unwrap());
        assert!(!repo.record_downloaded_po("12345").unwrap());
        assert!(repo.is_po_downloaded("12345"));

        repo.reset_downloaded_pos().unwrap();
        assert!(!repo.is_po_downloaded("12345"));
    }
}

//! Document records and the persisted state document.
//!
//! Serde field names follow the on-disk JSON layout of the production data
//! file; missing sections fall back to defaults on load.

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single priced line on an estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description, including the part code suffix when present.
    pub description: String,

    /// Quantity; integral for counted parts, fractional for time-based work.
    pub qty: Decimal,

    /// Unit price.
    pub price: Decimal,

    /// Discount percentage; zero when none applies.
    #[serde(default)]
    pub discount: Decimal,

    /// Line total.
    pub total: Decimal,

    /// Part code (codice ricambio) when the row carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codice_ricambio: Option<String>,
}

/// A parsed supplier estimate (preventivo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    /// Timestamp-derived identity, monotonically increasing per process.
    pub id: String,

    /// Display name of the source file.
    pub filename: String,

    /// Supplier-side case number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pratica_fornitore: Option<String>,

    /// Customer case id; the join key towards purchase orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pratica_hertz: Option<String>,

    /// Vehicle plate, trailing type suffix stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targa: Option<String>,

    /// Chassis number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telaio: Option<String>,

    /// Odometer reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km: Option<String>,

    /// Vehicle make/model/trim line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veicolo: Option<String>,

    /// Priced line items, table rows first, synthetic items appended.
    pub items: Vec<LineItem>,

    /// Sum of all line-item totals; always recomputed, never read from text.
    pub totale: Decimal,

    /// Creation timestamp (RFC 3339).
    pub data_caricamento: String,
}

impl Estimate {
    /// Sum of the line-item totals.
    pub fn items_total(items: &[LineItem]) -> Decimal {
        items.iter().map(|i| i.total).sum()
    }
}

/// A parsed customer purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Timestamp-derived identity.
    pub id: String,

    /// Display name of the source file.
    pub filename: String,

    /// PO number; the natural key of the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,

    /// Case id; the join key towards estimates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pratica_hertz: Option<String>,

    /// Vehicle plate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targa: Option<String>,

    /// Chassis number (VIN).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,

    /// Fleet unit number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,

    /// Vehicle model line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Odometer reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,

    /// Order date, normalized to the canonical calendar form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Order total as printed on the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    /// True when the order text mentions tyres; selects the HG partition.
    #[serde(default)]
    pub has_tyres: bool,

    /// Bounded excerpt of the source text, kept for reference only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp (RFC 3339).
    pub data_caricamento: String,
}

/// Invoice numbering partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceCategory {
    /// Tyre work; numbering suffix HG.
    #[serde(rename = "HG")]
    Tyres,
    /// Everything else (mechanical/body work); numbering suffix HM.
    #[serde(rename = "HM")]
    Mechanical,
}

impl InvoiceCategory {
    /// Numbering tag as it appears in the invoice document and records.
    pub fn suffix(&self) -> &'static str {
        match self {
            InvoiceCategory::Tyres => "HG",
            InvoiceCategory::Mechanical => "HM",
        }
    }
}

/// Record of an issued invoice. Its existence is the sole source of truth
/// for "already invoiced".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedInvoice {
    /// PO number the invoice settles.
    pub po_number: String,

    /// Vehicle plate, or empty when neither document carried one.
    pub targa: String,

    /// Case id of the consumed estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pratica_hertz: Option<String>,

    /// Rendered output file name.
    pub filename: String,

    /// Issued sequence number within the category/year partition.
    pub numero_fattura: u32,

    /// Numbering partition the sequence number belongs to.
    pub tipo: InvoiceCategory,

    /// Invoice total including tax.
    pub totale: Decimal,

    /// Date of the source purchase order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_po: Option<NaiveDate>,

    /// Generation timestamp (RFC 3339).
    pub data_generazione: String,
}

/// Per-category last-issued invoice numbers and the year they apply to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingState {
    /// Last number issued in the tyres (HG) partition.
    pub last_number_hg: u32,

    /// Last number issued in the other-work (HM) partition.
    pub last_number_hm: u32,

    /// Calendar year the counters apply to.
    pub year: i32,
}

impl Default for NumberingState {
    fn default() -> Self {
        Self {
            last_number_hg: 0,
            last_number_hm: 0,
            year: Local::now().year(),
        }
    }
}

impl NumberingState {
    /// Issue the next number in the given category for `year`.
    ///
    /// A year change resets both counters before the number is taken, so
    /// the first issuance of a new year is always 1 in either partition.
    pub fn issue(&mut self, category: InvoiceCategory, year: i32) -> u32 {
        if self.year != year {
            self.year = year;
            self.last_number_hg = 0;
            self.last_number_hm = 0;
        }
        let counter = match category {
            InvoiceCategory::Tyres => &mut self.last_number_hg,
            InvoiceCategory::Mechanical => &mut self.last_number_hm,
        };
        *counter += 1;
        *counter
    }
}

/// Mailbox-polling bookkeeping, persisted for the external poller.
///
/// The poller itself lives outside this crate; the repository only tracks
/// which PO numbers have already been pulled so an attachment is never
/// ingested twice without an intervening reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxState {
    /// Mailbox address the poller watches.
    pub email: String,

    /// Mailbox credential (app password).
    pub password: String,

    /// Optional sender filter.
    pub mittente_filtro: String,

    /// Subject filter for candidate messages.
    pub oggetto_filtro: String,

    /// Timestamp of the last poll.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultimo_controllo: Option<String>,

    /// Lower bound date for the poll window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_inizio: Option<String>,

    /// PO numbers already downloaded from the mailbox.
    pub po_scaricati: Vec<String>,
}

impl Default for MailboxState {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            mittente_filtro: String::new(),
            oggetto_filtro: "PO".to_string(),
            ultimo_controllo: None,
            data_inizio: None,
            po_scaricati: Vec::new(),
        }
    }
}

/// The single persisted state document: active collections, issued
/// invoices, numbering counters, and mailbox bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    /// Active (not yet invoiced) estimates.
    pub preventivi: Vec<Estimate>,

    /// Active (not yet invoiced) purchase orders.
    pub purchase_orders: Vec<PurchaseOrder>,

    /// Issued invoices.
    pub fatture_generate: Vec<GeneratedInvoice>,

    /// Numbering counters.
    pub config: NumberingState,

    /// Mailbox-polling bookkeeping.
    pub email_config: MailboxState,
}

impl StoreData {
    /// Whether a PO number already has an issued invoice.
    pub fn is_po_invoiced(&self, po_number: &str) -> bool {
        self.fatture_generate
            .iter()
            .any(|f| f.po_number == po_number)
    }

    /// Whether a case id already has an issued invoice.
    pub fn is_pratica_invoiced(&self, pratica: &str) -> bool {
        self.fatture_generate
            .iter()
            .any(|f| f.pratica_hertz.as_deref() == Some(pratica))
    }
}

/// Timestamp-derived record id; monotonically increasing within a process.
pub(crate) fn new_record_id() -> String {
    Local::now().format("%Y%m%d%H%M%S%6f").to_string()
}

/// Creation timestamp for new records.
pub(crate) fn now_timestamp() -> String {
    Local::now().to_rfc3339()
}

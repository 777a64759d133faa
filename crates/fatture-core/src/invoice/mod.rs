//! Invoice generation: numbering, tax, rendering, and retirement of the
//! consumed records.

mod generator;
mod xml;

pub use generator::{BatchOutcome, InvoiceGenerator};
pub use xml::render_invoice;

use crate::models::document::{Estimate, PurchaseOrder};

/// Figures of an invoice about to be rendered.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceFigures {
    /// Issued sequence number.
    pub number: u32,
    /// Numbering partition.
    pub category: crate::models::InvoiceCategory,
    /// Sum of the estimate's line-item totals.
    pub total_without_tax: rust_decimal::Decimal,
    /// VAT at the fixed domain rate.
    pub vat_amount: rust_decimal::Decimal,
    /// Grand total including VAT.
    pub total: rust_decimal::Decimal,
}

/// The plate used for the invoice: the estimate's when present, otherwise
/// the order's. Empty values count as absent.
pub(crate) fn effective_targa(estimate: &Estimate, order: &PurchaseOrder) -> Option<String> {
    estimate
        .targa
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| order.targa.clone().filter(|t| !t.is_empty()))
}

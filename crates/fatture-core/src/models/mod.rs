//! Data models for documents, invoices, and persisted state.

pub mod config;
pub mod document;

pub use config::AppConfig;
pub use document::{
    Estimate, GeneratedInvoice, InvoiceCategory, LineItem, MailboxState, NumberingState,
    PurchaseOrder, StoreData,
};

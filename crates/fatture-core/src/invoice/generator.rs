//! Invoice generation over matched pairs.
//!
//! Numbering, rendering, record creation, and retirement of the consumed
//! estimate/purchase-order pair commit as one unit per invoice: a failed
//! render or persist leaves counters and collections untouched.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{GenerateError, Result};
use crate::matching::{compute_matches, MatchPair};
use crate::models::document::{now_timestamp, Estimate, GeneratedInvoice, InvoiceCategory};
use crate::store::{Repository, StateStore};

use super::xml::render_invoice;
use super::{effective_targa, InvoiceFigures};

/// Outcome of a batch generation run: successes in generation order plus
/// the per-match failures the run continued past.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub generated: Vec<GeneratedInvoice>,
    pub failures: Vec<(String, GenerateError)>,
}

/// Generates numbered invoice documents from matched pairs.
pub struct InvoiceGenerator {
    output_dir: PathBuf,
}

impl InvoiceGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory rendered invoices are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate the invoice for the ready match with the given case id.
    pub fn generate<S: StateStore>(
        &self,
        repo: &mut Repository<S>,
        pratica: &str,
    ) -> std::result::Result<GeneratedInvoice, GenerateError> {
        let report = compute_matches(repo.data());
        let pair = report
            .matches
            .into_iter()
            .find(|m| m.estimate.pratica_hertz.as_deref() == Some(pratica))
            .ok_or_else(|| GenerateError::NoMatch(pratica.to_string()))?;

        self.generate_pair_at(repo, &pair, Local::now().date_naive())
    }

    /// Generate the invoice for a specific matched pair.
    pub fn generate_pair<S: StateStore>(
        &self,
        repo: &mut Repository<S>,
        pair: &MatchPair,
    ) -> std::result::Result<GeneratedInvoice, GenerateError> {
        self.generate_pair_at(repo, pair, Local::now().date_naive())
    }

    fn generate_pair_at<S: StateStore>(
        &self,
        repo: &mut Repository<S>,
        pair: &MatchPair,
        today: NaiveDate,
    ) -> std::result::Result<GeneratedInvoice, GenerateError> {
        let estimate = &pair.estimate;
        let order = &pair.order;

        let po_number = order
            .po_number
            .clone()
            .ok_or(GenerateError::MissingPoNumber)?;

        // Numbering advances on a scratch copy; it reaches the store only
        // with the rest of the commit.
        let mut numbering = repo.data().config.clone();
        let category = if order.has_tyres {
            InvoiceCategory::Tyres
        } else {
            InvoiceCategory::Mechanical
        };
        let number = numbering.issue(category, today.year());

        let total_without_tax = Estimate::items_total(&estimate.items);
        let vat_amount = (total_without_tax * Decimal::new(22, 2)).round_dp(2);
        let total = total_without_tax + vat_amount;

        let figures = InvoiceFigures {
            number,
            category,
            total_without_tax,
            vat_amount,
            total,
        };

        let xml = render_invoice(estimate, order, &figures, today)?;

        let targa =
            effective_targa(estimate, order).unwrap_or_else(|| "NOTARGA".to_string());
        let filename = invoice_filename(number, &po_number, order.date, &targa);

        std::fs::create_dir_all(&self.output_dir).map_err(GenerateError::Write)?;
        std::fs::write(self.output_dir.join(&filename), xml.as_bytes())
            .map_err(GenerateError::Write)?;

        let record = GeneratedInvoice {
            po_number: po_number.clone(),
            targa,
            pratica_hertz: estimate.pratica_hertz.clone(),
            filename: filename.clone(),
            numero_fattura: number,
            tipo: category,
            totale: total,
            data_po: order.date,
            data_generazione: now_timestamp(),
        };

        let mut next = repo.data().clone();
        next.config = numbering;
        next.fatture_generate.push(record.clone());
        next.preventivi
            .retain(|p| p.pratica_hertz != estimate.pratica_hertz);
        next.purchase_orders
            .retain(|p| p.po_number.as_deref() != Some(po_number.as_str()));
        repo.commit(next)?;

        info!(
            "Issued invoice {}/{} for PO {} -> {}",
            number,
            category.suffix(),
            po_number,
            filename
        );
        Ok(record)
    }

    /// Generate every ready match, oldest purchase order first; undated
    /// orders go last. Individual failures are collected and the run
    /// continues.
    pub fn generate_all<S: StateStore>(&self, repo: &mut Repository<S>) -> BatchOutcome {
        self.generate_all_at(repo, Local::now().date_naive())
    }

    fn generate_all_at<S: StateStore>(
        &self,
        repo: &mut Repository<S>,
        today: NaiveDate,
    ) -> BatchOutcome {
        let mut pairs = compute_matches(repo.data()).matches;
        pairs.sort_by_key(|m| m.order.date.unwrap_or(NaiveDate::MAX));

        let mut outcome = BatchOutcome::default();
        for pair in &pairs {
            let case = pair
                .estimate
                .pratica_hertz
                .clone()
                .unwrap_or_else(|| "?".to_string());
            match self.generate_pair_at(repo, pair, today) {
                Ok(record) => outcome.generated.push(record),
                Err(e) => {
                    warn!("Skipping case {}: {}", case, e);
                    outcome.failures.push((case, e));
                }
            }
        }

        outcome
    }

    /// Delete one issued invoice and its rendered file.
    pub fn delete_invoice<S: StateStore>(
        &self,
        repo: &mut Repository<S>,
        filename: &str,
    ) -> Result<bool> {
        match repo.remove_invoice(filename)? {
            Some(record) => {
                remove_rendered_file(&self.output_dir.join(&record.filename));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete all issued invoices and their rendered files. Returns how
    /// many records were removed.
    pub fn delete_all_invoices<S: StateStore>(&self, repo: &mut Repository<S>) -> Result<usize> {
        let removed = repo.remove_all_invoices()?;
        for record in &removed {
            remove_rendered_file(&self.output_dir.join(&record.filename));
        }
        Ok(removed.len())
    }
}

/// Remove a rendered file if present; a failure only logs, the record
/// removal stands.
fn remove_rendered_file(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Deterministic output file name, optionally prefixed with the order
/// date in digits-only form.
fn invoice_filename(number: u32, po_number: &str, date: Option<NaiveDate>, targa: &str) -> String {
    let date_prefix = date
        .map(|d| format!("{}_", d.format("%Y%m%d")))
        .unwrap_or_default();
    format!(
        "{}Fatt_{:03}_PO_{}_{}.xml",
        date_prefix, number, po_number, targa
    )
}

//! Pairing of active estimates with active purchase orders.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::document::{Estimate, PurchaseOrder, StoreData};

/// An estimate and the purchase order sharing its case id.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPair {
    pub estimate: Estimate,
    pub order: PurchaseOrder,
}

/// Outcome of a match computation: ready pairs plus the records still
/// waiting for their counterpart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub matches: Vec<MatchPair>,
    pub pending_estimates: Vec<Estimate>,
    pub pending_orders: Vec<PurchaseOrder>,
}

/// Headline counts derived from a match report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Stats {
    /// Pairs ready for invoice generation.
    pub ready: usize,
    /// Estimates with no matching order yet.
    pub pending_estimates: usize,
    /// Orders with no matching estimate yet.
    pub pending_orders: usize,
    /// Invoices issued so far.
    pub invoiced: usize,
    /// All active estimates.
    pub estimates: usize,
    /// All active orders.
    pub orders: usize,
}

impl MatchReport {
    pub fn stats(&self, data: &StoreData) -> Stats {
        Stats {
            ready: self.matches.len(),
            pending_estimates: self.pending_estimates.len(),
            pending_orders: self.pending_orders.len(),
            invoiced: data.fatture_generate.len(),
            estimates: data.preventivi.len(),
            orders: data.purchase_orders.len(),
        }
    }
}

/// Pair every active estimate with the first active purchase order sharing
/// its case id, in stable collection order.
///
/// The first order carrying the case id decides the outcome: if it is
/// already invoiced the estimate stays pending rather than falling through
/// to a later order. Pure read; no state is mutated.
pub fn compute_matches(data: &StoreData) -> MatchReport {
    let mut matches = Vec::new();

    for estimate in &data.preventivi {
        let Some(pratica) = estimate.pratica_hertz.as_deref() else {
            continue;
        };

        let first = data
            .purchase_orders
            .iter()
            .find(|po| po.pratica_hertz.as_deref() == Some(pratica));

        if let Some(order) = first {
            let invoiced = order
                .po_number
                .as_deref()
                .is_some_and(|po| data.is_po_invoiced(po));
            if !invoiced {
                matches.push(MatchPair {
                    estimate: estimate.clone(),
                    order: order.clone(),
                });
            }
        }
    }

    let matched_estimates: HashSet<&str> = matches
        .iter()
        .filter_map(|m| m.estimate.pratica_hertz.as_deref())
        .collect();
    let matched_orders: HashSet<&str> = matches
        .iter()
        .filter_map(|m| m.order.pratica_hertz.as_deref())
        .collect();

    let pending_estimates = data
        .preventivi
        .iter()
        .filter(|p| {
            p.pratica_hertz
                .as_deref()
                .map_or(true, |pr| !matched_estimates.contains(pr))
        })
        .cloned()
        .collect();

    let pending_orders = data
        .purchase_orders
        .iter()
        .filter(|po| {
            let unmatched = po
                .pratica_hertz
                .as_deref()
                .map_or(true, |pr| !matched_orders.contains(pr));
            let invoiced = po
                .po_number
                .as_deref()
                .is_some_and(|n| data.is_po_invoiced(n));
            unmatched && !invoiced
        })
        .cloned()
        .collect();

    MatchReport {
        matches,
        pending_estimates,
        pending_orders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{GeneratedInvoice, InvoiceCategory};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn estimate(pratica: &str) -> Estimate {
        Estimate {
            id: format!("est-{}", pratica),
            filename: format!("prev_{}.pdf", pratica),
            pratica_fornitore: None,
            pratica_hertz: Some(pratica.to_string()),
            targa: Some("AB123CD".to_string()),
            telaio: None,
            km: None,
            veicolo: None,
            items: Vec::new(),
            totale: Decimal::ZERO,
            data_caricamento: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn order(po: &str, pratica: &str) -> PurchaseOrder {
        PurchaseOrder {
            id: format!("po-{}", po),
            filename: format!("po_{}.pdf", po),
            po_number: Some(po.to_string()),
            pratica_hertz: Some(pratica.to_string()),
            targa: Some("AB123CD".to_string()),
            vin: None,
            unit_number: None,
            model: None,
            mileage: None,
            date: None,
            total: None,
            has_tyres: false,
            description: None,
            data_caricamento: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn invoiced(po: &str, pratica: &str) -> GeneratedInvoice {
        GeneratedInvoice {
            po_number: po.to_string(),
            targa: "AB123CD".to_string(),
            pratica_hertz: Some(pratica.to_string()),
            filename: format!("Fatt_001_PO_{}_AB123CD.xml", po),
            numero_fattura: 1,
            tipo: InvoiceCategory::Mechanical,
            totale: Decimal::ZERO,
            data_po: None,
            data_generazione: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn pairs_by_case_id() {
        let mut data = StoreData::default();
        data.preventivi.push(estimate("1001"));
        data.purchase_orders.push(order("500", "1001"));

        let report = compute_matches(&data);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].order.po_number.as_deref(), Some("500"));
        assert!(report.pending_estimates.is_empty());
        assert!(report.pending_orders.is_empty());
    }

    #[test]
    fn unmatched_records_are_pending() {
        let mut data = StoreData::default();
        data.preventivi.push(estimate("1001"));
        data.purchase_orders.push(order("500", "2002"));

        let report = compute_matches(&data);
        assert!(report.matches.is_empty());
        assert_eq!(report.pending_estimates.len(), 1);
        assert_eq!(report.pending_orders.len(), 1);
    }

    #[test]
    fn first_order_in_collection_order_wins() {
        let mut data = StoreData::default();
        data.preventivi.push(estimate("1001"));
        data.purchase_orders.push(order("500", "1001"));
        data.purchase_orders.push(order("501", "1001"));

        let report = compute_matches(&data);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].order.po_number.as_deref(), Some("500"));
    }

    #[test]
    fn invoiced_first_order_blocks_the_estimate() {
        let mut data = StoreData::default();
        data.preventivi.push(estimate("1001"));
        data.purchase_orders.push(order("500", "1001"));
        data.purchase_orders.push(order("501", "1001"));
        data.fatture_generate.push(invoiced("500", "1001"));

        // The first matching order decides; it is invoiced, so the pair is
        // not re-surfaced and the estimate stays pending.
        let report = compute_matches(&data);
        assert!(report.matches.is_empty());
        assert_eq!(report.pending_estimates.len(), 1);
    }

    #[test]
    fn estimates_without_case_id_never_match() {
        let mut data = StoreData::default();
        let mut est = estimate("1001");
        est.pratica_hertz = None;
        data.preventivi.push(est);
        let mut po = order("500", "1001");
        po.pratica_hertz = None;
        data.purchase_orders.push(po);

        let report = compute_matches(&data);
        assert!(report.matches.is_empty());
        assert_eq!(report.pending_estimates.len(), 1);
        assert_eq!(report.pending_orders.len(), 1);
    }

    #[test]
    fn stats_reflect_collections() {
        let mut data = StoreData::default();
        data.preventivi.push(estimate("1001"));
        data.preventivi.push(estimate("1002"));
        data.purchase_orders.push(order("500", "1001"));
        data.fatture_generate.push(invoiced("400", "0900"));

        let report = compute_matches(&data);
        let stats = report.stats(&data);

        assert_eq!(stats.ready, 1);
        assert_eq!(stats.pending_estimates, 1);
        assert_eq!(stats.pending_orders, 0);
        assert_eq!(stats.invoiced, 1);
        assert_eq!(stats.estimates, 2);
        assert_eq!(stats.orders, 1);
    }
}

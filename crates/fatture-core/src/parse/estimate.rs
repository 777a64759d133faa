//! Estimate (preventivo) field parser.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::document::{new_record_id, now_timestamp, Estimate, LineItem};
use crate::pdf::Table;

use super::rules::patterns::{
    KM, MANODOPERA_ORE, PRATICA_FORNITORE, PRATICA_HERTZ, SMALTIMENTO, TARGA, TELAIO, VEICOLO,
};
use super::rules::{capture, parse_amount, parse_cell};

/// Tokens that mark a table row as header or summary, never a priced item.
const HEADER_TOKENS: [&str; 4] = ["C.R.", "Voci di Danno", "IMPONIBILE", "Totale tempi"];

/// Description prefixes handled outside the priced-row path.
const CATEGORY_TOKENS: [&str; 6] = [
    "Ricambi",
    "Materiale",
    "Smaltimento",
    "Manodopera",
    "TOTALI",
    "Note:",
];

/// Labor categories billed as hours x hourly rate.
const LABOR_CATEGORIES: [&str; 3] = ["meccanica", "carrozzeria", "verniciatura"];

/// Cell offsets of the numeric columns in the damage grid.
const COL_TIME: usize = 18;
const COL_QTY: usize = 19;
const COL_PRICE: usize = 20;
const COL_DISCOUNT: usize = 23;
const COL_TOTAL: usize = 24;

/// Minimum cell count for a row to qualify as a priced item.
const MIN_ITEM_CELLS: usize = 20;

/// Parse an estimate from extracted text and recovered tables.
///
/// Every field is extracted independently; a miss leaves the field unset
/// and a bad row is skipped. The parser never fails on partial input.
pub fn parse_estimate(text: &str, tables: &[Table], filename: &str) -> Estimate {
    let mut items = table_items(tables);
    push_disposal_fee(text, &mut items);
    push_labor_items(tables, &mut items);

    let totale = Estimate::items_total(&items);
    debug!(
        "Parsed estimate from {}: {} items, total {}",
        filename,
        items.len(),
        totale
    );

    Estimate {
        id: new_record_id(),
        filename: filename.to_string(),
        pratica_fornitore: capture(&PRATICA_FORNITORE, text),
        pratica_hertz: capture(&PRATICA_HERTZ, text),
        targa: capture(&TARGA, text).map(|t| t.trim_end_matches('T').to_string()),
        telaio: capture(&TELAIO, text),
        km: capture(&KM, text),
        veicolo: capture(&VEICOLO, text),
        items,
        totale,
        data_caricamento: now_timestamp(),
    }
}

/// Collect priced items from the damage grid rows.
fn table_items(tables: &[Table]) -> Vec<LineItem> {
    let mut items = Vec::new();

    for table in tables {
        for row in table {
            if row.len() < MIN_ITEM_CELLS {
                continue;
            }

            let row_text = row.join(" ");
            if HEADER_TOKENS.iter().any(|t| row_text.contains(t)) {
                continue;
            }

            let codice = Some(row[0].trim()).filter(|c| !c.is_empty());
            let desc = row[1].trim();
            if desc.is_empty() || CATEGORY_TOKENS.iter().any(|t| desc.contains(t)) {
                continue;
            }

            let tempo = parse_cell(cell(row, COL_TIME));
            let mut qty = parse_cell(cell(row, COL_QTY));
            let price = parse_cell(cell(row, COL_PRICE));
            let discount = parse_cell(cell(row, COL_DISCOUNT)).trunc();
            let total = parse_cell(cell(row, COL_TOTAL));

            // Labor rows carry their count in the time column.
            if qty.is_zero() && tempo > Decimal::ONE {
                qty = tempo;
            }
            if qty.is_zero() {
                qty = Decimal::ONE;
            }

            if total > Decimal::ZERO {
                let description = match codice {
                    Some(c) => format!("{} - C.R: {}", desc, c),
                    None => desc.to_string(),
                };
                items.push(LineItem {
                    description,
                    qty: qty.normalize(),
                    price,
                    discount,
                    total,
                    codice_ricambio: codice.map(str::to_string),
                });
            }
        }
    }

    items
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Waste-disposal fee from free text, guarded against a duplicate when the
/// grid already produced one.
fn push_disposal_fee(text: &str, items: &mut Vec<LineItem>) {
    let Some(caps) = SMALTIMENTO.captures(text) else {
        return;
    };
    let Some(val) = parse_amount(&caps[1]) else {
        return;
    };

    if val > Decimal::ZERO && !items.iter().any(|i| i.description.contains("Smaltimento")) {
        items.push(LineItem {
            description: "Smaltimento Rifiuti".to_string(),
            qty: Decimal::ONE,
            price: val,
            discount: Decimal::ZERO,
            total: val,
            codice_ricambio: None,
        });
    }
}

/// Labor lines billed as hours x hourly rate, one synthetic item per
/// category at most.
fn push_labor_items(tables: &[Table], items: &mut Vec<LineItem>) {
    for table in tables {
        for row in table {
            let row_text = row.join(" ");

            for category in LABOR_CATEGORIES {
                let marker = format!("Manodopera {}", category);
                if !row_text.contains(&marker) {
                    continue;
                }
                let Some(caps) = MANODOPERA_ORE.captures(&row_text) else {
                    continue;
                };
                let (Some(ore), Some(tariffa)) = (parse_amount(&caps[1]), parse_amount(&caps[2]))
                else {
                    continue;
                };

                let total = ore * tariffa;
                if total > Decimal::ZERO && !items.iter().any(|i| i.description.contains(&marker))
                {
                    items.push(LineItem {
                        description: format!(
                            "{} ({}h x {}€/h)",
                            marker,
                            ore.normalize(),
                            tariffa.normalize()
                        ),
                        qty: Decimal::ONE,
                        price: total,
                        discount: Decimal::ZERO,
                        total,
                        codice_ricambio: None,
                    });
                }
            }
        }
    }
}

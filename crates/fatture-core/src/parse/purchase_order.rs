//! Purchase-order field parser.

use tracing::debug;

use crate::models::document::{new_record_id, now_timestamp, PurchaseOrder};

use super::rules::patterns::{
    PO_MILEAGE, PO_MODEL, PO_NUMBER, PO_PLATE, PO_TOTAL, PO_UNIT, PO_VIN, PO_WD,
};
use super::rules::{capture, extract_order_date, parse_amount};

/// Marker selecting the tyres numbering partition.
const TYRES_MARKER: &str = "TYRES";

/// How much of the source text is kept as a reference excerpt.
const DESCRIPTION_LIMIT: usize = 500;

/// Parse a purchase order from extracted text.
///
/// Fields are extracted independently via labeled patterns; a miss leaves
/// the field unset. The parser never fails on partial input.
pub fn parse_purchase_order(text: &str, filename: &str) -> PurchaseOrder {
    let po_number = capture(&PO_NUMBER, text);
    debug!("Parsed purchase order from {}: PO {:?}", filename, po_number);

    PurchaseOrder {
        id: new_record_id(),
        filename: filename.to_string(),
        po_number,
        pratica_hertz: capture(&PO_WD, text),
        targa: capture(&PO_PLATE, text),
        vin: capture(&PO_VIN, text),
        unit_number: capture(&PO_UNIT, text),
        model: capture(&PO_MODEL, text),
        mileage: capture(&PO_MILEAGE, text),
        date: extract_order_date(text),
        total: PO_TOTAL.captures(text).and_then(|c| parse_amount(&c[1])),
        has_tyres: text.to_uppercase().contains(TYRES_MARKER),
        description: Some(text.chars().take(DESCRIPTION_LIMIT).collect()),
        data_caricamento: now_timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const TEXT: &str = "PURCHASE ORDER #\n12345\n\
        WD: 1001\n\
        Plate Number: AB123CD\n\
        Serial Number (VIN): ZFA25000002123456\n\
        Unit Number: 778899\n\
        Model: DUCATO MAXI\n\
        Mileage: 48200\n\
        Date: 25/12/2024\n\
        TOTAL € 1220.00\n";

    #[test]
    fn extracts_all_labeled_fields() {
        let po = parse_purchase_order(TEXT, "po_12345.pdf");

        assert_eq!(po.po_number.as_deref(), Some("12345"));
        assert_eq!(po.pratica_hertz.as_deref(), Some("1001"));
        assert_eq!(po.targa.as_deref(), Some("AB123CD"));
        assert_eq!(po.vin.as_deref(), Some("ZFA25000002123456"));
        assert_eq!(po.unit_number.as_deref(), Some("778899"));
        assert_eq!(po.model.as_deref(), Some("DUCATO MAXI"));
        assert_eq!(po.mileage.as_deref(), Some("48200"));
        assert_eq!(po.date, NaiveDate::from_ymd_opt(2024, 12, 25));
        assert_eq!(po.total, Some(Decimal::from_str("1220.00").unwrap()));
        assert_eq!(po.filename, "po_12345.pdf");
    }

    #[test]
    fn po_number_found_across_lines() {
        let po = parse_purchase_order("PURCHASE ORDER # \n\n  67890 issued", "x.pdf");
        assert_eq!(po.po_number.as_deref(), Some("67890"));
    }

    #[test]
    fn tyres_flag_is_case_insensitive() {
        assert!(parse_purchase_order("PURCHASE ORDER # 1\nFour tyres replaced", "x.pdf").has_tyres);
        assert!(parse_purchase_order("PURCHASE ORDER # 1\nTYRES", "x.pdf").has_tyres);
        assert!(!parse_purchase_order(TEXT, "x.pdf").has_tyres);
    }

    #[test]
    fn bare_date_used_when_label_missing() {
        let po = parse_purchase_order("PURCHASE ORDER # 1\nconfirmed 12-25-2024\n", "x.pdf");
        assert_eq!(po.date, NaiveDate::from_ymd_opt(2024, 12, 25));
    }

    #[test]
    fn unparseable_date_stays_unset() {
        let po = parse_purchase_order("PURCHASE ORDER # 1\nDate: 99/99/2024\n", "x.pdf");
        assert_eq!(po.date, None);
    }

    #[test]
    fn missing_fields_stay_unset() {
        let po = parse_purchase_order("PURCHASE ORDER received, details follow", "x.pdf");

        assert_eq!(po.po_number, None);
        assert_eq!(po.pratica_hertz, None);
        assert_eq!(po.total, None);
        assert_eq!(po.date, None);
    }

    #[test]
    fn description_is_bounded() {
        let long_text = format!("PURCHASE ORDER # 1\n{}", "x".repeat(2000));
        let po = parse_purchase_order(&long_text, "x.pdf");
        assert_eq!(po.description.unwrap().chars().count(), 500);
    }
}

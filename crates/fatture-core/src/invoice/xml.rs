//! Invoice document rendering.
//!
//! Produces the `EasyfattDocuments` XML tree the downstream accounting
//! system imports: fixed company and customer identity blocks, one
//! `Document` with the issued number and totals, and a row per line item
//! preceded by a vehicle-information row.

use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_decimal::Decimal;

use crate::error::GenerateError;
use crate::models::document::{Estimate, PurchaseOrder};

use super::{effective_targa, InvoiceFigures};

const COMPANY: [(&str, &str); 9] = [
    ("Name", "SCHIAVI GOMME SRL"),
    ("Address", "VIA UTA 20"),
    ("Postcode", "00133"),
    ("City", "ROMA"),
    ("Province", "RM"),
    ("FiscalCode", "13021431005"),
    ("VatCode", "13021431005"),
    ("Tel", "0622152148"),
    ("Email", "schiavigomme@gmail.com"),
];

const CUSTOMER: [(&str, &str); 9] = [
    ("CustomerCode", "999999"),
    ("CustomerName", "HERTZ ITALIANA S.R.L."),
    ("CustomerAddress", "VIA DEL CASALE CAVALLARI, 204"),
    ("CustomerPostcode", "00156"),
    ("CustomerCity", "ROMA"),
    ("CustomerProvince", "RM"),
    ("CustomerCountry", "IT"),
    ("CustomerFiscalCode", "00433120581"),
    ("CustomerVatCode", "IT00890931009"),
];

const PAYMENT_NAME: &str = "Bonifico 60 gg";
const VAT_PERC: &str = "22.0";
const VAT_CLASS: &str = "Imponibile";

/// Render the invoice document, pretty printed with two-space indentation.
pub fn render_invoice(
    estimate: &Estimate,
    order: &PurchaseOrder,
    figures: &InvoiceFigures,
    today: NaiveDate,
) -> Result<String, GenerateError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, estimate, order, figures, today)
        .map_err(|e| GenerateError::Render(e.to_string()))?;

    String::from_utf8(writer.into_inner()).map_err(|e| GenerateError::Render(e.to_string()))
}

fn write_document(
    w: &mut Writer<Vec<u8>>,
    estimate: &Estimate,
    order: &PurchaseOrder,
    figures: &InvoiceFigures,
    today: NaiveDate,
) -> Result<(), quick_xml::Error> {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    w.write_event(Event::Start(BytesStart::new("EasyfattDocuments")))?;

    w.write_event(Event::Start(BytesStart::new("Company")))?;
    for (name, value) in COMPANY {
        leaf(w, name, value)?;
    }
    w.write_event(Event::End(BytesEnd::new("Company")))?;

    w.write_event(Event::Start(BytesStart::new("Documents")))?;
    w.write_event(Event::Start(BytesStart::new("Document")))?;

    for (name, value) in CUSTOMER {
        leaf(w, name, value)?;
    }

    leaf(w, "DocumentType", "I")?;
    leaf(w, "Date", &today.format("%Y-%m-%d").to_string())?;
    leaf(w, "Number", &figures.number.to_string())?;
    leaf(w, "Numbering", &format!("/{}", figures.category.suffix()))?;
    leaf(w, "TotalWithoutTax", &two_decimals(figures.total_without_tax))?;
    leaf(w, "VatAmount", &two_decimals(figures.vat_amount))?;
    leaf(w, "Total", &two_decimals(figures.total))?;
    leaf(w, "PricesIncludeVat", "false")?;
    leaf(w, "PaymentName", PAYMENT_NAME)?;

    let targa = effective_targa(estimate, order).unwrap_or_default();
    let po_number = order.po_number.as_deref().unwrap_or_default();
    leaf(
        w,
        "InternalComment",
        &format!("PO: {} - Targa: {}", po_number, targa),
    )?;

    w.write_event(Event::Start(BytesStart::new("Rows")))?;

    w.write_event(Event::Start(BytesStart::new("Row")))?;
    leaf(w, "Description", &vehicle_description(estimate, order))?;
    w.write_event(Event::End(BytesEnd::new("Row")))?;

    for item in &estimate.items {
        w.write_event(Event::Start(BytesStart::new("Row")))?;
        if let Some(codice) = &item.codice_ricambio {
            leaf(w, "Code", codice)?;
        }
        leaf(w, "Description", &item.description)?;
        leaf(w, "Qty", &item.qty.normalize().to_string())?;
        leaf(w, "Price", &two_decimals(item.price))?;
        if item.discount > Decimal::ZERO {
            leaf(w, "Discounts", &format!("{}%", two_decimals(item.discount)))?;
        }
        w.create_element("VatCode")
            .with_attribute(("Perc", VAT_PERC))
            .with_attribute(("Class", VAT_CLASS))
            .write_empty()?;
        leaf(w, "Total", &two_decimals(item.total))?;
        w.write_event(Event::End(BytesEnd::new("Row")))?;
    }

    w.write_event(Event::End(BytesEnd::new("Rows")))?;
    w.write_event(Event::End(BytesEnd::new("Document")))?;
    w.write_event(Event::End(BytesEnd::new("Documents")))?;
    w.write_event(Event::End(BytesEnd::new("EasyfattDocuments")))?;

    Ok(())
}

fn leaf(w: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<(), quick_xml::Error> {
    w.create_element(name)
        .write_text_content(BytesText::new(value))?;
    Ok(())
}

fn two_decimals(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Reference block describing the vehicle and order the invoice settles.
fn vehicle_description(estimate: &Estimate, order: &PurchaseOrder) -> String {
    format!(
        "PO Number: {}\n\
         Plate Number: {}\n\
         Serial Number (VIN): {}\n\
         Unit Number: {}\n\
         Model: {}\n\
         Country: IT\n\
         Type: L\n\
         Mileage: {}\n\
         Car/Van: V\n\
         Pratica Hertz: {}",
        order.po_number.as_deref().unwrap_or_default(),
        order.targa.as_deref().unwrap_or_default(),
        order.vin.as_deref().unwrap_or_default(),
        order.unit_number.as_deref().unwrap_or_default(),
        order.model.as_deref().unwrap_or_default(),
        order.mileage.as_deref().unwrap_or_default(),
        estimate.pratica_hertz.as_deref().unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{InvoiceCategory, LineItem};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn estimate() -> Estimate {
        Estimate {
            id: "est-1".to_string(),
            filename: "prev.pdf".to_string(),
            pratica_fornitore: None,
            pratica_hertz: Some("1001".to_string()),
            targa: Some("AB123CD".to_string()),
            telaio: None,
            km: None,
            veicolo: None,
            items: vec![
                LineItem {
                    description: "Pastiglie freno - C.R: BR-102".to_string(),
                    qty: dec("2"),
                    price: dec("45.50"),
                    discount: Decimal::ZERO,
                    total: dec("91.00"),
                    codice_ricambio: Some("BR-102".to_string()),
                },
                LineItem {
                    description: "Manodopera meccanica (2.5h x 35€/h)".to_string(),
                    qty: Decimal::ONE,
                    price: dec("87.50"),
                    discount: dec("10"),
                    total: dec("87.50"),
                    codice_ricambio: None,
                },
            ],
            totale: dec("178.50"),
            data_caricamento: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn order() -> PurchaseOrder {
        PurchaseOrder {
            id: "po-1".to_string(),
            filename: "po.pdf".to_string(),
            po_number: Some("12345".to_string()),
            pratica_hertz: Some("1001".to_string()),
            targa: Some("AB123CD".to_string()),
            vin: Some("ZFA25000002123456".to_string()),
            unit_number: Some("778899".to_string()),
            model: Some("DUCATO MAXI".to_string()),
            mileage: Some("48200".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 12, 25),
            total: None,
            has_tyres: false,
            description: None,
            data_caricamento: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn figures() -> InvoiceFigures {
        InvoiceFigures {
            number: 1,
            category: InvoiceCategory::Mechanical,
            total_without_tax: dec("178.50"),
            vat_amount: dec("39.27"),
            total: dec("217.77"),
        }
    }

    #[test]
    fn renders_declaration_and_identity_blocks() {
        let xml =
            render_invoice(&estimate(), &order(), &figures(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap())
                .unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<Name>SCHIAVI GOMME SRL</Name>"));
        assert!(xml.contains("<CustomerName>HERTZ ITALIANA S.R.L.</CustomerName>"));
        assert!(xml.contains("<DocumentType>I</DocumentType>"));
        assert!(xml.contains("<Date>2024-12-30</Date>"));
    }

    #[test]
    fn renders_number_and_totals_to_two_decimals() {
        let xml =
            render_invoice(&estimate(), &order(), &figures(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap())
                .unwrap();

        assert!(xml.contains("<Number>1</Number>"));
        assert!(xml.contains("<Numbering>/HM</Numbering>"));
        assert!(xml.contains("<TotalWithoutTax>178.50</TotalWithoutTax>"));
        assert!(xml.contains("<VatAmount>39.27</VatAmount>"));
        assert!(xml.contains("<Total>217.77</Total>"));
        assert!(xml.contains("<PricesIncludeVat>false</PricesIncludeVat>"));
        assert!(xml.contains("<PaymentName>Bonifico 60 gg</PaymentName>"));
        assert!(xml.contains("<InternalComment>PO: 12345 - Targa: AB123CD</InternalComment>"));
    }

    #[test]
    fn renders_vehicle_row_then_item_rows() {
        let xml =
            render_invoice(&estimate(), &order(), &figures(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap())
                .unwrap();

        assert!(xml.contains("PO Number: 12345"));
        assert!(xml.contains("Pratica Hertz: 1001"));

        assert!(xml.contains("<Code>BR-102</Code>"));
        assert!(xml.contains("<Qty>2</Qty>"));
        assert!(xml.contains("<Price>45.50</Price>"));
        assert!(xml.contains(r#"<VatCode Perc="22.0" Class="Imponibile"/>"#));
        assert!(xml.contains("<Total>91.00</Total>"));

        let vehicle_pos = xml.find("PO Number: 12345").unwrap();
        let item_pos = xml.find("Pastiglie freno").unwrap();
        assert!(vehicle_pos < item_pos);
    }

    #[test]
    fn discount_rendered_only_when_nonzero() {
        let xml =
            render_invoice(&estimate(), &order(), &figures(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap())
                .unwrap();

        assert!(xml.contains("<Discounts>10.00%</Discounts>"));
        assert_eq!(xml.matches("<Discounts>").count(), 1);
    }

    #[test]
    fn tyres_category_renders_hg_numbering() {
        let mut fig = figures();
        fig.category = InvoiceCategory::Tyres;
        let xml = render_invoice(&estimate(), &order(), &fig, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap())
            .unwrap();

        assert!(xml.contains("<Numbering>/HG</Numbering>"));
    }

    #[test]
    fn missing_order_fields_render_empty() {
        let mut po = order();
        po.vin = None;
        po.model = None;
        let xml = render_invoice(&estimate(), &po, &figures(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap())
            .unwrap();

        assert!(xml.contains("Serial Number (VIN): \n"));
        assert!(xml.contains("Model: \n"));
    }
}

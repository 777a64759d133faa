//! Regex patterns for estimate and purchase-order field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Estimate (preventivo) labeled fields
    pub static ref PRATICA_FORNITORE: Regex =
        Regex::new(r"Pratica Fornitore:\s*(\d+)").unwrap();

    pub static ref PRATICA_HERTZ: Regex =
        Regex::new(r"Pratica Hertz:\s*(\d+)").unwrap();

    pub static ref TARGA: Regex =
        Regex::new(r"Targa:\s*([A-Z0-9]+)").unwrap();

    pub static ref TELAIO: Regex =
        Regex::new(r"Telaio:\s*([A-Z0-9]+)").unwrap();

    pub static ref KM: Regex =
        Regex::new(r"Km:\s*(\d+)").unwrap();

    pub static ref VEICOLO: Regex =
        Regex::new(r"Veicolo \(Marca - Modello - Versione\):\s*([^\n]+)").unwrap();

    // Synthetic estimate items
    pub static ref SMALTIMENTO: Regex =
        Regex::new(r"Smaltimento Rifiuti[^\d]*(€?[\d.,]+)").unwrap();

    pub static ref MANODOPERA_ORE: Regex =
        Regex::new(r"ore\s+([\d.,]+)\s*x\s*([\d.,]+)").unwrap();

    // Purchase order labeled fields
    pub static ref PO_NUMBER: Regex =
        Regex::new(r"(?s)PURCHASE ORDER #.*?(\d+)").unwrap();

    pub static ref PO_WD: Regex =
        Regex::new(r"WD:\s*(\d+)").unwrap();

    pub static ref PO_PLATE: Regex =
        Regex::new(r"Plate Number:\s*([A-Z0-9]+)").unwrap();

    pub static ref PO_VIN: Regex =
        Regex::new(r"Serial Number \(VIN\):\s*([A-Z0-9]+)").unwrap();

    pub static ref PO_UNIT: Regex =
        Regex::new(r"Unit Number:\s*(\d+)").unwrap();

    pub static ref PO_MODEL: Regex =
        Regex::new(r"Model:\s*([^\n]+)").unwrap();

    pub static ref PO_MILEAGE: Regex =
        Regex::new(r"Mileage:\s*(\d+)").unwrap();

    pub static ref PO_TOTAL: Regex =
        Regex::new(r"TOTAL\s+€\s*([\d.]+)").unwrap();

    // Dates: labeled form first, bare date-shaped token as fallback
    pub static ref DATE_LABELED: Regex =
        Regex::new(r"Date:\s*(\d{1,2}[/-]\d{1,2}[/-]\d{4})").unwrap();

    pub static ref DATE_BARE: Regex =
        Regex::new(r"(\d{1,2}[/-]\d{1,2}[/-]\d{4})").unwrap();
}

//! Locale-tolerant numeric parsing.
//!
//! Document amounts arrive as "91,00", "1.234,56", or "€ 45.50" depending
//! on which system produced the page. All numeric fields go through one
//! utility that strips currency noise and resolves the decimal separator.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount, tolerating comma decimal separators, thousands
/// separators, and stray currency symbols.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else if cleaned.contains(',') && cleaned.contains('.') {
        // Both separators present: the rightmost one is the decimal mark.
        let comma_pos = cleaned.rfind(',');
        let dot_pos = cleaned.rfind('.');
        match (comma_pos, dot_pos) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            _ => cleaned,
        }
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

/// Parse a table cell that may be empty or unparseable; defaults to zero.
pub fn parse_cell(s: &str) -> Decimal {
    parse_amount(s).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_comma_decimal() {
        assert_eq!(parse_amount("91,00"), Some(dec("91.00")));
        assert_eq!(parse_amount("0,5"), Some(dec("0.5")));
    }

    #[test]
    fn parses_dot_decimal() {
        assert_eq!(parse_amount("45.50"), Some(dec("45.50")));
    }

    #[test]
    fn resolves_mixed_separators_by_rightmost() {
        assert_eq!(parse_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
    }

    #[test]
    fn strips_currency_noise() {
        assert_eq!(parse_amount("€ 120,00"), Some(dec("120.00")));
        assert_eq!(parse_amount("EUR 99"), Some(dec("99")));
    }

    #[test]
    fn cell_defaults_to_zero() {
        assert_eq!(parse_cell(""), Decimal::ZERO);
        assert_eq!(parse_cell("n/a"), Decimal::ZERO);
        assert_eq!(parse_cell("12,5"), dec("12.5"));
    }
}

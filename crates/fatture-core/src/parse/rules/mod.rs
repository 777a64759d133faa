//! Field-extraction rules shared by the document parsers.
//!
//! Each rule is a pure `text -> optional value` function backed by its own
//! pattern, so one broken pattern can never mask another.

pub mod dates;
pub mod numbers;
pub mod patterns;

pub use dates::{extract_order_date, normalize_date};
pub use numbers::{parse_amount, parse_cell};

use regex::Regex;

/// First capture group of `re` in `text`, trimmed.
pub fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::patterns::PRATICA_HERTZ;
    use super::*;

    #[test]
    fn capture_returns_trimmed_group() {
        assert_eq!(
            capture(&PRATICA_HERTZ, "Pratica Hertz: 1001 \n"),
            Some("1001".to_string())
        );
        assert_eq!(capture(&PRATICA_HERTZ, "no label here"), None);
    }
}

//! Order-date extraction and normalization.

use chrono::NaiveDate;

use super::patterns::{DATE_BARE, DATE_LABELED};

/// Date layouts tried in priority order: day-first with both separator
/// styles, then month-first as a fallback for US-formatted orders.
const DATE_LAYOUTS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%m-%d-%Y"];

/// Re-parse a date-shaped token into the canonical calendar form.
pub fn normalize_date(s: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
}

/// Extract the order date from purchase-order text: the labeled `Date:`
/// field wins; otherwise the first bare date-shaped token anywhere.
pub fn extract_order_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_LABELED.captures(text) {
        if let Some(date) = normalize_date(&caps[1]) {
            return Some(date);
        }
    }

    DATE_BARE
        .captures(text)
        .and_then(|caps| normalize_date(&caps[1]))
}

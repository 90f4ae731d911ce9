// Parsing and formatting helpers shared by the pipeline steps.
//
// Spreadsheet cells arrive as loosely formatted text; everything here turns
// them into typed values or `None` so the rest of the code never has to
// second-guess a cell.
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Month abbreviations as printed in the IBGE series, in calendar order.
pub const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

static MONTH_ORDINALS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| (*label, i as u32 + 1))
        .collect()
});

/// Map a month abbreviation (any case, surrounding blanks allowed) to 1..=12.
pub fn month_ordinal(label: &str) -> Option<u32> {
    MONTH_ORDINALS
        .get(label.trim().to_uppercase().as_str())
        .copied()
}

pub fn month_label(ordinal: u32) -> Option<&'static str> {
    let idx = usize::try_from(ordinal).ok()?.checked_sub(1)?;
    MONTH_LABELS.get(idx).copied()
}

/// Trim a cell and treat blank text as missing.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Parse a rate written with a decimal comma (`"0,42"`) or point (`"0.42"`).
///
/// Returns `None` instead of failing: a non-numeric rate becomes a gap in the
/// series, not an error.
pub fn parse_decimal_comma(s: Option<&str>) -> Option<f64> {
    let s = non_blank(s)?.replace(',', ".");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a quantity cell. Spreadsheets hand us plain numbers, so this only
/// trims and rejects blanks and non-finite values.
pub fn parse_quantity(s: Option<&str>) -> Option<f64> {
    non_blank(s)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `true` for a cell that is exactly four ASCII digits, e.g. `"2021"`.
pub fn is_year_token(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in log lines, e.g. `1,440 rows`.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lookup_is_case_insensitive() {
        assert_eq!(month_ordinal("JAN"), Some(1));
        assert_eq!(month_ordinal(" dez "), Some(12));
        assert_eq!(month_ordinal("Mai"), Some(5));
        assert_eq!(month_ordinal("XYZ"), None);
        assert_eq!(month_label(2), Some("FEV"));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }

    #[test]
    fn decimal_comma_is_accepted() {
        assert_eq!(parse_decimal_comma(Some("0,42")), Some(0.42));
        assert_eq!(parse_decimal_comma(Some(" -0.10 ")), Some(-0.1));
        assert_eq!(parse_decimal_comma(Some("n/d")), None);
        assert_eq!(parse_decimal_comma(Some("  ")), None);
        assert_eq!(parse_decimal_comma(None), None);
    }

    #[test]
    fn year_tokens_are_four_digits() {
        assert!(is_year_token("2021"));
        assert!(!is_year_token("202"));
        assert!(!is_year_token("2021.0"));
        assert!(!is_year_token("20a1"));
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_int(1440usize), "1,440");
    }
}

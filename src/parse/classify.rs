use once_cell::sync::Lazy;
use regex::Regex;

use super::date_parser::parse_unix_seconds;
use crate::schema::CellValue;

/// Plain integer or decimal, comma or dot separator, with an optional exponent.
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+([.,]\d+)?([eE][-+]?\d+)?$").expect("valid numeric regex"));

/// Same as [`NUMERIC`] without the exponent; used for display formatting.
pub(crate) static PLAIN_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+([.,]\d+)?$").expect("valid numeric regex"));

/// Parse a string already known to match one of the numeric patterns.
pub(crate) fn parse_decimal(raw: &str) -> Option<f64> {
    if raw.contains(',') {
        raw.replacen(',', ".", 1).parse().ok()
    } else {
        raw.parse().ok()
    }
}

/// Classify and coerce a single raw cell: number, then date, then category.
///
/// This looks only at the cell itself; the caller decides what the column's
/// locked type is.
pub fn classify_cell(raw: &str) -> CellValue {
    if NUMERIC.is_match(raw) {
        if let Some(n) = parse_decimal(raw) {
            return CellValue::Number(n);
        }
    }
    if let Some(secs) = parse_unix_seconds(raw) {
        return CellValue::Time(secs);
    }
    CellValue::Category(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_in_all_accepted_shapes() {
        assert_eq!(classify_cell("42"), CellValue::Number(42.0));
        assert_eq!(classify_cell("-7"), CellValue::Number(-7.0));
        assert_eq!(classify_cell("3.5"), CellValue::Number(3.5));
        assert_eq!(classify_cell("3,5"), CellValue::Number(3.5));
        assert_eq!(
            classify_cell("-2.1391701302586518e-05"),
            CellValue::Number(-2.1391701302586518e-05)
        );
        assert_eq!(classify_cell("1E+3"), CellValue::Number(1000.0));
    }

    #[test]
    fn test_number_lookalikes_are_not_numbers() {
        assert_eq!(classify_cell(".5"), CellValue::Category(".5".into()));
        assert_eq!(classify_cell("1.2.3"), CellValue::Category("1.2.3".into()));
        assert_eq!(classify_cell("+1"), CellValue::Category("+1".into()));
        assert_eq!(classify_cell("NaN"), CellValue::Category("NaN".into()));
        assert_eq!(classify_cell(""), CellValue::Category(String::new()));
    }

    #[test]
    fn test_dates_become_unix_seconds() {
        assert_eq!(
            classify_cell("2020-10-27 06:00:00"),
            CellValue::Time(1_603_778_400)
        );
    }

    #[test]
    fn test_plain_pattern_rejects_exponent() {
        assert!(PLAIN_NUMERIC.is_match("3.14159"));
        assert!(!PLAIN_NUMERIC.is_match("1e5"));
    }
}

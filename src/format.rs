//! Display labels for tooltips and axis ticks.
//!
//! Works from the bare value only. Any 10-character value that reads as a
//! number is taken to be a Unix-seconds timestamp, so an ordinary ten-digit
//! quantity such as `1234567890` is rendered as a date.

use chrono::DateTime;
use std::fmt::{self, Display};

use crate::parse::classify::{parse_decimal, PLAIN_NUMERIC};
use crate::schema::CellValue;

/// `M/D/YYYY h:mm:ss A`, rendered in UTC.
const TIMESTAMP_LAYOUT: &str = "%-m/%-d/%Y %-I:%M:%S %p";

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Time(t) => write!(f, "{t}"),
            CellValue::Category(s) => f.write_str(s),
        }
    }
}

/// Format any number or string as a label.
pub fn format_label(value: impl Display) -> String {
    format_str(&value.to_string())
}

pub fn format_value(value: &CellValue) -> String {
    format_label(value)
}

pub fn format_str(raw: &str) -> String {
    if raw.len() == 10 {
        if let Some(label) = unix_label(raw) {
            return label;
        }
    }

    if PLAIN_NUMERIC.is_match(raw) {
        if let Some(n) = parse_decimal(raw) {
            return four_places(n);
        }
    }

    raw.to_string()
}

/// Round to two places, then pad to four.
fn four_places(n: f64) -> String {
    let two = format!("{n:.2}");
    // no "-0.0000"
    let two = match two.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => two,
    };
    format!("{two}00")
}

fn unix_label(raw: &str) -> Option<String> {
    let secs: f64 = raw.parse().ok().filter(|v: &f64| v.is_finite())?;
    let dt = DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)?;
    Some(dt.format(TIMESTAMP_LAYOUT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals_get_four_places() {
        assert_eq!(format_label("3.14159"), "3.1400");
        assert_eq!(format_label("42"), "42.0000");
        assert_eq!(format_label("-1,5"), "-1.5000");
        assert_eq!(format_label("-0.001"), "0.0000");
        assert_eq!(format_label(2.5), "2.5000");
        assert_eq!(format_label("-0,004"), "0.0000");
    }

    #[test]
    fn test_large_numbers_keep_their_digits() {
        assert_eq!(format_label(1e21_f64), "1000000000000000000000.0000");
        assert_eq!(format_label("123456789012345678"), "123456789012345680.0000");
        assert_eq!(format_label(-98765.4321), "-98765.4300");
    }

    #[test]
    fn test_ten_character_numbers_are_timestamps() {
        assert_eq!(format_label(1_603_778_400_i64), "10/27/2020 6:00:00 AM");
        assert_eq!(format_label("1603778400"), "10/27/2020 6:00:00 AM");
        // any ten digit number is a timestamp, even when it isn't one
        assert_eq!(format_label(1_234_567_890_i64), "2/13/2009 11:31:30 PM");
        assert_eq!(format_value(&CellValue::Time(1_603_778_400)), "10/27/2020 6:00:00 AM");
        assert_eq!(format_value(&CellValue::Number(1_603_778_400.0)), "10/27/2020 6:00:00 AM");
    }

    #[test]
    fn test_exponent_numbers_and_text_pass_through() {
        assert_eq!(format_label("1e-5"), "1e-5");
        assert_eq!(format_label("SA1"), "SA1");
        assert_eq!(format_label("2020-10-27"), "2020-10-27");
        assert_eq!(format_label(""), "");
        assert_eq!(format_value(&CellValue::Category("category".into())), "category");
    }
}

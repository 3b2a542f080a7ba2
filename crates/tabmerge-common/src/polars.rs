//! Polars value helpers.
//!
//! Conversions between Polars `AnyValue` cells and their text form, plus the
//! scalar parsers used when coercing text columns.

use polars::prelude::AnyValue;

/// Converts a Polars `AnyValue` to its text representation.
///
/// Returns an empty string for `Null` and formats floats without a trailing
/// `.0`, so an integral float key and an integer key render the same.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use tabmerge_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(42.0)), "42");
/// assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_owned(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => {
            // Display quotes some variants.
            let text = other.to_string();
            match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
                Some(inner) => inner.to_owned(),
                None => text,
            }
        }
    }
}

/// Formats a float without a trailing `.0` on integral values.
///
/// `40.0` becomes `"40"`, `-0.0` becomes `"0"`, non-finite values render
/// as `NaN`, `inf` and `-inf`.
///
/// # Examples
///
/// ```
/// use tabmerge_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(100.0), "100");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        // Exact: integral and within i64 range.
        return format!("{}", v as i64);
    }
    format!("{v}")
}

/// True when the value is empty after trimming whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parses a string as `f64`, returning `None` for invalid or blank strings.
///
/// Only finite values are accepted; `"NaN"` and `"inf"` are treated as text.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string as `i64`, returning `None` for invalid or blank strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_integers() {
        assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::UInt32(0)), "0");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float32(2.5)), "2.5");
    }

    #[test]
    fn test_any_to_string_boolean() {
        assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
        assert_eq!(any_to_string(AnyValue::Boolean(false)), "false");
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(-0.0), "0");
        // Trailing zeros in the integer part stay
        assert_eq!(format_numeric(40.0), "40");
        assert_eq!(format_numeric(1000.0), "1000");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(-2.25), "-2.25");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("3.25"), Some(3.25));
        assert_eq!(parse_f64("  3.25  "), Some(3.25));
        assert_eq!(parse_f64("1.5e3"), Some(1500.0));
        assert_eq!(parse_f64("invalid"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64("  -100  "), Some(-100));
        assert_eq!(parse_i64("4.0"), None);
        assert_eq!(parse_i64("invalid"), None);
    }
}

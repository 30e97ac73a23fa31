//! Shared utilities for the analysis engine.
//!
//! Number parsing and formatting here reproduce the conversions a browser
//! applies to spreadsheet cells, so that labels and classifications match
//! what users see in the dashboard.

use polars::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Number Parsing
// =============================================================================

/// Parse text the way a browser's `Number(text)` does.
///
/// Surrounding whitespace is ignored and blank text is `0`. Accepts decimal
/// literals with optional sign and exponent, `Infinity`, and unsigned
/// `0x` / `0o` / `0b` integer literals. Everything else is `NaN`.
///
/// # Example
///
/// ```rust,ignore
/// use datalens::utils::js_number;
///
/// assert_eq!(js_number(" 1e3 "), 1000.0);
/// assert_eq!(js_number("0x1F"), 31.0);
/// assert!(js_number("12abc").is_nan());
/// ```
pub fn js_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust's float parser also accepts "inf" and "nan"; the browser does not.
    let decimal_chars = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal_chars {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// `0x`, `0o` and `0b` prefixed literals. `None` when there is no prefix.
fn parse_radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

// =============================================================================
// Number Formatting
// =============================================================================

/// Format a number the way a browser's `String(number)` does.
///
/// Integers print without a fractional part, very large and very small
/// magnitudes switch to exponent form (`1e+21`, `1e-7`).
pub fn format_js_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    format!("{}", n)
}

/// Fixed-point formatting with `digits` decimals, as `toFixed` does.
///
/// Negative zero prints without a sign; non-finite values print as
/// [`format_js_number`] does.
pub fn format_fixed(n: f64, digits: usize) -> String {
    if !n.is_finite() {
        return format_js_number(n);
    }
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{:.*}", digits, n)
}

/// Two-decimal label used for histogram bucket edges.
#[inline]
pub fn fixed2(n: f64) -> String {
    format_fixed(n, 2)
}

// =============================================================================
// String Comparison
// =============================================================================

/// Locale-style string ordering.
///
/// Letters compare case-insensitively first; on a tie, lowercase sorts
/// before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== js_number tests ====================

    #[test]
    fn test_js_number_decimal_literals() {
        assert_eq!(js_number("42"), 42.0);
        assert_eq!(js_number("  -3.5 "), -3.5);
        assert_eq!(js_number(".5"), 0.5);
        assert_eq!(js_number("5."), 5.0);
        assert_eq!(js_number("+7"), 7.0);
        assert_eq!(js_number("1e3"), 1000.0);
        assert_eq!(js_number("2.5E-1"), 0.25);
    }

    #[test]
    fn test_js_number_blank_is_zero() {
        assert_eq!(js_number(""), 0.0);
        assert_eq!(js_number("   "), 0.0);
    }

    #[test]
    fn test_js_number_radix_literals() {
        assert_eq!(js_number("0x1F"), 31.0);
        assert_eq!(js_number("0o17"), 15.0);
        assert_eq!(js_number("0b101"), 5.0);
        assert!(js_number("0x").is_nan());
        assert!(js_number("0xZZ").is_nan());
    }

    #[test]
    fn test_js_number_rejects_non_numeric() {
        assert!(js_number("abc").is_nan());
        assert!(js_number("12abc").is_nan());
        assert!(js_number("1,000").is_nan());
        assert!(js_number("inf").is_nan());
        assert!(js_number("nan").is_nan());
        assert!(js_number("1e").is_nan());
        assert!(js_number(".").is_nan());
    }

    #[test]
    fn test_js_number_infinity() {
        assert_eq!(js_number("Infinity"), f64::INFINITY);
        assert_eq!(js_number("-Infinity"), f64::NEG_INFINITY);
    }

    // ==================== formatting tests ====================

    #[test]
    fn test_format_js_number() {
        assert_eq!(format_js_number(5.0), "5");
        assert_eq!(format_js_number(-0.0), "0");
        assert_eq!(format_js_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_js_number(1e21), "1e+21");
        assert_eq!(format_js_number(1.5e-7), "1.5e-7");
        assert_eq!(format_js_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_fixed2() {
        assert_eq!(fixed2(5.0), "5.00");
        assert_eq!(fixed2(-0.0), "0.00");
        assert_eq!(fixed2(1.0 / 3.0), "0.33");
        assert_eq!(fixed2(-12.345678), "-12.35");
    }

    // ==================== locale_compare tests ====================

    #[test]
    fn test_locale_compare_case_insensitive_primary() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn test_locale_compare_lowercase_first_on_tie() {
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("A", "a"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }
}

//! Number and date formatting for letter text

use crate::{LetterError, Result};
use chrono::NaiveDate;
use std::fmt::Write;

/// Decimal places used for item weights
pub const WEIGHT_PRECISION: u32 = 2;

/// Format an item weight with exactly two decimal places
///
/// # Examples
/// ```
/// use letter_core::format::format_weight;
/// assert_eq!(format_weight(4.5), "4.50");
/// assert_eq!(format_weight(4.0), "4.00");
/// assert_eq!(format_weight(4.567), "4.57");
/// ```
pub fn format_weight(weight: f64) -> String {
    render_fixed(weight, WEIGHT_PRECISION)
}

/// Largest precision rounded through integer arithmetic
const MAX_INTEGER_PRECISION: u32 = 15;

/// 2^53: scaled values below this are exact integers in an f64
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Render a float with a fixed number of decimal places
///
/// Rounds half away from zero on the scaled value, so `0.125` at precision 2
/// gives `0.13`. No thousand separators are inserted. Values too large to
/// scale exactly are printed from their full binary value instead.
pub fn render_fixed(n: f64, precision: u32) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let digits = if precision <= MAX_INTEGER_PRECISION {
        let multiplier = 10_u64.pow(precision);
        let scaled = (n.abs() * multiplier as f64).round();
        (scaled < EXACT_INTEGER_LIMIT).then(|| {
            let scaled = scaled as u64;
            let int_part = scaled / multiplier;
            let frac_part = scaled % multiplier;
            if precision > 0 {
                format!(
                    "{int_part}.{frac_part:0>width$}",
                    width = precision as usize
                )
            } else {
                int_part.to_string()
            }
        })
    } else {
        None
    };
    let digits = digits.unwrap_or_else(|| format!("{:.*}", precision as usize, n.abs()));

    let is_zero = digits.bytes().all(|b| matches!(b, b'0' | b'.'));
    let sign = if n < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}{digits}")
}

/// Format a date with a strftime pattern
///
/// An invalid pattern is reported instead of panicking inside `Display`.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern))
        .map_err(|_| LetterError::DateFormat(pattern.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight_two_decimals() {
        assert_eq!(format_weight(4.5), "4.50");
        assert_eq!(format_weight(4.0), "4.00");
        assert_eq!(format_weight(4.567), "4.57");
        assert_eq!(format_weight(0.0), "0.00");
        assert_eq!(format_weight(12.004), "12.00");
    }

    #[test]
    fn test_format_weight_rounds_not_truncates() {
        assert_eq!(format_weight(1.999), "2.00");
        assert_eq!(format_weight(0.125), "0.13");
        assert_eq!(format_weight(1234.5), "1234.50");
    }

    #[test]
    fn test_render_fixed_negative() {
        assert_eq!(render_fixed(-100.5, 2), "-100.50");
        assert_eq!(render_fixed(-0.001, 2), "0.00");
        assert_eq!(render_fixed(7.6, 0), "8");
    }

    #[test]
    fn test_render_fixed_special() {
        assert_eq!(render_fixed(f64::NAN, 2), "NaN");
        assert_eq!(render_fixed(f64::INFINITY, 2), "Infinity");
        assert_eq!(render_fixed(f64::NEG_INFINITY, 2), "-Infinity");
    }

    #[test]
    fn test_format_weight_large_values() {
        assert_eq!(format_weight(2e17), "200000000000000000.00");
        assert_eq!(format_weight(1e18), "1000000000000000000.00");
        assert_eq!(format_weight(-1e18), "-1000000000000000000.00");
        assert_eq!(format_weight(123456789.125), "123456789.13");
    }

    #[test]
    fn test_render_fixed_high_precision() {
        assert_eq!(render_fixed(1.5, 20), "1.50000000000000000000");
        assert_eq!(render_fixed(-0.0, 20), "0.00000000000000000000");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 4).unwrap();
        assert_eq!(format_date(date, "%d/%m/%Y").unwrap(), "04/08/2024");
        assert_eq!(format_date(date, "%d %B %Y").unwrap(), "04 August 2024");
    }

    #[test]
    fn test_format_date_invalid_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 4).unwrap();
        assert!(matches!(
            format_date(date, "%Q"),
            Err(LetterError::DateFormat(_))
        ));
    }
}

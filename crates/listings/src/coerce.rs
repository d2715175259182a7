//! Fallible numeric coercion for loosely-typed listing fields.
//!
//! Stored values that ought to be numbers arrive as text, 32/64-bit
//! integers, doubles, or Decimal128. Every conversion here returns `None`
//! for unrepresentable input, so callers treat a failed coercion as "this
//! value is excluded" rather than as a fatal error. The in-pipeline
//! counterpart is `$convert` with `onError`/`onNull` fallbacks.

use mongodb::bson::Bson;

/// Interprets stored text as a float.
///
/// Tolerates surrounding whitespace, a leading `$`, and thousands
/// separators (`"$1,200.50"` parses to `1200.5`). Non-numeric or
/// non-finite input yields `None`.
#[must_use]
pub fn parse_f64(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Interprets stored text as an integer. `None` on anything that is not a
/// plain base-10 integer (fractional text like `"3.5"` does not truncate).
#[must_use]
pub fn parse_i64(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Converts a BSON value to `f64` where a faithful conversion exists.
///
/// Numeric variants convert directly; numeric text goes through
/// [`parse_f64`]. Everything else (arrays, documents, booleans, null)
/// yields `None`.
#[must_use]
pub fn bson_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v).filter(|v| v.is_finite()),
        Bson::Int32(v) => Some(f64::from(*v)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(v) => Some(*v as f64),
        Bson::Decimal128(v) => parse_f64(&v.to_string()),
        Bson::String(v) => parse_f64(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_f64_plain() {
        assert_eq!(parse_f64("700.00"), Some(700.0));
        assert_eq!(parse_f64("  85 "), Some(85.0));
    }

    #[test]
    fn test_parse_f64_currency_text() {
        assert_eq!(parse_f64("$1,200.50"), Some(1200.5));
        assert_eq!(parse_f64("$80"), Some(80.0));
    }

    #[test]
    fn test_parse_f64_unrepresentable() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("two hundred"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("3"), Some(3));
        assert_eq!(parse_i64(" -12 "), Some(-12));
        assert_eq!(parse_i64("3.5"), None);
        assert_eq!(parse_i64("three"), None);
    }

    #[test]
    fn test_bson_f64_numeric_variants() {
        assert_eq!(bson_f64(&Bson::Double(99.5)), Some(99.5));
        assert_eq!(bson_f64(&Bson::Int32(42)), Some(42.0));
        assert_eq!(bson_f64(&Bson::Int64(1_000)), Some(1000.0));
        assert_eq!(bson_f64(&Bson::String("700.00".to_string())), Some(700.0));

        let decimal = "1250.75".parse().expect("valid decimal128");
        assert_eq!(bson_f64(&Bson::Decimal128(decimal)), Some(1250.75));
    }

    #[test]
    fn test_bson_f64_non_numeric_variants() {
        assert_eq!(bson_f64(&Bson::Null), None);
        assert_eq!(bson_f64(&Bson::Boolean(true)), None);
        assert_eq!(bson_f64(&Bson::Array(vec![Bson::Int32(1)])), None);
        assert_eq!(bson_f64(&Bson::String("n/a".to_string())), None);
    }

    proptest! {
        /// Formatting a finite float and parsing it back is lossless.
        #[test]
        fn prop_parse_f64_roundtrip(value in -1.0e12f64..1.0e12) {
            prop_assert_eq!(parse_f64(&format!("{value}")), Some(value));
        }

        /// Coercion never panics, whatever the input text.
        #[test]
        fn prop_parse_never_panics(raw in ".*") {
            let _ = parse_f64(&raw);
            let _ = parse_i64(&raw);
        }
    }
}

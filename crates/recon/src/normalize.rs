//! Value normalization: canonical comparable form of a raw cell value.
//!
//! Spreadsheet tools render identical logical values as "123", "123.0" or
//! "0123" depending on cell typing. Normalization collapses those forms
//! while leaving genuine text untouched. Best-effort: a value that fails
//! numeric parsing passes through trimmed but otherwise unmodified.

use crate::model::CellScalar;

/// Canonical comparable form of a raw cell value. Empty cells normalize to
/// the empty string, which doubles as the "no key" sentinel.
pub fn normalize(value: &CellScalar) -> String {
    match value {
        CellScalar::Empty => String::new(),
        CellScalar::Text(s) => normalize_str(s),
        CellScalar::Number(n) => normalize_str(&render_number(*n)),
        CellScalar::Bool(true) => "TRUE".to_string(),
        CellScalar::Bool(false) => "FALSE".to_string(),
    }
}

/// Render a float the way spreadsheets display it: integers without decimals.
fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Canonicalize a raw string for comparison.
///
/// Trims, then: a decimal with a fractional separator becomes its
/// integer-truncated form ("123.0" → "123", "-7.9" → "-7"); an all-digit
/// string loses leading zeros ("007" → "7"). Idempotent.
pub fn normalize_str(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.contains('.') {
        if let Ok(f) = trimmed.parse::<f64>() {
            // The i64 range guard keeps truncation exact; values outside it
            // fall through to passthrough.
            if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                return (f.trunc() as i64).to_string();
            }
        }
        trimmed.to_string()
    } else if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn numeric_forms_collapse() {
        assert_eq!(normalize_str("123.0"), "123");
        assert_eq!(normalize_str("123"), "123");
        assert_eq!(normalize_str("0123"), "123");
        assert_eq!(normalize_str("123.45"), "123");
        assert_eq!(normalize_str("-7.9"), "-7");
        assert_eq!(normalize_str("000"), "0");
        assert_eq!(normalize_str(".5"), "0");
    }

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(normalize(&CellScalar::Empty), "");
        assert_eq!(normalize_str(""), "");
        assert_eq!(normalize_str("   "), "");
        assert_eq!(normalize_str("  Acme Corp  "), "Acme Corp");
    }

    #[test]
    fn parse_failures_pass_through() {
        assert_eq!(normalize_str("1.2.3"), "1.2.3");
        assert_eq!(normalize_str("80-001"), "80-001");
        assert_eq!(normalize_str("N/A"), "N/A");
        // Negative without a separator is not an all-digit string.
        assert_eq!(normalize_str("-007"), "-007");
    }

    #[test]
    fn scalar_variants() {
        assert_eq!(normalize(&CellScalar::Number(123.0)), "123");
        assert_eq!(normalize(&CellScalar::Number(123.45)), "123");
        assert_eq!(normalize(&CellScalar::Number(-4855.0)), "-4855");
        assert_eq!(normalize(&CellScalar::Text(" 007 ".into())), "7");
        assert_eq!(normalize(&CellScalar::Bool(true)), "TRUE");
        assert_eq!(normalize(&CellScalar::Bool(false)), "FALSE");
    }

    #[test]
    fn scientific_notation_with_separator() {
        assert_eq!(normalize_str("1.5e3"), "1500");
    }

    proptest! {
        #[test]
        fn normalize_str_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize_str(&raw);
            prop_assert_eq!(normalize_str(&once), once.clone());
        }
    }
}

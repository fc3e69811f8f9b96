//! Numeric display policies.
//!
//! Display strings must be stable across platforms, so every float shown to a
//! user goes through one of these helpers.

/// Canonicalize a floating-point value for display and comparison.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Round to `digits` decimals, then print the shortest form of the result.
///
/// `120.5` with 3 digits prints `"120.5"`, `120.0` prints `"120"` and values
/// that round to zero print `"0"` regardless of sign. Non-finite input yields
/// `None` so callers can choose their own placeholder.
pub fn fixed_trimmed(value: f64, digits: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let mut s = format!("{:.*}", digits, canonical_f64(value));
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    Some(s)
}

/// Fixed-decimal formatting without trimming; `None` for non-finite input.
pub fn fixed(value: f64, digits: usize) -> Option<String> {
    value
        .is_finite()
        .then(|| format!("{:.*}", digits, canonical_f64(value)))
}

#[cfg(test)]
mod tests {
    use super::{canonical_f64, fixed, fixed_trimmed};

    #[test]
    fn canonical_folds_negative_zero() {
        assert!(canonical_f64(-0.0).is_sign_positive());
        assert!(canonical_f64(f64::NAN).is_nan());
        assert_eq!(canonical_f64(2.5), 2.5);
    }

    #[test]
    fn trims_trailing_zeros_after_rounding() {
        assert_eq!(fixed_trimmed(123.45678, 3).as_deref(), Some("123.457"));
        assert_eq!(fixed_trimmed(120.5, 3).as_deref(), Some("120.5"));
        assert_eq!(fixed_trimmed(120.0, 3).as_deref(), Some("120"));
        assert_eq!(fixed_trimmed(15.2004, 3).as_deref(), Some("15.2"));
    }

    #[test]
    fn values_rounding_to_zero_print_unsigned() {
        assert_eq!(fixed_trimmed(-0.0001, 3).as_deref(), Some("0"));
        assert_eq!(fixed_trimmed(-0.0, 3).as_deref(), Some("0"));
    }

    #[test]
    fn non_finite_values_have_no_display() {
        assert_eq!(fixed_trimmed(f64::NAN, 3), None);
        assert_eq!(fixed_trimmed(f64::INFINITY, 3), None);
        assert_eq!(fixed(f64::NEG_INFINITY, 6), None);
    }

    #[test]
    fn fixed_keeps_all_digits() {
        assert_eq!(fixed(40.7368521, 6).as_deref(), Some("40.736852"));
        assert_eq!(fixed(-73.0, 6).as_deref(), Some("-73.000000"));
    }
}

//! Predicate evaluation for scan and narrowing steps

use crate::core::types::{Comparison, MemoryValue};

/// Evaluates `kind` for a freshly read value.
///
/// `equal`, `notEqual`, `greater` and `less` test against the user literal;
/// `changed` and `unchanged` test against the previous observation. A
/// missing operand never matches. Everything is compared in f64, so NaN is
/// not equal to anything, itself included.
pub fn compare(kind: Comparison, current: f64, literal: Option<f64>, previous: Option<f64>) -> bool {
    match kind {
        Comparison::Equal => literal.map_or(false, |l| current == l),
        Comparison::NotEqual => literal.map_or(false, |l| current != l),
        Comparison::Greater => literal.map_or(false, |l| current > l),
        Comparison::Less => literal.map_or(false, |l| current < l),
        Comparison::Changed => previous.map_or(false, |p| current != p),
        Comparison::Unchanged => previous.map_or(false, |p| current == p),
    }
}

/// [`compare`] over typed values
pub fn compare_values(
    kind: Comparison,
    current: &MemoryValue,
    literal: Option<f64>,
    previous: Option<&MemoryValue>,
) -> bool {
    compare(
        kind,
        current.as_f64(),
        literal,
        previous.map(MemoryValue::as_f64),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_comparisons() {
        assert!(compare(Comparison::Equal, 100.0, Some(100.0), None));
        assert!(!compare(Comparison::Equal, 100.0, Some(99.0), None));
        assert!(compare(Comparison::NotEqual, 100.0, Some(99.0), None));
        assert!(compare(Comparison::Greater, 5.0, Some(4.5), None));
        assert!(!compare(Comparison::Greater, 4.5, Some(4.5), None));
        assert!(compare(Comparison::Less, -3.0, Some(0.0), None));
    }

    #[test]
    fn test_previous_comparisons() {
        assert!(compare(Comparison::Changed, 2.0, None, Some(1.0)));
        assert!(!compare(Comparison::Changed, 1.0, None, Some(1.0)));
        assert!(compare(Comparison::Unchanged, 1.0, None, Some(1.0)));
        // previous-based kinds ignore the literal
        assert!(compare(Comparison::Unchanged, 1.0, Some(7.0), Some(1.0)));
    }

    #[test]
    fn test_missing_operand_never_matches() {
        assert!(!compare(Comparison::Changed, 2.0, Some(1.0), None));
        assert!(!compare(Comparison::Unchanged, 2.0, Some(2.0), None));
        assert!(!compare(Comparison::Equal, 2.0, None, Some(2.0)));
        assert!(!compare(Comparison::NotEqual, 2.0, None, None));
    }

    #[test]
    fn test_nan_semantics() {
        assert!(!compare(Comparison::Equal, f64::NAN, Some(f64::NAN), None));
        assert!(compare(Comparison::NotEqual, f64::NAN, Some(1.0), None));
        assert!(compare(Comparison::Changed, f64::NAN, None, Some(f64::NAN)));
    }

    #[test]
    fn test_typed_values_compare_in_natural_domain() {
        let current = MemoryValue::U8(200);
        assert!(compare_values(Comparison::Greater, &current, Some(127.0), None));
        let previous = MemoryValue::U8(199);
        assert!(compare_values(Comparison::Changed, &current, None, Some(&previous)));
        assert!(compare_values(
            Comparison::Equal,
            &MemoryValue::F32(0.5),
            Some(0.5),
            None
        ));
    }
}

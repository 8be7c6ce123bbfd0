// ---------------------------------------------------------------------------
// Lenient numeric coercion for feature fields
// ---------------------------------------------------------------------------

/// Outcome of parsing one non-empty field of a feature file.
///
/// Feature files are best-effort numeric text: anything that is not a
/// float is kept as a zero, never rejected. The variant records which of
/// the two happened so callers can count or report the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Number(f64),
    /// The text was not a float; the field contributes `0.0`.
    Defaulted,
}

impl Field {
    /// Numeric value of the field, `0.0` for [`Field::Defaulted`].
    pub fn value(self) -> f64 {
        match self {
            Field::Number(v) => v,
            Field::Defaulted => 0.0,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, Field::Defaulted)
    }
}

/// Parse a single field. Surrounding whitespace is ignored, as are the
/// spellings `inf`, `-inf`, `nan` which `f64::from_str` already accepts.
pub fn parse_field(text: &str) -> Field {
    match text.trim().parse::<f64>() {
        Ok(v) => Field::Number(v),
        Err(_) => Field::Defaulted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1.0)]
    #[case("-2.5", -2.5)]
    #[case(" 3e2 ", 300.0)]
    #[case("1e-3", 0.001)]
    fn numbers_parse(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_field(text), Field::Number(expected));
    }

    #[rstest]
    #[case("abc")]
    #[case("1,5")]
    #[case("0x10")]
    #[case("--1")]
    fn non_numbers_default_to_zero(#[case] text: &str) {
        let field = parse_field(text);
        assert!(field.is_defaulted());
        assert_eq!(field.value(), 0.0);
    }

    #[test]
    fn infinity_is_a_number() {
        assert_eq!(parse_field("-inf"), Field::Number(f64::NEG_INFINITY));
    }
}

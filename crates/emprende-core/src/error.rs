use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// Largest loan principal accepted. Keeps every schedule row well inside
/// `Decimal` range for any term and rate the loan validator allows.
pub const MAX_PRINCIPAL: Decimal = dec!(1_000_000_000_000);

/// Which constraint an input value violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Value must be strictly greater than zero
    NotPositive,
    /// Value must be zero or greater
    Negative,
    /// Value must lie within the inclusive range
    OutOfRange { min: Decimal, max: Decimal },
    /// Raw form text could not be read as a number
    Unparseable { raw: String },
    /// A required value was not supplied
    Missing,
    /// Arithmetic on this value left the `Decimal` range
    Overflow,
    /// A dated value lies outside the period being computed
    OutsidePeriod { period: String },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NotPositive => write!(f, "must be greater than 0"),
            Constraint::Negative => write!(f, "must not be negative"),
            Constraint::OutOfRange { min, max } => write!(f, "must be between {min} and {max}"),
            Constraint::Unparseable { raw } => write!(f, "'{raw}' is not a valid number"),
            Constraint::Missing => write!(f, "is required"),
            Constraint::Overflow => write!(f, "puts the result outside the computable range"),
            Constraint::OutsidePeriod { period } => write!(f, "falls outside {period}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EmprendeError {
    #[error("Invalid input: {field} {constraint}")]
    InvalidInput { field: String, constraint: Constraint },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl EmprendeError {
    pub fn invalid(field: &str, constraint: Constraint) -> Self {
        tracing::warn!(field, %constraint, "rejected input");
        EmprendeError::InvalidInput {
            field: field.to_string(),
            constraint,
        }
    }

    /// The violated constraint, when this is an input error.
    pub fn constraint(&self) -> Option<&Constraint> {
        match self {
            EmprendeError::InvalidInput { constraint, .. } => Some(constraint),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EmprendeError {
    fn from(e: serde_json::Error) -> Self {
        EmprendeError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for EmprendeError {
    fn from(e: std::io::Error) -> Self {
        EmprendeError::Storage(e.to_string())
    }
}

/// Fail unless `value > 0`.
pub fn ensure_positive(field: &str, value: Decimal) -> Result<(), EmprendeError> {
    if value <= Decimal::ZERO {
        return Err(EmprendeError::invalid(field, Constraint::NotPositive));
    }
    Ok(())
}

/// Fail unless `value >= 0`.
pub fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), EmprendeError> {
    if value < Decimal::ZERO {
        return Err(EmprendeError::invalid(field, Constraint::Negative));
    }
    Ok(())
}

/// Fail unless `min <= value <= max`.
pub fn ensure_in_range(
    field: &str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), EmprendeError> {
    if value < min || value > max {
        return Err(EmprendeError::invalid(
            field,
            Constraint::OutOfRange { min, max },
        ));
    }
    Ok(())
}

/// Unwrap a `checked_*` result, blaming `field` when it overflowed.
pub fn checked(field: &str, value: Option<Decimal>) -> Result<Decimal, EmprendeError> {
    value.ok_or_else(|| EmprendeError::invalid(field, Constraint::Overflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_range_message() {
        let err = ensure_in_range("term_months", dec!(400), dec!(1), dec!(360)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: term_months must be between 1 and 360"
        );
    }

    #[test]
    fn test_boundaries_accepted() {
        assert!(ensure_in_range("x", dec!(1), dec!(1), dec!(360)).is_ok());
        assert!(ensure_non_negative("x", Decimal::ZERO).is_ok());
        assert!(ensure_positive("x", Decimal::ZERO).is_err());
    }

    #[test]
    fn test_checked_overflow_names_field() {
        assert_eq!(checked("price_per_unit", Some(dec!(2))).unwrap(), dec!(2));
        let err = checked("price_per_unit", Decimal::MAX.checked_mul(dec!(2))).unwrap_err();
        assert_eq!(err.constraint(), Some(&Constraint::Overflow));
        assert_eq!(
            err.to_string(),
            "Invalid input: price_per_unit puts the result outside the computable range"
        );
    }
}

//! Shared input validation helpers.
//!
//! Provides reusable range-checking functions used by the forecast, flow
//! and PERT modules. All of them return `CoreError::Validation` naming the
//! offending field so the message can be surfaced verbatim upstream.

use crate::error::CoreError;

/// Validate that a value is finite (not NaN or infinite).
pub fn validate_finite(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a value is finite and `>= 0.0`.
pub fn validate_non_negative(value: f64, name: &str) -> Result<(), CoreError> {
    validate_finite(value, name)?;
    if value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate that every value of a weekly series is finite and non-negative.
///
/// The error names the index of the first offending week.
pub fn validate_weekly_series(values: &[f64], name: &str) -> Result<(), CoreError> {
    for (i, &value) in values.iter().enumerate() {
        validate_non_negative(value, &format!("{name}[{i}]"))?;
    }
    Ok(())
}

/// Validate an exponential smoothing factor, which must lie in `(0.0, 1.0]`.
pub fn validate_alpha(alpha: f64) -> Result<(), CoreError> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(CoreError::Validation(format!(
            "alpha must be in (0.0, 1.0], got {alpha}"
        )));
    }
    Ok(())
}

/// Validate a percentage that must lie in `(0.0, 100.0]`.
pub fn validate_positive_percent(value: f64, name: &str) -> Result<(), CoreError> {
    if !(value > 0.0 && value <= 100.0) {
        return Err(CoreError::Validation(format!(
            "{name} must be in (0, 100], got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- validate_non_negative --

    #[test]
    fn accepts_zero_and_positive() {
        assert!(validate_non_negative(0.0, "test").is_ok());
        assert!(validate_non_negative(12.5, "test").is_ok());
    }

    #[test]
    fn rejects_negative() {
        assert_matches!(
            validate_non_negative(-0.01, "test"),
            Err(CoreError::Validation(msg)) if msg.contains("test")
        );
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(validate_non_negative(f64::NAN, "test").is_err());
        assert!(validate_non_negative(f64::INFINITY, "test").is_err());
    }

    // -- validate_weekly_series --

    #[test]
    fn series_error_names_index() {
        let err = validate_weekly_series(&[1.0, 2.0, -3.0], "weeks").unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("weeks[2] must not be negative, got -3".to_string())
        );
    }

    #[test]
    fn empty_series_is_valid() {
        assert!(validate_weekly_series(&[], "weeks").is_ok());
    }

    // -- validate_alpha --

    #[test]
    fn alpha_boundaries() {
        assert!(validate_alpha(0.0).is_err());
        assert!(validate_alpha(0.001).is_ok());
        assert!(validate_alpha(1.0).is_ok());
        assert!(validate_alpha(1.0001).is_err());
        assert!(validate_alpha(f64::NAN).is_err());
    }

    // -- validate_positive_percent --

    #[test]
    fn percent_boundaries() {
        assert!(validate_positive_percent(0.0, "tolerance").is_err());
        assert!(validate_positive_percent(20.0, "tolerance").is_ok());
        assert!(validate_positive_percent(100.0, "tolerance").is_ok());
        assert!(validate_positive_percent(100.5, "tolerance").is_err());
    }
}

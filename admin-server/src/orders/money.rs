//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored and serialized as `f64`; arithmetic goes through
//! `Decimal` and is rounded to 2 decimal places, half away from zero.

use rust_decimal::prelude::*;

use super::error::OrderError;

const DECIMAL_PLACES: u32 = 2;

/// Maximum single fine or bid (KES)
const MAX_AMOUNT: f64 = 10_000_000.0;

/// Convert f64 to Decimal
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::Validation(format!(
            "{field_name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate an amount attached to a lifecycle action: finite, > 0, bounded
pub fn validate_positive_amount(value: f64, field_name: &str) -> Result<(), OrderError> {
    require_finite(value, field_name)?;
    if value <= 0.0 {
        return Err(OrderError::Validation(format!(
            "{field_name} must be positive, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(OrderError::Validation(format!(
            "{field_name} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// `a + b` without binary float drift
pub fn add(a: f64, b: f64) -> f64 {
    to_f64(to_decimal(a) + to_decimal(b))
}

/// `percent`% of `amount`
pub fn percent_of(amount: f64, percent: f64) -> f64 {
    to_f64(to_decimal(amount) * to_decimal(percent) / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_avoids_float_drift() {
        assert_eq!(add(0.1, 0.2), 0.3);
        assert_eq!(add(100.0, 35.55), 135.55);
    }

    #[test]
    fn test_percent_rounds_half_away_from_zero() {
        assert_eq!(percent_of(1400.0, 10.0), 140.0);
        assert_eq!(percent_of(0.05, 10.0), 0.01);
        assert_eq!(percent_of(333.33, 10.0), 33.33);
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(50.0, "amount").is_ok());
        assert!(validate_positive_amount(0.0, "amount").is_err());
        assert!(validate_positive_amount(-5.0, "amount").is_err());
        assert!(validate_positive_amount(f64::NAN, "amount").is_err());
        assert!(validate_positive_amount(f64::INFINITY, "amount").is_err());
        assert!(validate_positive_amount(MAX_AMOUNT * 2.0, "amount").is_err());
    }
}

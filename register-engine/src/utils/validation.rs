//! Input validation helpers
//!
//! Centralized limits and validation functions. Every service operation
//! validates its payload before opening a store transaction, so a rejected
//! request never produces partial writes.

use shared::models::DenominationInput;

use crate::utils::AppError;

/// Notes, closing reasons, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Maximum allowed cash amount per balance/transaction (₹10,000,000)
pub const MAX_AMOUNT: f64 = 10_000_000.0;

/// Validate a cash amount is finite, non-negative and within bounds
pub fn validate_cash(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a transaction amount (strictly positive)
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    validate_cash(value, field)?;
    if value == 0.0 {
        return Err(AppError::validation(format!("{field} must be positive")));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate optional denomination counts (all non-negative)
pub fn validate_denominations(value: &Option<DenominationInput>) -> Result<(), AppError> {
    if let Some(d) = value
        && d.has_negative_count()
    {
        return Err(AppError::validation(
            "Denomination counts must be non-negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_bounds() {
        assert!(validate_cash(0.0, "x").is_ok());
        assert!(validate_cash(999.99, "x").is_ok());
        assert!(validate_cash(-1.0, "x").is_err());
        assert!(validate_cash(f64::NAN, "x").is_err());
        assert!(validate_cash(f64::INFINITY, "x").is_err());
        assert!(validate_cash(MAX_AMOUNT + 1.0, "x").is_err());
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(validate_amount(0.0, "amount").is_err());
        assert!(validate_amount(0.01, "amount").is_ok());
    }

    #[test]
    fn denomination_counts() {
        let mut d = DenominationInput::default();
        assert!(validate_denominations(&Some(d)).is_ok());
        d.note50 = -1;
        assert!(validate_denominations(&Some(d)).is_err());
        assert!(validate_denominations(&None).is_ok());
    }
}

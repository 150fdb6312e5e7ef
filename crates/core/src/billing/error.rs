//! Billing error types.
//!
//! Range violations are hard errors, never silently clamped: the upstream
//! form already enforces these bounds, so a violation here means a caller
//! bypassed validation and the computation must not produce garbage totals.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while deriving an invoice ledger.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Discount percent must be between 0 and 100, item or invoice level.
    #[error("Discount percent must be between 0 and 100, got {value}")]
    DiscountOutOfRange {
        /// The offending value.
        value: Decimal,
    },

    /// Unit price cannot be negative.
    #[error("Unit price cannot be negative")]
    NegativeUnitPrice,

    /// Quantity must be at least 1.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// Deposit cannot be negative.
    #[error("Deposit cannot be negative")]
    NegativeDeposit,
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DiscountOutOfRange { .. } => "DISCOUNT_OUT_OF_RANGE",
            Self::NegativeUnitPrice => "NEGATIVE_UNIT_PRICE",
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::NegativeDeposit => "NEGATIVE_DEPOSIT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        // Every billing error is a caller-side validation failure.
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BillingError::DiscountOutOfRange { value: dec!(120) }.error_code(),
            "DISCOUNT_OUT_OF_RANGE"
        );
        assert_eq!(
            BillingError::NegativeUnitPrice.error_code(),
            "NEGATIVE_UNIT_PRICE"
        );
        assert_eq!(BillingError::ZeroQuantity.error_code(), "ZERO_QUANTITY");
        assert_eq!(
            BillingError::NegativeDeposit.error_code(),
            "NEGATIVE_DEPOSIT"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            BillingError::DiscountOutOfRange { value: dec!(-1) }.http_status_code(),
            400
        );
        assert_eq!(BillingError::NegativeDeposit.http_status_code(), 400);
    }

    #[test]
    fn test_error_display() {
        let err = BillingError::DiscountOutOfRange { value: dec!(120.5) };
        assert_eq!(
            err.to_string(),
            "Discount percent must be between 0 and 100, got 120.5"
        );
    }
}

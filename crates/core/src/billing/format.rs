//! Display rounding and currency formatting.
//!
//! Internal arithmetic keeps full precision; rounding happens only at the
//! display edge so many small line items cannot accumulate rounding error.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to 2 decimal places for display.
#[must_use]
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as a currency string: `$` prefix, fixed 2 decimals.
///
/// Negative amounts keep the sign after the symbol (`$-12.00`), matching
/// what the print layout has always shown for overpaid invoices.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("${:.2}", round_display(amount))
}

/// Formats a discount percent with 1 decimal place and a `%` suffix.
#[must_use]
pub fn format_percent(percent: Decimal) -> String {
    format!(
        "{:.1}%",
        percent.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_display() {
        assert_eq!(round_display(dec!(1234.5)), dec!(1234.50));
        assert_eq!(round_display(dec!(0.005)), dec!(0.01));
        assert_eq!(round_display(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_display(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(1234.5)), "$1234.50");
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(75)), "$75.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-12)), "$-12.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(10)), "10.0%");
        assert_eq!(format_percent(dec!(12.55)), "12.6%");
    }
}

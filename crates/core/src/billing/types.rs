//! Billing domain types.
//!
//! A `LineItem` is the snapshot of a service or product at the moment it was
//! attached to an invoice; the catalog price may change later without
//! affecting issued invoices. The `Ledger` carries the figures derived from
//! those snapshots plus the invoice-level discount and deposit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::format::round_display;

/// One billable service or product attached to an invoice.
///
/// Prices are captured at attachment time and never re-read from the
/// catalog, so historical invoices keep the prices they were issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Price per unit at attachment time.
    pub unit_price: Decimal,
    /// Number of units (at least 1).
    pub quantity: u32,
    /// Item-level discount in percent, 0 to 100.
    pub discount_percent: Decimal,
}

impl LineItem {
    /// Creates a new line item snapshot.
    #[must_use]
    pub const fn new(unit_price: Decimal, quantity: u32, discount_percent: Decimal) -> Self {
        Self {
            unit_price,
            quantity,
            discount_percent,
        }
    }

    /// The item's contribution to the subtotal after its own discount.
    #[must_use]
    pub fn net_price(&self) -> Decimal {
        self.unit_price
            * Decimal::from(self.quantity)
            * (Decimal::ONE - self.discount_percent / Decimal::ONE_HUNDRED)
    }
}

/// Payment status of an invoice, derived from current data on every read.
///
/// There is no stored status field: the status is always a function of the
/// computed total and the deposit, so it cannot go stale after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No line items contribute value (total is zero), regardless of deposit.
    Empty,
    /// The total is positive and the deposit does not cover it.
    Pending,
    /// The total is positive and the deposit covers it (possibly over).
    Paid,
}

impl PaymentStatus {
    /// Derives the status from a computed total and the deposit paid so far.
    #[must_use]
    pub fn derive(total: Decimal, deposit: Decimal) -> Self {
        if total <= Decimal::ZERO {
            Self::Empty
        } else if total - deposit <= Decimal::ZERO {
            Self::Paid
        } else {
            Self::Pending
        }
    }

    /// Returns true if a further payment is expected.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the deposit covers the total.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Lowercase wire representation, matching the serde encoding.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Unknown payment status: {s}")),
        }
    }
}

/// Derived financial figures for one invoice.
///
/// All fields are full-precision; use [`Ledger::rounded`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ledger {
    /// Sum of all line item net prices before the invoice-level discount.
    pub subtotal: Decimal,
    /// Amount removed by the invoice-level discount.
    pub discount_amount: Decimal,
    /// Final amount owed: `subtotal - discount_amount`.
    pub total: Decimal,
    /// Remaining unpaid amount: `total - deposit`. Negative when overpaid.
    pub balance_due: Decimal,
}

impl Ledger {
    /// The ledger of an invoice with no line items.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            balance_due: Decimal::ZERO,
        }
    }

    /// The deposit this ledger was computed against.
    #[must_use]
    pub fn deposit(&self) -> Decimal {
        self.total - self.balance_due
    }

    /// Payment status for this ledger.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::derive(self.total, self.deposit())
    }

    /// A copy with every figure rounded to 2 decimal places for display.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_display(self.subtotal),
            discount_amount: round_display(self.discount_amount),
            total: round_display(self.total),
            balance_due: round_display(self.balance_due),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_net_price_no_discount() {
        let item = LineItem::new(dec!(100), 2, dec!(0));
        assert_eq!(item.net_price(), dec!(200));
    }

    #[test]
    fn test_net_price_with_discount() {
        let item = LineItem::new(dec!(100), 1, dec!(25));
        assert_eq!(item.net_price(), dec!(75));
    }

    #[test]
    fn test_net_price_full_discount() {
        let item = LineItem::new(dec!(50), 3, dec!(100));
        assert_eq!(item.net_price(), dec!(0));
    }

    #[rstest]
    #[case(dec!(0), dec!(0), PaymentStatus::Empty)]
    #[case(dec!(0), dec!(500), PaymentStatus::Empty)]
    #[case(dec!(180), dec!(0), PaymentStatus::Pending)]
    #[case(dec!(180), dec!(50), PaymentStatus::Pending)]
    #[case(dec!(180), dec!(180), PaymentStatus::Paid)]
    #[case(dec!(180), dec!(200), PaymentStatus::Paid)]
    fn test_status_derivation(
        #[case] total: Decimal,
        #[case] deposit: Decimal,
        #[case] expected: PaymentStatus,
    ) {
        assert_eq!(PaymentStatus::derive(total, deposit), expected);
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            PaymentStatus::Empty,
            PaymentStatus::Pending,
            PaymentStatus::Paid,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
        assert!("overdue".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_ledger_deposit_reconstruction() {
        let ledger = Ledger {
            subtotal: dec!(200),
            discount_amount: dec!(20),
            total: dec!(180),
            balance_due: dec!(130),
        };
        assert_eq!(ledger.deposit(), dec!(50));
        assert_eq!(ledger.status(), PaymentStatus::Pending);
    }

    #[test]
    fn test_ledger_rounded() {
        let ledger = Ledger {
            subtotal: dec!(10.005),
            discount_amount: dec!(1.0005),
            total: dec!(9.0045),
            balance_due: dec!(9.0045),
        };
        let rounded = ledger.rounded();
        assert_eq!(rounded.subtotal, dec!(10.01));
        assert_eq!(rounded.discount_amount, dec!(1.00));
        assert_eq!(rounded.total, dec!(9.00));
    }

    #[test]
    fn test_empty_ledger_status() {
        assert_eq!(Ledger::empty().status(), PaymentStatus::Empty);
    }
}

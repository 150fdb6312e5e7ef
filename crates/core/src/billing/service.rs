//! Ledger calculator.

use rust_decimal::Decimal;

use super::error::BillingError;
use super::types::{Ledger, LineItem};

/// Pure derivation of financial figures from an invoice's current data.
///
/// No I/O, no hidden state: identical input always yields an identical
/// ledger, so consumers can recompute freely instead of caching.
pub struct LedgerCalculator;

impl LedgerCalculator {
    /// Derives the ledger for one invoice.
    ///
    /// Item order does not matter; the subtotal is a plain sum. All
    /// arithmetic is full-precision `Decimal`; rounding is left to the
    /// display edge via [`Ledger::rounded`].
    ///
    /// # Errors
    ///
    /// Returns `BillingError` when a discount percent falls outside
    /// `[0, 100]`, a unit price or the deposit is negative, or a quantity
    /// is zero. Out-of-range values are rejected, never clamped.
    pub fn compute(
        items: &[LineItem],
        discount_percent: Decimal,
        deposit: Decimal,
    ) -> Result<Ledger, BillingError> {
        Self::validate_discount_percent(discount_percent)?;
        Self::validate_deposit(deposit)?;

        let mut subtotal = Decimal::ZERO;
        for item in items {
            Self::validate_line_item(item)?;
            subtotal += item.net_price();
        }

        let discount_amount = subtotal * (discount_percent / Decimal::ONE_HUNDRED);
        let total = subtotal - discount_amount;

        Ok(Ledger {
            subtotal,
            discount_amount,
            total,
            balance_due: total - deposit,
        })
    }

    /// The deposit value that settles an invoice in full.
    ///
    /// "Mark as paid" is exactly `deposit := total`; on an overpaid invoice
    /// this normalizes the balance back to zero.
    #[must_use]
    pub const fn settlement_deposit(ledger: &Ledger) -> Decimal {
        ledger.total
    }

    /// Checks a discount percent against the `[0, 100]` bound.
    ///
    /// Shared by the calculator and the write path so a value that would
    /// fail at read time is rejected before it is ever persisted.
    pub fn validate_discount_percent(value: Decimal) -> Result<(), BillingError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(BillingError::DiscountOutOfRange { value });
        }
        Ok(())
    }

    /// Checks that a deposit is non-negative.
    pub fn validate_deposit(value: Decimal) -> Result<(), BillingError> {
        if value < Decimal::ZERO {
            return Err(BillingError::NegativeDeposit);
        }
        Ok(())
    }

    /// Checks one line item snapshot.
    pub fn validate_line_item(item: &LineItem) -> Result<(), BillingError> {
        if item.unit_price < Decimal::ZERO {
            return Err(BillingError::NegativeUnitPrice);
        }
        if item.quantity == 0 {
            return Err(BillingError::ZeroQuantity);
        }
        Self::validate_discount_percent(item.discount_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::PaymentStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_invoice() {
        let ledger = LedgerCalculator::compute(&[], dec!(0), dec!(0)).unwrap();
        assert_eq!(ledger.subtotal, dec!(0));
        assert_eq!(ledger.discount_amount, dec!(0));
        assert_eq!(ledger.total, dec!(0));
        assert_eq!(ledger.balance_due, dec!(0));
        assert_eq!(ledger.status(), PaymentStatus::Empty);
    }

    #[test]
    fn test_single_item_no_discounts() {
        let items = [LineItem::new(dec!(100), 2, dec!(0))];
        let ledger = LedgerCalculator::compute(&items, dec!(0), dec!(0)).unwrap();
        assert_eq!(ledger.subtotal, dec!(200));
        assert_eq!(ledger.total, dec!(200));
        assert_eq!(ledger.status(), PaymentStatus::Pending);
    }

    #[test]
    fn test_invoice_discount_applied_after_subtotal() {
        let items = [
            LineItem::new(dec!(100), 1, dec!(0)),
            LineItem::new(dec!(200), 1, dec!(50)),
        ];
        let ledger = LedgerCalculator::compute(&items, dec!(10), dec!(0)).unwrap();
        assert_eq!(ledger.subtotal, dec!(200));
        assert_eq!(ledger.discount_amount, dec!(20));
        assert_eq!(ledger.total, dec!(180));
    }

    #[test]
    fn test_deposit_fully_covers_total() {
        let items = [LineItem::new(dec!(180), 1, dec!(0))];
        let ledger = LedgerCalculator::compute(&items, dec!(0), dec!(180)).unwrap();
        assert_eq!(ledger.balance_due, dec!(0));
        assert_eq!(ledger.status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_deposit_partially_covers_total() {
        let items = [LineItem::new(dec!(180), 1, dec!(0))];
        let ledger = LedgerCalculator::compute(&items, dec!(0), dec!(50)).unwrap();
        assert_eq!(ledger.balance_due, dec!(130));
        assert_eq!(ledger.status(), PaymentStatus::Pending);
    }

    #[test]
    fn test_overpayment_reports_negative_balance_as_is() {
        let items = [LineItem::new(dec!(100), 1, dec!(0))];
        let ledger = LedgerCalculator::compute(&items, dec!(0), dec!(150)).unwrap();
        assert_eq!(ledger.balance_due, dec!(-50));
        assert_eq!(ledger.status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_zero_items_never_pending_or_paid() {
        let ledger = LedgerCalculator::compute(&[], dec!(0), dec!(500)).unwrap();
        assert_eq!(ledger.status(), PaymentStatus::Empty);
    }

    #[test]
    fn test_full_precision_internally() {
        // 3 × $0.333 = $0.999: no per-item rounding may creep in.
        let items = [
            LineItem::new(dec!(0.333), 1, dec!(0)),
            LineItem::new(dec!(0.333), 1, dec!(0)),
            LineItem::new(dec!(0.333), 1, dec!(0)),
        ];
        let ledger = LedgerCalculator::compute(&items, dec!(0), dec!(0)).unwrap();
        assert_eq!(ledger.subtotal, dec!(0.999));
        assert_eq!(ledger.rounded().subtotal, dec!(1.00));
    }

    #[test]
    fn test_invoice_discount_out_of_range() {
        let err = LedgerCalculator::compute(&[], dec!(100.01), dec!(0)).unwrap_err();
        assert!(matches!(err, BillingError::DiscountOutOfRange { .. }));

        let err = LedgerCalculator::compute(&[], dec!(-1), dec!(0)).unwrap_err();
        assert!(matches!(err, BillingError::DiscountOutOfRange { .. }));
    }

    #[test]
    fn test_item_discount_out_of_range() {
        let items = [LineItem::new(dec!(10), 1, dec!(150))];
        let err = LedgerCalculator::compute(&items, dec!(0), dec!(0)).unwrap_err();
        assert!(matches!(
            err,
            BillingError::DiscountOutOfRange { value } if value == dec!(150)
        ));
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let items = [LineItem::new(dec!(-10), 1, dec!(0))];
        let err = LedgerCalculator::compute(&items, dec!(0), dec!(0)).unwrap_err();
        assert!(matches!(err, BillingError::NegativeUnitPrice));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let items = [LineItem::new(dec!(10), 0, dec!(0))];
        let err = LedgerCalculator::compute(&items, dec!(0), dec!(0)).unwrap_err();
        assert!(matches!(err, BillingError::ZeroQuantity));
    }

    #[test]
    fn test_negative_deposit_rejected() {
        let err = LedgerCalculator::compute(&[], dec!(0), dec!(-5)).unwrap_err();
        assert!(matches!(err, BillingError::NegativeDeposit));
    }

    #[test]
    fn test_mark_as_paid_round_trip() {
        let items = [LineItem::new(dec!(60), 3, dec!(10))];
        let pending = LedgerCalculator::compute(&items, dec!(0), dec!(0)).unwrap();
        assert_eq!(pending.status(), PaymentStatus::Pending);

        let settled = LedgerCalculator::compute(
            &items,
            dec!(0),
            LedgerCalculator::settlement_deposit(&pending),
        )
        .unwrap();
        assert_eq!(settled.status(), PaymentStatus::Paid);
        assert_eq!(settled.balance_due, dec!(0));
    }

    #[test]
    fn test_paid_reverts_to_pending_when_items_grow() {
        let items = [LineItem::new(dec!(100), 1, dec!(0))];
        let paid = LedgerCalculator::compute(&items, dec!(0), dec!(100)).unwrap();
        assert_eq!(paid.status(), PaymentStatus::Paid);

        let grown = [
            LineItem::new(dec!(100), 1, dec!(0)),
            LineItem::new(dec!(40), 1, dec!(0)),
        ];
        let reopened = LedgerCalculator::compute(&grown, dec!(0), dec!(100)).unwrap();
        assert_eq!(reopened.status(), PaymentStatus::Pending);
        assert_eq!(reopened.balance_due, dec!(40));
    }
}

//! Property-based tests for ledger derivation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::LedgerCalculator;
use super::types::{LineItem, PaymentStatus};

/// Strategy for amounts between $0.00 and $100,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for discount percents between 0.00 and 100.00.
fn percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy for quantities between 1 and 50.
fn quantity() -> impl Strategy<Value = u32> {
    1u32..=50
}

/// Strategy for a single valid line item.
fn line_item() -> impl Strategy<Value = LineItem> {
    (amount(), quantity(), percent())
        .prop_map(|(unit_price, quantity, discount)| LineItem::new(unit_price, quantity, discount))
}

/// Strategy for a possibly-empty list of line items.
fn line_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_item(), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Identical input always yields an identical ledger.
    #[test]
    fn prop_compute_is_idempotent(
        items in line_items(),
        discount in percent(),
        deposit in amount(),
    ) {
        let first = LedgerCalculator::compute(&items, discount, deposit).unwrap();
        let second = LedgerCalculator::compute(&items, discount, deposit).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Permuting the items does not change any figure.
    #[test]
    fn prop_item_order_is_irrelevant(
        items in line_items(),
        discount in percent(),
        deposit in amount(),
    ) {
        let forward = LedgerCalculator::compute(&items, discount, deposit).unwrap();

        let mut reversed = items.clone();
        reversed.reverse();
        let backward = LedgerCalculator::compute(&reversed, discount, deposit).unwrap();

        prop_assert_eq!(forward, backward);

        let mut rotated = items;
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }
        let shifted = LedgerCalculator::compute(&rotated, discount, deposit).unwrap();
        prop_assert_eq!(forward, shifted);
    }

    /// Subtotal is exactly the sum of per-item net prices.
    #[test]
    fn prop_subtotal_is_sum_of_net_prices(
        items in line_items(),
        deposit in amount(),
    ) {
        let ledger = LedgerCalculator::compute(&items, Decimal::ZERO, deposit).unwrap();
        let expected: Decimal = items.iter().map(LineItem::net_price).sum();
        prop_assert_eq!(ledger.subtotal, expected);
    }

    /// Internal consistency: total and balance relate the figures exactly.
    #[test]
    fn prop_ledger_figures_are_consistent(
        items in line_items(),
        discount in percent(),
        deposit in amount(),
    ) {
        let ledger = LedgerCalculator::compute(&items, discount, deposit).unwrap();
        prop_assert_eq!(ledger.total, ledger.subtotal - ledger.discount_amount);
        prop_assert_eq!(ledger.balance_due, ledger.total - deposit);
        prop_assert_eq!(ledger.deposit(), deposit);
    }

    /// Settling via `deposit := total` always lands on Paid (or Empty for
    /// a zero-value invoice) with a zero balance.
    #[test]
    fn prop_mark_as_paid_settles_in_full(
        items in line_items(),
        discount in percent(),
    ) {
        let open = LedgerCalculator::compute(&items, discount, Decimal::ZERO).unwrap();
        let settled = LedgerCalculator::compute(
            &items,
            discount,
            LedgerCalculator::settlement_deposit(&open),
        )
        .unwrap();

        prop_assert_eq!(settled.balance_due, Decimal::ZERO);
        if open.total > Decimal::ZERO {
            prop_assert_eq!(settled.status(), PaymentStatus::Paid);
        } else {
            prop_assert_eq!(settled.status(), PaymentStatus::Empty);
        }
    }

    /// An invoice without items is Empty no matter the deposit.
    #[test]
    fn prop_no_items_is_always_empty(
        discount in percent(),
        deposit in amount(),
    ) {
        let ledger = LedgerCalculator::compute(&[], discount, deposit).unwrap();
        prop_assert_eq!(ledger.status(), PaymentStatus::Empty);
    }

    /// Display rounding never moves a figure by more than half a cent.
    #[test]
    fn prop_rounding_stays_within_half_cent(
        items in line_items(),
        discount in percent(),
        deposit in amount(),
    ) {
        let ledger = LedgerCalculator::compute(&items, discount, deposit).unwrap();
        let rounded = ledger.rounded();
        let half_cent = Decimal::new(5, 3);
        prop_assert!((ledger.subtotal - rounded.subtotal).abs() <= half_cent);
        prop_assert!((ledger.total - rounded.total).abs() <= half_cent);
        prop_assert!((ledger.balance_due - rounded.balance_due).abs() <= half_cent);
    }

    /// Status partitions: exactly one of the three states holds.
    #[test]
    fn prop_status_matches_balance_sign(
        items in line_items(),
        discount in percent(),
        deposit in amount(),
    ) {
        let ledger = LedgerCalculator::compute(&items, discount, deposit).unwrap();
        match ledger.status() {
            PaymentStatus::Empty => prop_assert_eq!(ledger.total, Decimal::ZERO),
            PaymentStatus::Paid => {
                prop_assert!(ledger.total > Decimal::ZERO);
                prop_assert!(ledger.balance_due <= Decimal::ZERO);
            }
            PaymentStatus::Pending => {
                prop_assert!(ledger.total > Decimal::ZERO);
                prop_assert!(ledger.balance_due > Decimal::ZERO);
            }
        }
    }
}

//! Invoice ledger derivation.
//!
//! This module implements the financial core of the system:
//! - Line items as immutable price snapshots
//! - Ledger derivation (subtotal, discount, total, balance due)
//! - Payment status as a pure function of current data
//! - Display rounding and currency formatting
//! - Error types for billing operations
//!
//! Derived figures are never persisted; every consumer recomputes them from
//! the raw inputs so totals and status cannot go stale after an edit.

pub mod error;
pub mod format;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::BillingError;
pub use format::{format_currency, format_percent, round_display};
pub use service::LedgerCalculator;
pub use types::{Ledger, LineItem, PaymentStatus};

//! Core billing logic for VetBill.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `billing` - Invoice ledger derivation and payment status

pub mod billing;

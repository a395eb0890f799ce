//! Core business logic - framework-agnostic catalog, ledgers and checkout.
//!
//! Nothing in here knows about Discord; the bot layer and the message listener are thin
//! shims over [`checkout::Shop`].

/// Shared-secret admin gate
pub mod admin;
/// Read-only product catalog
pub mod catalog;
/// Checkout orchestration and the `Shop` facade
pub mod checkout;
/// Text order command parser
pub mod command;
/// Order ledger and CSV export
pub mod order;
/// Totals, discounts and rounding
pub mod pricing;
/// Promo code ledger
pub mod promo;
/// Lock-scoped JSON file store
pub mod store;

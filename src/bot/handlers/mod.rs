//! Discord interaction handlers
//!
//! Autocomplete for command parameters and the plain-message order listener.

/// Autocomplete handlers for product names
pub mod autocomplete;
/// `!order` message listener
pub mod listener;

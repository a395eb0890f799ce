//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Admin commands (password protected)
pub mod admin;

/// General utility commands
pub mod general;

/// Catalog, quote and order commands
pub mod order;

// Export commands
pub use admin::*;
pub use general::*;
pub use order::*;

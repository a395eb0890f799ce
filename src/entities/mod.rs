//! Entity module - Records persisted in the shop's JSON files.
//! Each entity is a plain serde struct; the ledgers in `core` own reading and writing them.

pub mod order;
pub mod product;
pub mod promo;

pub use order::Order;
pub use product::{Product, RawPrice};
pub use promo::{PromoCode, PromoEntry};

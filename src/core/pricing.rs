//! Pricing rules - gross totals, discounts and rounding.
//!
//! Amounts are kept in cents. The ledgers store them as JSON numbers that are read back
//! through `f64`, so every amount written must stay below [`AMOUNT_LIMIT`] to survive a
//! reload unchanged.

use rust_decimal::{Decimal, RoundingStrategy};

/// Exclusive upper bound for stored amounts (10^13, i.e. 15 significant digits in cents).
pub const AMOUNT_LIMIT: i64 = 10_000_000_000_000;

/// Rounds a money amount to cents, halves away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// True when the amount can be written to a ledger and read back exactly.
#[must_use]
pub fn is_storable(amount: Decimal) -> bool {
    amount.abs() < Decimal::from(AMOUNT_LIMIT)
}

/// `unit_price * quantity`, rounded to cents. `None` if the product overflows.
#[must_use]
pub fn gross_total(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round_money)
}

/// Applies a discount without ever going below zero.
#[must_use]
pub fn apply_discount(gross: Decimal, discount: Decimal) -> Decimal {
    round_money((gross - discount).max(Decimal::ZERO))
}

/// Totals for one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Price per unit, in cents
    pub unit_price: Decimal,
    /// Before discount
    pub gross: Decimal,
    /// After discount
    pub net: Decimal,
}

impl Totals {
    /// Prices `quantity` units at `unit_price`, rounded to cents, with no discount.
    ///
    /// Returns `None` when the gross total overflows or is not storable.
    #[must_use]
    pub fn compute(unit_price: Decimal, quantity: u32) -> Option<Self> {
        let unit_price = round_money(unit_price);
        let gross = gross_total(unit_price, quantity).filter(|gross| is_storable(*gross))?;
        Some(Self {
            unit_price,
            gross,
            net: gross,
        })
    }

    /// Takes `discount` off the gross total if one applies.
    #[must_use]
    pub fn with_discount(self, discount: Option<Decimal>) -> Self {
        Self {
            net: discount.map_or(self.gross, |d| apply_discount(self.gross, d)),
            ..self
        }
    }
}

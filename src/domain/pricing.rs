//! Pricing rules shared across cart, checkout and order building.

use rust_decimal::{Decimal, RoundingStrategy};

/// Flat tax applied to the merchandise subtotal.
pub fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Shipping charge used until a shipping method has been selected.
///
/// Totals are always computed with this one rule so every surface
/// (cart summary, review step, order record) agrees: the selected
/// method's price once set, this flat default otherwise.
pub fn default_shipping_price() -> Decimal {
    Decimal::new(599, 2)
}

/// Rounds a monetary amount to two decimals for display and order records.
pub fn display_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

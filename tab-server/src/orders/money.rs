//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are snapshotted onto line items rounded to 2 decimal places
//! (half-up). Totals are exact sums of exact products and are always
//! recomputed from the item list, never adjusted by delta.

use super::traits::OrderError;
use rust_decimal::prelude::*;
use shared::order::{LineItem, Order};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: u32 = 9999;

/// Round a price to 2 decimal places, midpoint away from zero
#[inline]
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a unit price before it is written to a line
pub fn validate_price(price: Decimal) -> Result<(), OrderError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(OrderError::validation(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::validation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate a line quantity
pub fn validate_quantity(quantity: u32) -> Result<(), OrderError> {
    if quantity == 0 {
        return Err(OrderError::validation("quantity must be at least 1"));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Σ price × quantity over the given lines
pub fn items_total(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Recompute `total_amount` from the order's current items
pub fn recalculate_totals(order: &mut Order) {
    order.total_amount = items_total(&order.items);
}

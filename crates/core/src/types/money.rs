//! Decimal money arithmetic for canonical orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Financial totals of an order.
///
/// `total` is always computed from the components as
/// `subtotal + shipping + tax - discount`, never copied from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line items before shipping, tax and discounts.
    pub subtotal: Decimal,
    /// Shipping charges.
    pub shipping: Decimal,
    /// Tax charged.
    pub tax: Decimal,
    /// Discounts applied (a positive amount).
    pub discount: Decimal,
    /// Computed grand total.
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals from their components.
    #[must_use]
    pub fn compute(subtotal: Decimal, shipping: Decimal, tax: Decimal, discount: Decimal) -> Self {
        let discount = discount.abs();
        Self {
            subtotal,
            shipping,
            tax,
            discount,
            total: round_money(subtotal + shipping + tax - discount),
        }
    }

    /// Totals of an order with no charges.
    #[must_use]
    pub fn zero() -> Self {
        Self::compute(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }
}

/// Round an amount to two decimal places (banker's rounding).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

//! Money rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` kept at two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places stored for every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] places.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true when the amount is representable at [`MONEY_SCALE`] places.
///
/// Trailing zeros are ignored, so `10.500` fits but `10.005` does not.
#[must_use]
pub fn fits_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

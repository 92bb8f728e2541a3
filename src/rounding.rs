//! Deterministic decimal rounding used for every money and ratio field.

use rust_decimal::RoundingStrategy;

use crate::types::Money;

/// Decimal places kept on money values.
pub const MONEY_PRECISION: u32 = 2;
/// Decimal places kept on allocation fractions and returns.
pub const RATIO_PRECISION: u32 = 4;

/// Rounds half away from zero (2.345 -> 2.35, -2.345 -> -2.35).
pub fn round(value: Money, precision: u32) -> Money {
    value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_money(value: Money) -> Money {
    round(value, MONEY_PRECISION)
}

pub fn round_ratio(value: Money) -> Money {
    round(value, RATIO_PRECISION)
}

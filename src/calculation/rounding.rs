//! Rounding policy shared by every monetary calculation.
//!
//! All amounts are rounded to whole minor units with round-half-up. Amounts
//! reaching this module are never negative, so half-up coincides with
//! rounding half away from zero. Banker's rounding is not used.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{MINOR_UNIT_SCALE, Money};

/// The strategy applied when rounding to minor units.
pub const ROUNDING_STRATEGY: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Rounds a major-unit decimal to the nearest minor unit, half up.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::round_to_minor_units;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rounded = round_to_minor_units(Decimal::from_str("0.125").unwrap()).unwrap();
/// assert_eq!(rounded.minor_units(), 13);
/// ```
pub fn round_to_minor_units(amount: Decimal) -> EngineResult<Money> {
    let rounded = amount.round_dp_with_strategy(MINOR_UNIT_SCALE, ROUNDING_STRATEGY);
    Money::try_from(rounded).map_err(|_| EngineError::CalculationError {
        message: format!("{} cannot be represented as a monetary amount", amount),
    })
}

/// Multiplies `amount` by `rate` and rounds the product to minor units.
pub fn apply_rate(amount: Money, rate: Decimal) -> EngineResult<Money> {
    let product = amount
        .to_decimal()
        .checked_mul(rate)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("{} x {} overflows", amount, rate),
        })?;
    round_to_minor_units(product)
}

//! Fixed-point monetary amounts.
//!
//! [`Money`] stores currency as a whole number of minor units (cents) so
//! sums across a pay run never drift the way binary floating point does.

use std::fmt;
use std::ops::Sub;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Number of fractional digits in the currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// A monetary amount in minor units of the configured currency.
///
/// The value is signed so ledger arithmetic (residuals, adjustments) can be
/// expressed, but gross salary, tax and contributions are never negative:
/// the calculators reject negative inputs instead of producing them.
///
/// Serialized as a decimal string with two fractional digits.
///
/// There is no unchecked `+`: totals go through [`Money::try_add`] or
/// [`Money::try_sum`], which report overflow as an error.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::Money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let salary = Money::try_from(Decimal::from_str("1000.00").unwrap()).unwrap();
/// assert_eq!(salary.minor_units(), 100_000);
/// assert_eq!(salary.to_string(), "1000.00");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from a count of minor units (cents).
    pub const fn from_minor_units(minor_units: i64) -> Self {
        Money(minor_units)
    }

    /// Returns the amount as a count of minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns the amount in major units as an exact decimal.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// Returns true if the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if the amount is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts two amounts, returning `None` on overflow.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Adds two amounts, failing with [`EngineError::CalculationError`] on
    /// overflow. `what` names the total in the error message.
    pub fn try_add(self, other: Money, what: &str) -> EngineResult<Money> {
        self.checked_add(other).ok_or_else(|| overflow(what))
    }

    /// Sums amounts, failing with [`EngineError::CalculationError`] on
    /// overflow.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_ledger::models::Money;
    ///
    /// let total = Money::try_sum([Money::from_minor_units(150), Money::from_minor_units(250)], "debit")
    ///     .unwrap();
    /// assert_eq!(total, Money::from_minor_units(400));
    ///
    /// assert!(Money::try_sum([Money::from_minor_units(i64::MAX), Money::from_minor_units(1)], "debit").is_err());
    /// ```
    pub fn try_sum<I>(amounts: I, what: &str) -> EngineResult<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |total, amount| total.try_add(amount, what))
    }
}

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} total overflows", what),
    }
}

impl TryFrom<Decimal> for Money {
    type Error = EngineError;

    /// Converts a major-unit decimal into minor units.
    ///
    /// Values carrying fractions of a minor unit are rejected rather than
    /// rounded; rounding belongs to the calculators.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let scaled = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| EngineError::invalid_input("amount", "amount is out of range"))?;

        if !scaled.fract().is_zero() {
            return Err(EngineError::invalid_input(
                "amount",
                format!("{} has more than {} fractional digits", value, MINOR_UNIT_SCALE),
            ));
        }

        scaled
            .to_i64()
            .map(Money)
            .ok_or_else(|| EngineError::invalid_input("amount", "amount is out of range"))
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_try_from_decimal_whole_cents() {
        let money = Money::try_from(dec("1234.56")).unwrap();
        assert_eq!(money.minor_units(), 123_456);
    }

    #[test]
    fn test_try_from_decimal_without_fraction() {
        let money = Money::try_from(dec("500")).unwrap();
        assert_eq!(money.minor_units(), 50_000);
        assert_eq!(money.to_string(), "500.00");
    }

    #[test]
    fn test_try_from_decimal_rejects_fractional_cents() {
        let result = Money::try_from(dec("10.005"));
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_try_from_decimal_keeps_sign() {
        let money = Money::try_from(dec("-1.00")).unwrap();
        assert!(money.is_negative());
        assert_eq!(money.minor_units(), -100);
    }

    #[test]
    fn test_serializes_as_two_digit_string() {
        let json = serde_json::to_string(&Money::from_minor_units(91_000)).unwrap();
        assert_eq!(json, "\"910.00\"");
    }

    #[test]
    fn test_deserializes_from_string() {
        let money: Money = serde_json::from_str("\"12.30\"").unwrap();
        assert_eq!(money, Money::from_minor_units(1_230));
    }

    #[test]
    fn test_deserialize_rejects_fractional_cents() {
        let result: Result<Money, _> = serde_json::from_str("\"0.001\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_minor_units(100);
        let b = Money::from_minor_units(250);
        assert_eq!(a.try_add(b, "test").unwrap(), Money::from_minor_units(350));
        assert_eq!(b - a, Money::from_minor_units(150));

        let total = Money::try_sum([a, b, a], "test").unwrap();
        assert_eq!(total, Money::from_minor_units(450));
    }

    #[test]
    fn test_try_sum_reports_overflow() {
        let half = Money::from_minor_units(i64::MAX / 2 + 1);
        match Money::try_sum([half, half], "debit") {
            Err(EngineError::CalculationError { message }) => {
                assert_eq!(message, "debit total overflows")
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }

    #[test]
    fn test_checked_add_overflow() {
        assert!(Money::from_minor_units(i64::MAX)
            .checked_add(Money::from_minor_units(1))
            .is_none());
    }
}

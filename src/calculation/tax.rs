//! Wage income tax calculation.
//!
//! This module applies a residency's bracket table to a gross salary. Each
//! bracket taxes only the slice of income inside it, and the summed tax is
//! rounded once, half up, to whole minor units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{Money, ResidencyStatus};

use super::rounding::round_to_minor_units;

/// The tax owed on the slice of income falling inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketPortion {
    /// Inclusive lower bound of the bracket.
    pub lower_bound: Money,
    /// Exclusive upper bound of the bracket, `None` if unbounded.
    pub upper_bound: Option<Money>,
    /// Marginal rate of the bracket.
    pub rate: Decimal,
    /// The part of gross salary taxed in this bracket.
    pub taxable_amount: Money,
    /// `taxable_amount * rate`, before rounding.
    pub tax: Decimal,
}

/// How a tax figure was derived, bracket by bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// The residency whose table was applied.
    pub residency: ResidencyStatus,
    /// The gross salary taxed.
    pub gross_salary: Money,
    /// One portion per bracket the salary reaches into.
    pub portions: Vec<BracketPortion>,
    /// Sum of the portions' tax before rounding.
    pub unrounded_tax: Decimal,
    /// The tax owed, rounded half up to minor units.
    pub tax: Money,
}

/// Rejects a negative monetary input.
pub(crate) fn ensure_non_negative(field: &str, amount: Money) -> EngineResult<()> {
    if amount.is_negative() {
        return Err(EngineError::invalid_input(
            field,
            format!("{} must not be negative", amount),
        ));
    }
    Ok(())
}

/// Computes the tax owed with a per-bracket breakdown.
///
/// For every bracket whose lower bound is strictly below `gross_salary`,
/// the slice `min(gross, upper) - lower` is taxed at the bracket's rate.
/// Income exactly equal to a boundary therefore stays in the lower bracket.
/// A flat schedule is a single bracket from zero, so all income is taxed.
///
/// # Errors
///
/// - [`EngineError::Configuration`] if `tables` fails [`TaxTables::validate`].
/// - [`EngineError::InvalidInput`] if `gross_salary` is negative.
pub fn compute_tax_breakdown(
    gross_salary: Money,
    residency: ResidencyStatus,
    tables: &TaxTables,
) -> EngineResult<TaxBreakdown> {
    tables.validate()?;
    breakdown_with_valid_tables(gross_salary, residency, tables)
}

/// [`compute_tax_breakdown`] for tables already validated by
/// [`PayrollConfig::new`](crate::config::PayrollConfig::new).
pub(crate) fn breakdown_with_valid_tables(
    gross_salary: Money,
    residency: ResidencyStatus,
    tables: &TaxTables,
) -> EngineResult<TaxBreakdown> {
    ensure_non_negative("gross_salary", gross_salary)?;

    let portions: Vec<BracketPortion> = tables
        .for_residency(residency)
        .iter()
        .filter(|bracket| gross_salary > bracket.lower_bound)
        .map(|bracket| {
            let taxable_amount = bracket.taxable_portion(gross_salary);
            BracketPortion {
                lower_bound: bracket.lower_bound,
                upper_bound: bracket.upper_bound,
                rate: bracket.rate,
                taxable_amount,
                tax: taxable_amount.to_decimal() * bracket.rate,
            }
        })
        .collect();

    let unrounded_tax: Decimal = portions.iter().map(|p| p.tax).sum();
    let tax = round_to_minor_units(unrounded_tax)?;

    debug!(
        gross = %gross_salary,
        residency = %residency,
        brackets = portions.len(),
        tax = %tax,
        "Computed wage income tax"
    );

    Ok(TaxBreakdown {
        residency,
        gross_salary,
        portions,
        unrounded_tax,
        tax,
    })
}

/// Computes the wage income tax owed on `gross_salary`.
///
/// # Errors
///
/// - [`EngineError::Configuration`] if `tables` fails [`TaxTables::validate`].
/// - [`EngineError::InvalidInput`] if `gross_salary` is negative.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::compute_tax;
/// use payroll_ledger::config::{TaxBracket, TaxTables};
/// use payroll_ledger::models::{Money, ResidencyStatus};
/// use rust_decimal::Decimal;
///
/// let tables = TaxTables {
///     resident: vec![
///         TaxBracket {
///             lower_bound: Money::ZERO,
///             upper_bound: Some(Money::from_minor_units(50_000)),
///             rate: Decimal::ZERO,
///         },
///         TaxBracket {
///             lower_bound: Money::from_minor_units(50_000),
///             upper_bound: None,
///             rate: Decimal::new(10, 2),
///         },
///     ],
///     non_resident: vec![TaxBracket {
///         lower_bound: Money::ZERO,
///         upper_bound: None,
///         rate: Decimal::new(10, 2),
///     }],
/// };
///
/// let tax = compute_tax(Money::from_minor_units(100_000), ResidencyStatus::Resident, &tables);
/// assert_eq!(tax.unwrap(), Money::from_minor_units(5_000));
/// ```
pub fn compute_tax(
    gross_salary: Money,
    residency: ResidencyStatus,
    tables: &TaxTables,
) -> EngineResult<Money> {
    compute_tax_breakdown(gross_salary, residency, tables).map(|breakdown| breakdown.tax)
}

pub(crate) fn tax_with_valid_tables(
    gross_salary: Money,
    residency: ResidencyStatus,
    tables: &TaxTables,
) -> EngineResult<Money> {
    breakdown_with_valid_tables(gross_salary, residency, tables).map(|breakdown| breakdown.tax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{dec, illustrative_tables, money, progressive_tables};
    use proptest::prelude::*;

    #[test]
    fn test_resident_1000_pays_10_percent_of_excess() {
        let tax = compute_tax(money("1000"), ResidencyStatus::Resident, &illustrative_tables());
        assert_eq!(tax.unwrap(), money("50.00"));
    }

    #[test]
    fn test_resident_below_threshold_pays_nothing() {
        let tables = illustrative_tables();
        assert_eq!(
            compute_tax(money("0"), ResidencyStatus::Resident, &tables).unwrap(),
            Money::ZERO
        );
        assert_eq!(
            compute_tax(money("499.99"), ResidencyStatus::Resident, &tables).unwrap(),
            Money::ZERO
        );
    }

    #[test]
    fn test_income_at_threshold_stays_in_lower_bracket() {
        let breakdown =
            compute_tax_breakdown(money("500"), ResidencyStatus::Resident, &illustrative_tables())
                .unwrap();

        assert_eq!(breakdown.tax, Money::ZERO);
        assert_eq!(breakdown.portions.len(), 1);
        assert_eq!(breakdown.portions[0].rate, dec("0"));
        assert_eq!(breakdown.portions[0].taxable_amount, money("500"));
    }

    #[test]
    fn test_one_cent_above_threshold_enters_upper_bracket() {
        let breakdown = compute_tax_breakdown(
            money("500.01"),
            ResidencyStatus::Resident,
            &illustrative_tables(),
        )
        .unwrap();

        assert_eq!(breakdown.portions.len(), 2);
        assert_eq!(breakdown.portions[1].taxable_amount, money("0.01"));
        assert_eq!(breakdown.unrounded_tax, dec("0.001"));
        assert_eq!(breakdown.tax, Money::ZERO);
    }

    #[test]
    fn test_every_progressive_boundary_uses_lower_rate() {
        let tables = progressive_tables();

        // At 1500 the 20% bracket is not yet reached: 10% of 1000.
        assert_eq!(
            compute_tax(money("1500"), ResidencyStatus::Resident, &tables).unwrap(),
            money("100.00")
        );
        // Income above 1500 is taxed at 20%.
        assert_eq!(
            compute_tax(money("1510"), ResidencyStatus::Resident, &tables).unwrap(),
            money("102.00")
        );
        assert_eq!(
            compute_tax(money("500"), ResidencyStatus::Resident, &tables).unwrap(),
            Money::ZERO
        );
    }

    #[test]
    fn test_progressive_breakdown_slices() {
        let breakdown =
            compute_tax_breakdown(money("2000"), ResidencyStatus::Resident, &progressive_tables())
                .unwrap();

        let slices: Vec<Money> = breakdown.portions.iter().map(|p| p.taxable_amount).collect();
        assert_eq!(slices, vec![money("500"), money("1000"), money("500")]);
        assert_eq!(breakdown.tax, money("200.00"));
    }

    #[test]
    fn test_non_resident_flat_rate_has_no_exemption() {
        let tables = illustrative_tables();
        assert_eq!(
            compute_tax(money("1000"), ResidencyStatus::NonResident, &tables).unwrap(),
            money("100.00")
        );
        assert_eq!(
            compute_tax(money("100"), ResidencyStatus::NonResident, &tables).unwrap(),
            money("10.00")
        );
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 0.05 x 10% = 0.005 -> 0.01
        let tax = compute_tax(money("0.05"), ResidencyStatus::NonResident, &illustrative_tables());
        assert_eq!(tax.unwrap(), money("0.01"));
        // 500.05 resident: 0.05 x 10% = 0.005 -> 0.01
        let tax = compute_tax(money("500.05"), ResidencyStatus::Resident, &illustrative_tables());
        assert_eq!(tax.unwrap(), money("0.01"));
    }

    #[test]
    fn test_negative_gross_rejected() {
        let result = compute_tax(
            Money::from_minor_units(-100),
            ResidencyStatus::Resident,
            &illustrative_tables(),
        );

        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "gross_salary"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_is_configuration_error() {
        let tables = TaxTables {
            resident: vec![],
            ..illustrative_tables()
        };

        match compute_tax(money("1000"), ResidencyStatus::Resident, &tables) {
            Err(EngineError::Configuration { message }) => assert!(message.contains("no brackets")),
            other => panic!("Expected Configuration, got {:?}", other),
        }
        assert!(matches!(
            compute_tax_breakdown(money("1000"), ResidencyStatus::NonResident, &tables),
            Err(EngineError::Configuration { .. })
        ));
    }

    #[test]
    fn test_gapped_table_is_configuration_error() {
        let mut tables = progressive_tables();
        tables.resident[1].lower_bound = money("600");

        let result = compute_tax(money("2000"), ResidencyStatus::Resident, &tables);
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_breakdown_is_deterministic() {
        let tables = progressive_tables();
        let first = compute_tax_breakdown(money("1234.56"), ResidencyStatus::Resident, &tables);
        let second = compute_tax_breakdown(money("1234.56"), ResidencyStatus::Resident, &tables);
        assert_eq!(first.unwrap(), second.unwrap());
    }

    proptest! {
        #[test]
        fn prop_tax_is_monotonic(a in 0i64..100_000_000, b in 0i64..100_000_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let tables = progressive_tables();
            for residency in [ResidencyStatus::Resident, ResidencyStatus::NonResident] {
                let low_tax = compute_tax(Money::from_minor_units(low), residency, &tables).unwrap();
                let high_tax = compute_tax(Money::from_minor_units(high), residency, &tables).unwrap();
                prop_assert!(low_tax <= high_tax);
            }
        }

        #[test]
        fn prop_tax_never_exceeds_gross(gross in 0i64..100_000_000) {
            let gross = Money::from_minor_units(gross);
            let tax = compute_tax(gross, ResidencyStatus::Resident, &progressive_tables()).unwrap();
            prop_assert!(!tax.is_negative());
            prop_assert!(tax <= gross);
        }
    }
}

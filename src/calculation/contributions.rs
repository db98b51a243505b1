//! Social-security contribution calculation.
//!
//! Employee and employer shares are each computed from the contributable
//! base and rounded on their own; neither is derived from the other.

use tracing::debug;

use crate::config::ContributionRates;
use crate::error::EngineResult;
use crate::models::{ContributionShares, Money};

use super::rounding::apply_rate;
use super::tax::ensure_non_negative;

/// Computes the employee and employer contribution shares.
///
/// The base is the full gross salary, or the configured ceiling when gross
/// exceeds it.
///
/// # Errors
///
/// - [`EngineError::Configuration`](crate::error::EngineError::Configuration)
///   if `rates` fails [`ContributionRates::validate`].
/// - [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput)
///   if `gross_salary` is negative.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::compute_contributions;
/// use payroll_ledger::config::ContributionRates;
/// use payroll_ledger::models::Money;
/// use rust_decimal::Decimal;
///
/// let rates = ContributionRates {
///     employee_rate: Decimal::new(4, 2),
///     employer_rate: Decimal::new(6, 2),
///     ceiling: None,
/// };
///
/// let shares = compute_contributions(Money::from_minor_units(100_000), &rates).unwrap();
/// assert_eq!(shares.employee_share, Money::from_minor_units(4_000));
/// assert_eq!(shares.employer_share, Money::from_minor_units(6_000));
/// ```
pub fn compute_contributions(
    gross_salary: Money,
    rates: &ContributionRates,
) -> EngineResult<ContributionShares> {
    rates.validate()?;
    contributions_with_valid_rates(gross_salary, rates)
}

/// [`compute_contributions`] for rates already validated by
/// [`PayrollConfig::new`](crate::config::PayrollConfig::new).
pub(crate) fn contributions_with_valid_rates(
    gross_salary: Money,
    rates: &ContributionRates,
) -> EngineResult<ContributionShares> {
    ensure_non_negative("gross_salary", gross_salary)?;

    let base = rates.contributable_base(gross_salary);
    let shares = ContributionShares {
        employee_share: apply_rate(base, rates.employee_rate)?,
        employer_share: apply_rate(base, rates.employer_rate)?,
    };

    debug!(
        gross = %gross_salary,
        base = %base,
        employee_share = %shares.employee_share,
        employer_share = %shares.employer_share,
        "Computed contributions"
    );

    Ok(shares)
}

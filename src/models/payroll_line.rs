//! Payroll line item and contribution share models.
//!
//! A [`PayrollLineItem`] is the per-employee result of a pay run. It is not
//! persisted on its own; it feeds payslips and the run's journal entry.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Money;

/// Social-security contribution shares computed from a gross salary.
///
/// The two shares are computed independently. The employer share is a cost
/// to the organization and never reduces the employee's net pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionShares {
    /// The share deducted from the employee's pay.
    pub employee_share: Money,
    /// The share borne by the employer.
    pub employer_share: Money,
}

impl ContributionShares {
    /// Returns the combined employee and employer contribution.
    pub fn total(&self) -> EngineResult<Money> {
        self.employee_share.try_add(self.employer_share, "contribution")
    }
}

/// The computed pay figures for one employee in one pay run.
///
/// `net_pay` always equals `gross_salary - tax_withheld - employee_contribution`
/// and is never negative when built by
/// [`build_payroll_line`](crate::calculation::build_payroll_line).
///
/// # Example
///
/// ```
/// use payroll_ledger::models::{Money, PayrollLineItem};
///
/// let line = PayrollLineItem {
///     gross_salary: Money::from_minor_units(100_000),
///     tax_withheld: Money::from_minor_units(5_000),
///     employee_contribution: Money::from_minor_units(4_000),
///     employer_contribution: Money::from_minor_units(6_000),
///     net_pay: Money::from_minor_units(91_000),
/// };
/// assert_eq!(line.total_deductions().unwrap(), Money::from_minor_units(9_000));
/// assert!(line.is_consistent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLineItem {
    /// Gross salary for the period.
    pub gross_salary: Money,
    /// Wage income tax withheld.
    pub tax_withheld: Money,
    /// Employee share of social-security contributions.
    pub employee_contribution: Money,
    /// Employer share of social-security contributions.
    pub employer_contribution: Money,
    /// Amount paid to the employee.
    pub net_pay: Money,
}

impl PayrollLineItem {
    /// Returns the amounts withheld from gross pay.
    pub fn total_deductions(&self) -> EngineResult<Money> {
        self.tax_withheld.try_add(self.employee_contribution, "deduction")
    }

    /// Returns the total cost of the line to the employer.
    pub fn employer_cost(&self) -> EngineResult<Money> {
        self.gross_salary.try_add(self.employer_contribution, "employer cost")
    }

    /// Returns gross salary less deductions, the net pay the other figures
    /// imply.
    pub fn expected_net_pay(&self) -> EngineResult<Money> {
        let deductions = self.total_deductions()?;
        self.gross_salary
            .checked_sub(deductions)
            .ok_or_else(|| EngineError::CalculationError {
                message: format!(
                    "gross {} less deductions {} overflows",
                    self.gross_salary, deductions
                ),
            })
    }

    /// Returns true if `net_pay` matches gross less deductions.
    pub fn is_consistent(&self) -> bool {
        matches!(self.expected_net_pay(), Ok(net) if net == self.net_pay)
    }
}

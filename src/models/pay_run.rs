//! Pay run models.
//!
//! This module contains the input and result types of a pay run: the
//! employees to pay, the payslips produced, per-employee failures and the
//! journal entry posted for the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineResult;

use super::{JournalEntry, Money, PayPeriod, PayrollLineItem, ResidencyStatus};

/// An employee's salary and residency for a pay run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePay {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// Gross salary for the period.
    pub gross_salary: Money,
    /// Tax residency for the period.
    pub residency: ResidencyStatus,
}

/// The payslip figures for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// The employee the payslip belongs to.
    pub employee_id: String,
    /// The residency the tax was computed under.
    pub residency: ResidencyStatus,
    /// The computed pay figures.
    pub line: PayrollLineItem,
}

/// A record excluded from a pay run and the rule that rejected it.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::PayrollFailure;
///
/// let failure = PayrollFailure {
///     employee_id: "emp_007".to_string(),
///     code: "NEGATIVE_NET_PAY".to_string(),
///     message: "Net pay would be negative".to_string(),
/// };
/// assert_eq!(failure.code, "NEGATIVE_NET_PAY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFailure {
    /// The employee whose record failed.
    pub employee_id: String,
    /// The error code of the failed rule.
    pub code: String,
    /// A human-readable description of the failure.
    pub message: String,
}

/// Aggregated totals over the payslips of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRunTotals {
    /// Number of employees paid.
    pub employee_count: usize,
    /// Total gross salary.
    pub gross_salary: Money,
    /// Total tax withheld.
    pub tax_withheld: Money,
    /// Total employee contributions.
    pub employee_contribution: Money,
    /// Total employer contributions.
    pub employer_contribution: Money,
    /// Total net pay.
    pub net_pay: Money,
}

impl PayRunTotals {
    /// Sums the figures of the given line items.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CalculationError`](crate::error::EngineError::CalculationError)
    /// if any total overflows.
    pub fn from_lines<'a>(
        lines: impl IntoIterator<Item = &'a PayrollLineItem>,
    ) -> EngineResult<Self> {
        lines
            .into_iter()
            .try_fold(PayRunTotals::default(), |totals, line| {
                Ok(PayRunTotals {
                    employee_count: totals.employee_count + 1,
                    gross_salary: totals.gross_salary.try_add(line.gross_salary, "gross salary")?,
                    tax_withheld: totals.tax_withheld.try_add(line.tax_withheld, "tax")?,
                    employee_contribution: totals
                        .employee_contribution
                        .try_add(line.employee_contribution, "employee contribution")?,
                    employer_contribution: totals
                        .employer_contribution
                        .try_add(line.employer_contribution, "employer contribution")?,
                    net_pay: totals.net_pay.try_add(line.net_pay, "net pay")?,
                })
            })
    }
}

/// The complete result of a pay run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRunResult {
    /// Unique identifier for this run.
    pub pay_run_id: Uuid,
    /// When the run was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the run.
    pub engine_version: String,
    /// The jurisdiction code whose rates were applied.
    pub jurisdiction: String,
    /// The pay period of the run.
    pub pay_period: PayPeriod,
    /// Payslips for every employee that was paid.
    pub payslips: Vec<Payslip>,
    /// Employees excluded from the run and why.
    pub failures: Vec<PayrollFailure>,
    /// Totals over the payslips.
    pub totals: PayRunTotals,
    /// The balanced journal entry posted for the payslips, if any were paid.
    pub journal_entry: Option<JournalEntry>,
    /// The run duration in microseconds.
    pub duration_us: u64,
}

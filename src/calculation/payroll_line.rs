//! Payroll line building.
//!
//! Combines the tax and contribution calculators into the figures for one
//! employee's payslip.

use tracing::debug;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Money, PayrollLineItem, ResidencyStatus};

use super::contributions::contributions_with_valid_rates;
use super::tax::tax_with_valid_tables;

/// Builds the payroll line item for one gross salary.
///
/// `net_pay = gross_salary - tax_withheld - employee_contribution`. The
/// employer contribution is reported but does not reduce net pay.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if `gross_salary` is negative.
/// - [`EngineError::NegativeNetPay`] if tax and the employee contribution
///   exceed gross salary. This points at a rate misconfiguration and is
///   never clamped to zero.
pub fn build_payroll_line(
    gross_salary: Money,
    residency: ResidencyStatus,
    config: &PayrollConfig,
) -> EngineResult<PayrollLineItem> {
    let tax_withheld = tax_with_valid_tables(gross_salary, residency, config.tax_tables())?;
    let shares = contributions_with_valid_rates(gross_salary, config.contributions())?;

    let net_pay = gross_salary - tax_withheld - shares.employee_share;
    if net_pay.is_negative() {
        return Err(EngineError::NegativeNetPay {
            gross: gross_salary,
            tax_withheld,
            employee_contribution: shares.employee_share,
        });
    }

    debug!(
        gross = %gross_salary,
        residency = %residency,
        tax = %tax_withheld,
        net = %net_pay,
        "Built payroll line"
    );

    Ok(PayrollLineItem {
        gross_salary,
        tax_withheld,
        employee_contribution: shares.employee_share,
        employer_contribution: shares.employer_share,
        net_pay,
    })
}

//! Pay run orchestration.
//!
//! A pay run builds one payroll line per employee, sets aside the employees
//! whose records fail a rule, and posts a single journal entry for the rest.

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    EmployeePay, PayPeriod, PayRunResult, PayRunTotals, PayrollFailure, PayrollLineItem, Payslip,
};

use super::journal_posting::build_payroll_journal_entry;
use super::payroll_line::build_payroll_line;

/// Runs payroll for a set of employees over a pay period.
///
/// Each employee is calculated independently. An employee whose record fails
/// (negative salary, negative net pay, duplicate id) is reported in
/// [`PayRunResult::failures`] with the failed rule's code, and the run
/// continues for everyone else. The journal entry, dated on the period's end
/// date, covers only the employees that were paid.
///
/// # Errors
///
/// Fails as a whole only when the pay period is invalid or the journal entry
/// cannot be built; per-employee errors never abort the run.
pub fn run_payroll(
    pay_period: &PayPeriod,
    employees: &[EmployeePay],
    config: &PayrollConfig,
) -> EngineResult<PayRunResult> {
    let start_time = Instant::now();
    let pay_run_id = Uuid::new_v4();
    pay_period.validate()?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut payslips: Vec<Payslip> = Vec::with_capacity(employees.len());
    let mut failures: Vec<PayrollFailure> = Vec::new();

    for employee in employees {
        let outcome = if seen.insert(employee.employee_id.as_str()) {
            build_payroll_line(employee.gross_salary, employee.residency, config)
        } else {
            Err(EngineError::invalid_input(
                "employee_id",
                format!("{} appears more than once in the pay run", employee.employee_id),
            ))
        };

        match outcome {
            Ok(line) => payslips.push(Payslip {
                employee_id: employee.employee_id.clone(),
                residency: employee.residency,
                line,
            }),
            Err(err) => {
                warn!(
                    pay_run_id = %pay_run_id,
                    employee_id = %employee.employee_id,
                    code = err.code(),
                    error = %err,
                    "Employee excluded from pay run"
                );
                failures.push(PayrollFailure {
                    employee_id: employee.employee_id.clone(),
                    code: err.code().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    let lines: Vec<PayrollLineItem> = payslips.iter().map(|p| p.line).collect();
    let journal_entry = if lines.is_empty() {
        None
    } else {
        Some(build_payroll_journal_entry(
            &lines,
            config.accounts(),
            pay_period.end_date,
        )?)
    };

    let totals = PayRunTotals::from_lines(&lines)?;
    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        pay_run_id = %pay_run_id,
        jurisdiction = %config.jurisdiction().code,
        paid = payslips.len(),
        failed = failures.len(),
        gross = %totals.gross_salary,
        net = %totals.net_pay,
        duration_us,
        "Pay run completed"
    );

    Ok(PayRunResult {
        pay_run_id,
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        jurisdiction: config.jurisdiction().code.clone(),
        pay_period: pay_period.clone(),
        payslips,
        failures,
        totals,
        journal_entry,
        duration_us,
    })
}

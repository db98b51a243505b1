//! Payroll journal posting.
//!
//! This module folds the line items of a pay run into one balanced
//! double-entry journal entry and validates entries before they are posted.

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AccountMapping;
use crate::error::{EngineError, EngineResult};
use crate::models::{JournalEntry, JournalLine, Money, PayRunTotals, PayrollLineItem};

use super::tax::ensure_non_negative;

/// The most a line's `net_pay` may differ from gross less deductions and
/// still be posted. Anything larger is a data error, not rounding drift.
pub const MAX_NET_PAY_DRIFT: Money = Money::from_minor_units(1);

/// Builds the balanced journal entry for a pay run.
///
/// | Account | Side | Amount |
/// |---|---|---|
/// | salary expense | debit | total gross salary |
/// | employer contribution expense | debit | total employer contribution |
/// | cash | credit | total net pay |
/// | tax payable | credit | total tax withheld |
/// | contribution payable | credit | total employee + employer contribution |
///
/// Lines with a zero amount are left out. A line item whose `net_pay` is off
/// from gross less deductions by at most [`MAX_NET_PAY_DRIFT`] is accepted as
/// rounding drift: the cash credit absorbs the accumulated residual and the
/// amount is recorded in [`JournalEntry::rounding_adjustment`]. Line items
/// built by [`build_payroll_line`](super::build_payroll_line) always
/// balance, so the adjustment is zero for them.
///
/// # Errors
///
/// - [`EngineError::Configuration`] if any account name is blank; checked
///   before anything is computed.
/// - [`EngineError::InvalidInput`] if `lines` is empty, a line carries a
///   negative amount, or a line's `net_pay` drifts by more than
///   [`MAX_NET_PAY_DRIFT`].
/// - [`EngineError::CalculationError`] if totals overflow or the cash credit
///   would turn negative.
pub fn build_payroll_journal_entry(
    lines: &[PayrollLineItem],
    accounts: &AccountMapping,
    entry_date: NaiveDate,
) -> EngineResult<JournalEntry> {
    accounts.validate()?;

    if lines.is_empty() {
        return Err(EngineError::invalid_input(
            "lines",
            "a payroll journal entry needs at least one line item",
        ));
    }

    for (index, line) in lines.iter().enumerate() {
        check_line(index, line)?;
    }

    let totals = PayRunTotals::from_lines(lines)?;
    let contribution_payable = totals
        .employee_contribution
        .try_add(totals.employer_contribution, "contribution payable")?;
    let total_debits = totals.gross_salary.try_add(totals.employer_contribution, "debit")?;
    let non_cash_credits = totals.tax_withheld.try_add(contribution_payable, "credit")?;

    // Cash takes whatever balances the entry.
    let cash_credit = total_debits
        .checked_sub(non_cash_credits)
        .filter(|cash| !cash.is_negative())
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "credits {} exceed debits {} before cash is posted",
                non_cash_credits, total_debits
            ),
        })?;
    let rounding_adjustment = cash_credit - totals.net_pay;

    if !rounding_adjustment.is_zero() {
        warn!(
            net_pay = %totals.net_pay,
            cash_credit = %cash_credit,
            adjustment = %rounding_adjustment,
            account = %accounts.cash_account,
            "Cash account absorbed rounding residual"
        );
    }

    let candidates = [
        JournalLine::debit(&accounts.salary_expense_account, totals.gross_salary),
        JournalLine::debit(
            &accounts.employer_contribution_expense_account,
            totals.employer_contribution,
        ),
        JournalLine::credit(&accounts.cash_account, cash_credit),
        JournalLine::credit(&accounts.tax_payable_account, totals.tax_withheld),
        JournalLine::credit(&accounts.contribution_payable_account, contribution_payable),
    ];

    let entry = JournalEntry {
        id: Uuid::new_v4(),
        entry_date,
        description: format!("Payroll for {} employee(s)", totals.employee_count),
        lines: candidates
            .into_iter()
            .filter(|line| line.has_single_side())
            .collect(),
        rounding_adjustment,
    };

    validate_journal_entry(&entry)?;

    debug!(
        entry_id = %entry.id,
        lines = entry.lines.len(),
        total = %total_debits,
        "Built payroll journal entry"
    );

    Ok(entry)
}

fn check_line(index: usize, line: &PayrollLineItem) -> EngineResult<()> {
    let field = format!("lines[{}]", index);
    for amount in [
        line.gross_salary,
        line.tax_withheld,
        line.employee_contribution,
        line.employer_contribution,
        line.net_pay,
    ] {
        ensure_non_negative(&field, amount)?;
    }

    let expected = line.expected_net_pay()?;
    let drift = line
        .net_pay
        .checked_sub(expected)
        .map_or(u64::MAX, |d| d.minor_units().unsigned_abs());
    if drift > MAX_NET_PAY_DRIFT.minor_units().unsigned_abs() {
        return Err(EngineError::invalid_input(
            field,
            format!(
                "net pay {} does not match gross less deductions {}",
                line.net_pay, expected
            ),
        ));
    }
    Ok(())
}

/// Checks the structural invariants of a journal entry.
///
/// Every line must carry exactly one non-zero, non-negative amount, and the
/// entry's debits must equal its credits.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] naming the first offending line, or
/// the totals if the entry is unbalanced.
pub fn validate_journal_entry(entry: &JournalEntry) -> EngineResult<()> {
    for (index, line) in entry.lines.iter().enumerate() {
        let field = format!("lines[{}]", index);
        ensure_non_negative(&field, line.debit_amount)?;
        ensure_non_negative(&field, line.credit_amount)?;

        if !line.has_single_side() {
            return Err(EngineError::invalid_input(
                field,
                format!(
                    "'{}' must have exactly one of debit and credit non-zero",
                    line.account_name
                ),
            ));
        }
    }

    let (debits, credits) = (entry.total_debits()?, entry.total_credits()?);
    if debits != credits {
        return Err(EngineError::invalid_input(
            "lines",
            format!("debits {} do not equal credits {}", debits, credits),
        ));
    }

    Ok(())
}

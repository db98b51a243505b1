//! Trial balance reconciliation.
//!
//! Sums debits and credits over posted journal entries. The result is a read
//! model: it is recomputed on demand and holds no state between calls.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::EngineResult;
use crate::models::{AccountBalance, JournalEntry, Money, PayPeriod, TrialBalance};

/// Computes the trial balance over every line of every entry.
///
/// `is_balanced` is true iff total debits exactly equal total credits. An
/// empty input yields zero totals and is balanced.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`](crate::error::EngineError::CalculationError)
/// if a total overflows.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::compute_trial_balance;
/// use payroll_ledger::models::Money;
///
/// let balance = compute_trial_balance(&[]).unwrap();
/// assert_eq!(balance.total_debits, Money::ZERO);
/// assert_eq!(balance.total_credits, Money::ZERO);
/// assert!(balance.is_balanced);
/// ```
pub fn compute_trial_balance(entries: &[JournalEntry]) -> EngineResult<TrialBalance> {
    aggregate(entries.iter(), None)
}

/// Computes the trial balance over entries dated within `period`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput)
/// if the period ends before it starts, or
/// [`EngineError::CalculationError`](crate::error::EngineError::CalculationError)
/// if a total overflows.
pub fn compute_trial_balance_for_period(
    entries: &[JournalEntry],
    period: &PayPeriod,
) -> EngineResult<TrialBalance> {
    period.validate()?;

    let in_period = entries
        .iter()
        .filter(|entry| period.contains_date(entry.entry_date));
    aggregate(in_period, Some(period.clone()))
}

fn aggregate<'a>(
    entries: impl Iterator<Item = &'a JournalEntry>,
    period: Option<PayPeriod>,
) -> EngineResult<TrialBalance> {
    let mut by_account: BTreeMap<&str, (Money, Money)> = BTreeMap::new();
    let mut total_debits = Money::ZERO;
    let mut total_credits = Money::ZERO;
    let mut entry_count = 0usize;

    for entry in entries {
        entry_count += 1;
        for line in &entry.lines {
            total_debits = total_debits.try_add(line.debit_amount, "debit")?;
            total_credits = total_credits.try_add(line.credit_amount, "credit")?;

            let (debits, credits) = by_account
                .entry(line.account_name.as_str())
                .or_insert((Money::ZERO, Money::ZERO));
            *debits = debits.try_add(line.debit_amount, "account debit")?;
            *credits = credits.try_add(line.credit_amount, "account credit")?;
        }
    }

    let is_balanced = total_debits == total_credits;
    if is_balanced {
        debug!(entries = entry_count, total = %total_debits, "Trial balance reconciled");
    } else {
        warn!(
            entries = entry_count,
            debits = %total_debits,
            credits = %total_credits,
            "Trial balance does not reconcile"
        );
    }

    Ok(TrialBalance {
        total_debits,
        total_credits,
        is_balanced,
        accounts: by_account
            .into_iter()
            .map(|(account_name, (debits, credits))| AccountBalance {
                account_name: account_name.to_string(),
                debits,
                credits,
            })
            .collect(),
        period,
    })
}

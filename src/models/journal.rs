//! Ledger models: journal lines, journal entries and the trial balance.
//!
//! A [`JournalEntry`] is balanced when its debit total equals its credit
//! total. The [`TrialBalance`] is a read model recomputed from posted
//! entries and never mutated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineResult;

use super::{Money, PayPeriod};

/// One debit or credit against a named account.
///
/// Exactly one of `debit_amount` and `credit_amount` is non-zero.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::{JournalLine, Money};
///
/// let line = JournalLine::debit("Salary Expense", Money::from_minor_units(100_000));
/// assert!(line.is_debit());
/// assert_eq!(line.credit_amount, Money::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// The account the line is posted to.
    pub account_name: String,
    /// The debited amount, zero for a credit line.
    pub debit_amount: Money,
    /// The credited amount, zero for a debit line.
    pub credit_amount: Money,
}

impl JournalLine {
    /// Creates a debit line.
    pub fn debit(account_name: impl Into<String>, amount: Money) -> Self {
        Self {
            account_name: account_name.into(),
            debit_amount: amount,
            credit_amount: Money::ZERO,
        }
    }

    /// Creates a credit line.
    pub fn credit(account_name: impl Into<String>, amount: Money) -> Self {
        Self {
            account_name: account_name.into(),
            debit_amount: Money::ZERO,
            credit_amount: amount,
        }
    }

    /// Returns true if this is a debit line.
    pub fn is_debit(&self) -> bool {
        !self.debit_amount.is_zero()
    }

    /// Returns true if exactly one side of the line is non-zero.
    pub fn has_single_side(&self) -> bool {
        self.debit_amount.is_zero() != self.credit_amount.is_zero()
    }
}

/// An ordered set of journal lines posted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The posting date.
    pub entry_date: NaiveDate,
    /// A human-readable description.
    pub description: String,
    /// The lines of the entry, debits first.
    pub lines: Vec<JournalLine>,
    /// Residual absorbed by the cash account to balance the entry.
    #[serde(default)]
    pub rounding_adjustment: Money,
}

impl JournalEntry {
    /// Returns the sum of all debit amounts.
    pub fn total_debits(&self) -> EngineResult<Money> {
        Money::try_sum(self.lines.iter().map(|l| l.debit_amount), "debit")
    }

    /// Returns the sum of all credit amounts.
    pub fn total_credits(&self) -> EngineResult<Money> {
        Money::try_sum(self.lines.iter().map(|l| l.credit_amount), "credit")
    }

    /// Returns true if debits equal credits exactly.
    ///
    /// An entry whose totals overflow is never balanced.
    pub fn is_balanced(&self) -> bool {
        match (self.total_debits(), self.total_credits()) {
            (Ok(debits), Ok(credits)) => debits == credits,
            _ => false,
        }
    }
}

/// Debit and credit totals for a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account name.
    pub account_name: String,
    /// Total debited to the account.
    pub debits: Money,
    /// Total credited to the account.
    pub credits: Money,
}

impl AccountBalance {
    /// Returns debits minus credits, or `None` if the difference overflows.
    pub fn net(&self) -> Option<Money> {
        self.debits.checked_sub(self.credits)
    }
}

/// Debit and credit totals across a set of posted entries.
///
/// # Example
///
/// ```
/// use payroll_ledger::calculation::compute_trial_balance;
///
/// let balance = compute_trial_balance(&[]).unwrap();
/// assert!(balance.is_balanced);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Sum of every debit amount.
    pub total_debits: Money,
    /// Sum of every credit amount.
    pub total_credits: Money,
    /// True iff the totals are exactly equal.
    pub is_balanced: bool,
    /// Per-account totals ordered by account name.
    #[serde(default)]
    pub accounts: Vec<AccountBalance>,
    /// The period the balance was restricted to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<PayPeriod>,
}

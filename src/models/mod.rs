//! Core data models for the payroll ledger engine.
//!
//! This module contains all the domain models used throughout the engine.

mod journal;
mod money;
mod pay_period;
mod pay_run;
mod payroll_line;
mod residency;

pub use journal::{AccountBalance, JournalEntry, JournalLine, TrialBalance};
pub use money::{MINOR_UNIT_SCALE, Money};
pub use pay_period::PayPeriod;
pub use pay_run::{EmployeePay, PayRunResult, PayRunTotals, PayrollFailure, Payslip};
pub use payroll_line::{ContributionShares, PayrollLineItem};
pub use residency::ResidencyStatus;

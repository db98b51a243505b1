//! Calculation logic for the payroll engine.
//!
//! This module contains the income tax and social-security contribution
//! calculators, payroll line building, journal posting, trial balance
//! reconciliation and pay run orchestration. All rounding to minor currency
//! units goes through [`rounding`].

mod contributions;
mod journal_posting;
mod pay_run;
mod payroll_line;
pub mod rounding;
mod tax;
mod trial_balance;

pub use contributions::compute_contributions;
pub use journal_posting::{build_payroll_journal_entry, validate_journal_entry};
pub use pay_run::run_payroll;
pub use payroll_line::build_payroll_line;
pub use rounding::{ROUNDING_STRATEGY, apply_rate, round_to_minor_units};
pub use tax::{BracketPortion, TaxBreakdown, compute_tax, compute_tax_breakdown};
pub use trial_balance::{compute_trial_balance, compute_trial_balance_for_period};

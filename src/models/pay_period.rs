//! Pay period model.
//!
//! A [`PayPeriod`] bounds a pay run and the trial balance drawn for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a pay period with an inclusive date range.
///
/// The payroll journal entry for a run is dated on the period's end date,
/// so a trial balance for the same period picks it up.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())); // start date
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap())); // end date
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())); // after
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Rejects a period whose end date precedes its start date.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::invalid_input(
                "pay_period",
                format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            ));
        }
        Ok(())
    }
}

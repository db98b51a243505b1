//! Residency classification used to select a tax bracket table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An employee's tax residency for a pay period.
///
/// Residency is fixed for the period once HR has classified the employee;
/// the calculators read it but never change it.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::ResidencyStatus;
///
/// let status: ResidencyStatus = serde_json::from_str("\"non_resident\"").unwrap();
/// assert_eq!(status, ResidencyStatus::NonResident);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidencyStatus {
    /// Resident for tax purposes; taxed on the progressive schedule.
    Resident,
    /// Non-resident; taxed at a flat rate on all income.
    NonResident,
}

impl ResidencyStatus {
    /// Returns the snake_case label used in configuration and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ResidencyStatus::Resident => "resident",
            ResidencyStatus::NonResident => "non_resident",
        }
    }
}

impl fmt::Display for ResidencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

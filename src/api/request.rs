//! Request types for the payroll API.
//!
//! This module defines the JSON request structures for the `/payroll/line`,
//! `/payroll/run` and `/trial-balance` endpoints. Monetary amounts are sent
//! as decimal strings in major units, e.g. `"1000.00"`.

use serde::{Deserialize, Serialize};

use crate::models::{EmployeePay, JournalEntry, Money, PayPeriod, ResidencyStatus};

/// Request body for the `/payroll/line` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollLineRequest {
    /// Gross salary for the period.
    pub gross_salary: Money,
    /// Tax residency of the employee.
    pub residency: ResidencyStatus,
}

/// Request body for the `/payroll/run` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunRequest {
    /// The pay period being paid.
    pub pay_period: PayPeriod,
    /// The employees to pay.
    pub employees: Vec<EmployeePay>,
}

/// Request body for the `/trial-balance` endpoint.
///
/// When `period` is present only entries dated within it are summed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRequest {
    /// Posted journal entries.
    pub entries: Vec<JournalEntry>,
    /// Optional period to restrict the balance to.
    #[serde(default)]
    pub period: Option<PayPeriod>,
}

//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for computing payroll lines,
//! running payroll and drawing trial balances.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PayRunRequest, PayrollLineRequest, TrialBalanceRequest};
pub use response::{ApiError, ApiErrorResponse, PayrollLineResponse};
pub use state::AppState;

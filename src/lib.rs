//! Payroll tax, contribution and ledger posting engine
//!
//! This crate computes wage income tax and social-security contributions for
//! employees, builds balanced double-entry journal entries from the resulting
//! payroll lines, and reconciles posted entries into a trial balance. Rates
//! and account names are loaded from YAML configuration.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;

//! Configuration loading and management for the payroll ledger engine.
//!
//! This module provides functionality to load a jurisdiction's tax bracket
//! tables, contribution rates and ledger account mapping from YAML files.
//! Configuration is injected into the calculators, so each tenant or
//! jurisdiction can carry its own tables without code changes.
//!
//! # Example
//!
//! ```no_run
//! use payroll_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/illustrative").unwrap();
//! println!("Loaded rules: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AccountMapping, ContributionRates, JurisdictionMetadata, PayrollConfig, TaxBracket, TaxTables,
};

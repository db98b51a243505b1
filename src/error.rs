//! Error types for the payroll ledger engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the calculators, the ledger builders and the
//! configuration loader can report.

use thiserror::Error;

use crate::models::Money;

/// The main error type for the payroll ledger engine.
///
/// All operations in the engine return this error type. None of these
/// errors are retryable: every calculation is a pure function of its inputs,
/// so repeating it with the same inputs fails the same way.
///
/// # Example
///
/// ```
/// use payroll_ledger::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tax.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tax.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rate table or account mapping is missing or malformed.
    #[error("Configuration error: {message}")]
    Configuration {
        /// A description of what is wrong with the configuration.
        message: String,
    },

    /// A monetary input was negative or otherwise unusable.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input that was rejected.
        field: String,
        /// A description of why it was rejected.
        message: String,
    },

    /// Tax and employee contribution exceed gross salary.
    #[error(
        "Net pay would be negative: gross {gross} - tax {tax_withheld} - contribution {employee_contribution}"
    )]
    NegativeNetPay {
        /// The gross salary of the line.
        gross: Money,
        /// The tax withheld.
        tax_withheld: Money,
        /// The employee's share of contributions.
        employee_contribution: Money,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Builds an [`EngineError::InvalidInput`] for the named field.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds an [`EngineError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        EngineError::Configuration {
            message: message.into(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    ///
    /// Pay-run failure reports and HTTP error bodies carry this code so
    /// callers can tell which rule rejected a record.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::Configuration { .. } => "CONFIGURATION_ERROR",
            EngineError::InvalidInput { .. } => "INVALID_INPUT",
            EngineError::NegativeNetPay { .. } => "NEGATIVE_NET_PAY",
            EngineError::CalculationError { .. } => "CALCULATION_ERROR",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

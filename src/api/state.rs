//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{JurisdictionMetadata, PayrollConfig};

/// Shared application state.
///
/// Holds the validated payroll configuration. It is read-only after
/// startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    config: Arc<PayrollConfig>,
}

impl AppState {
    /// Creates a new application state with the given configuration.
    pub fn new(config: PayrollConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the metadata of the configured jurisdiction.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }
}

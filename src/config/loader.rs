//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{AccountMapping, ContributionRates, JurisdictionMetadata, PayrollConfig, TaxTables};

/// Loads and validates a jurisdiction's payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/illustrative/
/// ├── jurisdiction.yaml   # Jurisdiction metadata and currency
/// ├── tax.yaml            # Resident and non-resident bracket tables
/// ├── contributions.yaml  # Employee/employer rates and optional ceiling
/// └── accounts.yaml       # Ledger accounts for payroll postings
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/illustrative").unwrap();
/// println!("Loaded rules: {}", loader.jurisdiction().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - A table or the account mapping fails validation (`Configuration`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let tax_tables = Self::load_yaml::<TaxTables>(&path.join("tax.yaml"))?;
        let contributions = Self::load_yaml::<ContributionRates>(&path.join("contributions.yaml"))?;
        let accounts = Self::load_yaml::<AccountMapping>(&path.join("accounts.yaml"))?;

        let config = PayrollConfig::new(metadata, tax_tables, contributions, accounts)?;
        debug!(
            jurisdiction = %config.jurisdiction().code,
            version = %config.jurisdiction().version,
            resident_brackets = config.tax_tables().resident.len(),
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the validated payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }
}

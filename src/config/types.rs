//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, together with the
//! validation that runs before any pay run may use them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Money, ResidencyStatus};

/// Metadata about the jurisdiction whose rules are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short jurisdiction code (e.g., "TL").
    pub code: String,
    /// Human-readable name of the rule set.
    pub name: String,
    /// The version or effective date of the rules.
    pub version: String,
    /// ISO 4217 currency code of all amounts.
    pub currency: String,
    /// URL of the regulation the rates were taken from.
    pub source_url: String,
}

/// One bracket of a tax schedule.
///
/// Bounds are lower-inclusive and upper-exclusive: income exactly equal to
/// `upper_bound` is taxed entirely within this bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower bound.
    pub lower_bound: Money,
    /// Exclusive upper bound, `None` for the final unbounded bracket.
    #[serde(default)]
    pub upper_bound: Option<Money>,
    /// Marginal rate as a fraction (0.10 for 10%).
    pub rate: Decimal,
}

impl TaxBracket {
    /// Returns the part of `gross` that falls inside this bracket.
    ///
    /// Zero unless `gross` is strictly greater than the lower bound.
    pub fn taxable_portion(&self, gross: Money) -> Money {
        if gross <= self.lower_bound {
            return Money::ZERO;
        }
        let capped = match self.upper_bound {
            Some(upper) if gross > upper => upper,
            _ => gross,
        };
        capped - self.lower_bound
    }
}

/// Tax bracket tables keyed by residency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    /// Progressive schedule for residents.
    pub resident: Vec<TaxBracket>,
    /// Flat schedule for non-residents: a single bracket from zero.
    pub non_resident: Vec<TaxBracket>,
}

impl TaxTables {
    /// Returns the bracket table that applies to `residency`.
    pub fn for_residency(&self, residency: ResidencyStatus) -> &[TaxBracket] {
        match residency {
            ResidencyStatus::Resident => &self.resident,
            ResidencyStatus::NonResident => &self.non_resident,
        }
    }

    /// Checks both tables partition `[0, ∞)` with non-decreasing rates.
    pub fn validate(&self) -> EngineResult<()> {
        validate_bracket_table(ResidencyStatus::Resident, &self.resident)?;
        validate_bracket_table(ResidencyStatus::NonResident, &self.non_resident)?;

        if self.non_resident.len() != 1 {
            return Err(EngineError::configuration(format!(
                "non_resident table must be a single flat-rate bracket, found {} brackets",
                self.non_resident.len()
            )));
        }
        Ok(())
    }
}

fn validate_rate(label: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::configuration(format!(
            "{} rate {} must be between 0 and 1",
            label, rate
        )));
    }
    Ok(())
}

fn validate_bracket_table(residency: ResidencyStatus, brackets: &[TaxBracket]) -> EngineResult<()> {
    let first = brackets.first().ok_or_else(|| {
        EngineError::configuration(format!("{} tax table has no brackets", residency))
    })?;

    if !first.lower_bound.is_zero() {
        return Err(EngineError::configuration(format!(
            "{} tax table must start at 0.00, starts at {}",
            residency, first.lower_bound
        )));
    }

    let last_index = brackets.len() - 1;
    let mut previous_rate = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        let label = format!("{} bracket {}", residency, index + 1);
        validate_rate(&label, bracket.rate)?;

        if bracket.rate < previous_rate {
            return Err(EngineError::configuration(format!(
                "{} rate {} is lower than the previous bracket's {}",
                label, bracket.rate, previous_rate
            )));
        }
        previous_rate = bracket.rate;

        match (bracket.upper_bound, index == last_index) {
            (None, true) => {}
            (None, false) => {
                return Err(EngineError::configuration(format!(
                    "{} is unbounded but is not the final bracket",
                    label
                )));
            }
            (Some(upper), true) => {
                return Err(EngineError::configuration(format!(
                    "{} is the final bracket but is capped at {}",
                    label, upper
                )));
            }
            (Some(upper), false) => {
                if upper <= bracket.lower_bound {
                    return Err(EngineError::configuration(format!(
                        "{} upper bound {} must exceed its lower bound {}",
                        label, upper, bracket.lower_bound
                    )));
                }
                let next = &brackets[index + 1];
                if next.lower_bound != upper {
                    return Err(EngineError::configuration(format!(
                        "{} ends at {} but the next bracket starts at {}",
                        label, upper, next.lower_bound
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Social-security contribution rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    /// Fraction of gross deducted from the employee.
    pub employee_rate: Decimal,
    /// Fraction of gross borne by the employer.
    pub employer_rate: Decimal,
    /// Optional cap on the salary contributions are levied on.
    #[serde(default)]
    pub ceiling: Option<Money>,
}

impl ContributionRates {
    /// Checks both rates lie in `[0, 1]` and any ceiling is non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        validate_rate("employee contribution", self.employee_rate)?;
        validate_rate("employer contribution", self.employer_rate)?;

        if let Some(ceiling) = self.ceiling {
            if ceiling.is_negative() {
                return Err(EngineError::configuration(format!(
                    "contribution ceiling {} must not be negative",
                    ceiling
                )));
            }
        }
        Ok(())
    }

    /// Returns the part of `gross` contributions are levied on.
    pub fn contributable_base(&self, gross: Money) -> Money {
        match self.ceiling {
            Some(ceiling) if gross > ceiling => ceiling,
            _ => gross,
        }
    }
}

/// The ledger accounts a payroll journal entry posts to.
///
/// Missing keys deserialize as blank names so that [`AccountMapping::validate`]
/// can report every missing account at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMapping {
    /// Debited with total gross salary.
    #[serde(default)]
    pub salary_expense_account: String,
    /// Debited with total employer contributions.
    #[serde(default)]
    pub employer_contribution_expense_account: String,
    /// Credited with total net pay; absorbs any rounding residual.
    #[serde(default)]
    pub cash_account: String,
    /// Credited with total tax withheld.
    #[serde(default)]
    pub tax_payable_account: String,
    /// Credited with total employee and employer contributions.
    #[serde(default)]
    pub contribution_payable_account: String,
}

impl AccountMapping {
    /// Fails with a configuration error naming every blank account.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("salary_expense_account", &self.salary_expense_account),
            (
                "employer_contribution_expense_account",
                &self.employer_contribution_expense_account,
            ),
            ("cash_account", &self.cash_account),
            ("tax_payable_account", &self.tax_payable_account),
            (
                "contribution_payable_account",
                &self.contribution_payable_account,
            ),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(EngineError::configuration(format!(
                "account mapping is incomplete, missing: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

/// A validated payroll configuration.
///
/// The only way to build one is [`PayrollConfig::new`], which validates every
/// table, so a malformed configuration stops a pay run before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollConfig {
    metadata: JurisdictionMetadata,
    tax_tables: TaxTables,
    contributions: ContributionRates,
    accounts: AccountMapping,
}

impl PayrollConfig {
    /// Validates and assembles a configuration from its component parts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] if a bracket table is empty,
    /// non-contiguous, has decreasing rates or a misplaced unbounded bracket,
    /// if a rate is outside `[0, 1]`, or if an account name is blank.
    pub fn new(
        metadata: JurisdictionMetadata,
        tax_tables: TaxTables,
        contributions: ContributionRates,
        accounts: AccountMapping,
    ) -> EngineResult<Self> {
        tax_tables.validate()?;
        contributions.validate()?;
        accounts.validate()?;

        Ok(Self {
            metadata,
            tax_tables,
            contributions,
            accounts,
        })
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns the tax bracket tables.
    pub fn tax_tables(&self) -> &TaxTables {
        &self.tax_tables
    }

    /// Returns the contribution rates.
    pub fn contributions(&self) -> &ContributionRates {
        &self.contributions
    }

    /// Returns the ledger account mapping.
    pub fn accounts(&self) -> &AccountMapping {
        &self.accounts
    }
}

//! Configuration types for the compensation engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata about the regulation the engine implements.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Short code of the regulation (e.g., "LEI-13103").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Version of the configuration set.
    pub version: String,
    /// URL to the official text.
    pub source_url: String,
}

/// Hourly rates for the three kinds of paid minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRates {
    /// Rate for normal journey hours.
    pub normal: Decimal,
    /// Rate for overtime hours.
    pub overtime: Decimal,
    /// Rate for waiting hours.
    pub waiting: Decimal,
}

/// Compensation parameters in effect from a given date.
///
/// Loaded from `compensation/<date>.yaml`. The values are copied into each
/// payroll record computed with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationConfig {
    /// The first day this config applies.
    pub effective_date: NaiveDate,
    /// Fixed monthly base salary.
    pub base_salary: Decimal,
    /// Per-hour rates.
    pub hourly_rates: HourlyRates,
    /// Share of freight revenue withheld as levy, as a fraction (0.17 = 17%).
    pub levy_percent: Decimal,
    /// Share of the bonus base paid as bonus, as a fraction.
    pub bonus_percent: Decimal,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    /// Sorted oldest first.
    compensation: Vec<CompensationConfig>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(metadata: EngineMetadata, compensation: Vec<CompensationConfig>) -> Self {
        let mut sorted = compensation;
        sorted.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            compensation: sorted,
        }
    }

    /// Returns the engine metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns all compensation configurations, oldest first.
    pub fn compensation(&self) -> &[CompensationConfig] {
        &self.compensation
    }
}

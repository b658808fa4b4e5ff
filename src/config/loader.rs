//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading compensation
//! configurations from YAML files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPeriod;

use super::types::{CompensationConfig, EngineConfig, EngineMetadata};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/lei_13103/
/// ├── engine.yaml            # Regulation metadata
/// └── compensation/
///     └── 2025-01-01.yaml    # Compensation effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use fleet_compliance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/lei_13103")?;
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let compensation = loader.compensation_for(date)?;
/// println!("Base salary: {}", compensation.base_salary);
/// # Ok::<(), fleet_compliance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Fails if a file is missing, contains invalid YAML, or holds a value
    /// outside its allowed range.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<EngineMetadata>(&path.join("engine.yaml"))?;
        let compensation = Self::load_compensation(&path.join("compensation"))?;
        for config in &compensation {
            validate(config)?;
        }
        reject_duplicate_dates(&compensation)?;

        Ok(Self {
            config: EngineConfig::new(metadata, compensation),
        })
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

    /// Loads all compensation files from the directory.
    fn load_compensation(dir: &Path) -> EngineResult<Vec<CompensationConfig>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut configs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                configs.push(Self::load_yaml::<CompensationConfig>(&path)?);
            }
        }

        if configs.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no compensation files found)", dir_str),
            });
        }

        Ok(configs)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the regulation metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }

    /// Gets the compensation config in effect on a date.
    ///
    /// The latest config whose effective date is on or before `date` wins.
    pub fn compensation_for(&self, date: NaiveDate) -> EngineResult<&CompensationConfig> {
        self.config
            .compensation()
            .iter()
            .rev()
            .find(|c| c.effective_date <= date)
            .ok_or(EngineError::CompensationConfigNotFound { date })
    }

    /// Gets the compensation config for a payroll month, as of its first day.
    pub fn compensation_for_period(
        &self,
        period: PayrollPeriod,
    ) -> EngineResult<&CompensationConfig> {
        self.compensation_for(period.first_day())
    }
}

/// Rejects negative amounts and percentages outside (0, 1).
fn validate(config: &CompensationConfig) -> EngineResult<()> {
    let amounts = [
        ("base_salary", config.base_salary),
        ("hourly_rates.normal", config.hourly_rates.normal),
        ("hourly_rates.overtime", config.hourly_rates.overtime),
        ("hourly_rates.waiting", config.hourly_rates.waiting),
    ];
    for (field, value) in amounts {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(EngineError::InvalidConfig {
                field: field.to_string(),
                message: format!(
                    "must not be negative (got {} in config effective {})",
                    value, config.effective_date
                ),
            });
        }
    }

    let percents = [
        ("levy_percent", config.levy_percent),
        ("bonus_percent", config.bonus_percent),
    ];
    for (field, value) in percents {
        if value <= Decimal::ZERO || value >= Decimal::ONE {
            return Err(EngineError::InvalidConfig {
                field: field.to_string(),
                message: format!(
                    "must be a fraction between 0 and 1 exclusive (got {} in config effective {})",
                    value, config.effective_date
                ),
            });
        }
    }

    Ok(())
}

/// Two files in effect from the same day would make the lookup ambiguous.
fn reject_duplicate_dates(configs: &[CompensationConfig]) -> EngineResult<()> {
    let mut dates: Vec<NaiveDate> = configs.iter().map(|c| c.effective_date).collect();
    dates.sort_unstable();
    match dates.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => Err(EngineError::InvalidConfig {
            field: "effective_date".to_string(),
            message: format!("more than one compensation file is effective from {}", pair[0]),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/lei_13103"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn write_config(dir: &Path, compensation: &[(&str, &str)]) {
        fs::write(
            dir.join("engine.yaml"),
            "code: TEST\nname: Test\nversion: \"1\"\nsource_url: https://example.invalid\n",
        )
        .unwrap();
        let comp_dir = dir.join("compensation");
        fs::create_dir_all(&comp_dir).unwrap();
        for (name, body) in compensation {
            fs::write(comp_dir.join(name), body).unwrap();
        }
    }

    fn compensation_yaml(date: &str, base: &str, levy: &str) -> String {
        format!(
            "effective_date: {date}\n\
             base_salary: \"{base}\"\n\
             hourly_rates:\n  normal: \"15.00\"\n  overtime: \"22.50\"\n  waiting: \"4.50\"\n\
             levy_percent: \"{levy}\"\n\
             bonus_percent: \"0.03\"\n"
        )
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "LEI-13103");
    }

    #[test]
    fn test_shipped_compensation_values() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let config = loader.compensation_for(date).unwrap();

        assert_eq!(config.base_salary, dec("2500.00"));
        assert_eq!(config.hourly_rates.normal, dec("15.00"));
        assert_eq!(config.hourly_rates.overtime, dec("22.50"));
        assert_eq!(config.hourly_rates.waiting, dec("4.50"));
        assert_eq!(config.levy_percent, dec("0.17"));
        assert_eq!(config.bonus_percent, dec("0.03"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_effective_date_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            &[
                ("2025-01-01.yaml", &compensation_yaml("2025-01-01", "2500.00", "0.17")),
                ("2025-01-01-revised.yaml", &compensation_yaml("2025-01-01", "2600.00", "0.17")),
            ],
        );

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::InvalidConfig { field, message }) => {
                assert_eq!(field, "effective_date");
                assert!(message.contains("2025-01-01"));
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_latest_effective_config_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            &[
                ("2025-01-01.yaml", &compensation_yaml("2025-01-01", "2500.00", "0.17")),
                ("2025-06-01.yaml", &compensation_yaml("2025-06-01", "2750.00", "0.17")),
            ],
        );
        let loader = ConfigLoader::load(dir.path()).unwrap();

        let may = PayrollPeriod::new(5, 2025).unwrap();
        let june = PayrollPeriod::new(6, 2025).unwrap();
        assert_eq!(
            loader.compensation_for_period(may).unwrap().base_salary,
            dec("2500.00")
        );
        assert_eq!(
            loader.compensation_for_period(june).unwrap().base_salary,
            dec("2750.00")
        );
    }

    #[test]
    fn test_no_config_before_first_effective_date() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        match loader.compensation_for(date) {
            Err(EngineError::CompensationConfigNotFound { date: d }) => assert_eq!(d, date),
            other => panic!("Expected CompensationConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_percent_out_of_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            &[("2025-01-01.yaml", &compensation_yaml("2025-01-01", "2500.00", "17"))],
        );

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "levy_percent"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            &[("2025-01-01.yaml", &compensation_yaml("2025-01-01", "-1.00", "0.17"))],
        );

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "base_salary"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_compensation_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &[]);

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("no compensation files"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &[("2025-01-01.yaml", "effective_date: [not a date")]);

        assert!(matches!(
            ConfigLoader::load(dir.path()),
            Err(EngineError::ConfigParseError { .. })
        ));
    }
}

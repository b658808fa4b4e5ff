//! Configuration loading and management for the compensation engine.
//!
//! This module loads the regulation metadata and the dated compensation
//! parameters (base salary, hourly rates, levy and bonus percentages) from
//! YAML files. Regulatory thresholds are not configurable; see
//! [`crate::compliance::thresholds`].
//!
//! # Example
//!
//! ```no_run
//! use fleet_compliance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/lei_13103").unwrap();
//! println!("Loaded regulation: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CompensationConfig, EngineConfig, EngineMetadata, HourlyRates};

//! Work-time compliance and payroll engine for road transport drivers.
//!
//! This crate evaluates driver work sessions against the Brazilian driver
//! law (Lei 13.103/2015) and aggregates completed sessions into monthly
//! payroll statements, recording an audit trace of every rule it applies.

#![warn(missing_docs)]

pub mod api;
pub mod compliance;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod settings;
pub mod store;

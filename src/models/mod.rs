//! Core data models for the compliance and payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod event;
mod ledger;
mod outcome;
mod payroll;
mod session;
mod violation;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use event::{ActivityType, WorkEvent};
pub use ledger::{FreightRevenue, FuelExpense};
pub use outcome::RunOutcome;
pub use payroll::{
    MAX_PAYROLL_YEAR, MIN_PAYROLL_YEAR, PayComponent, PayrollPeriod, PayrollRecord, PayrollStatus,
};
pub use session::{DriverCategory, SessionStatus, SessionTotals, WorkSession};
pub use violation::{Severity, Violation, ViolationKind};

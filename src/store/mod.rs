//! Storage seam for the engine.
//!
//! The engine reads sessions, events and ledger entries and writes
//! violations, derived session totals and payroll records through the [`WorkStore`] trait.
//! [`SqliteStore`] is the bundled implementation.
//!
//! Two store-level guarantees are relied upon:
//!
//! - [`WorkStore::replace_violations`] swaps a session's violation set
//!   atomically, which makes re-evaluation idempotent.
//! - [`WorkStore::insert_payroll`] enforces uniqueness of
//!   (driver, month, year) and reports a conflict as
//!   [`InsertOutcome::AlreadyExists`] instead of failing.

mod sqlite;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    FreightRevenue, FuelExpense, PayrollPeriod, PayrollRecord, PayrollStatus, SessionTotals,
    Violation, WorkEvent, WorkSession,
};

pub use sqlite::SqliteStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row could not be decoded.
    #[error("corrupt row in {table} ({id}): {message}")]
    Corrupt {
        /// The table holding the row.
        table: &'static str,
        /// The row's ID.
        id: String,
        /// What failed to decode.
        message: String,
    },

    /// The store cannot serve requests right now.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// A description of the outage.
        message: String,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written.
    Inserted,
    /// A row with the same unique key already existed; nothing was written.
    AlreadyExists,
}

/// Reads and writes the engine needs from the work-event store.
pub trait WorkStore: Send + Sync {
    /// Fetches a session by ID.
    fn session(&self, session_id: &str) -> StoreResult<Option<WorkSession>>;

    /// Lists a session's events ordered by start time.
    fn session_events(&self, session_id: &str) -> StoreResult<Vec<WorkEvent>>;

    /// End time of the driver's latest session that started before `before`,
    /// excluding `exclude_session_id`. `None` if there is none or it is still
    /// open.
    fn previous_session_end(
        &self,
        driver_id: &str,
        before: DateTime<Utc>,
        exclude_session_id: &str,
    ) -> StoreResult<Option<DateTime<Utc>>>;

    /// Atomically replaces every violation of a session with `violations`.
    ///
    /// Returns the number of rows written.
    fn replace_violations(&self, session_id: &str, violations: &[Violation]) -> StoreResult<usize>;

    /// Lists the violations recorded for a session.
    fn session_violations(&self, session_id: &str) -> StoreResult<Vec<Violation>>;

    /// Sets the session's derived minute totals and overtime in one write.
    fn update_session_totals(
        &self,
        session_id: &str,
        totals: &SessionTotals,
        overtime_minutes: i64,
    ) -> StoreResult<()>;

    /// Returns true if the driver has at least one session on record.
    fn driver_exists(&self, driver_id: &str) -> StoreResult<bool>;

    /// Drivers with at least one completed session starting in the period,
    /// sorted by ID.
    fn drivers_with_completed_sessions(&self, period: PayrollPeriod) -> StoreResult<Vec<String>>;

    /// The driver's completed sessions starting in the period, ordered by start.
    fn completed_sessions(
        &self,
        driver_id: &str,
        period: PayrollPeriod,
    ) -> StoreResult<Vec<WorkSession>>;

    /// Revenue entries linked to any of the given sessions.
    fn freight_revenue_for_sessions(&self, session_ids: &[String])
    -> StoreResult<Vec<FreightRevenue>>;

    /// The driver's fuel expenses incurred in the period.
    fn fuel_expenses(&self, driver_id: &str, period: PayrollPeriod) -> StoreResult<Vec<FuelExpense>>;

    /// Fetches the driver's payroll record for the period.
    fn payroll_record(
        &self,
        driver_id: &str,
        period: PayrollPeriod,
    ) -> StoreResult<Option<PayrollRecord>>;

    /// Fetches a payroll record by ID.
    fn payroll_record_by_id(&self, payroll_id: Uuid) -> StoreResult<Option<PayrollRecord>>;

    /// Inserts a payroll record unless one exists for the same
    /// (driver, month, year).
    fn insert_payroll(&self, record: &PayrollRecord) -> StoreResult<InsertOutcome>;

    /// Moves a payroll record from `from` to `to` if it is still in `from`.
    ///
    /// Returns false when the record was not in `from` (or does not exist).
    /// Callers validate that the transition itself is allowed.
    fn advance_payroll_status(
        &self,
        payroll_id: Uuid,
        from: PayrollStatus,
        to: PayrollStatus,
    ) -> StoreResult<bool>;
}

//! SQLite implementation of [`WorkStore`].
//!
//! # Thread Safety
//!
//! `rusqlite::Connection` is `Send` but not `Sync`, so the connection lives
//! behind a `Mutex`. Every trait call holds the lock for one statement or one
//! transaction; nothing is held across calls.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 UTC with second precision
//! (e.g. `2025-03-10T06:00:00Z`), so lexicographic order matches
//! chronological order. Money is stored as TEXT holding the exact decimal
//! string to avoid floating point drift.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    FreightRevenue, FuelExpense, PayComponent, PayrollPeriod, PayrollRecord, PayrollStatus,
    SessionTotals, Violation, WorkEvent, WorkSession,
};

use super::{InsertOutcome, StoreError, StoreResult, WorkStore};

const SESSION_COLUMNS: &str = "id, driver_id, start_time, end_time, status, category, \
     total_worked_minutes, total_driving_minutes, total_waiting_minutes, total_rest_minutes, \
     overtime_minutes";

const PAYROLL_COLUMNS: &str = "id, driver_id, month, year, session_count, \
     normal_minutes, normal_hours, normal_rate, normal_amount, \
     overtime_minutes, overtime_hours, overtime_rate, overtime_amount, \
     waiting_minutes, waiting_hours, waiting_rate, waiting_amount, \
     base_salary, total_freight_revenue, total_fuel, levy_amount, bonus_base, bonus_amount, \
     gross_total, net_total, status, levy_percent, bonus_percent, config_effective_date, computed_at";

/// SQLite-backed work store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database. Dropped with the store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Unavailable {
            message: "connection lock poisoned".to_string(),
        })
    }

    /// Inserts a work session.
    pub fn insert_session(&self, session: &WorkSession) -> StoreResult<()> {
        self.conn()?.execute(
            "
            INSERT INTO driver_work_sessions
            (id, driver_id, start_time, end_time, status, category,
             total_worked_minutes, total_driving_minutes, total_waiting_minutes,
             total_rest_minutes, overtime_minutes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                session.id,
                session.driver_id,
                format_timestamp(session.start_time),
                session.end_time.map(format_timestamp),
                session.status.as_str(),
                session.category.as_str(),
                session.totals.total_worked_minutes,
                session.totals.total_driving_minutes,
                session.totals.total_waiting_minutes,
                session.totals.total_rest_minutes,
                session.overtime_minutes,
            ],
        )?;
        Ok(())
    }

    /// Inserts a batch of events in one transaction.
    pub fn insert_events(&self, events: &[WorkEvent]) -> StoreResult<usize> {
        if events.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO driver_work_events
                (id, session_id, type, start_time, end_time, duration_minutes)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )?;
            for event in events {
                inserted += stmt.execute(params![
                    event.id,
                    event.session_id,
                    event.activity.as_str(),
                    format_timestamp(event.start_time),
                    event.end_time.map(format_timestamp),
                    event.duration_minutes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Inserts a freight revenue entry.
    pub fn insert_freight_revenue(&self, revenue: &FreightRevenue) -> StoreResult<()> {
        self.conn()?.execute(
            "
            INSERT INTO driver_freight_revenue (id, session_id, driver_id, amount, recorded_at)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                revenue.id,
                revenue.session_id,
                revenue.driver_id,
                revenue.amount.to_string(),
                format_timestamp(revenue.recorded_at),
            ],
        )?;
        Ok(())
    }

    /// Inserts a fuel expense entry.
    pub fn insert_fuel_expense(&self, expense: &FuelExpense) -> StoreResult<()> {
        self.conn()?.execute(
            "
            INSERT INTO driver_fuel_expenses (id, driver_id, amount, liters, incurred_at)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                expense.id,
                expense.driver_id,
                expense.amount.to_string(),
                expense.liters.map(|l| l.to_string()),
                format_timestamp(expense.incurred_at),
            ],
        )?;
        Ok(())
    }

    /// Lists every payroll record for a period, ordered by driver.
    pub fn payroll_records(&self, period: PayrollPeriod) -> StoreResult<Vec<PayrollRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PAYROLL_COLUMNS} FROM driver_payroll
             WHERE month = ? AND year = ?
             ORDER BY driver_id ASC"
        ))?;
        let rows = stmt.query_map(params![period.month, period.year], PayrollRow::from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.decode()?);
        }
        Ok(records)
    }
}

fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS driver_work_sessions (
            id TEXT PRIMARY KEY,
            driver_id TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT,
            status TEXT NOT NULL,
            category TEXT NOT NULL,
            total_worked_minutes INTEGER NOT NULL DEFAULT 0,
            total_driving_minutes INTEGER NOT NULL DEFAULT 0,
            total_waiting_minutes INTEGER NOT NULL DEFAULT 0,
            total_rest_minutes INTEGER NOT NULL DEFAULT 0,
            overtime_minutes INTEGER NOT NULL DEFAULT 0,
            CHECK (end_time IS NULL OR end_time >= start_time)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_driver_start
            ON driver_work_sessions(driver_id, start_time);

        CREATE TABLE IF NOT EXISTS driver_work_events (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            type TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT,
            duration_minutes INTEGER,
            FOREIGN KEY (session_id) REFERENCES driver_work_sessions(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_events_session_start
            ON driver_work_events(session_id, start_time);

        CREATE TABLE IF NOT EXISTS driver_violations (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            driver_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            severity TEXT NOT NULL,
            measured_value INTEGER NOT NULL,
            allowed_value INTEGER NOT NULL,
            occurred_at TEXT NOT NULL,
            FOREIGN KEY (session_id) REFERENCES driver_work_sessions(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_violations_session ON driver_violations(session_id);

        CREATE TABLE IF NOT EXISTS driver_freight_revenue (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            driver_id TEXT NOT NULL,
            amount TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (session_id) REFERENCES driver_work_sessions(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_revenue_session ON driver_freight_revenue(session_id);

        CREATE TABLE IF NOT EXISTS driver_fuel_expenses (
            id TEXT PRIMARY KEY,
            driver_id TEXT NOT NULL,
            amount TEXT NOT NULL,
            liters TEXT,
            incurred_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_fuel_driver_incurred
            ON driver_fuel_expenses(driver_id, incurred_at);

        CREATE TABLE IF NOT EXISTS driver_payroll (
            id TEXT PRIMARY KEY,
            driver_id TEXT NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            year INTEGER NOT NULL,
            session_count INTEGER NOT NULL,
            normal_minutes INTEGER NOT NULL,
            normal_hours TEXT NOT NULL,
            normal_rate TEXT NOT NULL,
            normal_amount TEXT NOT NULL,
            overtime_minutes INTEGER NOT NULL,
            overtime_hours TEXT NOT NULL,
            overtime_rate TEXT NOT NULL,
            overtime_amount TEXT NOT NULL,
            waiting_minutes INTEGER NOT NULL,
            waiting_hours TEXT NOT NULL,
            waiting_rate TEXT NOT NULL,
            waiting_amount TEXT NOT NULL,
            base_salary TEXT NOT NULL,
            total_freight_revenue TEXT NOT NULL,
            total_fuel TEXT NOT NULL,
            levy_amount TEXT NOT NULL,
            bonus_base TEXT NOT NULL,
            bonus_amount TEXT NOT NULL,
            gross_total TEXT NOT NULL,
            net_total TEXT NOT NULL,
            status TEXT NOT NULL,
            levy_percent TEXT NOT NULL,
            bonus_percent TEXT NOT NULL,
            config_effective_date TEXT NOT NULL,
            computed_at TEXT NOT NULL,
            UNIQUE (driver_id, month, year)
        );
        ",
    )?;
    Ok(())
}

impl WorkStore for SqliteStore {
    fn session(&self, session_id: &str) -> StoreResult<Option<WorkSession>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM driver_work_sessions WHERE id = ?"),
                [session_id],
                SessionRow::from_row,
            )
            .optional()?;
        row.map(SessionRow::decode).transpose()
    }

    fn session_events(&self, session_id: &str) -> StoreResult<Vec<WorkEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "
            SELECT id, session_id, type, start_time, end_time, duration_minutes
            FROM driver_work_events
            WHERE session_id = ?
            ORDER BY start_time ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([session_id], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                session_id: row.get(1)?,
                activity: row.get(2)?,
                start_time: row.get(3)?,
                end_time: row.get(4)?,
                duration_minutes: row.get(5)?,
            })
        })?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?.decode()?);
        }
        Ok(events)
    }

    fn previous_session_end(
        &self,
        driver_id: &str,
        before: DateTime<Utc>,
        exclude_session_id: &str,
    ) -> StoreResult<Option<DateTime<Utc>>> {
        let conn = self.conn()?;
        let row: Option<(String, Option<String>)> = conn
            .query_row(
                "
                SELECT id, end_time
                FROM driver_work_sessions
                WHERE driver_id = ? AND start_time < ? AND id != ?
                ORDER BY start_time DESC, id DESC
                LIMIT 1
                ",
                params![driver_id, format_timestamp(before), exclude_session_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        match row {
            Some((id, Some(end))) => parse_timestamp("driver_work_sessions", &id, &end).map(Some),
            _ => Ok(None),
        }
    }

    fn replace_violations(&self, session_id: &str, violations: &[Violation]) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM driver_violations WHERE session_id = ?",
            [session_id],
        )?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO driver_violations
                (id, session_id, driver_id, kind, severity, measured_value, allowed_value, occurred_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for violation in violations {
                inserted += stmt.execute(params![
                    violation.id.to_string(),
                    violation.session_id,
                    violation.driver_id,
                    violation.kind.as_str(),
                    violation.severity.as_str(),
                    violation.measured_value,
                    violation.allowed_value,
                    format_timestamp(violation.occurred_at),
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn session_violations(&self, session_id: &str) -> StoreResult<Vec<Violation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "
            SELECT id, session_id, driver_id, kind, severity, measured_value, allowed_value, occurred_at
            FROM driver_violations
            WHERE session_id = ?
            ORDER BY occurred_at ASC, kind ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([session_id], |row| {
            Ok(ViolationRow {
                id: row.get(0)?,
                session_id: row.get(1)?,
                driver_id: row.get(2)?,
                kind: row.get(3)?,
                severity: row.get(4)?,
                measured_value: row.get(5)?,
                allowed_value: row.get(6)?,
                occurred_at: row.get(7)?,
            })
        })?;
        let mut violations = Vec::new();
        for row in rows {
            violations.push(row?.decode()?);
        }
        Ok(violations)
    }

    fn update_session_totals(
        &self,
        session_id: &str,
        totals: &SessionTotals,
        overtime_minutes: i64,
    ) -> StoreResult<()> {
        self.conn()?.execute(
            "
            UPDATE driver_work_sessions
            SET total_worked_minutes = ?, total_driving_minutes = ?,
                total_waiting_minutes = ?, total_rest_minutes = ?, overtime_minutes = ?
            WHERE id = ?
            ",
            params![
                totals.total_worked_minutes,
                totals.total_driving_minutes,
                totals.total_waiting_minutes,
                totals.total_rest_minutes,
                overtime_minutes,
                session_id,
            ],
        )?;
        Ok(())
    }

    fn driver_exists(&self, driver_id: &str) -> StoreResult<bool> {
        let conn = self.conn()?;
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM driver_work_sessions WHERE driver_id = ?)",
            [driver_id],
            |row| row.get(0),
        )?;
        Ok(exists != 0)
    }

    fn drivers_with_completed_sessions(&self, period: PayrollPeriod) -> StoreResult<Vec<String>> {
        let (start, end) = period.bounds();
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "
            SELECT DISTINCT driver_id
            FROM driver_work_sessions
            WHERE status = 'completed' AND start_time >= ? AND start_time < ?
            ORDER BY driver_id ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![format_timestamp(start), format_timestamp(end)],
            |row| row.get::<_, String>(0),
        )?;
        let mut drivers = Vec::new();
        for row in rows {
            drivers.push(row?);
        }
        Ok(drivers)
    }

    fn completed_sessions(
        &self,
        driver_id: &str,
        period: PayrollPeriod,
    ) -> StoreResult<Vec<WorkSession>> {
        let (start, end) = period.bounds();
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM driver_work_sessions
             WHERE driver_id = ? AND status = 'completed' AND start_time >= ? AND start_time < ?
             ORDER BY start_time ASC, id ASC"
        ))?;
        let rows = stmt.query_map(
            params![driver_id, format_timestamp(start), format_timestamp(end)],
            SessionRow::from_row,
        )?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?.decode()?);
        }
        Ok(sessions)
    }

    fn freight_revenue_for_sessions(
        &self,
        session_ids: &[String],
    ) -> StoreResult<Vec<FreightRevenue>> {
        if session_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; session_ids.len()].join(", ");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, session_id, driver_id, amount, recorded_at
             FROM driver_freight_revenue
             WHERE session_id IN ({placeholders})
             ORDER BY recorded_at ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params_from_iter(session_ids.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        let mut revenue = Vec::new();
        for row in rows {
            let (id, session_id, driver_id, amount, recorded_at) = row?;
            let table = "driver_freight_revenue";
            revenue.push(FreightRevenue {
                amount: parse_decimal(table, &id, &amount)?,
                recorded_at: parse_timestamp(table, &id, &recorded_at)?,
                id,
                session_id,
                driver_id,
            });
        }
        Ok(revenue)
    }

    fn fuel_expenses(&self, driver_id: &str, period: PayrollPeriod) -> StoreResult<Vec<FuelExpense>> {
        let (start, end) = period.bounds();
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "
            SELECT id, driver_id, amount, liters, incurred_at
            FROM driver_fuel_expenses
            WHERE driver_id = ? AND incurred_at >= ? AND incurred_at < ?
            ORDER BY incurred_at ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![driver_id, format_timestamp(start), format_timestamp(end)],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )?;
        let mut expenses = Vec::new();
        for row in rows {
            let (id, driver_id, amount, liters, incurred_at) = row?;
            let table = "driver_fuel_expenses";
            expenses.push(FuelExpense {
                amount: parse_decimal(table, &id, &amount)?,
                liters: liters
                    .map(|l| parse_decimal(table, &id, &l))
                    .transpose()?,
                incurred_at: parse_timestamp(table, &id, &incurred_at)?,
                id,
                driver_id,
            });
        }
        Ok(expenses)
    }

    fn payroll_record(
        &self,
        driver_id: &str,
        period: PayrollPeriod,
    ) -> StoreResult<Option<PayrollRecord>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {PAYROLL_COLUMNS} FROM driver_payroll
                     WHERE driver_id = ? AND month = ? AND year = ?"
                ),
                params![driver_id, period.month, period.year],
                PayrollRow::from_row,
            )
            .optional()?;
        row.map(PayrollRow::decode).transpose()
    }

    fn payroll_record_by_id(&self, payroll_id: Uuid) -> StoreResult<Option<PayrollRecord>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {PAYROLL_COLUMNS} FROM driver_payroll WHERE id = ?"),
                [payroll_id.to_string()],
                PayrollRow::from_row,
            )
            .optional()?;
        row.map(PayrollRow::decode).transpose()
    }

    fn insert_payroll(&self, record: &PayrollRecord) -> StoreResult<InsertOutcome> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            &format!(
                "INSERT INTO driver_payroll ({PAYROLL_COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                         ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT (driver_id, month, year) DO NOTHING"
            ),
            params![
                record.id.to_string(),
                record.driver_id,
                record.month,
                record.year,
                i64::try_from(record.session_count).unwrap_or(i64::MAX),
                record.normal.minutes,
                record.normal.hours.to_string(),
                record.normal.rate.to_string(),
                record.normal.amount.to_string(),
                record.overtime.minutes,
                record.overtime.hours.to_string(),
                record.overtime.rate.to_string(),
                record.overtime.amount.to_string(),
                record.waiting.minutes,
                record.waiting.hours.to_string(),
                record.waiting.rate.to_string(),
                record.waiting.amount.to_string(),
                record.base_salary.to_string(),
                record.total_freight_revenue.to_string(),
                record.total_fuel.to_string(),
                record.levy_amount.to_string(),
                record.bonus_base.to_string(),
                record.bonus_amount.to_string(),
                record.gross_total.to_string(),
                record.net_total.to_string(),
                record.status.as_str(),
                record.levy_percent.to_string(),
                record.bonus_percent.to_string(),
                record.config_effective_date.to_string(),
                format_timestamp(record.computed_at),
            ],
        )?;
        Ok(if inserted == 0 {
            InsertOutcome::AlreadyExists
        } else {
            InsertOutcome::Inserted
        })
    }

    fn advance_payroll_status(
        &self,
        payroll_id: Uuid,
        from: PayrollStatus,
        to: PayrollStatus,
    ) -> StoreResult<bool> {
        let updated = self.conn()?.execute(
            "UPDATE driver_payroll SET status = ? WHERE id = ? AND status = ?",
            params![to.as_str(), payroll_id.to_string(), from.as_str()],
        )?;
        Ok(updated == 1)
    }
}

struct SessionRow {
    id: String,
    driver_id: String,
    start_time: String,
    end_time: Option<String>,
    status: String,
    category: String,
    total_worked_minutes: i64,
    total_driving_minutes: i64,
    total_waiting_minutes: i64,
    total_rest_minutes: i64,
    overtime_minutes: i64,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            driver_id: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
            status: row.get(4)?,
            category: row.get(5)?,
            total_worked_minutes: row.get(6)?,
            total_driving_minutes: row.get(7)?,
            total_waiting_minutes: row.get(8)?,
            total_rest_minutes: row.get(9)?,
            overtime_minutes: row.get(10)?,
        })
    }

    fn decode(self) -> StoreResult<WorkSession> {
        let table = "driver_work_sessions";
        Ok(WorkSession {
            start_time: parse_timestamp(table, &self.id, &self.start_time)?,
            end_time: self
                .end_time
                .as_deref()
                .map(|end| parse_timestamp(table, &self.id, end))
                .transpose()?,
            status: parse_enum(table, &self.id, &self.status)?,
            category: parse_enum(table, &self.id, &self.category)?,
            totals: SessionTotals {
                total_worked_minutes: self.total_worked_minutes,
                total_driving_minutes: self.total_driving_minutes,
                total_waiting_minutes: self.total_waiting_minutes,
                total_rest_minutes: self.total_rest_minutes,
            },
            overtime_minutes: self.overtime_minutes,
            id: self.id,
            driver_id: self.driver_id,
        })
    }
}

struct EventRow {
    id: String,
    session_id: String,
    activity: String,
    start_time: String,
    end_time: Option<String>,
    duration_minutes: Option<i64>,
}

impl EventRow {
    fn decode(self) -> StoreResult<WorkEvent> {
        let table = "driver_work_events";
        Ok(WorkEvent {
            activity: parse_enum(table, &self.id, &self.activity)?,
            start_time: parse_timestamp(table, &self.id, &self.start_time)?,
            end_time: self
                .end_time
                .as_deref()
                .map(|end| parse_timestamp(table, &self.id, end))
                .transpose()?,
            duration_minutes: self.duration_minutes,
            id: self.id,
            session_id: self.session_id,
        })
    }
}

struct ViolationRow {
    id: String,
    session_id: String,
    driver_id: String,
    kind: String,
    severity: String,
    measured_value: i64,
    allowed_value: i64,
    occurred_at: String,
}

impl ViolationRow {
    fn decode(self) -> StoreResult<Violation> {
        let table = "driver_violations";
        Ok(Violation {
            id: parse_uuid(table, &self.id)?,
            kind: parse_enum(table, &self.id, &self.kind)?,
            severity: parse_enum(table, &self.id, &self.severity)?,
            occurred_at: parse_timestamp(table, &self.id, &self.occurred_at)?,
            measured_value: self.measured_value,
            allowed_value: self.allowed_value,
            session_id: self.session_id,
            driver_id: self.driver_id,
        })
    }
}

struct ComponentRow {
    minutes: i64,
    hours: String,
    rate: String,
    amount: String,
}

impl ComponentRow {
    fn from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            minutes: row.get(first)?,
            hours: row.get(first + 1)?,
            rate: row.get(first + 2)?,
            amount: row.get(first + 3)?,
        })
    }

    fn decode(self, id: &str) -> StoreResult<PayComponent> {
        let table = "driver_payroll";
        Ok(PayComponent {
            minutes: self.minutes,
            hours: parse_decimal(table, id, &self.hours)?,
            rate: parse_decimal(table, id, &self.rate)?,
            amount: parse_decimal(table, id, &self.amount)?,
        })
    }
}

struct PayrollRow {
    id: String,
    driver_id: String,
    month: u32,
    year: i32,
    session_count: i64,
    normal: ComponentRow,
    overtime: ComponentRow,
    waiting: ComponentRow,
    // Decimal columns 17..=24 in PAYROLL_COLUMNS order.
    amounts: [String; 8],
    status: String,
    levy_percent: String,
    bonus_percent: String,
    config_effective_date: String,
    computed_at: String,
}

impl PayrollRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            driver_id: row.get(1)?,
            month: row.get(2)?,
            year: row.get(3)?,
            session_count: row.get(4)?,
            normal: ComponentRow::from_row(row, 5)?,
            overtime: ComponentRow::from_row(row, 9)?,
            waiting: ComponentRow::from_row(row, 13)?,
            amounts: [
                row.get(17)?,
                row.get(18)?,
                row.get(19)?,
                row.get(20)?,
                row.get(21)?,
                row.get(22)?,
                row.get(23)?,
                row.get(24)?,
            ],
            status: row.get(25)?,
            levy_percent: row.get(26)?,
            bonus_percent: row.get(27)?,
            config_effective_date: row.get(28)?,
            computed_at: row.get(29)?,
        })
    }

    fn decode(self) -> StoreResult<PayrollRecord> {
        let table = "driver_payroll";
        let id = self.id.as_str();
        let [
            base_salary,
            total_freight_revenue,
            total_fuel,
            levy_amount,
            bonus_base,
            bonus_amount,
            gross_total,
            net_total,
        ] = &self.amounts;
        let config_effective_date =
            NaiveDate::from_str(&self.config_effective_date).map_err(|e| StoreError::Corrupt {
                table,
                id: id.to_string(),
                message: format!("invalid date '{}': {e}", self.config_effective_date),
            })?;
        Ok(PayrollRecord {
            id: parse_uuid(table, id)?,
            driver_id: self.driver_id.clone(),
            month: self.month,
            year: self.year,
            session_count: usize::try_from(self.session_count).unwrap_or_default(),
            normal: self.normal.decode(id)?,
            overtime: self.overtime.decode(id)?,
            waiting: self.waiting.decode(id)?,
            base_salary: parse_decimal(table, id, base_salary)?,
            total_freight_revenue: parse_decimal(table, id, total_freight_revenue)?,
            total_fuel: parse_decimal(table, id, total_fuel)?,
            levy_amount: parse_decimal(table, id, levy_amount)?,
            bonus_base: parse_decimal(table, id, bonus_base)?,
            bonus_amount: parse_decimal(table, id, bonus_amount)?,
            gross_total: parse_decimal(table, id, gross_total)?,
            net_total: parse_decimal(table, id, net_total)?,
            status: parse_enum(table, id, &self.status)?,
            levy_percent: parse_decimal(table, id, &self.levy_percent)?,
            bonus_percent: parse_decimal(table, id, &self.bonus_percent)?,
            config_effective_date,
            computed_at: parse_timestamp(table, id, &self.computed_at)?,
        })
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(table: &'static str, id: &str, value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            table,
            id: id.to_string(),
            message: format!("invalid timestamp '{value}': {e}"),
        })
}

fn parse_decimal(table: &'static str, id: &str, value: &str) -> StoreResult<Decimal> {
    Decimal::from_str(value).map_err(|e| StoreError::Corrupt {
        table,
        id: id.to_string(),
        message: format!("invalid decimal '{value}': {e}"),
    })
}

fn parse_uuid(table: &'static str, id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|e| StoreError::Corrupt {
        table,
        id: id.to_string(),
        message: format!("invalid uuid: {e}"),
    })
}

fn parse_enum<T: FromStr<Err = String>>(
    table: &'static str,
    id: &str,
    value: &str,
) -> StoreResult<T> {
    value.parse().map_err(|message| StoreError::Corrupt {
        table,
        id: id.to_string(),
        message,
    })
}

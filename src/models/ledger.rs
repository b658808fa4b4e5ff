//! Freight revenue and fuel expense records feeding the gratification.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Freight revenue earned on one work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreightRevenue {
    /// Unique identifier for the entry.
    pub id: String,
    /// The session the freight was carried in.
    pub session_id: String,
    /// The driver who carried it.
    pub driver_id: String,
    /// Revenue amount.
    pub amount: Decimal,
    /// When the revenue was booked.
    pub recorded_at: DateTime<Utc>,
}

/// A fuel purchase charged to a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelExpense {
    /// Unique identifier for the entry.
    pub id: String,
    /// The driver the fuel was charged to.
    pub driver_id: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Volume purchased, when known.
    #[serde(default)]
    pub liters: Option<Decimal>,
    /// When the fuel was bought.
    pub incurred_at: DateTime<Utc>,
}

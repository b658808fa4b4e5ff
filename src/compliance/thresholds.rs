//! Regulatory limits for professional drivers.
//!
//! All values are minutes. They follow the professional driver statute
//! (Lei 13.103/2015) as incorporated into the CLT and the CTB.

/// Normal daily journey.
pub const NORMAL_JOURNEY_MINUTES: i64 = 480;

/// Overtime allowed on top of the normal journey.
pub const MAX_OVERTIME_MINUTES: i64 = 240;

/// Maximum journey including overtime.
pub const MAX_JOURNEY_MINUTES: i64 = NORMAL_JOURNEY_MINUTES + MAX_OVERTIME_MINUTES;

/// Maximum uninterrupted driving for cargo transport.
pub const CONTINUOUS_DRIVING_LIMIT_CARGO: i64 = 330;

/// Maximum uninterrupted driving for passenger transport.
pub const CONTINUOUS_DRIVING_LIMIT_PASSENGER: i64 = 240;

/// A stop at least this long between two driving periods resets continuous driving.
pub const QUALIFYING_BREAK_MINUTES: i64 = 30;

/// Minimum rest between the end of one session and the start of the next.
pub const MIN_INTERJOURNEY_REST_MINUTES: i64 = 660;

/// Minimum meal break.
pub const MIN_MEAL_BREAK_MINUTES: i64 = 60;

/// Statute reference for continuous driving and mandatory stops.
pub const CONTINUOUS_DRIVING_REF: &str = "CTB art. 67-C";

/// Statute reference for the daily journey and overtime.
pub const JOURNEY_REF: &str = "CLT art. 235-C caput";

/// Statute reference for the meal break.
pub const MEAL_BREAK_REF: &str = "CLT art. 235-C §2";

/// Statute reference for inter-journey rest.
pub const INTERJOURNEY_REST_REF: &str = "CLT art. 235-C §3";

/// Minutes worked beyond the normal journey, never negative.
///
/// # Examples
///
/// ```
/// use fleet_compliance_engine::compliance::thresholds::overtime_minutes;
///
/// assert_eq!(overtime_minutes(750), 270);
/// assert_eq!(overtime_minutes(300), 0);
/// ```
pub const fn overtime_minutes(total_worked_minutes: i64) -> i64 {
    let excess = total_worked_minutes - NORMAL_JOURNEY_MINUTES;
    if excess > 0 { excess } else { 0 }
}

/// Minutes paid at the normal rate: the worked total capped at the normal journey.
pub const fn normal_minutes(total_worked_minutes: i64) -> i64 {
    if total_worked_minutes < 0 {
        0
    } else if total_worked_minutes > NORMAL_JOURNEY_MINUTES {
        NORMAL_JOURNEY_MINUTES
    } else {
        total_worked_minutes
    }
}

//! Work-time compliance rules.
//!
//! This module contains the rule evaluator for driver work sessions: journey
//! aggregation, continuous driving, daily journey and overtime limits, meal
//! breaks and inter-journey rest. Each rule returns its findings together
//! with an [`AuditStep`](crate::models::AuditStep).

mod continuous_driving;
mod daily_journey;
mod evaluator;
mod interjourney_rest;
mod journey_totals;
mod meal_break;
mod recorder;
mod service;
pub mod thresholds;

pub use continuous_driving::{
    ContinuousDrivingBreach, ContinuousDrivingResult, ContinuousDrivingTracker,
    evaluate_continuous_driving,
};
pub use daily_journey::{JourneyRuleResult, evaluate_daily_journey, evaluate_overtime};
pub use evaluator::{SessionEvaluation, evaluate_session};
pub use interjourney_rest::{InterjourneyRestResult, evaluate_interjourney_rest};
pub use journey_totals::{JourneyAggregation, aggregate_journey};
pub use meal_break::{MealBreakResult, evaluate_meal_breaks};
pub use recorder::{RecordFailure, RecordOutcome, record_evaluation};
pub use service::{ComplianceReport, run_compliance_check};

//! Audit trace models.
//!
//! Every rule the evaluator applies records an [`AuditStep`] so a compliance
//! officer can see exactly which measurement led to which decision.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a rule decision.
///
/// # Example
///
/// ```
/// use fleet_compliance_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "meal_break".to_string(),
///     rule_name: "Minimum Meal Break".to_string(),
///     legal_ref: "CLT art. 235-C §2".to_string(),
///     input: serde_json::json!({"meal_minutes": [45]}),
///     output: serde_json::json!({"violations": 1}),
///     reasoning: "45 minute meal break is under the 60 minute minimum".to_string(),
/// };
/// assert_eq!(step.rule_id, "meal_break");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute behind the rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during evaluation.
///
/// Warnings do not block evaluation but the result may change once the
/// underlying data settles (for example an event that is still open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The complete audit trace for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrace {
    /// The sequence of rule steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during evaluation.
    pub warnings: Vec<AuditWarning>,
    /// The total evaluation duration in microseconds.
    pub duration_us: u64,
}

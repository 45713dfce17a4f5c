//! Simulation wire types
//!
//! Shapes exchanged with the backend `simulate` endpoint: the dry-run
//! request, the per-rule results it returns, and the match status derived
//! from them. Wire keys are camelCase on this surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `for`-wrapper progress reported for a simulated rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatus {
    /// Scheduling state, e.g. `would_schedule`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Remaining or configured hold time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u64>,
}

/// `for` status value meaning the rule's condition currently holds and a
/// duration timer would be started
pub const WOULD_SCHEDULE: &str = "would_schedule";

/// One rule's result within a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedRule {
    /// Rule id, unique within a result set
    pub id: i64,

    /// Display name
    pub name: String,

    /// Rule kind label
    pub kind: String,

    /// Evaluation priority
    pub priority: i64,

    /// Whether the rule matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,

    /// Opaque evaluation trace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<serde_json::Value>,

    /// Opaque preview of the actions that would run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions_preview: Option<serde_json::Value>,

    /// Duration-wrapper progress
    #[serde(rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_status: Option<ForStatus>,
}

impl SimulatedRule {
    /// Derive the match status for this entry.
    ///
    /// `matched` wins; a non-matched rule whose `for` status is
    /// [`WOULD_SCHEDULE`] reports as would-schedule; everything else is
    /// not-matched.
    pub fn status(&self) -> RuleStatus {
        if self.matched == Some(true) {
            return RuleStatus::Matched;
        }
        let would_schedule = self
            .for_status
            .as_ref()
            .and_then(|f| f.status.as_deref())
            .map(|status| status == WOULD_SCHEDULE)
            .unwrap_or(false);
        if would_schedule {
            RuleStatus::WouldSchedule
        } else {
            RuleStatus::NotMatched
        }
    }
}

/// Derived match status of a rule within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Matched,
    WouldSchedule,
    NotMatched,
}

impl RuleStatus {
    /// Wire string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStatus::Matched => "matched",
            RuleStatus::WouldSchedule => "would_schedule",
            RuleStatus::NotMatched => "not_matched",
        }
    }
}

/// Request body for a dry-run evaluation (consumed by the backend)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Hypothetical entity states, entity id → state
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub state_overrides: HashMap<String, String>,

    /// Pretend every `for` wrapper has already held this long
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assume_for_seconds: Option<u64>,

    /// Hypothetical alarm state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_state: Option<String>,
}

/// Result of one simulation run over all rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    /// Rules that matched or would schedule a duration timer
    pub matched_rules: Vec<SimulatedRule>,

    /// Rules that did not match
    pub non_matching_rules: Vec<SimulatedRule>,

    /// Aggregate counts, if the backend supplied them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SimulationSummary>,
}

impl SimulationResponse {
    /// Recompute the aggregate counts from the result lists
    pub fn summarize(&self) -> SimulationSummary {
        let mut matched = 0;
        let mut would_schedule = 0;
        for rule in &self.matched_rules {
            match rule.status() {
                RuleStatus::Matched => matched += 1,
                RuleStatus::WouldSchedule => would_schedule += 1,
                RuleStatus::NotMatched => {}
            }
        }
        SimulationSummary {
            evaluated: self.matched_rules.len() + self.non_matching_rules.len(),
            matched,
            would_schedule,
        }
    }
}

/// Aggregate counts over one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    /// Total rules evaluated
    pub evaluated: usize,

    /// Rules that matched
    pub matched: usize,

    /// Rules that would schedule a duration timer
    pub would_schedule: usize,
}

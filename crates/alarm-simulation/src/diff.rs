//! Simulation diff engine
//!
//! Compares two independent simulation runs (a baseline and a changed run)
//! and reports the rules whose derived match status differs. Rules present
//! in only one run are out of scope for comparison and silently skipped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::result::{RuleStatus, SimulationResponse};

/// One rule whose status changed between the baseline and changed runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedRule {
    /// Rule id
    pub id: i64,

    /// Status in the baseline run
    pub from: RuleStatus,

    /// Status in the changed run
    pub to: RuleStatus,
}

/// Result of comparing two simulation runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDiff {
    /// Changed rules, sorted by the changed run's priority descending,
    /// then name ascending
    pub changed_rules: Vec<ChangedRule>,
}

/// Per-rule record after normalizing one run
struct StatusRecord {
    status: RuleStatus,
    priority: i64,
    name: String,
}

/// Flatten one run into a map keyed by rule id.
///
/// Matched-list entries keep their derived status and take precedence over
/// non-matching-list entries sharing an id; remaining non-matching entries
/// are recorded as not-matched. The lists are assumed disjoint per id in
/// practice; the precedence rule only fixes behavior if they are not.
fn normalize(response: &SimulationResponse) -> HashMap<i64, StatusRecord> {
    let mut records = HashMap::new();
    for rule in &response.matched_rules {
        records.insert(
            rule.id,
            StatusRecord {
                status: rule.status(),
                priority: rule.priority,
                name: rule.name.clone(),
            },
        );
    }
    for rule in &response.non_matching_rules {
        records.entry(rule.id).or_insert_with(|| StatusRecord {
            status: RuleStatus::NotMatched,
            priority: rule.priority,
            name: rule.name.clone(),
        });
    }
    records
}

/// Compute which rules changed match status between two runs.
///
/// Pure and order-independent on the input lists, aside from the documented
/// matched-over-non-matching precedence for duplicate ids within one run.
pub fn compute_simulation_diff(
    base: &SimulationResponse,
    changed: &SimulationResponse,
) -> SimulationDiff {
    let base_records = normalize(base);
    let changed_records = normalize(changed);
    debug!(
        base = base_records.len(),
        changed = changed_records.len(),
        "comparing simulation runs"
    );

    let mut entries: Vec<(ChangedRule, i64, &str)> = Vec::new();
    for (id, after) in &changed_records {
        let Some(before) = base_records.get(id) else {
            continue;
        };
        if before.status != after.status {
            entries.push((
                ChangedRule {
                    id: *id,
                    from: before.status,
                    to: after.status,
                },
                after.priority,
                after.name.as_str(),
            ));
        }
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(b.2)));

    SimulationDiff {
        changed_rules: entries.into_iter().map(|(entry, _, _)| entry).collect(),
    }
}

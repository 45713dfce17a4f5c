//! Flat rule builder
//!
//! The dashboard edits rules as a flat list of condition and action rows
//! plus one logical operator and one optional duration. [`BuilderState`]
//! bridges that representation and the canonical nested [`RuleDefinition`]:
//! building is total, hydration is best-effort and reports unrepresentable
//! shapes as `None` so the caller can fall back to raw JSON editing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::node::{
    ActionNode, AlarmStateInCondition, ConditionNode, EntityStateCondition, ForNode,
    FrigatePersonDetectedCondition, LogicalNode, LogicalOp, RuleDefinition, WhenNode,
};

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// Client-side row identifier.
///
/// Used only for list reconciliation in the UI; never serialized into rule
/// JSON and not stable across saves. Fresh ids come from a process-wide
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    /// Allocate a fresh row id
    pub fn next() -> Self {
        RowId(NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// The condition kinds a builder row can hold.
///
/// These are the leaf conditions; negation is a row flag rather than a
/// nested node, and combinators exist only as the builder-level operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionLeaf {
    EntityState(EntityStateCondition),
    AlarmStateIn(AlarmStateInCondition),
    FrigatePersonDetected(FrigatePersonDetectedCondition),
}

impl ConditionLeaf {
    fn into_node(self) -> ConditionNode {
        match self {
            ConditionLeaf::EntityState(condition) => ConditionNode::EntityState(condition),
            ConditionLeaf::AlarmStateIn(condition) => ConditionNode::AlarmStateIn(condition),
            ConditionLeaf::FrigatePersonDetected(condition) => {
                ConditionNode::FrigatePersonDetected(condition)
            }
        }
    }
}

/// One editable condition row
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionRow {
    /// Client-only row id
    pub id: RowId,

    /// Whether the condition is negated
    pub negate: bool,

    /// The condition itself
    pub condition: ConditionLeaf,
}

impl ConditionRow {
    /// New row with a fresh id
    pub fn new(condition: ConditionLeaf) -> Self {
        Self {
            id: RowId::next(),
            negate: false,
            condition,
        }
    }

    /// New negated row with a fresh id
    pub fn negated(condition: ConditionLeaf) -> Self {
        Self {
            id: RowId::next(),
            negate: true,
            condition,
        }
    }

    fn to_node(&self) -> ConditionNode {
        let node = self.condition.clone().into_node();
        if self.negate {
            ConditionNode::not(node)
        } else {
            node
        }
    }
}

/// One editable action row
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    /// Client-only row id
    pub id: RowId,

    /// The action itself
    pub action: ActionNode,
}

impl ActionRow {
    /// New row with a fresh id
    pub fn new(action: ActionNode) -> Self {
        Self {
            id: RowId::next(),
            action,
        }
    }
}

/// Flat, UI-editable representation of a rule
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuilderState {
    /// Combinator applied when there are two or more conditions
    pub operator: LogicalOp,

    /// Overall hold duration, if any
    pub for_seconds: Option<u64>,

    /// Condition rows
    pub conditions: Vec<ConditionRow>,

    /// Action rows
    pub actions: Vec<ActionRow>,
}

impl BuilderState {
    /// Build the canonical nested definition from this builder state.
    ///
    /// Total and deterministic. A single condition becomes the when-node
    /// directly, never a one-child combinator; zero conditions become the
    /// empty node; `for_seconds` wraps the result last. Row ids are
    /// dropped.
    pub fn build(&self) -> RuleDefinition {
        let mut nodes: Vec<ConditionNode> = self.conditions.iter().map(ConditionRow::to_node).collect();

        let mut when = match nodes.len() {
            0 => WhenNode::Empty,
            1 => WhenNode::Condition(nodes.remove(0)),
            _ => WhenNode::Logical(LogicalNode {
                op: self.operator,
                conditions: nodes,
            }),
        };

        if let Some(seconds) = self.for_seconds {
            when = WhenNode::For(ForNode {
                seconds,
                child: Box::new(when),
            });
        }

        RuleDefinition {
            when,
            then: self.actions.iter().map(|row| row.action.clone()).collect(),
        }
    }

    /// Reconstruct builder rows from a stored definition, best-effort.
    ///
    /// Returns `None` for shapes the flat builder cannot represent: a `for`
    /// nested inside a `for`, a double negation, or a combinator with fewer
    /// than two children (which [`build`](Self::build) never emits, so
    /// accepting one would break the round-trip guarantee). For every
    /// accepted definition, `hydrate(rule).build() == rule`. Row ids are
    /// freshly generated.
    pub fn hydrate(rule: &RuleDefinition) -> Option<Self> {
        let (for_seconds, inner) = match &rule.when {
            WhenNode::For(node) => {
                if matches!(*node.child, WhenNode::For(_)) {
                    debug!("nested duration wrappers are not editable in the flat builder");
                    return None;
                }
                (Some(node.seconds), node.child.as_ref())
            }
            other => (None, other),
        };

        let (operator, nodes): (LogicalOp, Vec<&ConditionNode>) = match inner {
            WhenNode::Empty => (LogicalOp::default(), Vec::new()),
            WhenNode::Condition(node) => (LogicalOp::default(), vec![node]),
            WhenNode::Logical(logical) => {
                if logical.conditions.len() < 2 {
                    debug!(
                        op = logical.op.as_str(),
                        children = logical.conditions.len(),
                        "combinator with fewer than two children is not builder-representable"
                    );
                    return None;
                }
                (logical.op, logical.conditions.iter().collect())
            }
            // Nested `for` was rejected above.
            WhenNode::For(_) => return None,
        };

        let mut conditions = Vec::with_capacity(nodes.len());
        for node in nodes {
            conditions.push(hydrate_condition(node)?);
        }

        let actions = rule
            .then
            .iter()
            .map(|action| ActionRow::new(action.clone()))
            .collect();

        Some(BuilderState {
            operator,
            for_seconds,
            conditions,
            actions,
        })
    }
}

fn hydrate_condition(node: &ConditionNode) -> Option<ConditionRow> {
    let (negate, leaf_node) = match node {
        ConditionNode::Not(not) => (true, not.child.as_ref()),
        other => (false, other),
    };

    let condition = match leaf_node {
        ConditionNode::EntityState(condition) => ConditionLeaf::EntityState(condition.clone()),
        ConditionNode::AlarmStateIn(condition) => ConditionLeaf::AlarmStateIn(condition.clone()),
        ConditionNode::FrigatePersonDetected(condition) => {
            ConditionLeaf::FrigatePersonDetected(condition.clone())
        }
        ConditionNode::Not(_) => {
            debug!("double negation is not editable in the flat builder");
            return None;
        }
    };

    Some(ConditionRow {
        id: RowId::next(),
        negate,
        condition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ActionNode, AlarmArmAction, ArmMode, NotCondition};
    use serde_json::json;

    fn door_condition() -> ConditionLeaf {
        ConditionLeaf::EntityState(EntityStateCondition {
            entity_id: "binary_sensor.front_door".to_string(),
            state: "on".to_string(),
            source: None,
        })
    }

    fn armed_condition() -> ConditionLeaf {
        ConditionLeaf::AlarmStateIn(AlarmStateInCondition {
            states: vec!["armed_away".to_string(), "armed_home".to_string()],
        })
    }

    #[test]
    fn test_row_ids_are_unique() {
        let a = ConditionRow::new(door_condition());
        let b = ConditionRow::new(door_condition());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_zero_conditions_build_empty_when() {
        let state = BuilderState::default();
        let rule = state.build();
        assert_eq!(rule, RuleDefinition::empty());
    }

    #[test]
    fn test_single_condition_builds_without_wrapper() {
        let state = BuilderState {
            conditions: vec![ConditionRow::new(door_condition())],
            ..Default::default()
        };

        let rule = state.build();
        assert!(matches!(
            rule.when,
            WhenNode::Condition(ConditionNode::EntityState(_))
        ));
    }

    #[test]
    fn test_two_conditions_build_logical_wrapper() {
        let state = BuilderState {
            operator: LogicalOp::Any,
            conditions: vec![
                ConditionRow::new(door_condition()),
                ConditionRow::new(armed_condition()),
            ],
            ..Default::default()
        };

        let rule = state.build();
        if let WhenNode::Logical(logical) = rule.when {
            assert_eq!(logical.op, LogicalOp::Any);
            assert_eq!(logical.conditions.len(), 2);
        } else {
            panic!("expected logical when-node");
        }
    }

    #[test]
    fn test_negate_flag_wraps_not() {
        let state = BuilderState {
            conditions: vec![ConditionRow::negated(armed_condition())],
            ..Default::default()
        };

        let rule = state.build();
        assert!(matches!(
            rule.when,
            WhenNode::Condition(ConditionNode::Not(_))
        ));
    }

    #[test]
    fn test_duration_wraps_last() {
        let state = BuilderState {
            for_seconds: Some(300),
            conditions: vec![ConditionRow::new(door_condition())],
            ..Default::default()
        };

        let rule = state.build();
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            value,
            json!({
                "when": {
                    "op": "for",
                    "seconds": 300,
                    "child": {
                        "op": "entity_state",
                        "entity_id": "binary_sensor.front_door",
                        "state": "on"
                    }
                },
                "then": []
            })
        );
    }

    #[test]
    fn test_row_ids_never_serialize() {
        let state = BuilderState {
            conditions: vec![ConditionRow::new(door_condition())],
            actions: vec![ActionRow::new(ActionNode::AlarmTrigger)],
            ..Default::default()
        };

        let value = serde_json::to_value(state.build()).unwrap();
        let text = value.to_string();
        assert!(!text.contains("row-"));
        assert!(!text.contains("\"id\""));
    }

    #[test]
    fn test_hydrate_round_trips_accepted_shapes() {
        let shapes = vec![
            BuilderState::default(),
            BuilderState {
                conditions: vec![ConditionRow::new(door_condition())],
                ..Default::default()
            },
            BuilderState {
                operator: LogicalOp::Any,
                for_seconds: Some(120),
                conditions: vec![
                    ConditionRow::negated(door_condition()),
                    ConditionRow::new(armed_condition()),
                ],
                actions: vec![
                    ActionRow::new(ActionNode::AlarmArm(AlarmArmAction { mode: ArmMode::Night })),
                    ActionRow::new(ActionNode::AlarmDisarm),
                ],
            },
            BuilderState {
                for_seconds: Some(60),
                ..Default::default()
            },
        ];

        for state in shapes {
            let rule = state.build();
            let hydrated = BuilderState::hydrate(&rule).expect("shape should be hydratable");
            assert_eq!(hydrated.build(), rule);
        }
    }

    #[test]
    fn test_hydrate_rejects_nested_for() {
        let rule = RuleDefinition {
            when: WhenNode::for_seconds(60, WhenNode::for_seconds(30, WhenNode::Empty)),
            then: vec![],
        };
        assert_eq!(BuilderState::hydrate(&rule), None);
    }

    #[test]
    fn test_hydrate_rejects_double_negation() {
        let inner = ConditionNode::AlarmStateIn(AlarmStateInCondition {
            states: vec!["disarmed".to_string()],
        });
        let rule = RuleDefinition {
            when: WhenNode::Condition(ConditionNode::Not(NotCondition {
                child: Box::new(ConditionNode::not(inner)),
            })),
            then: vec![],
        };
        assert_eq!(BuilderState::hydrate(&rule), None);
    }

    #[test]
    fn test_hydrate_rejects_single_child_combinator() {
        // `build` never emits this shape, so accepting it would break the
        // round-trip guarantee.
        let rule = RuleDefinition {
            when: WhenNode::all(vec![ConditionNode::AlarmStateIn(AlarmStateInCondition {
                states: vec!["triggered".to_string()],
            })]),
            then: vec![],
        };
        assert_eq!(BuilderState::hydrate(&rule), None);
    }

    #[test]
    fn test_hydrate_recovers_negate_flag_and_duration() {
        let state = BuilderState {
            for_seconds: Some(45),
            conditions: vec![
                ConditionRow::negated(door_condition()),
                ConditionRow::new(armed_condition()),
            ],
            ..Default::default()
        };

        let hydrated = BuilderState::hydrate(&state.build()).unwrap();
        assert_eq!(hydrated.for_seconds, Some(45));
        assert!(hydrated.conditions[0].negate);
        assert!(!hydrated.conditions[1].negate);
    }
}

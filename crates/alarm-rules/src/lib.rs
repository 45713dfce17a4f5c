//! Rule definition language
//!
//! This crate provides the rule-definition subsystem of the alarm platform:
//! the tagged-union node model for automation rules, validation of untyped
//! JSON against the rule grammar, and the bridge between the dashboard's
//! flat rule builder and the canonical nested form.
//!
//! # Architecture
//!
//! ```text
//! RULE = WHEN (condition tree) → THEN (action list)
//! ```
//!
//! - **When-node**: empty (always true), a single condition, an `all`/`any`
//!   combinator, or a `for` duration wrapper
//! - **Condition**: entity state, Frigate person detection, alarm state,
//!   or a negation
//! - **Action**: alarm control, device calls, notifications
//!
//! # Key Types
//!
//! - [`RuleDefinition`] - a complete `{when, then}` rule
//! - [`WhenNode`] / [`ConditionNode`] / [`ActionNode`] - the node model
//! - [`ValidationError`] - structural rejection with a JSON path
//! - [`BuilderState`] - the flat, UI-editable representation

pub mod builder;
pub mod node;
pub mod validate;

pub use builder::{ActionRow, BuilderState, ConditionLeaf, ConditionRow, RowId};
pub use node::{
    ActionNode, Aggregation, AlarmArmAction, AlarmStateInCondition, ArmMode, ConditionNode,
    EntityStateCondition, ForNode, FrigatePersonDetectedCondition, HaCallServiceAction,
    LogicalNode, LogicalOp, NotCondition, PropertyKey, RuleDefinition, SendNotificationAction,
    StateSource, SwitchState, UnavailablePolicy, ValueId, WhenNode, Zigbee2mqttLightAction,
    Zigbee2mqttSetValueAction, Zigbee2mqttSwitchAction, ZwavejsSetValueAction,
};
pub use validate::{parse_action, parse_condition, parse_when, ValidationError, ValidationResult};

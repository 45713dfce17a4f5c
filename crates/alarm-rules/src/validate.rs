//! Rule definition validation
//!
//! Recursive-descent validation of untyped JSON against the `{when, then}`
//! grammar. No coercion is performed: a numeric string is not a number, a
//! bare service name is not a `domain.service` identifier. Failures are
//! reported as [`ValidationError`] values carrying the JSON path of the
//! offending field; the validator never panics on malformed input.
//!
//! For optional fields, JSON `null` is treated the same as an absent key.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::node::{
    ActionNode, AlarmArmAction, AlarmStateInCondition, ArmMode, ConditionNode,
    EntityStateCondition, ForNode, FrigatePersonDetectedCondition, HaCallServiceAction,
    LogicalNode, LogicalOp, NotCondition, PropertyKey, RuleDefinition, SendNotificationAction,
    StateSource, SwitchState, ValueId, WhenNode, Zigbee2mqttLightAction, Zigbee2mqttSetValueAction,
    Zigbee2mqttSwitchAction, ZwavejsSetValueAction,
};
use crate::node::{Aggregation, UnavailablePolicy};

/// Structural validation failure, with the JSON path of the offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rule definition at {path}: {reason}")]
pub struct ValidationError {
    /// Dotted JSON path, rooted at `$` (e.g. `$.when.conditions[2].cameras`)
    pub path: String,

    /// What was expected there
    pub reason: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

impl RuleDefinition {
    /// Validate untyped JSON against the rule grammar.
    ///
    /// Accepts the minimal rule `{"when": {}, "then": []}`. Rejects
    /// non-objects, a missing `when` or `then`, a `when` outside the
    /// when-node grammar, a non-array `then`, and any invalid `then`
    /// element.
    pub fn parse(value: &Value) -> ValidationResult<Self> {
        let map = object(value, "$")?;
        let when = parse_when(require(map, "when", "$")?, "$.when")?;

        let then_value = require(map, "then", "$")?;
        let items = then_value
            .as_array()
            .ok_or_else(|| ValidationError::new("$.then", "expected an array"))?;
        let mut then = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            then.push(parse_action(item, &format!("$.then[{index}]"))?);
        }

        Ok(RuleDefinition { when, then })
    }
}

// Deserialization routes through the grammar validator, so serde entry
// points enforce the same structural rules as `RuleDefinition::parse`.
impl<'de> Deserialize<'de> for RuleDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RuleDefinition::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Validate a when-node: `{}`, a condition, `all`/`any`, or `for`.
pub fn parse_when(value: &Value, path: &str) -> ValidationResult<WhenNode> {
    let map = object(value, path)?;
    if map.is_empty() {
        return Ok(WhenNode::Empty);
    }

    match tag(map, "op", path)? {
        "all" => Ok(WhenNode::Logical(parse_logical(LogicalOp::All, map, path)?)),
        "any" => Ok(WhenNode::Logical(parse_logical(LogicalOp::Any, map, path)?)),
        "for" => {
            let seconds = integer_u64(require(map, "seconds", path)?, &join(path, "seconds"))?;
            let child = parse_when(require(map, "child", path)?, &join(path, "child"))?;
            Ok(WhenNode::For(ForNode {
                seconds,
                child: Box::new(child),
            }))
        }
        _ => Ok(WhenNode::Condition(parse_condition(value, path)?)),
    }
}

/// Validate a condition node: `entity_state`, `frigate_person_detected`,
/// `alarm_state_in`, or `not`. Combinator and duration tags are rejected
/// here; they are only valid at the when-node level.
pub fn parse_condition(value: &Value, path: &str) -> ValidationResult<ConditionNode> {
    let map = object(value, path)?;
    match tag(map, "op", path)? {
        "entity_state" => {
            let entity_id = string(require(map, "entity_id", path)?, &join(path, "entity_id"))?;
            let state = string(require(map, "state", path)?, &join(path, "state"))?;
            let source = match optional(map, "source") {
                Some(value) => Some(enum_tag(
                    value,
                    &join(path, "source"),
                    StateSource::parse,
                    "home_assistant, zwavejs, zigbee2mqtt or all",
                )?),
                None => None,
            };
            Ok(ConditionNode::EntityState(EntityStateCondition {
                entity_id,
                state,
                source,
            }))
        }
        "frigate_person_detected" => {
            let cameras_path = join(path, "cameras");
            let cameras = string_list(require(map, "cameras", path)?, &cameras_path)?;
            if cameras.is_empty() {
                return Err(ValidationError::new(cameras_path, "expected a non-empty array"));
            }
            if let Some(index) = cameras.iter().position(String::is_empty) {
                return Err(ValidationError::new(
                    format!("{cameras_path}[{index}]"),
                    "expected a non-empty string",
                ));
            }

            let zones = match optional(map, "zones") {
                Some(value) => Some(string_list(value, &join(path, "zones"))?),
                None => None,
            };
            let within_seconds = integer_u64(
                require(map, "within_seconds", path)?,
                &join(path, "within_seconds"),
            )?;
            let min_confidence_pct = number(
                require(map, "min_confidence_pct", path)?,
                &join(path, "min_confidence_pct"),
            )?;
            let aggregation = enum_tag(
                require(map, "aggregation", path)?,
                &join(path, "aggregation"),
                Aggregation::parse,
                "latest, max or percentile",
            )?;
            let percentile = match optional(map, "percentile") {
                Some(value) => Some(number(value, &join(path, "percentile"))?),
                None => None,
            };
            let on_unavailable = enum_tag(
                require(map, "on_unavailable", path)?,
                &join(path, "on_unavailable"),
                UnavailablePolicy::parse,
                "treat_as_match or treat_as_no_match",
            )?;

            Ok(ConditionNode::FrigatePersonDetected(
                FrigatePersonDetectedCondition {
                    cameras,
                    zones,
                    within_seconds,
                    min_confidence_pct,
                    aggregation,
                    percentile,
                    on_unavailable,
                },
            ))
        }
        "alarm_state_in" => {
            let states_path = join(path, "states");
            let states = string_list(require(map, "states", path)?, &states_path)?;
            if states.is_empty() {
                return Err(ValidationError::new(states_path, "expected a non-empty array"));
            }
            Ok(ConditionNode::AlarmStateIn(AlarmStateInCondition { states }))
        }
        "not" => {
            let child = parse_condition(require(map, "child", path)?, &join(path, "child"))?;
            Ok(ConditionNode::Not(NotCondition {
                child: Box::new(child),
            }))
        }
        op @ ("all" | "any" | "for") => Err(ValidationError::new(
            join(path, "op"),
            format!("`{op}` is not a condition node"),
        )),
        op => Err(ValidationError::new(
            join(path, "op"),
            format!("unknown condition op `{op}`"),
        )),
    }
}

/// Validate an action node by its `type` tag.
pub fn parse_action(value: &Value, path: &str) -> ValidationResult<ActionNode> {
    let map = object(value, path)?;
    match tag(map, "type", path)? {
        "alarm_disarm" => Ok(ActionNode::AlarmDisarm),
        "alarm_trigger" => Ok(ActionNode::AlarmTrigger),
        "alarm_arm" => {
            let mode = enum_tag(
                require(map, "mode", path)?,
                &join(path, "mode"),
                ArmMode::parse,
                "away, home, night or vacation",
            )?;
            Ok(ActionNode::AlarmArm(AlarmArmAction { mode }))
        }
        "ha_call_service" => {
            let action_path = join(path, "action");
            let action = string(require(map, "action", path)?, &action_path)?;
            if !action.contains('.') {
                return Err(ValidationError::new(
                    action_path,
                    "expected a dotted `domain.service` identifier",
                ));
            }
            let entity_id = match optional(map, "entity_id") {
                Some(value) => Some(string_list(value, &join(path, "entity_id"))?),
                None => None,
            };
            let data = data_object(map, "data", path)?;
            Ok(ActionNode::HaCallService(HaCallServiceAction {
                action,
                entity_id,
                data,
            }))
        }
        "zwavejs_set_value" => {
            let node_id = integer_i64(require(map, "node_id", path)?, &join(path, "node_id"))?;
            let value_id = parse_value_id(require(map, "value_id", path)?, &join(path, "value_id"))?;
            let value = require(map, "value", path)?.clone();
            Ok(ActionNode::ZwavejsSetValue(ZwavejsSetValueAction {
                node_id,
                value_id,
                value,
            }))
        }
        "zigbee2mqtt_set_value" => {
            let entity_id = string(require(map, "entity_id", path)?, &join(path, "entity_id"))?;
            let value = require(map, "value", path)?.clone();
            Ok(ActionNode::Zigbee2mqttSetValue(Zigbee2mqttSetValueAction {
                entity_id,
                value,
            }))
        }
        "zigbee2mqtt_switch" => {
            let entity_id = string(require(map, "entity_id", path)?, &join(path, "entity_id"))?;
            let state = enum_tag(
                require(map, "state", path)?,
                &join(path, "state"),
                SwitchState::parse,
                "on or off",
            )?;
            Ok(ActionNode::Zigbee2mqttSwitch(Zigbee2mqttSwitchAction {
                entity_id,
                state,
            }))
        }
        "zigbee2mqtt_light" => {
            let entity_id = string(require(map, "entity_id", path)?, &join(path, "entity_id"))?;
            let state = enum_tag(
                require(map, "state", path)?,
                &join(path, "state"),
                SwitchState::parse,
                "on or off",
            )?;
            let brightness = match optional(map, "brightness") {
                Some(value) => Some(number(value, &join(path, "brightness"))?),
                None => None,
            };
            Ok(ActionNode::Zigbee2mqttLight(Zigbee2mqttLightAction {
                entity_id,
                state,
                brightness,
            }))
        }
        "send_notification" => {
            let provider = string(require(map, "provider", path)?, &join(path, "provider"))?;
            let message = string(require(map, "message", path)?, &join(path, "message"))?;
            let title = match optional(map, "title") {
                Some(value) => Some(string(value, &join(path, "title"))?),
                None => None,
            };
            let data = data_object(map, "data", path)?;
            Ok(ActionNode::SendNotification(SendNotificationAction {
                provider,
                message,
                title,
                data,
            }))
        }
        kind => Err(ValidationError::new(
            join(path, "type"),
            format!("unknown action type `{kind}`"),
        )),
    }
}

fn parse_logical(
    op: LogicalOp,
    map: &Map<String, Value>,
    path: &str,
) -> ValidationResult<LogicalNode> {
    let conditions_path = join(path, "conditions");
    let items = require(map, "conditions", path)?
        .as_array()
        .ok_or_else(|| ValidationError::new(conditions_path.clone(), "expected an array"))?;

    let mut conditions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        conditions.push(parse_condition(item, &format!("{conditions_path}[{index}]"))?);
    }
    Ok(LogicalNode { op, conditions })
}

fn parse_value_id(value: &Value, path: &str) -> ValidationResult<ValueId> {
    let map = object(value, path)?;
    let command_class = integer_i64(
        require(map, "commandClass", path)?,
        &join(path, "commandClass"),
    )?;
    let endpoint = match optional(map, "endpoint") {
        Some(value) => Some(integer_i64(value, &join(path, "endpoint"))?),
        None => None,
    };
    let property = property_key(require(map, "property", path)?, &join(path, "property"))?;
    let property_key = match optional(map, "propertyKey") {
        Some(value) => Some(property_key(value, &join(path, "propertyKey"))?),
        None => None,
    };
    Ok(ValueId {
        command_class,
        endpoint,
        property,
        property_key,
    })
}

// --- Field helpers ---

fn join(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

fn object<'a>(value: &'a Value, path: &str) -> ValidationResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::new(path, "expected an object"))
}

fn require<'a>(map: &'a Map<String, Value>, key: &str, path: &str) -> ValidationResult<&'a Value> {
    map.get(key)
        .ok_or_else(|| ValidationError::new(join(path, key), "missing required field"))
}

fn optional<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match map.get(key) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

fn tag<'a>(map: &'a Map<String, Value>, key: &str, path: &str) -> ValidationResult<&'a str> {
    require(map, key, path)?
        .as_str()
        .ok_or_else(|| ValidationError::new(join(path, key), "expected a string"))
}

fn string(value: &Value, path: &str) -> ValidationResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::new(path, "expected a string"))
}

fn string_list(value: &Value, path: &str) -> ValidationResult<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::new(path, "expected an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::new(format!("{path}[{index}]"), "expected a string"))
        })
        .collect()
}

fn integer_u64(value: &Value, path: &str) -> ValidationResult<u64> {
    value
        .as_u64()
        .ok_or_else(|| ValidationError::new(path, "expected a non-negative integer"))
}

fn integer_i64(value: &Value, path: &str) -> ValidationResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| ValidationError::new(path, "expected an integer"))
}

// Numbers are kept in their source representation (integer or float) so
// serialization re-emits the stored document byte-for-byte.
fn number(value: &Value, path: &str) -> ValidationResult<Number> {
    match value {
        Value::Number(number) => Ok(number.clone()),
        _ => Err(ValidationError::new(path, "expected a number")),
    }
}

fn enum_tag<T>(
    value: &Value,
    path: &str,
    parse: impl Fn(&str) -> Option<T>,
    expected: &'static str,
) -> ValidationResult<T> {
    let tag = value
        .as_str()
        .ok_or_else(|| ValidationError::new(path, "expected a string"))?;
    parse(tag).ok_or_else(|| ValidationError::new(path, format!("expected one of: {expected}")))
}

fn property_key(value: &Value, path: &str) -> ValidationResult<PropertyKey> {
    if let Some(name) = value.as_str() {
        return Ok(PropertyKey::Name(name.to_string()));
    }
    if let Some(index) = value.as_i64() {
        return Ok(PropertyKey::Index(index));
    }
    Err(ValidationError::new(path, "expected a string or an integer"))
}

fn data_object(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> ValidationResult<Option<Value>> {
    match optional(map, key) {
        Some(value) if value.is_object() => Ok(Some(value.clone())),
        Some(_) => Err(ValidationError::new(join(path, key), "expected an object")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_rule_is_accepted() {
        let rule = RuleDefinition::parse(&json!({"when": {}, "then": []})).unwrap();
        assert_eq!(rule, RuleDefinition::empty());
    }

    #[test]
    fn test_non_object_input_is_rejected() {
        assert!(RuleDefinition::parse(&json!(null)).is_err());
        assert!(RuleDefinition::parse(&json!("rule")).is_err());
        assert!(RuleDefinition::parse(&json!([{"when": {}, "then": []}])).is_err());
    }

    #[test]
    fn test_missing_keys_are_rejected() {
        let err = RuleDefinition::parse(&json!({"when": {}})).unwrap_err();
        assert_eq!(err.path, "$.then");

        let err = RuleDefinition::parse(&json!({"then": []})).unwrap_err();
        assert_eq!(err.path, "$.when");
    }

    #[test]
    fn test_then_must_be_an_array() {
        let err = RuleDefinition::parse(&json!({"when": {}, "then": {}})).unwrap_err();
        assert_eq!(err.path, "$.then");
        assert_eq!(err.reason, "expected an array");
    }

    #[test]
    fn test_entity_state_condition() {
        let rule = RuleDefinition::parse(&json!({
            "when": {
                "op": "entity_state",
                "entity_id": "binary_sensor.back_door",
                "state": "on",
                "source": "zigbee2mqtt"
            },
            "then": []
        }))
        .unwrap();

        assert!(matches!(
            rule.when,
            WhenNode::Condition(ConditionNode::EntityState(_))
        ));
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let err = RuleDefinition::parse(&json!({
            "when": {"op": "sun_below_horizon"},
            "then": []
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.when.op");
    }

    #[test]
    fn test_for_node_requires_integer_seconds() {
        let when = |seconds: Value| {
            json!({
                "when": {
                    "op": "for",
                    "seconds": seconds,
                    "child": {"op": "alarm_state_in", "states": ["armed_away"]}
                },
                "then": []
            })
        };

        assert!(RuleDefinition::parse(&when(json!(300))).is_ok());

        let err = RuleDefinition::parse(&when(json!("300"))).unwrap_err();
        assert_eq!(err.path, "$.when.seconds");
        let err = RuleDefinition::parse(&when(json!(-300))).unwrap_err();
        assert_eq!(err.path, "$.when.seconds");
    }

    #[test]
    fn test_for_child_is_recursively_validated() {
        let err = RuleDefinition::parse(&json!({
            "when": {
                "op": "for",
                "seconds": 60,
                "child": {"op": "entity_state", "entity_id": "lock.front"}
            },
            "then": []
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.when.child.state");
    }

    #[test]
    fn test_nested_for_is_valid_grammar() {
        let rule = RuleDefinition::parse(&json!({
            "when": {
                "op": "for",
                "seconds": 60,
                "child": {"op": "for", "seconds": 30, "child": {}}
            },
            "then": []
        }))
        .unwrap();
        assert!(matches!(rule.when, WhenNode::For(_)));
    }

    #[test]
    fn test_not_only_wraps_condition_nodes() {
        let err = RuleDefinition::parse(&json!({
            "when": {
                "op": "not",
                "child": {"op": "all", "conditions": []}
            },
            "then": []
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.when.child.op");
        assert_eq!(err.reason, "`all` is not a condition node");

        // Double negation is valid grammar.
        let rule = RuleDefinition::parse(&json!({
            "when": {
                "op": "not",
                "child": {
                    "op": "not",
                    "child": {"op": "alarm_state_in", "states": ["disarmed"]}
                }
            },
            "then": []
        }))
        .unwrap();
        assert!(matches!(rule.when, WhenNode::Condition(ConditionNode::Not(_))));
    }

    #[test]
    fn test_logical_children_are_conditions_not_when_nodes() {
        let err = RuleDefinition::parse(&json!({
            "when": {
                "op": "all",
                "conditions": [
                    {"op": "alarm_state_in", "states": ["armed_home"]},
                    {"op": "for", "seconds": 10, "child": {}}
                ]
            },
            "then": []
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.when.conditions[1].op");
    }

    #[test]
    fn test_frigate_condition_field_checks() {
        let base = json!({
            "op": "frigate_person_detected",
            "cameras": ["front_porch"],
            "within_seconds": 30,
            "min_confidence_pct": 72.5,
            "aggregation": "max",
            "on_unavailable": "treat_as_no_match"
        });
        let rule = |when: Value| json!({"when": when, "then": []});

        assert!(RuleDefinition::parse(&rule(base.clone())).is_ok());

        let mut empty_cameras = base.clone();
        empty_cameras["cameras"] = json!([]);
        let err = RuleDefinition::parse(&rule(empty_cameras)).unwrap_err();
        assert_eq!(err.path, "$.when.cameras");

        let mut blank_camera = base.clone();
        blank_camera["cameras"] = json!(["front_porch", ""]);
        let err = RuleDefinition::parse(&rule(blank_camera)).unwrap_err();
        assert_eq!(err.path, "$.when.cameras[1]");

        let mut string_confidence = base.clone();
        string_confidence["min_confidence_pct"] = json!("72.5");
        let err = RuleDefinition::parse(&rule(string_confidence)).unwrap_err();
        assert_eq!(err.path, "$.when.min_confidence_pct");

        let mut bad_aggregation = base;
        bad_aggregation["aggregation"] = json!("median");
        let err = RuleDefinition::parse(&rule(bad_aggregation)).unwrap_err();
        assert_eq!(err.path, "$.when.aggregation");
    }

    #[test]
    fn test_alarm_state_in_requires_non_empty_states() {
        let err = RuleDefinition::parse(&json!({
            "when": {"op": "alarm_state_in", "states": []},
            "then": []
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.when.states");
    }

    #[test]
    fn test_ha_call_service_requires_dotted_action() {
        let err = RuleDefinition::parse(&json!({
            "when": {},
            "then": [{"type": "ha_call_service", "action": "turn_on"}]
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.then[0].action");

        assert!(RuleDefinition::parse(&json!({
            "when": {},
            "then": [{"type": "ha_call_service", "action": "light.turn_on"}]
        }))
        .is_ok());
    }

    #[test]
    fn test_unknown_action_type_is_rejected() {
        let err = RuleDefinition::parse(&json!({
            "when": {},
            "then": [{"type": "alarm_disarm"}, {"type": "reboot_hub"}]
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.then[1].type");
    }

    #[test]
    fn test_zwavejs_value_id_checks() {
        let rule = RuleDefinition::parse(&json!({
            "when": {},
            "then": [{
                "type": "zwavejs_set_value",
                "node_id": 7,
                "value_id": {"commandClass": 38, "property": "targetValue"},
                "value": 255
            }]
        }))
        .unwrap();
        assert_eq!(rule.then.len(), 1);

        let err = RuleDefinition::parse(&json!({
            "when": {},
            "then": [{
                "type": "zwavejs_set_value",
                "node_id": 7,
                "value_id": {"commandClass": "38", "property": "targetValue"},
                "value": 255
            }]
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.then[0].value_id.commandClass");
    }

    #[test]
    fn test_notification_data_must_be_object() {
        let err = RuleDefinition::parse(&json!({
            "when": {},
            "then": [{
                "type": "send_notification",
                "provider": "pushover",
                "message": "hi",
                "data": "urgent"
            }]
        }))
        .unwrap_err();
        assert_eq!(err.path, "$.then[0].data");
    }

    #[test]
    fn test_null_optional_fields_are_treated_as_absent() {
        let rule = RuleDefinition::parse(&json!({
            "when": {
                "op": "entity_state",
                "entity_id": "sensor.hall",
                "state": "motion",
                "source": null
            },
            "then": [{
                "type": "send_notification",
                "provider": "pushover",
                "message": "motion",
                "title": null,
                "data": null
            }]
        }))
        .unwrap();

        if let WhenNode::Condition(ConditionNode::EntityState(condition)) = &rule.when {
            assert_eq!(condition.source, None);
        } else {
            panic!("expected entity_state condition");
        }
    }

    #[test]
    fn test_deserialize_goes_through_validator() {
        let ok: Result<RuleDefinition, _> =
            serde_json::from_str(r#"{"when": {}, "then": []}"#);
        assert!(ok.is_ok());

        let bad: Result<RuleDefinition, _> =
            serde_json::from_str(r#"{"when": {}, "then": [{"type": "ha_call_service", "action": "turn_on"}]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_parse_serialize_round_trip() {
        let original = json!({
            "when": {
                "op": "for",
                "seconds": 300,
                "child": {
                    "op": "any",
                    "conditions": [
                        {"op": "entity_state", "entity_id": "binary_sensor.front_door", "state": "on"},
                        {"op": "not", "child": {"op": "alarm_state_in", "states": ["disarmed"]}}
                    ]
                }
            },
            "then": [
                {"type": "alarm_arm", "mode": "away"},
                {"type": "zigbee2mqtt_light", "entity_id": "hall_light", "state": "on", "brightness": 128.0}
            ]
        });

        let rule = RuleDefinition::parse(&original).unwrap();
        assert_eq!(serde_json::to_value(&rule).unwrap(), original);
    }
}

//! Rule node types
//!
//! A rule is `{ when, then }`: a condition tree that gates the rule and an
//! ordered list of actions to run when it holds. Condition nodes are tagged
//! by `op`, action nodes by `type`; both tag sets are closed.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A complete rule definition as persisted by the backend.
///
/// `then` is always an array and may be empty (a no-op rule).
/// Deserialization goes through the grammar validator in
/// [`crate::validate`], so `serde_json::from_value` enforces the same
/// structural rules as [`RuleDefinition::parse`](crate::RuleDefinition::parse).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDefinition {
    /// Condition tree gating the rule
    pub when: WhenNode,

    /// Actions executed when `when` is satisfied
    pub then: Vec<ActionNode>,
}

impl RuleDefinition {
    /// A rule that always matches and does nothing
    pub fn empty() -> Self {
        Self {
            when: WhenNode::Empty,
            then: Vec::new(),
        }
    }
}

/// The condition tree of a rule.
///
/// Grammar: the empty object (always true), a single condition node inlined,
/// a logical combinator over condition nodes, or a duration wrapper around
/// another when-node.
#[derive(Debug, Clone, PartialEq)]
pub enum WhenNode {
    /// `{}` - no condition, always true
    Empty,

    /// A single condition, serialized without a wrapper
    Condition(ConditionNode),

    /// AND/OR over a list of condition nodes
    Logical(LogicalNode),

    /// Condition must hold continuously for N seconds
    For(ForNode),
}

impl WhenNode {
    /// AND combinator over conditions
    pub fn all(conditions: Vec<ConditionNode>) -> Self {
        WhenNode::Logical(LogicalNode {
            op: LogicalOp::All,
            conditions,
        })
    }

    /// OR combinator over conditions
    pub fn any(conditions: Vec<ConditionNode>) -> Self {
        WhenNode::Logical(LogicalNode {
            op: LogicalOp::Any,
            conditions,
        })
    }

    /// Wrap a when-node in a duration requirement
    pub fn for_seconds(seconds: u64, child: WhenNode) -> Self {
        WhenNode::For(ForNode {
            seconds,
            child: Box::new(child),
        })
    }

    /// True for the empty (always-matching) node
    pub fn is_empty(&self) -> bool {
        matches!(self, WhenNode::Empty)
    }
}

// The empty node and the inlined single condition are not expressible with a
// derived tagged representation, so the wire form is written by hand.
impl Serialize for WhenNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            WhenNode::Empty => serializer.serialize_map(Some(0))?.end(),
            WhenNode::Condition(condition) => condition.serialize(serializer),
            WhenNode::Logical(node) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("op", node.op.as_str())?;
                map.serialize_entry("conditions", &node.conditions)?;
                map.end()
            }
            WhenNode::For(node) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("op", "for")?;
                map.serialize_entry("seconds", &node.seconds)?;
                map.serialize_entry("child", &node.child)?;
                map.end()
            }
        }
    }
}

/// Logical combinator over condition nodes.
///
/// Child order does not affect semantics but is preserved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalNode {
    /// AND or OR
    pub op: LogicalOp,

    /// Ordered child conditions
    pub conditions: Vec<ConditionNode>,
}

/// Logical operator for combinator nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    /// All children must hold (AND)
    #[default]
    All,

    /// At least one child must hold (OR)
    Any,
}

impl LogicalOp {
    /// Wire tag for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::All => "all",
            LogicalOp::Any => "any",
        }
    }

    pub(crate) fn parse(tag: &str) -> Option<Self> {
        match tag {
            "all" => Some(LogicalOp::All),
            "any" => Some(LogicalOp::Any),
            _ => None,
        }
    }
}

/// Duration wrapper: the child when-node must hold continuously for
/// `seconds` before the rule is considered satisfied.
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    /// Hold time in seconds
    pub seconds: u64,

    /// Wrapped when-node
    pub child: Box<WhenNode>,
}

/// A single condition.
///
/// Negation only wraps condition nodes (a leaf or another `not`), never a
/// logical or duration node; the type makes that unrepresentable and the
/// validator rejects it in raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ConditionNode {
    /// Check an entity's current state
    EntityState(EntityStateCondition),

    /// Check recent Frigate person detections
    FrigatePersonDetected(FrigatePersonDetectedCondition),

    /// Check that the alarm is in one of a set of states
    AlarmStateIn(AlarmStateInCondition),

    /// Negate a nested condition
    Not(NotCondition),
}

impl ConditionNode {
    /// Negate a condition
    pub fn not(condition: ConditionNode) -> Self {
        ConditionNode::Not(NotCondition {
            child: Box::new(condition),
        })
    }

    /// Wire tag (`op` value) for this condition
    pub fn op(&self) -> &'static str {
        match self {
            ConditionNode::EntityState(_) => "entity_state",
            ConditionNode::FrigatePersonDetected(_) => "frigate_person_detected",
            ConditionNode::AlarmStateIn(_) => "alarm_state_in",
            ConditionNode::Not(_) => "not",
        }
    }
}

/// Entity state condition - entity's state equals an expected value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityStateCondition {
    /// Entity to check
    pub entity_id: String,

    /// Expected state value
    pub state: String,

    /// Which source system the entity belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<StateSource>,
}

/// Source system hint for entity lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateSource {
    HomeAssistant,
    Zwavejs,
    Zigbee2mqtt,
    All,
}

impl StateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateSource::HomeAssistant => "home_assistant",
            StateSource::Zwavejs => "zwavejs",
            StateSource::Zigbee2mqtt => "zigbee2mqtt",
            StateSource::All => "all",
        }
    }

    pub(crate) fn parse(tag: &str) -> Option<Self> {
        match tag {
            "home_assistant" => Some(StateSource::HomeAssistant),
            "zwavejs" => Some(StateSource::Zwavejs),
            "zigbee2mqtt" => Some(StateSource::Zigbee2mqtt),
            "all" => Some(StateSource::All),
            _ => None,
        }
    }
}

/// Frigate person-detection condition.
///
/// Matches when a person was detected on one of `cameras` within the
/// lookback window at or above the confidence threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrigatePersonDetectedCondition {
    /// Cameras to consider (non-empty)
    pub cameras: Vec<String>,

    /// Restrict to detections inside these zones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,

    /// Lookback window in seconds
    pub within_seconds: u64,

    /// Minimum detection confidence, percent. Kept as the source JSON
    /// number so an integer-written value re-emits unchanged.
    pub min_confidence_pct: serde_json::Number,

    /// How to aggregate confidence over the window
    pub aggregation: Aggregation,

    /// Percentile for [`Aggregation::Percentile`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<serde_json::Number>,

    /// What to do when Frigate is unreachable
    pub on_unavailable: UnavailablePolicy,
}

/// Confidence aggregation over the lookback window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Latest,
    Max,
    Percentile,
}

impl Aggregation {
    pub(crate) fn parse(tag: &str) -> Option<Self> {
        match tag {
            "latest" => Some(Aggregation::Latest),
            "max" => Some(Aggregation::Max),
            "percentile" => Some(Aggregation::Percentile),
            _ => None,
        }
    }
}

/// Policy when the detection source is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailablePolicy {
    TreatAsMatch,
    TreatAsNoMatch,
}

impl UnavailablePolicy {
    pub(crate) fn parse(tag: &str) -> Option<Self> {
        match tag {
            "treat_as_match" => Some(UnavailablePolicy::TreatAsMatch),
            "treat_as_no_match" => Some(UnavailablePolicy::TreatAsNoMatch),
            _ => None,
        }
    }
}

/// Alarm state condition - current alarm state is one of `states`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmStateInCondition {
    /// Accepted alarm state names (non-empty)
    pub states: Vec<String>,
}

/// Negation of a nested condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotCondition {
    /// Condition to negate
    pub child: Box<ConditionNode>,
}

/// A single action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionNode {
    /// Disarm the alarm
    AlarmDisarm,

    /// Trigger the alarm siren
    AlarmTrigger,

    /// Arm the alarm in a given mode
    AlarmArm(AlarmArmAction),

    /// Call a Home Assistant service
    HaCallService(HaCallServiceAction),

    /// Set a Z-Wave JS value on a node
    ZwavejsSetValue(ZwavejsSetValueAction),

    /// Publish a raw value to a Zigbee2MQTT device
    Zigbee2mqttSetValue(Zigbee2mqttSetValueAction),

    /// Switch a Zigbee2MQTT device on/off
    Zigbee2mqttSwitch(Zigbee2mqttSwitchAction),

    /// Set a Zigbee2MQTT light's state and brightness
    Zigbee2mqttLight(Zigbee2mqttLightAction),

    /// Send a message through a notification provider
    SendNotification(SendNotificationAction),
}

impl ActionNode {
    /// Wire tag (`type` value) for this action
    pub fn kind(&self) -> &'static str {
        match self {
            ActionNode::AlarmDisarm => "alarm_disarm",
            ActionNode::AlarmTrigger => "alarm_trigger",
            ActionNode::AlarmArm(_) => "alarm_arm",
            ActionNode::HaCallService(_) => "ha_call_service",
            ActionNode::ZwavejsSetValue(_) => "zwavejs_set_value",
            ActionNode::Zigbee2mqttSetValue(_) => "zigbee2mqtt_set_value",
            ActionNode::Zigbee2mqttSwitch(_) => "zigbee2mqtt_switch",
            ActionNode::Zigbee2mqttLight(_) => "zigbee2mqtt_light",
            ActionNode::SendNotification(_) => "send_notification",
        }
    }
}

/// Arm the alarm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmArmAction {
    /// Target arm mode
    pub mode: ArmMode,
}

/// Alarm arm modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmMode {
    Away,
    Home,
    Night,
    Vacation,
}

impl ArmMode {
    pub(crate) fn parse(tag: &str) -> Option<Self> {
        match tag {
            "away" => Some(ArmMode::Away),
            "home" => Some(ArmMode::Home),
            "night" => Some(ArmMode::Night),
            "vacation" => Some(ArmMode::Vacation),
            _ => None,
        }
    }
}

/// Home Assistant service call.
///
/// `action` is the dotted `domain.service` identifier; a bare service name
/// without the domain prefix is invalid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HaCallServiceAction {
    /// `domain.service` identifier
    pub action: String,

    /// Target entities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Vec<String>>,

    /// Free-form service data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Z-Wave JS set-value action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZwavejsSetValueAction {
    /// Z-Wave node id
    pub node_id: i64,

    /// Value to write, addressed by [`ValueId`]
    pub value_id: ValueId,

    /// New value (arbitrary JSON)
    pub value: serde_json::Value,
}

/// Z-Wave JS value address.
///
/// Key spellings (`commandClass`, `propertyKey`) follow the Z-Wave JS wire
/// format and must be preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueId {
    #[serde(rename = "commandClass")]
    pub command_class: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<i64>,

    pub property: PropertyKey,

    #[serde(rename = "propertyKey", skip_serializing_if = "Option::is_none")]
    pub property_key: Option<PropertyKey>,
}

/// Z-Wave property selector - a name or a numeric index
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyKey {
    Name(String),
    Index(i64),
}

/// Zigbee2MQTT raw set-value action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zigbee2mqttSetValueAction {
    /// Zigbee2MQTT entity id
    pub entity_id: String,

    /// Value to publish (arbitrary JSON)
    pub value: serde_json::Value,
}

/// Zigbee2MQTT on/off switch action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zigbee2mqttSwitchAction {
    pub entity_id: String,
    pub state: SwitchState,
}

/// On/off state for switch and light actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    pub(crate) fn parse(tag: &str) -> Option<Self> {
        match tag {
            "on" => Some(SwitchState::On),
            "off" => Some(SwitchState::Off),
            _ => None,
        }
    }
}

/// Zigbee2MQTT light action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zigbee2mqttLightAction {
    pub entity_id: String,

    pub state: SwitchState,

    /// Brightness level; units are device-defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<serde_json::Number>,
}

/// Send a notification through a configured provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendNotificationAction {
    /// Notification provider id
    pub provider: String,

    /// Message body
    pub message: String,

    /// Optional title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Provider-specific extra data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

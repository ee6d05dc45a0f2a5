//! Flow graph nodes.
//!
//! A behavior is a chain of typed nodes: a trigger, optional conditions,
//! actions, operand-context switches, waits and loops, linked child-to-child
//! by id. Nodes never hold references to each other — the graph is an arena
//! in [`Flows`](super::Flows) and every edge is a `NodeId`, so there are no
//! ownership cycles.
//!
//! ## Edge terminals
//!
//! Each child edge carries a terminal flag. A `true` edge is *gated*: it is
//! taken only when the parent clause succeeded — a condition's success
//! branch, or the B-operand output of a two-terminal trigger. A `false`
//! edge is the unconditional continuation (the next sequential step, or a
//! condition's else branch).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::core::ItemId;
use crate::tags::Tag;

/// Unique identifier of a flow node within one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a node id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Structural kind of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Entry point: a simulation event this chain reacts to.
    Trigger,
    /// Gate: the chain continues on the `true` edge only if satisfied.
    Condition,
    /// An effect on the current operand.
    Action,
    /// Switches the operand (A = self, B = the other party, or by tag).
    Context,
    /// Frame-delays the rest of the chain.
    Wait,
    /// Rewinds the chain a number of steps, a bounded number of times.
    Loop,
}

impl NodeKind {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Trigger => 1,
            Self::Condition => 2,
            Self::Action => 3,
            Self::Context => 4,
            Self::Wait => 5,
            Self::Loop => 6,
        }
    }

    /// Decode a wire code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Trigger),
            2 => Some(Self::Condition),
            3 => Some(Self::Action),
            4 => Some(Self::Context),
            5 => Some(Self::Wait),
            6 => Some(Self::Loop),
            _ => None,
        }
    }
}

/// Trigger subtypes: the simulation events a chain can react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum TriggerKind {
    Frame = 1,
    Start = 2,
    Collision = 3,
    CollisionEnd = 4,
    Selected = 5,
    NearIn = 6,
    Near = 7,
    NearOut = 8,
    RangeIn = 9,
    RangeOut = 10,
    SteppedOn = 11,
    Crush = 12,
    EnterSector = 13,
    ExitSector = 14,
    SectorEmpty = 15,
    See = 16,
    AttackStart = 17,
    AttackHit = 18,
    StateChanged = 19,
    HealthChanged = 20,
    PlayerScored = 21,
    PickedUp = 22,
    Destroyed = 23,
}

impl TriggerKind {
    /// Every trigger subtype, in wire-code order.
    pub const ALL: [Self; 23] = [
        Self::Frame,
        Self::Start,
        Self::Collision,
        Self::CollisionEnd,
        Self::Selected,
        Self::NearIn,
        Self::Near,
        Self::NearOut,
        Self::RangeIn,
        Self::RangeOut,
        Self::SteppedOn,
        Self::Crush,
        Self::EnterSector,
        Self::ExitSector,
        Self::SectorEmpty,
        Self::See,
        Self::AttackStart,
        Self::AttackHit,
        Self::StateChanged,
        Self::HealthChanged,
        Self::PlayerScored,
        Self::PickedUp,
        Self::Destroyed,
    ];

    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode a wire code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// DSL spelling.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Self::Frame => "frame",
            Self::Start => "start",
            Self::Collision => "collision",
            Self::CollisionEnd => "collisionEnd",
            Self::Selected => "selected",
            Self::NearIn => "nearIn",
            Self::Near => "near",
            Self::NearOut => "nearOut",
            Self::RangeIn => "rangeIn",
            Self::RangeOut => "rangeOut",
            Self::SteppedOn => "steppedOn",
            Self::Crush => "crush",
            Self::EnterSector => "enterSector",
            Self::ExitSector => "exitSector",
            Self::SectorEmpty => "sectorEmpty",
            Self::See => "see",
            Self::AttackStart => "attackStart",
            Self::AttackHit => "attackHit",
            Self::StateChanged => "stateChanged",
            Self::HealthChanged => "healthChanged",
            Self::PlayerScored => "playerScored",
            Self::PickedUp => "pickedUp",
            Self::Destroyed => "destroyed",
        }
    }

    /// Look up a subtype by its DSL spelling, case-insensitively.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.word().eq_ignore_ascii_case(word))
    }

    /// Number of output terminals: two-terminal triggers involve another
    /// party (B operand) alongside the owner, one-terminal triggers do not.
    #[must_use]
    pub const fn terminal_count(self) -> u8 {
        match self {
            Self::Frame
            | Self::Start
            | Self::Selected
            | Self::SectorEmpty
            | Self::StateChanged
            | Self::HealthChanged
            | Self::PlayerScored
            | Self::PickedUp
            | Self::Destroyed => 1,
            Self::Collision
            | Self::CollisionEnd
            | Self::NearIn
            | Self::Near
            | Self::NearOut
            | Self::RangeIn
            | Self::RangeOut
            | Self::SteppedOn
            | Self::Crush
            | Self::EnterSector
            | Self::ExitSector
            | Self::See
            | Self::AttackStart
            | Self::AttackHit => 2,
        }
    }
}

/// Condition subtypes: predicates a chain can gate on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ConditionKind {
    Touching = 1,
    PlayerHas = 2,
    Contains = 3,
    Tagged = 4,
    BTagged = 5,
    State = 6,
    IsNear = 7,
    IsInRange = 8,
    InSector = 9,
    FollowingB = 10,
    Health = 11,
    Strength = 12,
    Range = 13,
    Armor = 14,
    Memory = 15,
    Score = 16,
}

impl ConditionKind {
    /// Every condition subtype, in wire-code order.
    pub const ALL: [Self; 16] = [
        Self::Touching,
        Self::PlayerHas,
        Self::Contains,
        Self::Tagged,
        Self::BTagged,
        Self::State,
        Self::IsNear,
        Self::IsInRange,
        Self::InSector,
        Self::FollowingB,
        Self::Health,
        Self::Strength,
        Self::Range,
        Self::Armor,
        Self::Memory,
        Self::Score,
    ];

    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode a wire code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// DSL spelling.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Self::Touching => "touching",
            Self::PlayerHas => "playerHas",
            Self::Contains => "contains",
            Self::Tagged => "tagged",
            Self::BTagged => "bTagged",
            Self::State => "state",
            Self::IsNear => "isNear",
            Self::IsInRange => "isInRange",
            Self::InSector => "inSector",
            Self::FollowingB => "followingB",
            Self::Health => "health",
            Self::Strength => "strength",
            Self::Range => "range",
            Self::Armor => "armor",
            Self::Memory => "memory",
            Self::Score => "score",
        }
    }

    /// Look up a subtype by its DSL spelling, case-insensitively.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.word().eq_ignore_ascii_case(word))
    }

    /// Kind of value this condition compares against.
    #[must_use]
    pub const fn target_type(self) -> TargetType {
        match self {
            Self::Touching
            | Self::PlayerHas
            | Self::Contains
            | Self::Tagged
            | Self::BTagged
            | Self::IsNear
            | Self::IsInRange
            | Self::InSector => TargetType::Tag,
            Self::State => TargetType::State,
            Self::FollowingB => TargetType::None,
            Self::Health
            | Self::Strength
            | Self::Range
            | Self::Armor
            | Self::Memory
            | Self::Score => TargetType::Number,
        }
    }
}

/// Action subtypes: the effects a chain can apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ActionKind {
    Goto = 1,
    ChangeHealth = 2,
    ChangeStrength = 3,
    ChangeRange = 4,
    ChangeArmor = 5,
    SetMemory = 6,
    SolidOff = 7,
    SolidOn = 8,
    TeleportTo = 9,
    SelfDestruct = 10,
    WatchB = 11,
    FaceB = 12,
    FollowB = 13,
    Unfollow = 14,
    AttackB = 15,
    Defend = 16,
    SpawnItem = 17,
    ShowText = 18,
    TurnOff = 19,
    TurnOn = 20,
    Create = 21,
    ChangeScore = 22,
    LoseGame = 23,
    WinGame = 24,
}

impl ActionKind {
    /// Every action subtype, in wire-code order.
    pub const ALL: [Self; 24] = [
        Self::Goto,
        Self::ChangeHealth,
        Self::ChangeStrength,
        Self::ChangeRange,
        Self::ChangeArmor,
        Self::SetMemory,
        Self::SolidOff,
        Self::SolidOn,
        Self::TeleportTo,
        Self::SelfDestruct,
        Self::WatchB,
        Self::FaceB,
        Self::FollowB,
        Self::Unfollow,
        Self::AttackB,
        Self::Defend,
        Self::SpawnItem,
        Self::ShowText,
        Self::TurnOff,
        Self::TurnOn,
        Self::Create,
        Self::ChangeScore,
        Self::LoseGame,
        Self::WinGame,
    ];

    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode a wire code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// DSL spelling.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Self::Goto => "goto",
            Self::ChangeHealth => "changeHealth",
            Self::ChangeStrength => "changeStrength",
            Self::ChangeRange => "changeRange",
            Self::ChangeArmor => "changeArmor",
            Self::SetMemory => "setMemory",
            Self::SolidOff => "solidOff",
            Self::SolidOn => "solidOn",
            Self::TeleportTo => "teleportTo",
            Self::SelfDestruct => "selfDestruct",
            Self::WatchB => "watchB",
            Self::FaceB => "faceB",
            Self::FollowB => "followB",
            Self::Unfollow => "unfollow",
            Self::AttackB => "attackB",
            Self::Defend => "defend",
            Self::SpawnItem => "spawnItem",
            Self::ShowText => "showText",
            Self::TurnOff => "turnOff",
            Self::TurnOn => "turnOn",
            Self::Create => "create",
            Self::ChangeScore => "changeScore",
            Self::LoseGame => "loseGame",
            Self::WinGame => "winGame",
        }
    }

    /// Look up a subtype by its DSL spelling, case-insensitively.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.word().eq_ignore_ascii_case(word))
    }

    /// Kind of value this action carries.
    #[must_use]
    pub const fn target_type(self) -> TargetType {
        match self {
            Self::Goto => TargetType::State,
            Self::ChangeHealth
            | Self::ChangeStrength
            | Self::ChangeRange
            | Self::ChangeArmor
            | Self::SetMemory
            | Self::ChangeScore => TargetType::Number,
            Self::TeleportTo | Self::SpawnItem | Self::TurnOff | Self::TurnOn | Self::Create => {
                TargetType::Tag
            }
            Self::ShowText => TargetType::Text,
            Self::SolidOff
            | Self::SolidOn
            | Self::SelfDestruct
            | Self::WatchB
            | Self::FaceB
            | Self::FollowB
            | Self::Unfollow
            | Self::AttackB
            | Self::Defend
            | Self::LoseGame
            | Self::WinGame => TargetType::None,
        }
    }
}

/// Context subtypes: which operand the rest of the chain acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ContextKind {
    /// The chain's owner (object A).
    Subject = 1,
    /// The other party of the trigger (object B).
    B = 2,
    /// Every item carrying a tag.
    Tag = 3,
}

impl ContextKind {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode a wire code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Subject),
            2 => Some(Self::B),
            3 => Some(Self::Tag),
            _ => None,
        }
    }

    /// Kind of value this context carries.
    #[must_use]
    pub const fn target_type(self) -> TargetType {
        match self {
            Self::Subject | Self::B => TargetType::None,
            Self::Tag => TargetType::Tag,
        }
    }
}

/// Comparison operator on condition nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    None,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
}

impl Operator {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Equals => 1,
            Self::NotEquals => 2,
            Self::GreaterThan => 3,
            Self::LessThan => 4,
        }
    }

    /// Decode a wire code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Equals),
            2 => Some(Self::NotEquals),
            3 => Some(Self::GreaterThan),
            4 => Some(Self::LessThan),
            _ => None,
        }
    }

    /// DSL symbol, empty for `None`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
        }
    }

    /// Look up an operator by its DSL symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Self::Equals),
            "!=" => Some(Self::NotEquals),
            ">" => Some(Self::GreaterThan),
            "<" => Some(Self::LessThan),
            _ => None,
        }
    }
}

/// What a node's target value refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    #[default]
    None,
    /// Plain number (stat delta, seconds, loop count).
    Number,
    /// Display-state index.
    State,
    /// A tag key; negative values name archetypes.
    Tag,
    /// Free text (stored base64 on the wire).
    Text,
}

impl TargetType {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Number => 1,
            Self::State => 2,
            Self::Tag => 3,
            Self::Text => 4,
        }
    }

    /// Decode a wire code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Number),
            2 => Some(Self::State),
            3 => Some(Self::Tag),
            4 => Some(Self::Text),
            _ => None,
        }
    }
}

/// A node's target value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TargetValue {
    #[default]
    None,
    Number(f64),
    Text(String),
}

impl TargetValue {
    /// Numeric view; `None` targets read as 0 like the original attribs.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            _ => 0.0,
        }
    }

    /// Tag view of a numeric target.
    #[must_use]
    pub fn as_tag(&self) -> Tag {
        Tag(self.as_number() as i32)
    }

    /// Text view.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<f64> for TargetValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for TargetValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Tag> for TargetValue {
    fn from(tag: Tag) -> Self {
        Self::Number(f64::from(tag.raw()))
    }
}

/// Error parsing one serialized node record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeRecordError {
    #[error("record has too few fields")]
    TooFewFields,
    #[error("bad numeric field `{field}`: {text:?}")]
    BadNumber { field: &'static str, text: String },
    #[error("unknown node kind code {0}")]
    UnknownKind(i32),
    #[error("unknown operator code {0}")]
    UnknownOperator(i32),
    #[error("unknown target type code {0}")]
    UnknownTargetType(i32),
    #[error("child list shorter than declared count")]
    TruncatedChildren,
    #[error("text target is not valid base64/utf-8")]
    BadText,
}

/// One node of a behavior graph.
///
/// Structurally immutable after compilation except for child-link wiring;
/// owned exclusively by the [`Flows`](super::Flows) store that created it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Unique id within the owning store.
    pub id: NodeId,

    /// Owning entity; `None` for global/unowned chains.
    pub owner: Option<ItemId>,

    /// Structural kind.
    pub kind: NodeKind,

    /// Subtype wire code; see the typed views below.
    pub subtype: i32,

    /// Comparison operator (conditions only).
    pub operator: Operator,

    /// What `target` refers to.
    pub target_type: TargetType,

    /// The node's operand value.
    pub target: TargetValue,

    children: SmallVec<[NodeId; 2]>,
    children_terminal: SmallVec<[bool; 2]>,
}

impl FlowNode {
    /// Create an unlinked node.
    pub fn new(
        id: NodeId,
        owner: Option<ItemId>,
        kind: NodeKind,
        subtype: i32,
        operator: Operator,
        target_type: TargetType,
        target: TargetValue,
    ) -> Self {
        Self {
            id,
            owner,
            kind,
            subtype,
            operator,
            target_type,
            target,
            children: SmallVec::new(),
            children_terminal: SmallVec::new(),
        }
    }

    /// Typed trigger subtype, if this is a trigger node.
    #[must_use]
    pub fn trigger_kind(&self) -> Option<TriggerKind> {
        match self.kind {
            NodeKind::Trigger => TriggerKind::from_code(self.subtype),
            _ => None,
        }
    }

    /// Typed condition subtype, if this is a condition node.
    #[must_use]
    pub fn condition_kind(&self) -> Option<ConditionKind> {
        match self.kind {
            NodeKind::Condition => ConditionKind::from_code(self.subtype),
            _ => None,
        }
    }

    /// Typed action subtype, if this is an action node.
    #[must_use]
    pub fn action_kind(&self) -> Option<ActionKind> {
        match self.kind {
            NodeKind::Action => ActionKind::from_code(self.subtype),
            _ => None,
        }
    }

    /// Typed context subtype, if this is a context node.
    #[must_use]
    pub fn context_kind(&self) -> Option<ContextKind> {
        match self.kind {
            NodeKind::Context => ContextKind::from_code(self.subtype),
            _ => None,
        }
    }

    /// Child node ids, in edge order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Per-edge terminal flags, parallel to [`children`](Self::children).
    #[must_use]
    pub fn children_terminal(&self) -> &[bool] {
        &self.children_terminal
    }

    /// Link a child edge. Duplicate child ids are ignored.
    pub fn add_child(&mut self, child: NodeId, terminal: bool) {
        if !self.children.contains(&child) {
            self.children.push(child);
            self.children_terminal.push(terminal);
        }
    }

    /// Remove a child edge if present.
    pub fn remove_child(&mut self, child: NodeId) {
        if let Some(index) = self.children.iter().position(|&id| id == child) {
            self.children.remove(index);
            self.children_terminal.remove(index);
        }
    }

    /// Serialize to the comma-joined wire record:
    /// `id,owner,kind,subtype,operator,targetType,target,childCount,children...,terminals...`.
    ///
    /// `None` owner writes the `-1` wire sentinel; `None` target writes the
    /// `@` placeholder; text targets are base64-encoded.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut fields: Vec<String> = Vec::with_capacity(8 + self.children.len() * 2);
        fields.push(self.id.raw().to_string());
        fields.push(self.owner.map_or(-1, ItemId::raw).to_string());
        fields.push(self.kind.code().to_string());
        fields.push(self.subtype.to_string());
        fields.push(self.operator.code().to_string());
        fields.push(self.target_type.code().to_string());
        fields.push(match &self.target {
            TargetValue::None => "@".to_string(),
            TargetValue::Number(value) => format_number(*value),
            TargetValue::Text(text) => BASE64.encode(text),
        });
        fields.push(self.children.len().to_string());
        for child in &self.children {
            fields.push(child.raw().to_string());
        }
        for &terminal in &self.children_terminal {
            fields.push(i32::from(terminal).to_string());
        }
        fields.join(",")
    }

    /// Parse a wire record produced by [`serialize`](Self::serialize).
    ///
    /// The caller is expected to have substituted the blob-level `@`
    /// placeholder to `null` already (see `Flows::unserialize`).
    pub fn parse(record: &str) -> Result<Self, NodeRecordError> {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() < 8 {
            return Err(NodeRecordError::TooFewFields);
        }

        let id = NodeId(parse_int(fields[0], "id")? as u32);
        let owner_raw = parse_int(fields[1], "owner")?;
        // Negative owner on the wire means unowned; ownership never uses
        // the player's -1 entity id.
        let owner = (owner_raw >= 0).then_some(ItemId(owner_raw));

        let kind_code = parse_int(fields[2], "kind")?;
        let kind = NodeKind::from_code(kind_code).ok_or(NodeRecordError::UnknownKind(kind_code))?;
        let subtype = parse_int(fields[3], "subtype")?;
        let operator_code = parse_int(fields[4], "operator")?;
        let operator = Operator::from_code(operator_code)
            .ok_or(NodeRecordError::UnknownOperator(operator_code))?;
        let target_type_code = parse_int(fields[5], "targetType")?;
        let target_type = TargetType::from_code(target_type_code)
            .ok_or(NodeRecordError::UnknownTargetType(target_type_code))?;

        let target = match fields[6] {
            "null" | "@" | "" => TargetValue::None,
            text if target_type == TargetType::Text => {
                let bytes = BASE64.decode(text).map_err(|_| NodeRecordError::BadText)?;
                let decoded = String::from_utf8(bytes).map_err(|_| NodeRecordError::BadText)?;
                TargetValue::Text(decoded)
            }
            number => TargetValue::Number(number.parse::<f64>().map_err(|_| {
                NodeRecordError::BadNumber {
                    field: "target",
                    text: number.to_string(),
                }
            })?),
        };

        let child_count = parse_int(fields[7], "childCount")? as usize;
        if fields.len() < 8 + child_count * 2 {
            return Err(NodeRecordError::TruncatedChildren);
        }

        let mut children = SmallVec::new();
        let mut children_terminal = SmallVec::new();
        for i in 0..child_count {
            children.push(NodeId(parse_int(fields[8 + i], "child")? as u32));
        }
        for i in 0..child_count {
            children_terminal.push(parse_int(fields[8 + child_count + i], "terminal")? != 0);
        }

        Ok(Self {
            id,
            owner,
            kind,
            subtype,
            operator,
            target_type,
            target,
            children,
            children_terminal,
        })
    }
}

fn parse_int(text: &str, field: &'static str) -> Result<i32, NodeRecordError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| NodeRecordError::BadNumber {
            field,
            text: text.to_string(),
        })
}

/// Render a number without a trailing `.0` for whole values, so records
/// stay byte-stable across round trips.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

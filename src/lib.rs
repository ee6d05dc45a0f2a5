//! # tileflow
//!
//! The behavior-scripting core of a tile-based action game: a small textual
//! DSL is compiled into node graphs attached to game items, and those
//! graphs are interpreted every simulation frame to produce gated game
//! events — attacks, health changes, teleports, self-destructs.
//!
//! ## Design Principles
//!
//! 1. **Id-addressed graph**: flow nodes reference each other by integer
//!    id through the store's lookup table, never by pointer. The graph is
//!    an arena plus index maps, with no ownership cycles.
//!
//! 2. **Nothing here is fatal**: corrupt saves degrade to defaults with a
//!    logged error, rule-denied events are dropped as normal control flow,
//!    and dangling references read as absent. The core sits inside an
//!    interactive editor; a bad blob must not take the session down.
//!
//! 3. **Closed taxonomies**: triggers, conditions, actions and event kinds
//!    are enums matched exhaustively, so the rules layer cannot silently
//!    miss a case.
//!
//! 4. **Explicit channels**: stores broadcast changes over injected
//!    channel objects, not ambient global signal buses.
//!
//! ## Modules
//!
//! - `core`: item identity, the level item table, behavior configuration
//! - `tags`: archetype/designer tags and the membership store
//! - `flows`: flow nodes, the graph store and its indices, the DSL compiler
//! - `events`: the frame-delayed event queue and its dispatch channel
//! - `rules`: allow/deny gates, team predicates, default behaviors
//! - `history`: change broadcast and undo-history entry points

pub mod core;
pub mod events;
pub mod flows;
pub mod history;
pub mod rules;
pub mod tags;

// Re-export commonly used types
pub use crate::core::{BehaviorConfig, GameItem, ItemId, ItemKind, ItemProps, ItemState, Level};

pub use crate::tags::{Tag, TagStore};

pub use crate::flows::{
    compile, decompile, tokenize, ActionKind, ConditionKind, ContextKind, DecompileError,
    FlowNode, Flows, NodeId, NodeKind, NodeRecordError, Operator, TargetType, TargetValue,
    TriggerKind,
};

pub use crate::events::{GameEvent, GameEventKind, GameEvents};

pub use crate::rules::{apply_default_behaviors, GameRules};

pub use crate::history::{Dispatcher, HistoryAction, StoreChange};

//! Behavior flow graphs: nodes, the store and its indices, the DSL compiler.
//!
//! A flow is a chain of typed nodes attached to one game item. The external
//! game loop walks trigger nodes through the store's indices every frame,
//! evaluates condition children, and schedules the resulting actions on the
//! event queue.

pub mod compiler;
pub mod node;
pub mod store;

pub use compiler::{compile, decompile, tokenize, DecompileError};
pub use node::{
    ActionKind, ConditionKind, ContextKind, FlowNode, NodeId, NodeKind, NodeRecordError, Operator,
    TargetType, TargetValue, TriggerKind,
};
pub use store::Flows;

//! Core types: item identity, the level item table, behavior configuration.

pub mod config;
pub mod item;
pub mod level;

pub use config::{round10, BehaviorConfig};
pub use item::{GameItem, ItemId, ItemKind, ItemProps, ItemState};
pub use level::Level;

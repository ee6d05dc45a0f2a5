//! Game rules: allow/deny gates, team predicates, default behaviors.

pub mod defaults;
pub mod gates;

pub use defaults::apply_default_behaviors;
pub use gates::GameRules;

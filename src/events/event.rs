//! Game event types.
//!
//! Events are the gated output of the behavior core: when a flow chain's
//! action clears the rules layer it becomes one of these, scheduled on the
//! queue and eventually broadcast to the rest of the game (animation,
//! score UI, item updates).

use serde::{Deserialize, Serialize};

use crate::core::ItemId;
use crate::flows::TargetValue;

/// What happened. A closed set — the rules layer matches it exhaustively,
/// so adding a kind forces a decision about whether it is gated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEventKind {
    Attack,
    PlayerScored,
    PlayerContact,
    PlayerSelect,
    PlayerHealthChanged,
    PlayerDamaged,
    PlayerHealed,
    ItemPickedUp,
    DeathComplete,
    ItemDestroyed,
}

impl GameEventKind {
    /// Every event kind, in wire-code order.
    pub const ALL: [Self; 10] = [
        Self::Attack,
        Self::PlayerScored,
        Self::PlayerContact,
        Self::PlayerSelect,
        Self::PlayerHealthChanged,
        Self::PlayerDamaged,
        Self::PlayerHealed,
        Self::ItemPickedUp,
        Self::DeathComplete,
        Self::ItemDestroyed,
    ];

    /// Wire code used by the owning game.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Attack => 301,
            Self::PlayerScored => 302,
            Self::PlayerContact => 303,
            Self::PlayerSelect => 304,
            Self::PlayerHealthChanged => 305,
            Self::PlayerDamaged => 306,
            Self::PlayerHealed => 307,
            Self::ItemPickedUp => 308,
            Self::DeathComplete => 309,
            Self::ItemDestroyed => 310,
        }
    }

    /// Decode a wire code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl std::fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A scheduled game event. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// What happened.
    pub kind: GameEventKind,

    /// The item that caused the event, if any.
    pub source: Option<ItemId>,

    /// The item affected by the event, if any.
    pub target: Option<ItemId>,

    /// First frame at which the event may fire.
    pub ready_frame: u64,

    /// Payload interpreted per kind (health delta, score delta, ...).
    pub data: TargetValue,
}

impl GameEvent {
    /// Create an event ready at `ready_frame`.
    pub fn new(kind: GameEventKind, ready_frame: u64) -> Self {
        Self {
            kind,
            source: None,
            target: None,
            ready_frame,
            data: TargetValue::None,
        }
    }

    /// Set the source item (builder pattern).
    #[must_use]
    pub const fn with_source(mut self, source: ItemId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the target item (builder pattern).
    #[must_use]
    pub const fn with_target(mut self, target: ItemId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the payload (builder pattern).
    #[must_use]
    pub fn with_data(mut self, data: TargetValue) -> Self {
        self.data = data;
        self
    }

    /// Check whether the event is eligible to fire at `frame`.
    #[must_use]
    pub const fn is_ready(&self, frame: u64) -> bool {
        self.ready_frame <= frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_round_trip() {
        for kind in GameEventKind::ALL {
            assert_eq!(GameEventKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(GameEventKind::from_code(0), None);
        assert_eq!(GameEventKind::from_code(311), None);
    }

    #[test]
    fn test_is_ready() {
        let event = GameEvent::new(GameEventKind::Attack, 5);
        assert!(!event.is_ready(4));
        assert!(event.is_ready(5));
        assert!(event.is_ready(6));
    }

    #[test]
    fn test_builder() {
        let event = GameEvent::new(GameEventKind::PlayerHealthChanged, 1)
            .with_source(ItemId(3))
            .with_target(ItemId::PLAYER)
            .with_data(TargetValue::Number(-10.0));

        assert_eq!(event.source, Some(ItemId(3)));
        assert_eq!(event.target, Some(ItemId::PLAYER));
        assert_eq!(event.data.as_number(), -10.0);
    }

    #[test]
    fn test_serialization() {
        let event = GameEvent::new(GameEventKind::Attack, 2).with_source(ItemId(1));
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}

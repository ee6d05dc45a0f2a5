//! Item identification and the read-mostly item view.
//!
//! Every placed game object (wall, platform, liquid, panel, item, biped) has
//! an `ItemId`. The player is a special entity with the reserved id `-1`.
//!
//! ## The `-1` convention
//!
//! The owning game assigns `-1` to the player entity. This crate never reuses
//! `-1` to mean "no owner" — flow-node ownership is `Option<ItemId>` (see
//! `flows`), so the two meanings cannot be conflated.
//!
//! ## Usage
//!
//! ```
//! use tileflow::core::ItemId;
//!
//! let crate_item = ItemId(42);
//! assert!(!crate_item.is_player());
//! assert!(ItemId::PLAYER.is_player());
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a placed game entity.
///
/// Ids are assigned by the level model (external to this crate). The player
/// entity is always [`ItemId::PLAYER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub i32);

impl ItemId {
    /// The player's entity id, by convention of the owning game.
    pub const PLAYER: Self = Self(-1);

    /// Create an item id from a raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Check if this id refers to the player entity.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for ItemId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item({})", self.0)
    }
}

/// Structural kind of a placed item.
///
/// The kind decides which behavior templates apply to it (see
/// `rules::apply_default_behaviors`) and which trigger subtypes the editor
/// offers; this crate only interprets the kinds listed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Static sector wall.
    Wall,
    /// Moving platform sector.
    Platform,
    /// Liquid-filled sector (water, lava).
    Liquid,
    /// Wall-mounted panel (switch, sign).
    Panel,
    /// Free-standing collectible or prop.
    Item,
    /// Walking character.
    Biped,
}

impl ItemKind {
    /// Wire code used by the level model.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Wall => 0,
            Self::Platform => 1,
            Self::Liquid => 2,
            Self::Panel => 3,
            Self::Item => 4,
            Self::Biped => 5,
        }
    }

    /// Decode a wire code. Unknown codes are `None`.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Wall),
            1 => Some(Self::Platform),
            2 => Some(Self::Liquid),
            3 => Some(Self::Panel),
            4 => Some(Self::Item),
            5 => Some(Self::Biped),
            _ => None,
        }
    }
}

/// Runtime activity state of an item.
///
/// Transitions are driven by the external simulation; the rules layer only
/// reads the state (e.g. an attack event fires only while the source is
/// still `Attacking`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemState {
    /// Standing by.
    #[default]
    Idle,
    /// Following another item.
    Following,
    /// Mid attack animation.
    Attacking,
    /// Blocking an incoming attack.
    Defending,
}

/// Initial stat block for an item, as authored in the editor.
///
/// All stats are clamped to `0..=100` by the editor; this crate reads them
/// as plain integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProps {
    pub health: i32,
    pub strength: i32,
    pub range: i32,
    pub armor: i32,
    pub speed: i32,
    pub score: i32,
    pub memory: i32,
    /// Liquid texture selector: 1 = water-like, 2 = lava-like.
    pub liquid_kind: i32,
}

impl ItemProps {
    /// Create an empty stat block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the speed stat (builder pattern).
    #[must_use]
    pub const fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the health stat (builder pattern).
    #[must_use]
    pub const fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Set the score stat (builder pattern).
    #[must_use]
    pub const fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    /// Set the liquid kind (builder pattern).
    #[must_use]
    pub const fn with_liquid_kind(mut self, liquid_kind: i32) -> Self {
        self.liquid_kind = liquid_kind;
        self
    }
}

/// A game item as seen by the behavior core.
///
/// The full item model (geometry, textures, animation) lives outside this
/// crate; this is the slice the rules and events layers read, plus the two
/// flags (`evil`, `selectable`) the default-behavior pass writes back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameItem {
    /// Unique id within the level.
    pub id: ItemId,

    /// Structural kind.
    pub kind: ItemKind,

    /// Current health. Zero means dead.
    pub health: i32,

    /// Current activity state.
    pub state: ItemState,

    /// Death animation in progress.
    pub dying: bool,

    /// Marked hostile by the default-behavior pass.
    pub evil: bool,

    /// Player may pick this item up or interact with it.
    pub selectable: bool,

    /// Authored initial stats.
    pub props: ItemProps,
}

impl GameItem {
    /// Create an item with default stats, full health.
    pub fn new(id: ItemId, kind: ItemKind) -> Self {
        Self {
            id,
            kind,
            health: 100,
            state: ItemState::Idle,
            dying: false,
            evil: false,
            selectable: false,
            props: ItemProps::new(),
        }
    }

    /// Set the stat block (builder pattern).
    #[must_use]
    pub const fn with_props(mut self, props: ItemProps) -> Self {
        self.props = props;
        self
    }

    /// Set current health (builder pattern).
    #[must_use]
    pub const fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Check if this item is alive (positive health).
    #[must_use]
    pub const fn alive(&self) -> bool {
        self.health > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id() {
        assert!(ItemId::PLAYER.is_player());
        assert!(!ItemId(0).is_player());
        assert!(!ItemId(42).is_player());
        assert_eq!(ItemId::PLAYER.raw(), -1);
    }

    #[test]
    fn test_item_kind_codes() {
        for kind in [
            ItemKind::Wall,
            ItemKind::Platform,
            ItemKind::Liquid,
            ItemKind::Panel,
            ItemKind::Item,
            ItemKind::Biped,
        ] {
            assert_eq!(ItemKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ItemKind::from_code(99), None);
    }

    #[test]
    fn test_item_alive() {
        let item = GameItem::new(ItemId(1), ItemKind::Biped);
        assert!(item.alive());

        let dead = item.with_health(0);
        assert!(!dead.alive());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ItemId(7)), "Item(7)");
    }

    #[test]
    fn test_serialization() {
        let item = GameItem::new(ItemId(3), ItemKind::Item)
            .with_props(ItemProps::new().with_speed(20));
        let json = serde_json::to_string(&item).unwrap();
        let back: GameItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}

//! Tag system: archetype and designer tags on game items.
//!
//! Tags are signed integer keys. Negative values down to
//! `-SPECIAL_TAG_OFFSET` are reserved archetype ("special") tags — player,
//! good, evil, weapon and friends — that the rules layer and the
//! default-behavior pass interpret. Non-negative values are free-form
//! designer tags (`1..=MAX_DESIGNER_TAG` in the editor UI).
//!
//! ## Exclusivity
//!
//! An item holds at most one special tag at a time: linking a new negative
//! tag clears any prior one. Designer tags stack freely.

mod store;

pub use store::TagStore;

use serde::{Deserialize, Serialize};

/// Lowest special tag is `-SPECIAL_TAG_OFFSET`; also the index shift used by
/// the serialized form.
pub const SPECIAL_TAG_OFFSET: i32 = 10;

/// Highest designer tag offered by the editor UI.
pub const MAX_DESIGNER_TAG: i32 = 64;

/// A tag key. Negative = special archetype tag, non-negative = designer tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(pub i32);

impl Tag {
    /// Wildcard, matches any tag in conditions.
    pub const ANY: Self = Self(0);
    /// The player entity.
    pub const PLAYER: Self = Self(-1);
    /// Good team.
    pub const GOOD: Self = Self(-2);
    /// Evil team.
    pub const EVIL: Self = Self(-3);
    /// Damages on contact.
    pub const HAZARD: Self = Self(-4);
    /// Fired projectile.
    pub const PROJECTILE: Self = Self(-5);
    /// Inventory key item.
    pub const KEY: Self = Self(-6);
    /// Health/score powerup.
    pub const POWERUP: Self = Self(-7);
    /// Wearable armor.
    pub const ARMOR: Self = Self(-8);
    /// Carryable weapon.
    pub const WEAPON: Self = Self(-9);

    /// Create a tag from its raw key.
    #[must_use]
    pub const fn new(tag: i32) -> Self {
        Self(tag)
    }

    /// Get the raw key.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Check if this is a reserved archetype tag.
    #[must_use]
    pub const fn is_special(self) -> bool {
        self.0 < 0
    }

    /// DSL spelling of a special tag, if it has one.
    ///
    /// `shield` and `bad` are the script-facing names for armor and evil.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("any"),
            -1 => Some("player"),
            -2 => Some("good"),
            -3 => Some("bad"),
            -4 => Some("hazard"),
            -5 => Some("projectile"),
            -6 => Some("key"),
            -7 => Some("powerup"),
            -8 => Some("shield"),
            -9 => Some("weapon"),
            _ => None,
        }
    }

    /// Look up a special tag by its DSL spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "any" => Self::ANY,
            "player" => Self::PLAYER,
            "good" => Self::GOOD,
            "bad" => Self::EVIL,
            "hazard" => Self::HAZARD,
            "projectile" => Self::PROJECTILE,
            "key" => Self::KEY,
            "powerup" => Self::POWERUP,
            "shield" => Self::ARMOR,
            "weapon" => Self::WEAPON,
            _ => return None,
        };
        Some(tag)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Tag({name})"),
            None => write!(f, "Tag({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_range() {
        assert!(Tag::WEAPON.is_special());
        assert!(Tag::PLAYER.is_special());
        assert!(!Tag::ANY.is_special());
        assert!(!Tag(5).is_special());
    }

    #[test]
    fn test_name_round_trip() {
        for tag in [
            Tag::ANY,
            Tag::PLAYER,
            Tag::GOOD,
            Tag::EVIL,
            Tag::HAZARD,
            Tag::PROJECTILE,
            Tag::KEY,
            Tag::POWERUP,
            Tag::ARMOR,
            Tag::WEAPON,
        ] {
            let name = tag.name().unwrap();
            assert_eq!(Tag::from_name(name), Some(tag));
        }
        assert_eq!(Tag(3).name(), None);
        assert_eq!(Tag::from_name("dragon"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Tag::EVIL), "Tag(bad)");
        assert_eq!(format!("{}", Tag(12)), "Tag(12)");
    }
}

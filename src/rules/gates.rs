//! Allow/deny gates and team predicates.
//!
//! Pure functions over the level and tag collaborators; no mutable state,
//! safe to call anywhere in the single-threaded interpreter loop.
//!
//! Two gates exist because world state changes between scheduling and
//! firing: [`GameRules::allow_action`] vets an *intended* action at the
//! moment a flow chain wants to start it, [`GameRules::allow_event`] vets
//! the *scheduled* event again on the tick it becomes ready. An attack that
//! passed the first gate still dies at the second if its target did.

use crate::core::{GameItem, ItemState, Level};
use crate::events::{GameEvent, GameEventKind};
use crate::flows::ActionKind;
use crate::tags::{Tag, TagStore};

/// The rule book. Stateless; all functions are associated.
pub struct GameRules;

impl GameRules {
    /// Gate an intended action before it is scheduled.
    #[must_use]
    pub fn allow_action(
        kind: ActionKind,
        source: Option<&GameItem>,
        target: Option<&GameItem>,
    ) -> bool {
        match kind {
            ActionKind::FaceB | ActionKind::FollowB => match (source, target) {
                (Some(s), Some(t)) => s.alive() && t.alive(),
                _ => false,
            },
            ActionKind::AttackB => match (source, target) {
                (Some(s), Some(t)) => s.state == ItemState::Idle && s.alive() && t.alive(),
                _ => false,
            },
            ActionKind::Defend => {
                source.is_some_and(|s| s.state == ItemState::Idle && s.alive())
            }
            _ => false,
        }
    }

    /// Gate a scheduled event on the tick it fires.
    ///
    /// Notification kinds always pass; attacks require the source to still
    /// be mid-attack and both parties alive; a death completion requires
    /// the source to actually be dying. Missing items fail closed.
    #[must_use]
    pub fn allow_event(event: &GameEvent, level: &Level) -> bool {
        let source = event.source.and_then(|id| level.item(id));
        let target = event.target.and_then(|id| level.item(id));

        match event.kind {
            GameEventKind::PlayerContact
            | GameEventKind::PlayerScored
            | GameEventKind::PlayerSelect
            | GameEventKind::PlayerHealthChanged
            | GameEventKind::PlayerDamaged
            | GameEventKind::PlayerHealed
            | GameEventKind::ItemPickedUp
            | GameEventKind::ItemDestroyed => true,

            GameEventKind::Attack => match (source, target) {
                (Some(s), Some(t)) => s.state == ItemState::Attacking && s.alive() && t.alive(),
                _ => false,
            },

            GameEventKind::DeathComplete => source.is_some_and(|s| s.dying),
        }
    }

    /// Check if an item is on the good team.
    #[must_use]
    pub fn is_good(item: &GameItem, tags: &TagStore) -> bool {
        tags.item_has_tag(item.id, Tag::GOOD)
    }

    /// Check if an item is on the evil team.
    #[must_use]
    pub fn is_bad(item: &GameItem, tags: &TagStore) -> bool {
        tags.item_has_tag(item.id, Tag::EVIL)
    }

    /// Check if an item is the player.
    #[must_use]
    pub fn is_player(item: &GameItem) -> bool {
        item.id.is_player()
    }

    /// Check if an item is on either team.
    #[must_use]
    pub fn on_team(item: &GameItem, tags: &TagStore) -> bool {
        Self::is_good(item, tags) || Self::is_bad(item, tags)
    }

    /// Check if two items share a team.
    #[must_use]
    pub fn on_same_team(a: &GameItem, b: &GameItem, tags: &TagStore) -> bool {
        (Self::is_good(a, tags) && Self::is_good(b, tags))
            || (Self::is_bad(a, tags) && Self::is_bad(b, tags))
    }

    /// The default combat rule used by auto-generated behaviors: an attack
    /// is allowed if the target fights for a team the source is not on, or
    /// the source is evil and the target is the player.
    ///
    /// Distinct from [`allow_event`](Self::allow_event), which is the
    /// narrower always-enforced safety gate.
    #[must_use]
    pub fn allow_default(event: &GameEvent, level: &Level, tags: &TagStore) -> bool {
        let (Some(source), Some(target)) = (
            event.source.and_then(|id| level.item(id)),
            event.target.and_then(|id| level.item(id)),
        ) else {
            return false;
        };

        match event.kind {
            GameEventKind::Attack => {
                if Self::on_team(target, tags) && !Self::on_same_team(source, target, tags) {
                    return true;
                }
                Self::is_bad(source, tags) && Self::is_player(target)
            }
            _ => false,
        }
    }
}

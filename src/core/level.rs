//! Level item table.
//!
//! The authoritative level model (geometry, sectors, lighting) lives in the
//! editor outside this crate. The behavior core only needs id-addressed
//! access to the items' rule-relevant slice, which this table provides.
//!
//! Uses an `im` persistent map so the external undo history can snapshot the
//! table in O(1); the behavior core itself treats it as read-mostly (the one
//! writer is the default-behavior pass, which flags hostile items).

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use super::item::{GameItem, ItemId};

/// Id-addressed table of the items in the running level.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Level {
    items: ImHashMap<ItemId, GameItem>,
}

impl Level {
    /// Create an empty level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item.
    pub fn add_item(&mut self, item: GameItem) {
        self.items.insert(item.id, item);
    }

    /// Remove an item. Returns the removed item if present.
    pub fn remove_item(&mut self, id: ItemId) -> Option<GameItem> {
        self.items.remove(&id)
    }

    /// Get an item by id. Absence is not an error: the world can change
    /// between the time a behavior was authored and the time it fires.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&GameItem> {
        self.items.get(&id)
    }

    /// Get a mutable item by id.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut GameItem> {
        self.items.get_mut(&id)
    }

    /// Iterate all items.
    pub fn iter(&self) -> impl Iterator<Item = &GameItem> {
        self.items.values()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the level holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::ItemKind;

    #[test]
    fn test_add_and_get() {
        let mut level = Level::new();
        level.add_item(GameItem::new(ItemId(1), ItemKind::Biped));
        level.add_item(GameItem::new(ItemId::PLAYER, ItemKind::Biped));

        assert_eq!(level.len(), 2);
        assert!(level.item(ItemId(1)).is_some());
        assert!(level.item(ItemId::PLAYER).is_some());
        assert!(level.item(ItemId(99)).is_none());
    }

    #[test]
    fn test_remove() {
        let mut level = Level::new();
        level.add_item(GameItem::new(ItemId(1), ItemKind::Item));

        assert!(level.remove_item(ItemId(1)).is_some());
        assert!(level.remove_item(ItemId(1)).is_none());
        assert!(level.is_empty());
    }

    #[test]
    fn test_cheap_snapshot() {
        let mut level = Level::new();
        for i in 0..100 {
            level.add_item(GameItem::new(ItemId(i), ItemKind::Item));
        }

        let snapshot = level.clone();
        if let Some(item) = level.item_mut(ItemId(0)) {
            item.health = 0;
        }

        assert_eq!(snapshot.item(ItemId(0)).map(|i| i.health), Some(100));
        assert_eq!(level.item(ItemId(0)).map(|i| i.health), Some(0));
    }
}

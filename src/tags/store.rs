//! Tag membership store.
//!
//! Two-way index between tags and item ids, with the special-tag
//! exclusivity rule enforced at link time. Lookup misses return a shared
//! empty slice so per-frame callers can iterate without null checks; the
//! returned views are never mutated by the store's callers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ItemId;
use crate::history::{Dispatcher, HistoryAction, StoreChange};

use super::{Tag, MAX_DESIGNER_TAG, SPECIAL_TAG_OFFSET};

const EMPTY_ITEMS: &[ItemId] = &[];
const EMPTY_TAGS: &[Tag] = &[];

/// Two-way tag/item membership index.
#[derive(Debug, Default)]
pub struct TagStore {
    items_by_tag: FxHashMap<Tag, Vec<ItemId>>,
    tags_by_item: FxHashMap<ItemId, Vec<Tag>>,
    changed: Dispatcher<StoreChange>,
}

impl TagStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a serialized blob.
    #[must_use]
    pub fn with_data(data: &str) -> Self {
        let mut store = Self::new();
        store.unserialize(data);
        store
    }

    /// Subscribe to change notifications.
    pub fn subscribe_changes(&mut self) -> crossbeam_channel::Receiver<StoreChange> {
        self.changed.subscribe()
    }

    /// Drop all links.
    pub fn reset(&mut self, quiet: bool) {
        self.items_by_tag.clear();
        self.tags_by_item.clear();
        if !quiet {
            self.changed.dispatch(&StoreChange::Reset);
        }
    }

    /// Link an item to a tag.
    ///
    /// Linking a special (negative) tag first unlinks any special tag the
    /// item already holds; an item is on at most one archetype at a time.
    pub fn link(&mut self, item: ItemId, tag: Tag) {
        if tag.is_special() {
            if let Some(prior) = self.special_tag_for_item(item) {
                if prior == tag {
                    return;
                }
                self.unlink(item, prior);
            }
        }

        let items = self.items_by_tag.entry(tag).or_default();
        if !items.contains(&item) {
            items.push(item);
        }
        let tags = self.tags_by_item.entry(item).or_default();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    /// Remove a link. Unknown links are ignored.
    pub fn unlink(&mut self, item: ItemId, tag: Tag) {
        if let Some(items) = self.items_by_tag.get_mut(&tag) {
            items.retain(|&id| id != item);
            if items.is_empty() {
                self.items_by_tag.remove(&tag);
            }
        }
        if let Some(tags) = self.tags_by_item.get_mut(&item) {
            tags.retain(|&t| t != tag);
            if tags.is_empty() {
                self.tags_by_item.remove(&item);
            }
        }
    }

    /// All items carrying a tag. Shared empty slice when none do.
    #[must_use]
    pub fn items_by_tag(&self, tag: Tag) -> &[ItemId] {
        self.items_by_tag
            .get(&tag)
            .map_or(EMPTY_ITEMS, Vec::as_slice)
    }

    /// First item carrying a tag, if any.
    #[must_use]
    pub fn first_item_with_tag(&self, tag: Tag) -> Option<ItemId> {
        self.items_by_tag(tag).first().copied()
    }

    /// All tags on an item. Shared empty slice when it has none.
    #[must_use]
    pub fn tags_for_item(&self, item: ItemId) -> &[Tag] {
        self.tags_by_item
            .get(&item)
            .map_or(EMPTY_TAGS, Vec::as_slice)
    }

    /// Check whether an item carries a tag.
    ///
    /// The player matches [`Tag::PLAYER`] without a stored link; the player
    /// entity is not part of the authored level data.
    #[must_use]
    pub fn item_has_tag(&self, item: ItemId, tag: Tag) -> bool {
        if tag == Tag::PLAYER && item.is_player() {
            return true;
        }
        self.tags_for_item(item).contains(&tag)
    }

    /// Check whether an item holds any special tag.
    #[must_use]
    pub fn has_special_tag(&self, item: ItemId) -> bool {
        self.special_tag_for_item(item).is_some()
    }

    /// The item's special tag, if it holds one.
    #[must_use]
    pub fn special_tag_for_item(&self, item: ItemId) -> Option<Tag> {
        self.tags_for_item(item)
            .iter()
            .copied()
            .find(|tag| tag.is_special())
    }

    /// Apply a command pushed by the external undo/redo history.
    pub fn on_action(&mut self, action: &HistoryAction) {
        match action {
            HistoryAction::Reset => self.reset(false),
            HistoryAction::Undo(blob) => self.restore_undo(blob),
            HistoryAction::Redo(blob) => self.redo(blob),
        }
    }

    /// Restore from an undo blob.
    pub fn restore_undo(&mut self, data: &str) {
        self.reset(true);
        self.unserialize(data);
        self.changed.dispatch(&StoreChange::Undo);
    }

    /// Restore from a redo blob.
    pub fn redo(&mut self, data: &str) {
        self.reset(true);
        self.unserialize(data);
        self.changed.dispatch(&StoreChange::Redo);
    }

    /// Serialize to the pipe-delimited wire form: one `,`-joined item list
    /// per tag slot, slots running from `-SPECIAL_TAG_OFFSET` through
    /// `MAX_DESIGNER_TAG`.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut groups = Vec::with_capacity((SPECIAL_TAG_OFFSET + MAX_DESIGNER_TAG + 1) as usize);
        for raw in -SPECIAL_TAG_OFFSET..=MAX_DESIGNER_TAG {
            let ids: Vec<String> = self
                .items_by_tag(Tag(raw))
                .iter()
                .map(|id| id.raw().to_string())
                .collect();
            groups.push(ids.join(","));
        }
        groups.join("|")
    }

    /// Rebuild from the wire form. Malformed ids are logged and skipped;
    /// a corrupt save must not take the session down.
    pub fn unserialize(&mut self, data: &str) {
        for (slot, group) in data.split('|').enumerate() {
            let raw = slot as i32 - SPECIAL_TAG_OFFSET;
            if raw > MAX_DESIGNER_TAG || group.is_empty() {
                continue;
            }
            for id_text in group.split(',') {
                match id_text.trim().parse::<i32>() {
                    Ok(id) => self.link(ItemId(id), Tag(raw)),
                    Err(_) => {
                        log::warn!("tag blob: skipping bad item id {id_text:?} in slot {raw}");
                    }
                }
            }
        }
        self.changed.dispatch(&StoreChange::Change);
    }
}

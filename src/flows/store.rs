//! The flow graph store.
//!
//! Owns every [`FlowNode`] and keeps the runtime lookup indices the
//! per-frame interpreter walks:
//!
//! - by node id (the arena itself),
//! - by owning item,
//! - trigger nodes by owning item,
//! - trigger nodes by trigger subtype (global, across all items),
//! - per-item trigger-subtype presence flags.
//!
//! The three trigger indices are kept mutually consistent by routing every
//! insertion — `add_node` and `unserialize` alike — through one internal
//! indexing path. Lookup misses return a shared empty slice.
//!
//! Mutation happens only through `add_node`/`add_child`/`unserialize`/
//! `reset`; per-frame traversal sees a stable snapshot within a tick.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::ItemId;
use crate::history::{Dispatcher, HistoryAction, StoreChange};

use super::node::{FlowNode, NodeId, NodeKind, Operator, TargetType, TargetValue, TriggerKind};

const EMPTY_NODES: &[NodeId] = &[];

/// Arena and index maps over all flow nodes.
#[derive(Debug, Default)]
pub struct Flows {
    nodes: FxHashMap<NodeId, FlowNode>,
    nodes_by_item: FxHashMap<ItemId, Vec<NodeId>>,
    triggers_by_item: FxHashMap<ItemId, Vec<NodeId>>,
    triggers_by_type: FxHashMap<TriggerKind, Vec<NodeId>>,
    trigger_flags_by_item: FxHashMap<ItemId, FxHashSet<TriggerKind>>,
    metadata: serde_json::Value,
    next_id: u32,
    changed: Dispatcher<StoreChange>,
}

impl Flows {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: empty_metadata(),
            next_id: 1,
            ..Self::default()
        }
    }

    /// Create a store pre-populated from a serialized blob.
    #[must_use]
    pub fn with_data(data: &str) -> Self {
        let mut flows = Self::new();
        flows.unserialize(data);
        flows
    }

    /// Number of nodes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The id the next `add_node` call will allocate. Ids strictly increase
    /// and are never reused, even across `reset` + `unserialize` replay, so
    /// history replay cannot collide fresh nodes with restored ones.
    #[must_use]
    pub fn next_node_id(&self) -> NodeId {
        NodeId(self.next_id)
    }

    /// Subscribe to change notifications.
    pub fn subscribe_changes(&mut self) -> crossbeam_channel::Receiver<StoreChange> {
        self.changed.subscribe()
    }

    /// Broadcast an ordinary content change. The compiler calls this once
    /// per non-quiet statement rather than per node.
    pub fn notify_changed(&mut self) {
        self.changed.dispatch(&StoreChange::Change);
    }

    /// Decoded metadata header of the last `unserialize`.
    #[must_use]
    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    /// Drop all nodes and indices. The id counter is intentionally kept.
    pub fn reset(&mut self, quiet: bool) {
        self.nodes.clear();
        self.nodes_by_item.clear();
        self.triggers_by_item.clear();
        self.triggers_by_type.clear();
        self.trigger_flags_by_item.clear();
        self.metadata = empty_metadata();
        if !quiet {
            self.changed.dispatch(&StoreChange::Reset);
        }
    }

    /// Allocate and index a new node. Never fails; unowned nodes
    /// (`owner == None`) are kept out of the per-item indices.
    pub fn add_node(
        &mut self,
        owner: Option<ItemId>,
        kind: NodeKind,
        subtype: i32,
        operator: Operator,
        target_type: TargetType,
        target: TargetValue,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        let node = FlowNode::new(id, owner, kind, subtype, operator, target_type, target);
        self.insert_node(node);
        id
    }

    /// Get a node by id. Absence is not an error — the graph can reference
    /// nodes removed by an external edit; callers must null-check.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&FlowNode> {
        self.nodes.get(&id)
    }

    /// All nodes owned by an item. Shared empty slice when it has none.
    #[must_use]
    pub fn nodes_by_item(&self, item: ItemId) -> &[NodeId] {
        self.nodes_by_item
            .get(&item)
            .map_or(EMPTY_NODES, Vec::as_slice)
    }

    /// Trigger nodes owned by an item. Shared empty slice when it has none.
    #[must_use]
    pub fn triggers_by_item(&self, item: ItemId) -> &[NodeId] {
        self.triggers_by_item
            .get(&item)
            .map_or(EMPTY_NODES, Vec::as_slice)
    }

    /// Trigger nodes of a subtype, across all items. Shared empty slice
    /// when the subtype is unused.
    #[must_use]
    pub fn triggers_by_type(&self, kind: TriggerKind) -> &[NodeId] {
        self.triggers_by_type
            .get(&kind)
            .map_or(EMPTY_NODES, Vec::as_slice)
    }

    /// Check whether an item owns any trigger node.
    #[must_use]
    pub fn item_has_triggers(&self, item: ItemId) -> bool {
        self.triggers_by_item.contains_key(&item)
    }

    /// Check whether an item owns a trigger of the given subtype.
    #[must_use]
    pub fn item_has_trigger_of(&self, item: ItemId, kind: TriggerKind) -> bool {
        self.trigger_flags_by_item
            .get(&item)
            .is_some_and(|flags| flags.contains(&kind))
    }

    /// Resolve a node's children, optionally filtered by edge terminal.
    /// Dangling child ids are skipped.
    #[must_use]
    pub fn children_by_node(&self, id: NodeId, terminal: Option<bool>) -> Vec<&FlowNode> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };

        node.children()
            .iter()
            .zip(node.children_terminal())
            .filter(|&(_, &edge)| terminal.is_none_or(|wanted| edge == wanted))
            .filter_map(|(&child, _)| self.node(child))
            .collect()
    }

    /// Link a child edge on an existing node. Missing parents are ignored
    /// (the compiler only wires nodes it just created).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, terminal: bool) {
        match self.nodes.get_mut(&parent) {
            Some(node) => node.add_child(child, terminal),
            None => log::debug!("add_child: no such parent {parent}"),
        }
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

    /// Serialize to the wire form:
    /// `<base64(JSON metadata)>~<node>|<node>|...`, nodes in id order.
    #[must_use]
    pub fn serialize(&self) -> String {
        let meta_json = self.metadata.to_string();
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();

        let records: Vec<String> = ids
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(FlowNode::serialize)
            .collect();

        format!("{}~{}", BASE64.encode(meta_json), records.join("|"))
    }

    /// Rebuild from the wire form, rebuilding every index through the same
    /// path `add_node` uses. Designed to be called from a clean `reset`.
    ///
    /// Nothing here throws: a bad metadata segment degrades to `{}` and is
    /// logged, malformed node records are logged and skipped. A corrupt
    /// save must not take the editor session down.
    pub fn unserialize(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }

        // Blob-level literal-null placeholder, substituted before splitting.
        let data = data.replace('@', "null");

        let Some((meta, records)) = data.split_once('~') else {
            log::error!("flows blob: missing metadata separator, ignoring blob");
            return;
        };

        self.metadata = decode_metadata(meta);

        for record in records.split('|') {
            if record.is_empty() {
                continue;
            }
            match FlowNode::parse(record) {
                Ok(node) => self.insert_node(node),
                Err(err) => log::error!("flows blob: skipping node record: {err}"),
            }
        }
    }

    /// Insert a node and maintain every index. The single path shared by
    /// `add_node` and `unserialize`, which is what keeps the trigger
    /// indices mutually consistent.
    fn insert_node(&mut self, node: FlowNode) {
        let id = node.id;

        if self.nodes.contains_key(&id) {
            log::warn!("flows: duplicate node id {id}, record skipped");
            return;
        }

        self.next_id = self.next_id.max(id.raw() + 1);

        if let Some(owner) = node.owner {
            self.nodes_by_item.entry(owner).or_default().push(id);

            if let Some(trigger) = node.trigger_kind() {
                self.triggers_by_item.entry(owner).or_default().push(id);
                self.triggers_by_type.entry(trigger).or_default().push(id);
                self.trigger_flags_by_item
                    .entry(owner)
                    .or_default()
                    .insert(trigger);
            }
        }

        self.nodes.insert(id, node);
    }
}

fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn decode_metadata(meta: &str) -> serde_json::Value {
    if meta.is_empty() {
        return empty_metadata();
    }

    let decoded = BASE64
        .decode(meta)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|text| serde_json::from_str(&text).ok());

    match decoded {
        Some(value) => value,
        None => {
            log::error!("flows blob: bad metadata segment, using empty metadata");
            empty_metadata()
        }
    }
}

//! The seam between the engine and whatever owns the document tree.
//!
//! The engine never stores nodes itself. Everything it does during a
//! settlement pass goes through [`TreeHost`], so the same engine can drive the
//! in-crate [`Document`](super::document::Document) or a foreign tree.

use std::collections::BTreeSet;

use super::selection::Selection;
use crate::models::{BlockId, EntityKind, InlineNode, NodeKey};

/// Nodes and blocks an edit changed; what a host reports to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet {
    /// Nodes whose text changed.
    pub nodes: BTreeSet<NodeKey>,
    /// Blocks whose child list changed.
    pub blocks: BTreeSet<BlockId>,
}

impl DirtySet {
    pub fn node(key: NodeKey) -> Self {
        let mut dirty = Self::default();
        dirty.nodes.insert(key);
        dirty
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.blocks.is_empty()
    }

    pub fn extend(&mut self, other: DirtySet) {
        self.nodes.extend(other.nodes);
        self.blocks.extend(other.blocks);
    }
}

/// What a host declares it can store, checked once when the engine attaches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Entity kinds the host has registered node types for.
    pub entity_kinds: BTreeSet<EntityKind>,
    /// Whether the host can hold reference placeholder nodes.
    pub placeholders: bool,
}

impl HostCapabilities {
    /// A host that can store every node the engine produces.
    pub fn all() -> Self {
        Self {
            entity_kinds: EntityKind::ALL.into_iter().collect(),
            placeholders: true,
        }
    }
}

/// Node storage and structural operations the engine needs.
///
/// Tree operations do not move the selection; the engine carries the
/// selection through a pass itself and writes it back with
/// [`set_selection`](TreeHost::set_selection) when the pass ends.
pub trait TreeHost {
    fn capabilities(&self) -> HostCapabilities;

    /// Blocks in document order.
    fn blocks(&self) -> Vec<BlockId>;

    /// Children of `block` in order; empty if the block does not exist.
    fn children(&self, block: BlockId) -> Vec<NodeKey>;

    fn node(&self, key: NodeKey) -> Option<&InlineNode>;

    fn node_mut(&mut self, key: NodeKey) -> Option<&mut InlineNode>;

    fn block_of(&self, key: NodeKey) -> Option<BlockId>;

    fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey>;

    fn next_sibling(&self, key: NodeKey) -> Option<NodeKey>;

    /// Cuts a text node at the given character offsets, which must be
    /// strictly increasing and inside the text. The first piece keeps `key`;
    /// every piece keeps the node's variant and format. Returns the keys of
    /// all pieces in order.
    fn split_at(&mut self, key: NodeKey, offsets: &[usize]) -> Vec<NodeKey>;

    /// Replaces `key` with `nodes` in the same position, under fresh keys.
    fn replace(&mut self, key: NodeKey, nodes: Vec<InlineNode>) -> Vec<NodeKey>;

    fn remove(&mut self, key: NodeKey) -> Option<InlineNode>;

    fn insert_after(&mut self, anchor: NodeKey, node: InlineNode) -> Option<NodeKey>;

    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);
}

use std::collections::HashMap;

use super::commands::{Cmd, EditError};
use super::host::{DirtySet, HostCapabilities, TreeHost};
use super::selection::{Point, Selection};
use crate::models::{BlockId, InlineNode, NodeKey};
use crate::parsing::span::{byte_offset, char_len, slice_chars};

#[derive(Debug, Clone)]
struct Block {
    id: BlockId,
    children: Vec<NodeKey>,
}

/// In-memory document tree: ordered blocks of inline nodes.
///
/// This is the reference [`TreeHost`]. Node keys come from a counter that
/// only moves forward, so a key is never handed out twice.
///
/// Edits arrive as [`Cmd`]s through [`apply`](Document::apply), which returns
/// the [`DirtySet`] the engine needs to settle the tree afterwards. The
/// document itself never recognizes entities.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    nodes: HashMap<NodeKey, InlineNode>,
    parents: HashMap<NodeKey, BlockId>,
    next_key: u64,
    selection: Option<Selection>,
    capabilities: HostCapabilities,
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document that can store every node kind.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            nodes: HashMap::new(),
            parents: HashMap::new(),
            next_key: 1,
            selection: None,
            capabilities: HostCapabilities::all(),
            version: 0,
        }
    }

    /// One block per line, each holding a single plain node. The caret is
    /// placed at the end of the text.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        for line in text.split('\n') {
            let id = BlockId::new();
            doc.blocks.push(Block {
                id,
                children: Vec::new(),
            });
            let key = doc.alloc(id, InlineNode::plain(line));
            if let Some(block) = doc.blocks.last_mut() {
                block.children.push(key);
            }
        }
        doc.selection = doc.end_of_document().map(Selection::caret);
        doc
    }

    /// A document with the given nodes, one inner vector per block. There is
    /// no selection.
    pub fn from_blocks(blocks: Vec<Vec<InlineNode>>) -> Self {
        let mut doc = Self::new();
        for nodes in blocks {
            let id = BlockId::new();
            let children = nodes.into_iter().map(|node| doc.alloc(id, node)).collect();
            doc.blocks.push(Block { id, children });
        }
        doc
    }

    /// Restricts what the document claims it can store.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// The literal text of every block, joined with newlines. Placeholders
    /// contribute nothing.
    pub fn to_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| self.block_text(block.id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn block_text(&self, block: BlockId) -> String {
        self.children(block)
            .into_iter()
            .filter_map(|key| self.nodes.get(&key))
            .map(InlineNode::text)
            .collect()
    }

    /// Every node and block, for settling a freshly loaded document.
    pub fn all_dirty(&self) -> DirtySet {
        DirtySet {
            nodes: self.nodes.keys().copied().collect(),
            blocks: self.blocks.iter().map(|b| b.id).collect(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn caret(&self) -> Option<Point> {
        self.selection.map(|s| s.focus)
    }

    pub fn len_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Applies one edit and reports what it dirtied.
    pub fn apply(&mut self, cmd: Cmd) -> Result<DirtySet, EditError> {
        let dirty = match cmd {
            Cmd::InsertText { at, text } => self.insert_text(at, &text)?,
            Cmd::DeleteRange { from, to } => self.delete_range(from, to)?,
            Cmd::ReplaceText { node, text } => self.replace_text(node, text)?,
            Cmd::SplitBlock { at } => self.split_block(at)?,
            Cmd::InsertBlock { after, text } => self.insert_block(after, text)?,
            Cmd::RemoveBlock { block } => self.remove_block(block)?,
            Cmd::Select(selection) => {
                self.check_point(selection.anchor)?;
                self.check_point(selection.focus)?;
                // An empty node may have been kept alive only by the old caret.
                let mut dirty = DirtySet::default();
                if let Some(previous) = self.selection.replace(selection) {
                    for point in [previous.anchor, previous.focus] {
                        if let Some(block) = self.block_of(point.node) {
                            dirty.blocks.insert(block);
                        }
                    }
                }
                dirty
            }
        };
        self.version += 1;
        Ok(dirty)
    }

    fn insert_text(&mut self, at: Point, text: &str) -> Result<DirtySet, EditError> {
        self.check_editable(at)?;
        if let Some(content) = self.nodes.get_mut(&at.node).and_then(InlineNode::text_mut) {
            let index = byte_offset(content, at.offset);
            content.insert_str(index, text);
        }
        self.selection = Some(Selection::caret(Point::new(
            at.node,
            at.offset + char_len(text),
        )));
        Ok(DirtySet::node(at.node))
    }

    fn delete_range(&mut self, from: Point, to: Point) -> Result<DirtySet, EditError> {
        self.check_editable(from)?;
        self.check_editable(to)?;
        let (from_block, from_index) = self.position(from.node).ok_or(EditError::UnknownNode(from.node))?;
        let (to_block, to_index) = self.position(to.node).ok_or(EditError::UnknownNode(to.node))?;
        if from_block != to_block {
            return Err(EditError::CrossBlockRange);
        }
        let (from, to, from_index, to_index) = if (to_index, to.offset) < (from_index, from.offset) {
            (to, from, to_index, from_index)
        } else {
            (from, to, from_index, to_index)
        };

        let mut dirty = DirtySet::default();
        if from.node == to.node {
            self.delete_chars(from.node, from.offset, to.offset);
            dirty.nodes.insert(from.node);
        } else {
            let from_len = self.nodes.get(&from.node).map_or(0, InlineNode::char_len);
            self.delete_chars(from.node, from.offset, from_len);
            self.delete_chars(to.node, 0, to.offset);
            let between: Vec<NodeKey> = self.blocks[from_block].children[from_index + 1..to_index].to_vec();
            for key in between {
                self.detach(key);
            }
            dirty.nodes.insert(from.node);
            dirty.nodes.insert(to.node);
            dirty.blocks.insert(self.blocks[from_block].id);
        }
        self.selection = Some(Selection::caret(from));
        Ok(dirty)
    }

    fn replace_text(&mut self, key: NodeKey, text: String) -> Result<DirtySet, EditError> {
        self.check_editable(Point::new(key, 0))?;
        let len = char_len(&text);
        if let Some(content) = self.nodes.get_mut(&key).and_then(InlineNode::text_mut) {
            *content = text;
        }
        if let Some(selection) = self.selection.as_mut() {
            selection.remap(|p| {
                if p.node == key {
                    Point::new(key, p.offset.min(len))
                } else {
                    p
                }
            });
        }
        Ok(DirtySet::node(key))
    }

    fn split_block(&mut self, at: Point) -> Result<DirtySet, EditError> {
        self.check_editable(at)?;
        let (block_index, child_index) = self.position(at.node).ok_or(EditError::UnknownNode(at.node))?;
        let old_id = self.blocks[block_index].id;
        let new_id = BlockId::new();

        let mut dirty = DirtySet::default();
        dirty.nodes.insert(at.node);
        dirty.blocks.insert(old_id);
        dirty.blocks.insert(new_id);

        let mut moved = self.blocks[block_index].children.split_off(child_index + 1);
        // Trailing placeholders stay with the block they already mirror.
        let text_end = moved
            .iter()
            .rposition(|key| !self.is_placeholder(*key))
            .map_or(0, |i| i + 1);
        let trailing = moved.split_off(text_end);
        self.blocks[block_index].children.extend(trailing);
        let mut children = Vec::with_capacity(moved.len() + 1);
        let tail = match self.nodes.get_mut(&at.node) {
            Some(node) => {
                let text = node.text().to_string();
                let tail = slice_chars(&text, at.offset, char_len(&text)).to_string();
                let head = slice_chars(&text, 0, at.offset).to_string();
                let tail_node = if tail.is_empty() {
                    InlineNode::plain("")
                } else {
                    node.with_text(tail)
                };
                if let Some(content) = node.text_mut() {
                    *content = head;
                }
                tail_node
            }
            None => return Err(EditError::UnknownNode(at.node)),
        };
        let moves_text = moved.iter().any(|key| !self.is_placeholder(*key));
        if !tail.text().is_empty() || !moves_text {
            let key = self.alloc(new_id, tail);
            dirty.nodes.insert(key);
            children.push(key);
        }
        for key in &moved {
            self.parents.insert(*key, new_id);
        }
        children.extend(moved);

        self.selection = children
            .iter()
            .find(|key| !self.is_placeholder(**key))
            .map(|key| Selection::caret(Point::new(*key, 0)));
        self.blocks.insert(
            block_index + 1,
            Block {
                id: new_id,
                children,
            },
        );
        Ok(dirty)
    }

    fn insert_block(&mut self, after: Option<BlockId>, text: String) -> Result<DirtySet, EditError> {
        let index = match after {
            Some(id) => self.block_index(id).ok_or(EditError::UnknownBlock(id))? + 1,
            None => 0,
        };
        let id = BlockId::new();
        let len = char_len(&text);
        let key = self.alloc(id, InlineNode::plain(text));
        self.blocks.insert(
            index,
            Block {
                id,
                children: vec![key],
            },
        );
        self.selection = Some(Selection::caret(Point::new(key, len)));

        let mut dirty = DirtySet::node(key);
        dirty.blocks.insert(id);
        Ok(dirty)
    }

    fn remove_block(&mut self, id: BlockId) -> Result<DirtySet, EditError> {
        let index = self.block_index(id).ok_or(EditError::UnknownBlock(id))?;
        let block = self.blocks.remove(index);
        let caret_lost = self
            .selection
            .is_some_and(|s| block.children.iter().any(|key| s.touches(*key)));
        for key in &block.children {
            self.nodes.remove(key);
            self.parents.remove(key);
        }
        if caret_lost {
            let previous = index.checked_sub(1).and_then(|i| self.blocks.get(i)).map(|b| b.id);
            self.selection = previous
                .and_then(|b| self.end_of_block(b))
                .map(Selection::caret);
        }
        let mut dirty = DirtySet::default();
        dirty.blocks.insert(id);
        Ok(dirty)
    }

    fn alloc(&mut self, block: BlockId, node: InlineNode) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes.insert(key, node);
        self.parents.insert(key, block);
        key
    }

    fn detach(&mut self, key: NodeKey) -> Option<InlineNode> {
        let (block_index, child_index) = self.position(key)?;
        self.blocks[block_index].children.remove(child_index);
        self.parents.remove(&key);
        self.nodes.remove(&key)
    }

    fn block_index(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    fn position(&self, key: NodeKey) -> Option<(usize, usize)> {
        let block = self.parents.get(&key)?;
        let block_index = self.block_index(*block)?;
        let child_index = self.blocks[block_index]
            .children
            .iter()
            .position(|k| *k == key)?;
        Some((block_index, child_index))
    }

    fn delete_chars(&mut self, key: NodeKey, start: usize, end: usize) {
        if let Some(content) = self.nodes.get_mut(&key).and_then(InlineNode::text_mut) {
            let from = byte_offset(content, start);
            let to = byte_offset(content, end.max(start));
            content.replace_range(from..to, "");
        }
    }

    fn is_placeholder(&self, key: NodeKey) -> bool {
        self.nodes.get(&key).is_some_and(|node| node.is_placeholder())
    }

    fn check_point(&self, point: Point) -> Result<(), EditError> {
        let node = self
            .nodes
            .get(&point.node)
            .ok_or(EditError::UnknownNode(point.node))?;
        let len = node.char_len();
        if point.offset > len {
            return Err(EditError::OffsetOutOfBounds {
                node: point.node,
                offset: point.offset,
                len,
            });
        }
        Ok(())
    }

    fn check_editable(&self, point: Point) -> Result<(), EditError> {
        self.check_point(point)?;
        match self.nodes.get(&point.node) {
            Some(node) if node.is_placeholder() => Err(EditError::NotEditable(point.node)),
            _ => Ok(()),
        }
    }

    fn end_of_block(&self, block: BlockId) -> Option<Point> {
        self.children(block)
            .into_iter()
            .rev()
            .filter_map(|key| self.nodes.get(&key).map(|node| (key, node)))
            .find(|(_, node)| !node.is_placeholder())
            .map(|(key, node)| Point::new(key, node.char_len()))
    }

    fn end_of_document(&self) -> Option<Point> {
        self.blocks.last().and_then(|b| self.end_of_block(b.id))
    }
}

impl TreeHost for Document {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities.clone()
    }

    fn blocks(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    fn children(&self, block: BlockId) -> Vec<NodeKey> {
        self.block_index(block)
            .map(|i| self.blocks[i].children.clone())
            .unwrap_or_default()
    }

    fn node(&self, key: NodeKey) -> Option<&InlineNode> {
        self.nodes.get(&key)
    }

    fn node_mut(&mut self, key: NodeKey) -> Option<&mut InlineNode> {
        self.nodes.get_mut(&key)
    }

    fn block_of(&self, key: NodeKey) -> Option<BlockId> {
        self.parents.get(&key).copied()
    }

    fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let (block_index, child_index) = self.position(key)?;
        let index = child_index.checked_sub(1)?;
        self.blocks[block_index].children.get(index).copied()
    }

    fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let (block_index, child_index) = self.position(key)?;
        self.blocks[block_index].children.get(child_index + 1).copied()
    }

    fn split_at(&mut self, key: NodeKey, offsets: &[usize]) -> Vec<NodeKey> {
        let Some((block_index, child_index)) = self.position(key) else {
            return Vec::new();
        };
        let Some(node) = self.nodes.get(&key).cloned() else {
            return Vec::new();
        };
        let text = node.text();
        let len = char_len(text);
        let mut cuts: Vec<usize> = offsets.iter().copied().filter(|o| *o > 0 && *o < len).collect();
        cuts.sort_unstable();
        cuts.dedup();
        if cuts.is_empty() {
            return vec![key];
        }

        let block = self.blocks[block_index].id;
        let mut bounds = Vec::with_capacity(cuts.len() + 2);
        bounds.push(0);
        bounds.extend(cuts);
        bounds.push(len);

        let mut keys = vec![key];
        for (i, window) in bounds.windows(2).enumerate().skip(1) {
            let piece = node.with_text(slice_chars(text, window[0], window[1]).to_string());
            let piece_key = self.alloc(block, piece);
            self.blocks[block_index]
                .children
                .insert(child_index + i, piece_key);
            keys.push(piece_key);
        }
        if let Some(content) = self.nodes.get_mut(&key).and_then(InlineNode::text_mut) {
            *content = slice_chars(text, 0, bounds[1]).to_string();
        }
        keys
    }

    fn replace(&mut self, key: NodeKey, nodes: Vec<InlineNode>) -> Vec<NodeKey> {
        let Some((block_index, child_index)) = self.position(key) else {
            return Vec::new();
        };
        let block = self.blocks[block_index].id;
        self.detach(key);
        let mut keys = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.into_iter().enumerate() {
            let new_key = self.alloc(block, node);
            self.blocks[block_index]
                .children
                .insert(child_index + i, new_key);
            keys.push(new_key);
        }
        keys
    }

    fn remove(&mut self, key: NodeKey) -> Option<InlineNode> {
        self.detach(key)
    }

    fn insert_after(&mut self, anchor: NodeKey, node: InlineNode) -> Option<NodeKey> {
        let (block_index, child_index) = self.position(anchor)?;
        let block = self.blocks[block_index].id;
        let key = self.alloc(block, node);
        self.blocks[block_index].children.insert(child_index + 1, key);
        Some(key)
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }
}

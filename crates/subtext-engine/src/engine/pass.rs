use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::editing::host::TreeHost;
use crate::editing::patch::Patch;
use crate::editing::selection::{Point, Selection};
use crate::models::{BlockId, NodeKey};
use crate::parsing::MatchContext;

/// State threaded through one settlement pass.
///
/// The pass owns the selection while it runs: every structural change
/// relocates it here, and the engine hands it back to the host at the end.
pub(crate) struct PassContext {
    pub selection: Option<Selection>,
    worklist: VecDeque<NodeKey>,
    queued: HashSet<NodeKey>,
    edited: HashSet<NodeKey>,
    touched: BTreeSet<NodeKey>,
    blocks: Vec<BlockId>,
    pub patch: Patch,
}

impl PassContext {
    pub fn new(selection: Option<Selection>) -> Self {
        Self {
            selection,
            worklist: VecDeque::new(),
            queued: HashSet::new(),
            edited: HashSet::new(),
            touched: BTreeSet::new(),
            blocks: Vec::new(),
            patch: Patch::default(),
        }
    }

    /// A node the host reported as changed.
    pub fn mark_edited(&mut self, host: &impl TreeHost, key: NodeKey) {
        self.edited.insert(key);
        self.queue(key);
        self.touch(host, key);
    }

    pub fn is_edited(&self, key: NodeKey) -> bool {
        self.edited.contains(&key)
    }

    /// Carries host-edited status over to a node that replaced `from`.
    pub fn inherit(&mut self, from: NodeKey, to: NodeKey) {
        if self.edited.contains(&from) {
            self.edited.insert(to);
        }
    }

    /// Schedules a node for matching.
    pub fn queue(&mut self, key: NodeKey) {
        if self.queued.insert(key) {
            self.worklist.push_back(key);
        }
    }

    pub fn next(&mut self) -> Option<NodeKey> {
        let key = self.worklist.pop_front()?;
        self.queued.remove(&key);
        Some(key)
    }

    pub fn has_pending(&self) -> bool {
        !self.worklist.is_empty()
    }

    /// Marks a node and its neighbors for the guard, and rescans plain
    /// neighbors whose context may have changed.
    pub fn touch(&mut self, host: &impl TreeHost, key: NodeKey) {
        self.touched.insert(key);
        for neighbor in [host.previous_sibling(key), host.next_sibling(key)]
            .into_iter()
            .flatten()
        {
            self.touched.insert(neighbor);
            if host.node(neighbor).is_some_and(|n| n.is_plain()) {
                self.queue(neighbor);
            }
        }
        if let Some(block) = host.block_of(key) {
            self.touch_block(block);
        }
    }

    /// Touches the neighbors of a node about to leave the tree.
    pub fn touch_around(&mut self, host: &impl TreeHost, key: NodeKey) {
        for neighbor in [host.previous_sibling(key), host.next_sibling(key)]
            .into_iter()
            .flatten()
        {
            self.touch(host, neighbor);
        }
    }

    pub fn touch_block(&mut self, block: BlockId) {
        if !self.blocks.contains(&block) {
            self.blocks.push(block);
        }
    }

    pub fn take_touched(&mut self) -> BTreeSet<NodeKey> {
        std::mem::take(&mut self.touched)
    }

    pub fn blocks(&self) -> Vec<BlockId> {
        self.blocks.clone()
    }

    pub fn changed(&mut self, block: BlockId) {
        self.patch.note_changed(block);
    }

    pub fn holds_selection(&self, key: NodeKey) -> bool {
        self.selection.is_some_and(|s| s.touches(key))
    }

    pub fn relocate(&mut self, relocate: impl FnMut(Point) -> Point) {
        if let Some(selection) = self.selection.as_mut() {
            selection.remap(relocate);
        }
    }

    /// Moves every point on `from` to `to`, shifting offsets by `shift`.
    pub fn move_points(&mut self, from: NodeKey, to: NodeKey, shift: usize) {
        self.relocate(|p| {
            if p.node == from {
                Point::new(to, p.offset + shift)
            } else {
                p
            }
        });
    }

    /// Drops the selection if it sits on a node that is going away.
    pub fn forget(&mut self, key: NodeKey) {
        if self.holds_selection(key) {
            log::debug!("selection lost with removed node {key:?}");
            self.selection = None;
        }
    }

    pub fn finish(mut self) -> Patch {
        self.patch.selection = self.selection;
        self.patch
    }
}

/// Describes what precedes `key` for matching: the nearest non-empty
/// previous sibling decides line start, the preceding character and, when
/// `suppress` is set, which kind may not match at offset 0.
pub(crate) fn match_context(host: &impl TreeHost, key: NodeKey, suppress: bool) -> MatchContext {
    let mut previous = host.previous_sibling(key);
    while let Some(candidate) = previous {
        match host.node(candidate) {
            Some(node) if !node.text().is_empty() => {
                let last = node.text().chars().next_back();
                return MatchContext {
                    at_line_start: last == Some('\n'),
                    preceding: last,
                    suppressed_at_start: if suppress { node.entity_kind() } else { None },
                };
            }
            _ => previous = host.previous_sibling(candidate),
        }
    }
    MatchContext::line_start()
}

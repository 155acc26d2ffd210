use serde::Serialize;

use super::selection::Selection;
use crate::models::BlockId;

/// What one settlement pass (or one edit plus its settlement) changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Patch {
    /// Blocks whose children changed, in first-seen order.
    pub changed_blocks: Vec<BlockId>,
    /// Entity groups created.
    pub recognized: usize,
    /// Typed nodes turned back into plain text.
    pub demoted: usize,
    /// Plain-text nodes folded into a neighbor.
    pub merged: usize,
    pub placeholders_added: usize,
    pub placeholders_removed: usize,
    /// Pending placeholders that received their content.
    pub placeholders_resolved: usize,
    pub selection: Option<Selection>,
    pub version: u64,
}

impl Patch {
    /// True if the tree was not touched.
    pub fn is_noop(&self) -> bool {
        self.changed_blocks.is_empty()
            && self.recognized == 0
            && self.demoted == 0
            && self.merged == 0
            && self.placeholders_added == 0
            && self.placeholders_removed == 0
            && self.placeholders_resolved == 0
    }

    pub fn note_changed(&mut self, block: BlockId) {
        if !self.changed_blocks.contains(&block) {
            self.changed_blocks.push(block);
        }
    }

    /// Folds a later patch into this one.
    pub fn absorb(&mut self, later: Patch) {
        for block in later.changed_blocks {
            self.note_changed(block);
        }
        self.recognized += later.recognized;
        self.demoted += later.demoted;
        self.merged += later.merged;
        self.placeholders_added += later.placeholders_added;
        self.placeholders_removed += later.placeholders_removed;
        self.placeholders_resolved += later.placeholders_resolved;
        self.selection = later.selection;
        self.version = later.version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absorb_accumulates_counts_and_keeps_latest_selection() {
        let block = BlockId::new();
        let mut first = Patch {
            recognized: 1,
            version: 1,
            ..Patch::default()
        };
        first.note_changed(block);
        let mut second = Patch {
            demoted: 3,
            merged: 2,
            version: 2,
            ..Patch::default()
        };
        second.note_changed(block);

        first.absorb(second);

        assert_eq!(first.changed_blocks, vec![block]);
        assert_eq!((first.recognized, first.demoted, first.merged), (1, 3, 2));
        assert_eq!(first.version, 2);
        assert!(!first.is_noop());
        assert!(Patch::default().is_noop());
    }
}

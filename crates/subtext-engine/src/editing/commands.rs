use super::selection::{Point, Selection};
use crate::models::{BlockId, NodeKey};

/// Edits the host applies to a [`Document`](super::document::Document).
///
/// Offsets are in characters. Every command reports the nodes and blocks it
/// touched so the engine can settle them; `Select` reports the blocks the
/// previous selection was in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: Point, text: String },
    /// Deletes between two points of the same block, in either order.
    DeleteRange { from: Point, to: Point },
    /// Replaces the whole text of one node.
    ReplaceText { node: NodeKey, text: String },
    /// Ends the block at `at` and moves the rest into a new block after it.
    SplitBlock { at: Point },
    /// A new single-node block after `after`, or first when `None`.
    InsertBlock { after: Option<BlockId>, text: String },
    RemoveBlock { block: BlockId },
    Select(Selection),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no node {0:?} in the document")]
    UnknownNode(NodeKey),
    #[error("no block {0} in the document")]
    UnknownBlock(BlockId),
    #[error("offset {offset} is outside node {node:?} of length {len}")]
    OffsetOutOfBounds {
        node: NodeKey,
        offset: usize,
        len: usize,
    },
    #[error("node {0:?} holds no editable text")]
    NotEditable(NodeKey),
    #[error("range spans more than one block")]
    CrossBlockRange,
    #[error("there is no caret to edit at")]
    NoCaret,
}

use serde::Serialize;

use super::entity::{EntityKind, Format, Role};
use crate::parsing::span::char_len;

/// Identity of an inline node inside a host tree.
///
/// Keys are allocated monotonically by the host and never reused, so a node
/// that is demoted and recreated always comes back under a fresh key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey(pub u64);

/// Display content held by a reference placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlaceholderContent {
    Ready(String),
    /// The resolver has not answered yet.
    Pending,
    /// The lookup failed; rendered as a sentinel.
    Unavailable,
}

/// A child of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InlineNode {
    /// Untyped text; the only variant pattern matchers run over.
    PlainText { content: String, format: Format },
    /// Recognized payload of an entity.
    EntityContent {
        kind: EntityKind,
        content: String,
        format: Format,
    },
    /// A delimiter belonging to a triplet group.
    EntityPunctuation {
        kind: EntityKind,
        role: Role,
        text: String,
        format: Format,
    },
    /// Block-trailing stand-in for a cross-reference found earlier in the block.
    ReferencePlaceholder {
        target_id: String,
        content: PlaceholderContent,
    },
}

impl InlineNode {
    pub fn plain(content: impl Into<String>) -> Self {
        InlineNode::PlainText {
            content: content.into(),
            format: Format::PLAIN,
        }
    }

    pub fn placeholder(target_id: impl Into<String>, content: PlaceholderContent) -> Self {
        InlineNode::ReferencePlaceholder {
            target_id: target_id.into(),
            content,
        }
    }

    /// Literal text of the node. Placeholders carry none.
    pub fn text(&self) -> &str {
        match self {
            InlineNode::PlainText { content, .. } | InlineNode::EntityContent { content, .. } => {
                content
            }
            InlineNode::EntityPunctuation { text, .. } => text,
            InlineNode::ReferencePlaceholder { .. } => "",
        }
    }

    pub(crate) fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            InlineNode::PlainText { content, .. } | InlineNode::EntityContent { content, .. } => {
                Some(content)
            }
            InlineNode::EntityPunctuation { text, .. } => Some(text),
            InlineNode::ReferencePlaceholder { .. } => None,
        }
    }

    /// Length of the literal text in characters.
    pub fn char_len(&self) -> usize {
        char_len(self.text())
    }

    pub fn format(&self) -> Format {
        match self {
            InlineNode::PlainText { format, .. }
            | InlineNode::EntityContent { format, .. }
            | InlineNode::EntityPunctuation { format, .. } => *format,
            InlineNode::ReferencePlaceholder { .. } => Format::PLAIN,
        }
    }

    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            InlineNode::EntityContent { kind, .. } | InlineNode::EntityPunctuation { kind, .. } => {
                Some(*kind)
            }
            _ => None,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, InlineNode::PlainText { .. })
    }

    /// True for content and punctuation nodes.
    pub fn is_entity(&self) -> bool {
        self.entity_kind().is_some()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, InlineNode::ReferencePlaceholder { .. })
    }

    /// Same variant and attributes, different text. Placeholders are returned unchanged.
    pub fn with_text(&self, text: String) -> InlineNode {
        match self {
            InlineNode::PlainText { format, .. } => InlineNode::PlainText {
                content: text,
                format: *format,
            },
            InlineNode::EntityContent { kind, format, .. } => InlineNode::EntityContent {
                kind: *kind,
                content: text,
                format: *format,
            },
            InlineNode::EntityPunctuation {
                kind, role, format, ..
            } => InlineNode::EntityPunctuation {
                kind: *kind,
                role: *role,
                text,
                format: *format,
            },
            InlineNode::ReferencePlaceholder { .. } => self.clone(),
        }
    }

    /// The plain-text node this node demotes to, if it is typed.
    pub fn demoted(&self) -> Option<InlineNode> {
        if !self.is_entity() {
            return None;
        }
        Some(InlineNode::PlainText {
            content: self.text().to_string(),
            format: self.format(),
        })
    }
}

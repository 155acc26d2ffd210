//! Stable text rendering of the tree, for snapshot tests and the CLI.
//!
//! One line per node:
//!
//! ```text
//! text "Visit "
//! wikilink:open "[["
//! wikilink "Ben Follington"
//! wikilink:close "]]"
//! ref "my-favorite-beach" ready "Sand and sea."
//! ```
//!
//! Blocks are separated by a `--` line.

pub mod invariants;

use crate::editing::host::TreeHost;
use crate::models::{BlockId, Format, InlineNode, PlaceholderContent, Role};

pub fn render_node(node: &InlineNode) -> String {
    match node {
        InlineNode::PlainText { content, format } => {
            let mut line = format!("text {content:?}");
            if !format.is_plain() {
                line.push_str(&format!(" [{}]", format_flags(*format)));
            }
            line
        }
        InlineNode::EntityContent { kind, content, .. } => format!("{kind} {content:?}"),
        InlineNode::EntityPunctuation { kind, role, text, .. } => {
            let side = match role {
                Role::Opening => "open",
                Role::Closing => "close",
            };
            format!("{kind}:{side} {text:?}")
        }
        InlineNode::ReferencePlaceholder { target_id, content } => match content {
            PlaceholderContent::Ready(text) => format!("ref {target_id:?} ready {text:?}"),
            PlaceholderContent::Pending => format!("ref {target_id:?} pending"),
            PlaceholderContent::Unavailable => format!("ref {target_id:?} unavailable"),
        },
    }
}

fn format_flags(format: Format) -> String {
    [
        (Format::BOLD, "bold"),
        (Format::ITALIC, "italic"),
        (Format::UNDERLINE, "underline"),
        (Format::STRIKETHROUGH, "strikethrough"),
    ]
    .into_iter()
    .filter(|(flag, _)| format.contains(*flag))
    .map(|(_, name)| name)
    .collect::<Vec<_>>()
    .join(" ")
}

pub fn render_block(host: &impl TreeHost, block: BlockId) -> String {
    host.children(block)
        .into_iter()
        .filter_map(|key| host.node(key))
        .map(render_node)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_document(host: &impl TreeHost) -> String {
    host.blocks()
        .into_iter()
        .map(|block| render_block(host, block))
        .collect::<Vec<_>>()
        .join("\n--\n")
}

//! Reverse direction: typed nodes whose structural contract broke are
//! demoted back to plain text.

use std::collections::BTreeSet;

use super::pass::{PassContext, match_context};
use crate::editing::host::TreeHost;
use crate::models::{EntityKind, InlineNode, NodeKey, Role};
use crate::parsing::{GrammarSet, GroupShape};

/// Checks every touched typed node and demotes the invalid ones together
/// with the rest of their group. Returns how many nodes were demoted.
pub(crate) fn run(host: &mut impl TreeHost, grammars: &GrammarSet, ctx: &mut PassContext) -> usize {
    let mut doomed = BTreeSet::new();
    for key in ctx.take_touched() {
        let is_entity = host.node(key).is_some_and(InlineNode::is_entity);
        if is_entity && !doomed.contains(&key) && !is_valid(host, grammars, key) {
            doomed.extend(participants(host, grammars, key));
        }
    }
    doomed
        .into_iter()
        .filter(|key| demote(host, ctx, *key))
        .count()
}

/// Whether a typed node still honors its grammar and group.
pub fn is_valid(host: &impl TreeHost, grammars: &GrammarSet, key: NodeKey) -> bool {
    match host.node(key) {
        Some(InlineNode::EntityContent { kind, content, .. }) => match grammars.shape_of(*kind) {
            Some(GroupShape::Triplet) => triplet_is_intact(host, grammars, key),
            Some(GroupShape::Single) => {
                grammars.matches_whole(*kind, content, &match_context(host, key, false))
            }
            None => false,
        },
        Some(InlineNode::EntityPunctuation { kind, role, .. }) => {
            partner(host, key, *kind, *role).is_some_and(|content| triplet_is_intact(host, grammars, content))
        }
        _ => true,
    }
}

/// A triplet content node framed by its own punctuation, where the three
/// texts together are still one match of the grammar.
fn triplet_is_intact(host: &impl TreeHost, grammars: &GrammarSet, content: NodeKey) -> bool {
    let Some(InlineNode::EntityContent { kind, content: text, .. }) = host.node(content) else {
        return false;
    };
    let Some(grammar) = grammars.triplet(*kind) else {
        return false;
    };
    let Some(delimiters) = grammar.delimiters() else {
        return false;
    };
    let (Some(open), Some(close)) = (host.previous_sibling(content), host.next_sibling(content)) else {
        return false;
    };
    punctuation_is(host, open, *kind, Role::Opening, &delimiters.open)
        && punctuation_is(host, close, *kind, Role::Closing, &delimiters.close)
        && grammar.matches_whole(
            &format!("{}{text}{}", delimiters.open, delimiters.close),
            &match_context(host, open, false),
        )
}

fn punctuation_is(host: &impl TreeHost, key: NodeKey, kind: EntityKind, role: Role, text: &str) -> bool {
    matches!(
        host.node(key),
        Some(InlineNode::EntityPunctuation { kind: k, role: r, text: t, .. })
            if *k == kind && *r == role && t == text
    )
}

fn is_punctuation(host: &impl TreeHost, key: NodeKey, kind: EntityKind, role: Role) -> bool {
    matches!(
        host.node(key),
        Some(InlineNode::EntityPunctuation { kind: k, role: r, .. }) if *k == kind && *r == role
    )
}

/// The content node a punctuation node belongs to, if it sits on the right side.
fn partner(host: &impl TreeHost, key: NodeKey, kind: EntityKind, role: Role) -> Option<NodeKey> {
    let candidate = match role {
        Role::Opening => host.next_sibling(key)?,
        Role::Closing => host.previous_sibling(key)?,
    };
    match host.node(candidate) {
        Some(InlineNode::EntityContent { kind: k, .. }) if *k == kind => Some(candidate),
        _ => None,
    }
}

/// Every typed node that falls with `key`.
fn participants(host: &impl TreeHost, grammars: &GrammarSet, key: NodeKey) -> Vec<NodeKey> {
    match host.node(key) {
        Some(InlineNode::EntityContent { kind, .. })
            if grammars.shape_of(*kind) != Some(GroupShape::Single) =>
        {
            let mut group = vec![key];
            group.extend(
                host.previous_sibling(key)
                    .filter(|k| is_punctuation(host, *k, *kind, Role::Opening)),
            );
            group.extend(
                host.next_sibling(key)
                    .filter(|k| is_punctuation(host, *k, *kind, Role::Closing)),
            );
            group
        }
        Some(InlineNode::EntityPunctuation { kind, role, .. }) => {
            let mut group = vec![key];
            if let Some(content) = partner(host, key, *kind, *role) {
                group.extend(participants(host, grammars, content));
            }
            group
        }
        _ => vec![key],
    }
}

/// Replaces a typed node with plain text in place. Plain nodes and
/// placeholders are left alone.
fn demote(host: &mut impl TreeHost, ctx: &mut PassContext, key: NodeKey) -> bool {
    let Some(node) = host.node(key) else {
        return false;
    };
    let Some(plain) = node.demoted() else {
        return false;
    };
    log::debug!("demoting {key:?} {:?}", node.text());
    let block = host.block_of(key);
    let Some(new_key) = host.replace(key, vec![plain]).first().copied() else {
        return false;
    };
    ctx.move_points(key, new_key, 0);
    ctx.inherit(key, new_key);
    ctx.queue(new_key);
    ctx.touch(host, new_key);
    if let Some(block) = block {
        ctx.changed(block);
    }
    ctx.patch.demoted += 1;
    true
}

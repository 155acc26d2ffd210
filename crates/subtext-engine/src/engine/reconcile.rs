//! Keeps each block's trailing placeholders in step with the references
//! found earlier in the block.

use std::collections::VecDeque;

use super::pass::PassContext;
use crate::editing::host::TreeHost;
use crate::models::{BlockId, EntityKind, InlineNode, NodeKey, PlaceholderContent};
use crate::references::{ReferenceResolver, Resolution};

/// The target id of a reference: link text starting with a sigil, sigil stripped.
pub fn reference_target<'a>(node: &'a InlineNode, sigils: &[char]) -> Option<&'a str> {
    match node {
        InlineNode::EntityContent {
            kind: EntityKind::Link,
            content,
            ..
        } => {
            let sigil = content.chars().next().filter(|c| sigils.contains(c))?;
            let target = &content[sigil.len_utf8()..];
            (!target.is_empty()).then_some(target)
        }
        _ => None,
    }
}

/// Target ids of the block's references, in order.
pub fn references(host: &impl TreeHost, block: BlockId, sigils: &[char]) -> Vec<String> {
    host.children(block)
        .into_iter()
        .filter_map(|key| host.node(key))
        .filter_map(|node| reference_target(node, sigils))
        .map(str::to_string)
        .collect()
}

/// The trailing run of placeholders with their target ids.
pub fn trailing_placeholders(host: &impl TreeHost, block: BlockId) -> Vec<(NodeKey, String)> {
    let mut run: Vec<(NodeKey, String)> = host
        .children(block)
        .into_iter()
        .rev()
        .map_while(|key| match host.node(key) {
            Some(InlineNode::ReferencePlaceholder { target_id, .. }) => Some((key, target_id.clone())),
            _ => None,
        })
        .collect();
    run.reverse();
    run
}

/// Brings the block's placeholders in line with its references.
///
/// Placeholders that still match keep their node and content; stale ones are
/// removed and missing ones created and resolved. Nothing happens when the
/// two lists already agree.
pub(crate) fn run(
    host: &mut impl TreeHost,
    resolver: &impl ReferenceResolver,
    sigils: &[char],
    ctx: &mut PassContext,
    block: BlockId,
) {
    let wanted = references(host, block, sigils);
    let existing = trailing_placeholders(host, block);
    if wanted.len() == existing.len() && wanted.iter().zip(&existing).all(|(w, (_, id))| *w == *id) {
        return;
    }

    let children = host.children(block);
    let mut cursor = (children.len() - existing.len())
        .checked_sub(1)
        .map(|last_text| children[last_text]);

    let mut pool: VecDeque<(NodeKey, String)> = existing.into();
    for target in &wanted {
        if let Some(position) = pool.iter().position(|(_, id)| id == target) {
            for (stale, _) in pool.drain(..position) {
                remove(host, ctx, block, stale);
            }
            cursor = pool.pop_front().map(|(key, _)| key);
            continue;
        }
        let Some(anchor) = cursor else {
            log::warn!("block {block} has references but no node to hang placeholders on");
            return;
        };
        let content: PlaceholderContent = resolver.resolve(target).into();
        log::debug!("placeholder for {target:?}: {content:?}");
        cursor = host.insert_after(anchor, InlineNode::placeholder(target.clone(), content));
        ctx.patch.placeholders_added += 1;
        ctx.changed(block);
    }
    for (stale, _) in pool {
        remove(host, ctx, block, stale);
    }
}

fn remove(host: &mut impl TreeHost, ctx: &mut PassContext, block: BlockId, key: NodeKey) {
    log::debug!("removing placeholder {key:?}");
    ctx.forget(key);
    host.remove(key);
    ctx.patch.placeholders_removed += 1;
    ctx.changed(block);
}

/// Re-asks the resolver for pending placeholders of `block`, optionally only
/// those pointing at `target`. Returns how many received content.
pub(crate) fn resolve_pending(
    host: &mut impl TreeHost,
    resolver: &impl ReferenceResolver,
    block: BlockId,
    target: Option<&str>,
) -> usize {
    let mut resolved = 0;
    for (key, target_id) in trailing_placeholders(host, block) {
        if target.is_some_and(|t| t != target_id) {
            continue;
        }
        let Some(InlineNode::ReferencePlaceholder { content, .. }) = host.node_mut(key) else {
            continue;
        };
        if *content != PlaceholderContent::Pending {
            continue;
        }
        let resolution = resolver.resolve(&target_id);
        if resolution != Resolution::Pending {
            *content = resolution.into();
            resolved += 1;
        }
    }
    resolved
}

//! Forward direction: plain text in, typed nodes out.

use super::pass::{PassContext, match_context};
use super::splitter::split;
use crate::editing::host::TreeHost;
use crate::editing::selection::Point;
use crate::models::NodeKey;
use crate::parsing::span::{char_len, slice_chars};
use crate::parsing::{GrammarSet, GroupShape};

/// Drains the worklist, recognizing entities until no queued node matches.
///
/// Residual pieces go back on the worklist, so several entities typed in
/// one edit are all recognized in the same pass.
pub(crate) fn run(host: &mut impl TreeHost, grammars: &GrammarSet, ctx: &mut PassContext) {
    while let Some(key) = ctx.next() {
        recognize(host, grammars, ctx, key);
    }
}

fn recognize(host: &mut impl TreeHost, grammars: &GrammarSet, ctx: &mut PassContext, key: NodeKey) {
    let Some(node) = host.node(key) else {
        return;
    };
    if !node.is_plain() || node.text().is_empty() {
        return;
    }
    let text = node.text().to_string();
    let format = node.format();

    // Nodes the host edited may not re-split a same-kind entity right before them.
    let context = match_context(host, key, ctx.is_edited(key));
    let Some(found) = grammars.first_match(&text, &context) else {
        return;
    };
    let grammar = found.grammar;
    let matched = slice_chars(&text, found.span.start, found.span.end);
    let Some(group) = grammar.build_group(matched, format) else {
        log::warn!("{} grammar {:?} matched {matched:?} without its delimiters", grammar.kind(), grammar.name());
        return;
    };
    let Some(pieces) = split(host, ctx, key, found.span) else {
        return;
    };

    let (content_index, open_len, close_len) = match (grammar.shape(), grammar.delimiters()) {
        (GroupShape::Triplet, Some(delimiters)) => {
            (1, char_len(&delimiters.open), char_len(&delimiters.close))
        }
        _ => (0, 0, 0),
    };
    let matched_len = found.span.len();
    let keys = host.replace(pieces.matched, group);
    let Some(content) = keys.get(content_index).copied() else {
        return;
    };
    let content_len = host.node(content).map_or(0, |n| n.char_len());
    let closing = keys.get(content_index + 1).copied();
    ctx.relocate(|p| match closing {
        _ if p.node != pieces.matched => p,
        // The end of a triplet is after its closing delimiter, so typing there
        // breaks the group instead of growing its content.
        Some(closing) if p.offset >= matched_len => Point::new(closing, close_len),
        _ => Point::new(content, p.offset.saturating_sub(open_len).min(content_len)),
    });

    log::debug!("recognized {} {matched:?}", grammar.kind());
    ctx.patch.recognized += 1;
    if let Some(block) = host.block_of(content) {
        ctx.changed(block);
    }
    for new_key in &keys {
        ctx.touch(host, *new_key);
    }
    for residual in [pieces.before, pieces.after].into_iter().flatten() {
        ctx.queue(residual);
    }
}

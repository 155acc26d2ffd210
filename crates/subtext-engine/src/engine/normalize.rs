//! Keeps the text layer tidy between transform rounds: no stray
//! placeholders, no two adjacent plain nodes of the same format, no empty
//! plain nodes unless the caret is in one or the block would be left empty.

use super::pass::PassContext;
use crate::editing::host::TreeHost;
use crate::models::{BlockId, InlineNode};

pub(crate) fn run(host: &mut impl TreeHost, ctx: &mut PassContext) {
    for block in ctx.blocks() {
        drop_stray_placeholders(host, ctx, block);
        merge_plain_runs(host, ctx, block);
        drop_empty_plain(host, ctx, block);
    }
}

/// Placeholders may only form the trailing run of a block.
fn drop_stray_placeholders(host: &mut impl TreeHost, ctx: &mut PassContext, block: BlockId) {
    let children = host.children(block);
    let Some(last_text) = children
        .iter()
        .rposition(|k| host.node(*k).is_some_and(|n| !n.is_placeholder()))
    else {
        return;
    };
    for key in &children[..last_text] {
        if host.node(*key).is_some_and(InlineNode::is_placeholder) {
            ctx.forget(*key);
            host.remove(*key);
            ctx.patch.placeholders_removed += 1;
            ctx.changed(block);
        }
    }
}

fn merge_plain_runs(host: &mut impl TreeHost, ctx: &mut PassContext, block: BlockId) {
    let mut children = host.children(block);
    let mut i = 0;
    while i + 1 < children.len() {
        let (left, right) = (children[i], children[i + 1]);
        let left_len = match (host.node(left), host.node(right)) {
            (Some(a), Some(b)) if a.is_plain() && b.is_plain() && a.format() == b.format() => a.char_len(),
            _ => {
                i += 1;
                continue;
            }
        };
        let Some(removed) = host.remove(right) else {
            i += 1;
            continue;
        };
        if let Some(content) = host.node_mut(left).and_then(InlineNode::text_mut) {
            content.push_str(removed.text());
        }
        children.remove(i + 1);

        ctx.move_points(right, left, left_len);
        ctx.inherit(right, left);
        ctx.queue(left);
        ctx.touch(host, left);
        ctx.changed(block);
        ctx.patch.merged += 1;
    }
}

fn drop_empty_plain(host: &mut impl TreeHost, ctx: &mut PassContext, block: BlockId) {
    let children = host.children(block);
    // An empty line keeps one node to put the caret in later.
    if children.len() < 2 {
        return;
    }
    for key in children {
        let empty = host.node(key).is_some_and(|n| n.is_plain() && n.text().is_empty());
        if empty && !ctx.holds_selection(key) {
            ctx.touch_around(host, key);
            host.remove(key);
            ctx.changed(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;
    use crate::editing::selection::{Point, Selection};
    use crate::models::{EntityKind, Format, NodeKey, PlaceholderContent};
    use crate::snapshot::render_block;
    use pretty_assertions::assert_eq;

    fn normalize(doc: &mut Document, selection: Option<Selection>) -> PassContext {
        let mut ctx = PassContext::new(selection);
        ctx.touch_block(doc.blocks()[0]);
        run(doc, &mut ctx);
        ctx
    }

    fn child(doc: &Document, index: usize) -> NodeKey {
        doc.children(doc.blocks()[0])[index]
    }

    #[test]
    fn merges_runs_into_the_leftmost_node() {
        let mut doc = Document::from_blocks(vec![vec![
            InlineNode::plain("Visit "),
            InlineNode::plain("[["),
            InlineNode::plain("Ben"),
            InlineNode::plain(" today"),
        ]]);
        let first = child(&doc, 0);
        let third = child(&doc, 2);

        let ctx = normalize(&mut doc, Some(Selection::caret(Point::new(third, 1))));

        assert_eq!(doc.children(doc.blocks()[0]), vec![first]);
        assert_eq!(doc.block_text(doc.blocks()[0]), "Visit [[Ben today");
        assert_eq!(ctx.selection, Some(Selection::caret(Point::new(first, 9))));
        assert_eq!(ctx.patch.merged, 3);
    }

    #[test]
    fn different_formats_stay_apart() {
        let mut doc = Document::from_blocks(vec![vec![
            InlineNode::plain("a"),
            InlineNode::PlainText {
                content: "b".into(),
                format: Format::ITALIC,
            },
        ]]);
        let ctx = normalize(&mut doc, None);
        assert_eq!(ctx.patch.merged, 0);
        assert_eq!(doc.children(doc.blocks()[0]).len(), 2);
    }

    #[test]
    fn empty_plain_nodes_go_unless_they_hold_the_caret() {
        let mut doc = Document::from_blocks(vec![vec![
            InlineNode::plain(""),
            InlineNode::EntityContent {
                kind: EntityKind::Hashtag,
                content: "#a".into(),
                format: Format::PLAIN,
            },
            InlineNode::plain(""),
        ]]);
        let caret = child(&doc, 2);

        normalize(&mut doc, Some(Selection::caret(Point::new(caret, 0))));

        insta::assert_snapshot!(render_block(&doc, doc.blocks()[0]), @r##"
        hashtag "#a"
        text ""
        "##);
    }

    #[test]
    fn an_empty_line_keeps_its_node() {
        let mut doc = Document::from_text("a\n\nb");
        let empty_line = doc.blocks()[1];
        let mut ctx = PassContext::new(None);
        ctx.touch_block(empty_line);

        run(&mut doc, &mut ctx);

        assert_eq!(doc.children(empty_line).len(), 1);
        assert!(ctx.patch.changed_blocks.is_empty());
    }

    #[test]
    fn placeholders_before_text_are_removed() {
        let mut doc = Document::from_blocks(vec![vec![
            InlineNode::placeholder("a", PlaceholderContent::Pending),
            InlineNode::plain("x"),
            InlineNode::placeholder("b", PlaceholderContent::Pending),
        ]]);
        let ctx = normalize(&mut doc, None);
        assert_eq!(ctx.patch.placeholders_removed, 1);
        insta::assert_snapshot!(render_block(&doc, doc.blocks()[0]), @r#"
        text "x"
        ref "b" pending
        "#);
    }
}

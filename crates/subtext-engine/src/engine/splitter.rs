use super::pass::PassContext;
use crate::editing::host::TreeHost;
use crate::editing::selection::relocate_into_pieces;
use crate::models::NodeKey;
use crate::parsing::Span;

/// The pieces a plain node was cut into around a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SplitPieces {
    pub before: Option<NodeKey>,
    pub matched: NodeKey,
    pub after: Option<NodeKey>,
}

/// Cuts the plain node `key` into before/matched/after around `span`.
///
/// Empty residuals are not created. Every piece keeps the node's format, and
/// a selection inside the node follows its offset into the piece that now
/// holds it. Returns `None` if the node is not plain text or the span does
/// not fit it.
pub(crate) fn split(
    host: &mut impl TreeHost,
    ctx: &mut PassContext,
    key: NodeKey,
    span: Span,
) -> Option<SplitPieces> {
    let node = host.node(key)?;
    let len = node.char_len();
    if !node.is_plain() || span.is_empty() || span.end > len {
        return None;
    }

    let mut offsets = Vec::with_capacity(2);
    if span.start > 0 {
        offsets.push(span.start);
    }
    if span.end < len {
        offsets.push(span.end);
    }

    let keys = host.split_at(key, &offsets);
    if keys.len() != offsets.len() + 1 {
        log::warn!("host split {key:?} into {} pieces, expected {}", keys.len(), offsets.len() + 1);
        return None;
    }
    let pieces: Vec<(NodeKey, usize)> = keys
        .iter()
        .map(|k| (*k, host.node(*k).map_or(0, |n| n.char_len())))
        .collect();
    ctx.relocate(|p| relocate_into_pieces(p, key, &pieces));

    let mut keys = keys.into_iter();
    let before = if span.start > 0 { keys.next() } else { None };
    let matched = keys.next()?;
    Some(SplitPieces {
        before,
        matched,
        after: keys.next(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::selection::{Point, Selection};
    use crate::editing::Document;
    use crate::models::{Format, InlineNode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn texts(doc: &Document) -> Vec<String> {
        doc.children(doc.blocks()[0])
            .into_iter()
            .map(|k| doc.node(k).unwrap().text().to_string())
            .collect()
    }

    #[rstest]
    #[case("Visit [[Ben]] today", Span::new(6, 13), vec!["Visit ", "[[Ben]]", " today"])]
    #[case("[[Ben]] today", Span::new(0, 7), vec!["[[Ben]]", " today"])]
    #[case("Visit [[Ben]]", Span::new(6, 13), vec!["Visit ", "[[Ben]]"])]
    #[case("[[Ben]]", Span::new(0, 7), vec!["[[Ben]]"])]
    fn residuals_are_only_created_when_non_empty(
        #[case] text: &str,
        #[case] span: Span,
        #[case] expected: Vec<&str>,
    ) {
        let mut doc = Document::from_text(text);
        let key = doc.children(doc.blocks()[0])[0];
        let mut ctx = PassContext::new(None);

        let pieces = split(&mut doc, &mut ctx, key, span).unwrap();

        assert_eq!(texts(&doc), expected);
        assert_eq!(pieces.before.is_some(), span.start > 0);
    }

    #[test]
    fn selection_follows_its_offset() {
        let mut doc = Document::from_text("Visit [[Ben]] today");
        let key = doc.children(doc.blocks()[0])[0];
        let mut ctx = PassContext::new(Some(Selection {
            anchor: Point::new(key, 2),
            focus: Point::new(key, 15),
        }));

        let pieces = split(&mut doc, &mut ctx, key, Span::new(6, 13)).unwrap();

        let after = pieces.after.unwrap();
        let selection = ctx.selection.unwrap();
        assert_eq!(selection.anchor, Point::new(key, 2));
        assert_eq!(selection.focus, Point::new(after, 2));
    }

    #[test]
    fn format_is_kept_on_every_piece() {
        let mut doc = Document::from_blocks(vec![vec![InlineNode::PlainText {
            content: "a #tag b".into(),
            format: Format::BOLD,
        }]]);
        let key = doc.children(doc.blocks()[0])[0];
        let mut ctx = PassContext::new(None);

        let pieces = split(&mut doc, &mut ctx, key, Span::new(2, 6)).unwrap();

        for piece in [pieces.before.unwrap(), pieces.matched, pieces.after.unwrap()] {
            assert_eq!(doc.node(piece).unwrap().format(), Format::BOLD);
        }
    }

    #[test]
    fn refuses_spans_past_the_end() {
        let mut doc = Document::from_text("abc");
        let key = doc.children(doc.blocks()[0])[0];
        let mut ctx = PassContext::new(None);
        assert_eq!(split(&mut doc, &mut ctx, key, Span::new(1, 9)), None);
        assert_eq!(texts(&doc), vec!["abc"]);
    }
}

//! # Pattern Matcher
//!
//! Finds the left-most match of the registered grammars in a piece of text.
//! Grammars are tried in registration order and each accepted match claims
//! its span: a later grammar's match that overlaps a claimed span is skipped
//! in favor of its next candidate.

use std::ops::Range;

use super::grammar::{Anchor, Grammar, GrammarSet};
use super::span::{Span, char_len, char_span};
use crate::models::EntityKind;

/// What the matcher needs to know about the node's surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchContext {
    /// The text begins at the start of its line (no preceding sibling).
    pub at_line_start: bool,
    /// The last character of the preceding sibling's text.
    pub preceding: Option<char>,
    /// The preceding sibling is an entity of this kind; its grammar may not
    /// match at offset 0.
    pub suppressed_at_start: Option<EntityKind>,
}

impl MatchContext {
    /// Context of a text with nothing before it.
    pub fn line_start() -> Self {
        Self {
            at_line_start: true,
            ..Self::default()
        }
    }
}

/// A match of one grammar, in character offsets.
#[derive(Debug, Clone, Copy)]
pub struct EntityMatch<'g> {
    pub grammar: &'g Grammar,
    pub span: Span,
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Anchor {
    fn admits(self, text: &str, byte_start: usize, ctx: &MatchContext) -> bool {
        let before = if byte_start == 0 {
            None
        } else {
            text[..byte_start].chars().next_back()
        };
        match self {
            Anchor::Anywhere => true,
            Anchor::LineStart => match before {
                None => ctx.at_line_start,
                Some(c) => c == '\n',
            },
            Anchor::WordBoundary => {
                let preceding = if byte_start == 0 { ctx.preceding } else { before };
                !preceding.is_some_and(is_word_char)
            }
        }
    }
}

fn next_boundary(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

impl Grammar {
    /// Left-most admissible match at or after byte offset `from`.
    fn find_from(&self, text: &str, mut from: usize, ctx: &MatchContext) -> Option<Range<usize>> {
        while from <= text.len() {
            let found = self.pattern.find_at(text, from)?;
            let suppressed = found.start() == 0 && ctx.suppressed_at_start == Some(self.kind);
            if !found.is_empty() && !suppressed && self.anchor.admits(text, found.start(), ctx) {
                return Some(found.range());
            }
            from = next_boundary(text, found.start());
        }
        None
    }

    /// Left-most match of this grammar alone.
    pub fn find(&self, text: &str, ctx: &MatchContext) -> Option<Span> {
        self.find_from(text, 0, ctx)
            .map(|bytes| char_span(text, bytes))
    }

    /// True if the whole of `text` is one match of this grammar.
    pub fn matches_whole(&self, text: &str, ctx: &MatchContext) -> bool {
        !text.is_empty() && self.whole.is_match(text) && self.anchor.admits(text, 0, ctx)
    }
}

impl GrammarSet {
    /// The left-most match across all grammars, honoring registration-order claims.
    pub fn first_match(&self, text: &str, ctx: &MatchContext) -> Option<EntityMatch<'_>> {
        let mut accepted: Vec<(Range<usize>, &Grammar)> = Vec::new();
        for grammar in self.grammars() {
            let mut from = 0;
            while let Some(found) = grammar.find_from(text, from, ctx) {
                let claimed = accepted
                    .iter()
                    .any(|(span, _)| span.start < found.end && found.start < span.end);
                if !claimed {
                    log::trace!("{} matched {:?}", grammar.name(), &text[found.clone()]);
                    accepted.push((found, grammar));
                    break;
                }
                from = next_boundary(text, found.start);
            }
        }
        accepted
            .into_iter()
            .min_by_key(|(span, _)| span.start)
            .map(|(bytes, grammar)| EntityMatch {
                grammar,
                span: char_span(text, bytes),
            })
    }

    /// True if `text` is exactly one match of a grammar registered for `kind`.
    pub fn matches_whole(&self, kind: EntityKind, text: &str, ctx: &MatchContext) -> bool {
        self.for_kind(kind).any(|g| g.matches_whole(text, ctx))
    }

    /// True if no grammar finds anything in `text`.
    pub fn is_inert(&self, text: &str, ctx: &MatchContext) -> bool {
        char_len(text) == 0 || self.first_match(text, ctx).is_none()
    }
}

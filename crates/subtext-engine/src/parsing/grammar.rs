//! Grammar registration.
//!
//! A [`Grammar`] describes how one entity kind is recognized (a regular
//! pattern plus anchoring) and how a match is represented in the tree (its
//! [`GroupShape`]). A [`GrammarSet`] holds grammars in registration order;
//! earlier grammars claim their spans first.

use regex::Regex;

use super::kinds::{Bold, CodeSpan, Hashtag, Heading, Link, WikiLink};
use crate::models::{EntityKind, Format, InlineNode, Role};

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("invalid pattern for {kind} grammar {name:?}: {source}")]
    Pattern {
        kind: EntityKind,
        name: &'static str,
        source: regex::Error,
    },
    #[error("{first} and {second} both claim the delimiter {delimiter:?}")]
    DelimiterConflict {
        first: EntityKind,
        second: EntityKind,
        delimiter: String,
    },
    #[error("{kind} is registered with more than one group shape")]
    ShapeConflict { kind: EntityKind },
    #[error("triplet grammar for {kind} needs non-empty opening and closing delimiters")]
    MissingDelimiters { kind: EntityKind },
}

/// How a match is represented once recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape {
    /// The whole match becomes one `EntityContent` node, delimiters included.
    Single,
    /// Opening punctuation, content, closing punctuation as three siblings.
    Triplet,
}

/// Where a match may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Anywhere,
    /// Only at the start of a line.
    LineStart,
    /// Only where the preceding character is not a word character.
    WordBoundary,
}

/// Literal delimiters a grammar claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) kind: EntityKind,
    pub(crate) name: &'static str,
    pub(crate) pattern: Regex,
    pub(crate) whole: Regex,
    pub(crate) shape: GroupShape,
    pub(crate) anchor: Anchor,
    pub(crate) delimiters: Option<Delimiters>,
}

impl Grammar {
    /// A grammar whose matches become a single content node.
    pub fn single(
        kind: EntityKind,
        name: &'static str,
        pattern: &str,
        anchor: Anchor,
    ) -> Result<Self, GrammarError> {
        Self::build(kind, name, pattern, GroupShape::Single, anchor, None)
    }

    /// A grammar whose matches become an opening/content/closing group.
    pub fn triplet(
        kind: EntityKind,
        name: &'static str,
        pattern: &str,
        open: &str,
        close: &str,
    ) -> Result<Self, GrammarError> {
        if open.is_empty() || close.is_empty() {
            return Err(GrammarError::MissingDelimiters { kind });
        }
        Self::build(
            kind,
            name,
            pattern,
            GroupShape::Triplet,
            Anchor::Anywhere,
            Some(Delimiters {
                open: open.to_string(),
                close: close.to_string(),
            }),
        )
    }

    /// Declares the literal delimiters a single-node grammar claims, so
    /// registration can reject ambiguous grammars.
    #[must_use]
    pub fn claiming(mut self, open: &str, close: &str) -> Self {
        self.delimiters = Some(Delimiters {
            open: open.to_string(),
            close: close.to_string(),
        });
        self
    }

    fn build(
        kind: EntityKind,
        name: &'static str,
        pattern: &str,
        shape: GroupShape,
        anchor: Anchor,
        delimiters: Option<Delimiters>,
    ) -> Result<Self, GrammarError> {
        let compile = |source: &str| {
            Regex::new(source).map_err(|source| GrammarError::Pattern { kind, name, source })
        };
        Ok(Self {
            kind,
            name,
            pattern: compile(pattern)?,
            whole: compile(&format!("^(?:{pattern})$"))?,
            shape,
            anchor,
            delimiters,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> GroupShape {
        self.shape
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn delimiters(&self) -> Option<&Delimiters> {
        self.delimiters.as_ref()
    }

    /// Builds the typed nodes replacing `matched`.
    ///
    /// Returns `None` when a triplet match does not carry the grammar's
    /// delimiters, in which case the text is left alone.
    pub fn build_group(&self, matched: &str, format: Format) -> Option<Vec<InlineNode>> {
        match self.shape {
            GroupShape::Single => Some(vec![InlineNode::EntityContent {
                kind: self.kind,
                content: matched.to_string(),
                format,
            }]),
            GroupShape::Triplet => {
                let delimiters = self.delimiters.as_ref()?;
                let content = matched
                    .strip_prefix(delimiters.open.as_str())?
                    .strip_suffix(delimiters.close.as_str())?;
                Some(vec![
                    InlineNode::EntityPunctuation {
                        kind: self.kind,
                        role: Role::Opening,
                        text: delimiters.open.clone(),
                        format,
                    },
                    InlineNode::EntityContent {
                        kind: self.kind,
                        content: content.to_string(),
                        format,
                    },
                    InlineNode::EntityPunctuation {
                        kind: self.kind,
                        role: Role::Closing,
                        text: delimiters.close.clone(),
                        format,
                    },
                ])
            }
        }
    }
}

/// Registered grammars in their fixed registration order.
#[derive(Debug, Clone, Default)]
pub struct GrammarSet {
    grammars: Vec<Grammar>,
}

impl GrammarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// All standard grammars in their default order: heading, inline code,
    /// wikilink, bold, link, hashtag.
    pub fn standard() -> Result<Self, GrammarError> {
        Self::with_kinds(&EntityKind::ALL)
    }

    /// Standard grammars for the given kinds, registered in the given order.
    pub fn with_kinds(kinds: &[EntityKind]) -> Result<Self, GrammarError> {
        let mut set = Self::new();
        for kind in kinds {
            for grammar in standard_grammars(*kind)? {
                set.register(grammar)?;
            }
        }
        Ok(set)
    }

    /// Appends a grammar, rejecting ambiguous registrations.
    pub fn register(&mut self, grammar: Grammar) -> Result<(), GrammarError> {
        for existing in &self.grammars {
            if existing.kind == grammar.kind && existing.shape != grammar.shape {
                return Err(GrammarError::ShapeConflict { kind: grammar.kind });
            }
            if existing.kind != grammar.kind
                && existing.anchor == grammar.anchor
                && let (Some(a), Some(b)) = (&existing.delimiters, &grammar.delimiters)
                && a.open == b.open
            {
                return Err(GrammarError::DelimiterConflict {
                    first: existing.kind,
                    second: grammar.kind,
                    delimiter: b.open.clone(),
                });
            }
        }
        log::debug!("registered {} grammar {:?}", grammar.kind, grammar.name);
        self.grammars.push(grammar);
        Ok(())
    }

    pub fn grammars(&self) -> &[Grammar] {
        &self.grammars
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Kinds with at least one registered grammar, in registration order.
    pub fn kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<EntityKind> = Vec::new();
        for grammar in &self.grammars {
            if !kinds.contains(&grammar.kind) {
                kinds.push(grammar.kind);
            }
        }
        kinds
    }

    pub fn for_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Grammar> {
        self.grammars.iter().filter(move |g| g.kind == kind)
    }

    /// The group shape registered for `kind`, if any.
    pub fn shape_of(&self, kind: EntityKind) -> Option<GroupShape> {
        self.for_kind(kind).next().map(|g| g.shape)
    }

    /// The triplet grammar registered for `kind`, if any.
    pub fn triplet(&self, kind: EntityKind) -> Option<&Grammar> {
        self.for_kind(kind).find(|g| g.shape == GroupShape::Triplet)
    }
}

fn standard_grammars(kind: EntityKind) -> Result<Vec<Grammar>, GrammarError> {
    Ok(match kind {
        EntityKind::Heading => vec![Heading::grammar()?],
        EntityKind::InlineCode => vec![CodeSpan::grammar()?],
        EntityKind::WikiLink => vec![WikiLink::grammar()?],
        EntityKind::Bold => vec![Bold::grammar()?],
        EntityKind::Link => Link::grammars()?,
        EntityKind::Hashtag => vec![Hashtag::grammar()?],
    })
}

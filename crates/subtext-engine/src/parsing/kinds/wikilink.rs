use crate::models::EntityKind;
use crate::parsing::grammar::{Grammar, GrammarError};

pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";
    /// No brackets inside, so nested or half-typed links never match.
    pub const PATTERN: &'static str = r"\[\[[^\[\]]+\]\]";

    pub fn grammar() -> Result<Grammar, GrammarError> {
        Grammar::triplet(
            EntityKind::WikiLink,
            "wikilink",
            Self::PATTERN,
            Self::OPEN,
            Self::CLOSE,
        )
    }
}

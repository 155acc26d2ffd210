use crate::models::EntityKind;
use crate::parsing::grammar::{Anchor, Grammar, GrammarError};

pub struct Hashtag;

impl Hashtag {
    pub const SIGIL: &'static str = "#";
    pub const PATTERN: &'static str = r"#[\p{L}\p{N}_][\p{L}\p{N}_\-]*";

    pub fn grammar() -> Result<Grammar, GrammarError> {
        Ok(Grammar::single(
            EntityKind::Hashtag,
            "hashtag",
            Self::PATTERN,
            Anchor::WordBoundary,
        )?
        .claiming(Self::SIGIL, ""))
    }
}

use crate::models::EntityKind;
use crate::parsing::grammar::{Anchor, Grammar, GrammarError};

pub struct Bold;

impl Bold {
    pub const STAR: &'static str = "*";
    /// Content may not start or end with whitespace and may not contain `*`.
    pub const PATTERN: &'static str = r"\*[^*\s](?:[^*\n]*[^*\s])?\*";

    pub fn grammar() -> Result<Grammar, GrammarError> {
        Ok(
            Grammar::single(EntityKind::Bold, "bold", Self::PATTERN, Anchor::Anywhere)?
                .claiming(Self::STAR, Self::STAR),
        )
    }
}

use crate::models::EntityKind;
use crate::parsing::grammar::{Anchor, Grammar, GrammarError};

/// Code span inline type with owned delimiter constant.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: &'static str = "`";
    pub const PATTERN: &'static str = r"`[^`\n]+`";

    pub fn grammar() -> Result<Grammar, GrammarError> {
        Ok(Grammar::single(
            EntityKind::InlineCode,
            "inline-code",
            Self::PATTERN,
            Anchor::Anywhere,
        )?
        .claiming(Self::TICK, Self::TICK))
    }
}

use crate::models::EntityKind;
use crate::parsing::grammar::{Anchor, Grammar, GrammarError};

/// A heading is a single node covering its whole line, marker included.
pub struct Heading;

impl Heading {
    pub const MARKER: &'static str = "# ";
    pub const PATTERN: &'static str = r"#[ \t][^\n]*";

    pub fn grammar() -> Result<Grammar, GrammarError> {
        Ok(
            Grammar::single(EntityKind::Heading, "heading", Self::PATTERN, Anchor::LineStart)?
                .claiming(Self::MARKER, ""),
        )
    }
}

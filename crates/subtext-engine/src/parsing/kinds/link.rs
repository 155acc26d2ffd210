use crate::models::EntityKind;
use crate::parsing::grammar::{Anchor, Grammar, GrammarError};

/// Auto-detected links. Three patterns share the `Link` kind; the slashlink
/// pattern produces the cross-references that get placeholders.
pub struct Link;

impl Link {
    pub const URL: &'static str = r"(?:https?://(?:www\.)?|www\.)[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b[-a-zA-Z0-9()@:%_+.~#?&/=]*";
    pub const EMAIL: &'static str = r#"(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*|"[^"\n]+")@(?:\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]|(?:[a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,})"#;
    /// `/note`, `/a/b`, or owner-qualified `@owner/note`.
    pub const SLASHLINK: &'static str = r"(?:@[\w\-]+)?(?:/[\w\-]+)+";

    /// Sigils that mark a recognized entity as a cross-reference.
    pub const REFERENCE_SIGILS: [char; 2] = ['/', '@'];

    pub fn grammars() -> Result<Vec<Grammar>, GrammarError> {
        Ok(vec![
            Grammar::single(EntityKind::Link, "url", Self::URL, Anchor::WordBoundary)?,
            Grammar::single(EntityKind::Link, "email", Self::EMAIL, Anchor::WordBoundary)?,
            Grammar::single(
                EntityKind::Link,
                "slashlink",
                Self::SLASHLINK,
                Anchor::WordBoundary,
            )?,
        ])
    }
}

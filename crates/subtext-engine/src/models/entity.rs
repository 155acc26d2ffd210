use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kinds of entity the engine can recognize.
///
/// Adding a kind means adding a variant here and a grammar under
/// [`crate::parsing::kinds`]; no node type hierarchy is involved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// `# Title` covering a whole line.
    Heading,
    /// `` `code` ``
    InlineCode,
    /// `[[Page]]`, represented as a punctuation/content/punctuation triplet.
    WikiLink,
    /// `*strong*`
    Bold,
    /// URLs, e-mail addresses and slashlinks (`/note`, `@owner/note`).
    Link,
    /// `#tag`
    Hashtag,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Heading,
        EntityKind::InlineCode,
        EntityKind::WikiLink,
        EntityKind::Bold,
        EntityKind::Link,
        EntityKind::Hashtag,
    ];

    /// Stable name used in configuration files and rendered snapshots.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Heading => "heading",
            EntityKind::InlineCode => "inline-code",
            EntityKind::WikiLink => "wikilink",
            EntityKind::Bold => "bold",
            EntityKind::Link => "link",
            EntityKind::Hashtag => "hashtag",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: {0:?}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

/// Which side of a triplet group a punctuation node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Opening,
    Closing,
}

/// Character formatting carried by text nodes (bit set).
///
/// Formatting is never interpreted by the engine; it is copied onto every
/// node produced from a formatted node so splits and demotions keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Format(u8);

impl Format {
    pub const PLAIN: Format = Format(0);
    pub const BOLD: Format = Format(1);
    pub const ITALIC: Format = Format(1 << 1);
    pub const UNDERLINE: Format = Format(1 << 2);
    pub const STRIKETHROUGH: Format = Format(1 << 3);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Format) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn with(self, other: Format) -> Format {
        Format(self.0 | other.0)
    }

    pub fn is_plain(self) -> bool {
        self.0 == 0
    }
}

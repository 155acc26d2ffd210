//! # Parsing
//!
//! Grammar registration and pattern matching over plain text.
//!
//! ## Modules
//!
//! - **`span`**: `Span` in character offsets plus char/byte conversions
//! - **`grammar`**: `Grammar`, `GroupShape`, `Anchor` and the ordered `GrammarSet`
//! - **`matcher`**: left-most match search with registration-order claims
//! - **`kinds`**: per-kind delimiters and patterns
//!
//! ## Claim Precedence
//!
//! Earlier grammars claim their spans: `` `[[not a link]]` `` is a code span,
//! and `# Title with #tag` is one heading.

pub mod grammar;
pub mod kinds;
pub mod matcher;
pub mod span;

pub use grammar::{Anchor, Delimiters, Grammar, GrammarError, GrammarSet, GroupShape};
pub use matcher::{EntityMatch, MatchContext};
pub use span::Span;

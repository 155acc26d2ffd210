//! # Entity Kinds
//!
//! Each kind owns its delimiter constants and pattern; the matcher and the
//! transform engine never hardcode `[[` or `` ` ``.
//!
//! - **`Heading`**: `# ` at line start, whole line, single node
//! - **`CodeSpan`**: `` `code` ``, single node, registered early so it shields its content
//! - **`WikiLink`**: `[[` content `]]`, triplet
//! - **`Bold`**: `*strong*`, single node
//! - **`Link`**: URL, e-mail and slashlink patterns plus the reference sigils
//! - **`Hashtag`**: `#tag` at a word boundary, single node

pub mod bold;
pub mod code_span;
pub mod hashtag;
pub mod heading;
pub mod link;
pub mod wikilink;

pub use bold::Bold;
pub use code_span::CodeSpan;
pub use hashtag::Hashtag;
pub use heading::Heading;
pub use link::Link;
pub use wikilink::WikiLink;

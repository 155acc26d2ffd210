//! Lookup of the content a cross-reference points at.
//!
//! The engine calls the resolver synchronously while reconciling a block.
//! A resolver backed by slow storage answers [`Resolution::Pending`] and the
//! host later calls `complete_reference` once the content has arrived.

pub mod memory;

pub use memory::InMemoryResolver;

use crate::models::PlaceholderContent;

/// Outcome of resolving one target id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Ready(String),
    /// Not known yet; ask again later.
    Pending,
    /// No such target.
    Absent,
}

impl From<Resolution> for PlaceholderContent {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Ready(content) => PlaceholderContent::Ready(content),
            Resolution::Pending => PlaceholderContent::Pending,
            Resolution::Absent => PlaceholderContent::Unavailable,
        }
    }
}

/// Maps a reference target id to display content. Must not touch the tree.
pub trait ReferenceResolver {
    fn resolve(&self, target_id: &str) -> Resolution;
}

impl<F> ReferenceResolver for F
where
    F: Fn(&str) -> Resolution,
{
    fn resolve(&self, target_id: &str) -> Resolution {
        self(target_id)
    }
}

/// A resolver that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

impl ReferenceResolver for NoReferences {
    fn resolve(&self, _target_id: &str) -> Resolution {
        Resolution::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn closures_are_resolvers() {
        let resolver = |id: &str| Resolution::Ready(id.to_uppercase());
        assert_eq!(resolver.resolve("beach"), Resolution::Ready("BEACH".into()));
    }

    #[test]
    fn absent_becomes_unavailable() {
        assert_eq!(
            PlaceholderContent::from(NoReferences.resolve("x")),
            PlaceholderContent::Unavailable
        );
    }
}

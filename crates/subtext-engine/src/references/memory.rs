use std::collections::{HashMap, HashSet};

use super::{ReferenceResolver, Resolution};

/// Resolver over a map of target id to content.
///
/// Ids marked pending answer [`Resolution::Pending`] until
/// [`insert`](InMemoryResolver::insert) supplies their content.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResolver {
    entries: HashMap<String, String>,
    pending: HashSet<String>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target_id: impl Into<String>, content: impl Into<String>) {
        let target_id = target_id.into();
        self.pending.remove(&target_id);
        self.entries.insert(target_id, content.into());
    }

    #[must_use]
    pub fn with(mut self, target_id: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(target_id, content);
        self
    }

    pub fn mark_pending(&mut self, target_id: impl Into<String>) {
        let target_id = target_id.into();
        self.entries.remove(&target_id);
        self.pending.insert(target_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceResolver for InMemoryResolver {
    fn resolve(&self, target_id: &str) -> Resolution {
        if self.pending.contains(target_id) {
            return Resolution::Pending;
        }
        match self.entries.get(target_id) {
            Some(content) => Resolution::Ready(content.clone()),
            None => Resolution::Absent,
        }
    }
}

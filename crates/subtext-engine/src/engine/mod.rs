/*!
 * # Settlement Engine
 *
 * Runs after every edit and leaves the tree settled before anything renders
 * it. One settlement pass goes through these stages:
 *
 * 1. **Normalize**: merge adjacent plain text, drop empty plain nodes and
 *    placeholders that are not trailing.
 * 2. **Transform**: run the matcher over queued plain nodes, split out each
 *    match and replace it with its typed group. Residual text is queued again.
 * 3. **Guard**: re-check every typed node touched so far and demote broken
 *    groups to plain text.
 *
 * Stages 1-3 repeat until the guard demotes nothing. Then every touched block
 * is reconciled once: its trailing reference placeholders are made to mirror
 * the references in its text.
 *
 * The pass is total. Malformed entity syntax is the normal state while
 * typing and is handled by demotion, so `settle` returns a [`Patch`] rather
 * than a `Result`. The only failures are contract violations at setup time,
 * reported by [`Engine::attach`].
 *
 * ## Module Structure
 *
 * - **`pass`**: per-pass context (worklist, selection, touched nodes)
 * - **`splitter`**: cuts a plain node around a match
 * - **`transform`**: forward recognition
 * - **`guard`**: validity checks and demotion
 * - **`normalize`**: plain-text merging and cleanup
 * - **`reconcile`**: reference placeholder mirroring
 * - **`activation`**: classification and click handling for renderers
 */

pub mod activation;
pub(crate) mod guard;
pub(crate) mod normalize;
pub(crate) mod pass;
pub mod reconcile;
pub(crate) mod splitter;
pub(crate) mod transform;

pub use activation::{Activation, Classification, activate_text, classify, page_slug};

use crate::editing::host::{DirtySet, TreeHost};
use crate::editing::patch::Patch;
use crate::models::{BlockId, EntityKind, NodeKey};
use crate::parsing::kinds::Link;
use crate::parsing::{GrammarError, GrammarSet};
use crate::references::ReferenceResolver;
use pass::PassContext;

/// Upper bound on normalize/transform/guard rounds in one pass.
pub const MAX_ROUNDS: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("the host has no node type registered for {0}")]
    UnregisteredKind(EntityKind),
    #[error("the host cannot store reference placeholders")]
    PlaceholdersUnsupported,
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Recognition and reconciliation over any [`TreeHost`].
#[derive(Debug, Clone)]
pub struct Engine<R> {
    grammars: GrammarSet,
    resolver: R,
    sigils: Vec<char>,
}

impl<R> Engine<R> {
    pub fn grammars(&self) -> &GrammarSet {
        &self.grammars
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    pub fn reference_sigils(&self) -> &[char] {
        &self.sigils
    }
}

impl<R: ReferenceResolver> Engine<R> {
    pub fn new(grammars: GrammarSet, resolver: R) -> Self {
        Self {
            grammars,
            resolver,
            sigils: Link::REFERENCE_SIGILS.to_vec(),
        }
    }

    /// The standard grammar set.
    pub fn standard(resolver: R) -> Result<Self, SetupError> {
        Ok(Self::new(GrammarSet::standard()?, resolver))
    }

    /// Characters that mark link text as a cross-reference.
    #[must_use]
    pub fn with_reference_sigils(mut self, sigils: impl IntoIterator<Item = char>) -> Self {
        self.sigils = sigils.into_iter().collect();
        self
    }

    /// Checks once that the host can hold everything the grammars produce.
    pub fn attach(&self, host: &impl TreeHost) -> Result<(), SetupError> {
        let capabilities = host.capabilities();
        for kind in self.grammars.kinds() {
            if !capabilities.entity_kinds.contains(&kind) {
                return Err(SetupError::UnregisteredKind(kind));
            }
        }
        let references = self.grammars.kinds().contains(&EntityKind::Link) && !self.sigils.is_empty();
        if references && !capabilities.placeholders {
            return Err(SetupError::PlaceholdersUnsupported);
        }
        log::debug!("attached with {} grammars", self.grammars.grammars().len());
        Ok(())
    }

    /// Settles after the host changed the text of one node.
    pub fn on_content_dirty(&self, host: &mut impl TreeHost, key: NodeKey) -> Patch {
        self.settle(host, &DirtySet::node(key))
    }

    /// Runs one settlement pass over everything `dirty` names.
    pub fn settle(&self, host: &mut impl TreeHost, dirty: &DirtySet) -> Patch {
        let mut ctx = PassContext::new(host.selection());
        for key in &dirty.nodes {
            if host.node(*key).is_some() {
                ctx.mark_edited(host, *key);
            }
        }
        for block in &dirty.blocks {
            for key in host.children(*block) {
                ctx.mark_edited(host, key);
            }
            ctx.touch_block(*block);
        }

        let mut rounds = 0;
        loop {
            rounds += 1;
            normalize::run(host, &mut ctx);
            transform::run(host, &self.grammars, &mut ctx);
            let demoted = guard::run(host, &self.grammars, &mut ctx);
            if demoted == 0 && !ctx.has_pending() {
                break;
            }
            if rounds == MAX_ROUNDS {
                log::warn!("settlement stopped after {MAX_ROUNDS} rounds");
                break;
            }
        }

        if host.capabilities().placeholders {
            for block in ctx.blocks() {
                if !host.children(block).is_empty() {
                    reconcile::run(host, &self.resolver, &self.sigils, &mut ctx, block);
                }
            }
        }

        host.set_selection(ctx.selection);
        ctx.finish()
    }

    /// Re-runs reconciliation for one block and retries its pending placeholders.
    pub fn refresh_block(&self, host: &mut impl TreeHost, block: BlockId) -> Patch {
        let mut ctx = PassContext::new(host.selection());
        if host.capabilities().placeholders && !host.children(block).is_empty() {
            reconcile::run(host, &self.resolver, &self.sigils, &mut ctx, block);
            let resolved = reconcile::resolve_pending(host, &self.resolver, block, None);
            if resolved > 0 {
                ctx.patch.placeholders_resolved += resolved;
                ctx.changed(block);
            }
        }
        host.set_selection(ctx.selection);
        ctx.finish()
    }

    /// Fills in placeholders for `target_id` that were waiting on the
    /// resolver. Blocks without such a placeholder are not touched.
    pub fn complete_reference(&self, host: &mut impl TreeHost, target_id: &str) -> Patch {
        let mut patch = Patch {
            selection: host.selection(),
            ..Patch::default()
        };
        for block in host.blocks() {
            let resolved = reconcile::resolve_pending(host, &self.resolver, block, Some(target_id));
            if resolved > 0 {
                log::debug!("resolved {resolved} placeholders for {target_id:?} in block {block}");
                patch.placeholders_resolved += resolved;
                patch.note_changed(block);
            }
        }
        patch
    }

    /// Styling query for one node.
    pub fn classify(&self, host: &impl TreeHost, key: NodeKey) -> Option<Classification> {
        host.node(key).map(classify)
    }

    /// What activating the node at `key` means.
    pub fn activate(&self, host: &impl TreeHost, key: NodeKey) -> Option<Activation> {
        activation::activate(host, key, &self.sigils)
    }
}

use super::commands::{Cmd, EditError};
use super::document::Document;
use super::host::TreeHost;
use super::patch::Patch;
use super::selection::Point;
use crate::engine::{Activation, Classification, Engine, SetupError};
use crate::models::{BlockId, NodeKey};
use crate::references::ReferenceResolver;

/// A [`Document`] with an attached [`Engine`]: every command is applied and
/// then settled before control returns.
#[derive(Debug, Clone)]
pub struct Editor<R> {
    document: Document,
    engine: Engine<R>,
}

impl<R: ReferenceResolver> Editor<R> {
    /// Attaches the engine and settles the whole document once.
    pub fn new(mut document: Document, engine: Engine<R>) -> Result<Self, SetupError> {
        engine.attach(&document)?;
        let dirty = document.all_dirty();
        engine.settle(&mut document, &dirty);
        Ok(Self { document, engine })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        self.engine.resolver_mut()
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let selecting = matches!(cmd, Cmd::Select(_));
        let dirty = self.document.apply(cmd)?;
        let mut edited_blocks: Vec<BlockId> = dirty
            .nodes
            .iter()
            .filter_map(|key| self.document.block_of(*key))
            .collect();
        if !selecting {
            edited_blocks.extend(dirty.blocks.iter().copied());
        }

        let mut patch = self.engine.settle(&mut self.document, &dirty);
        for block in edited_blocks {
            patch.note_changed(block);
        }
        patch.version = self.document.version();
        Ok(patch)
    }

    /// Types `text` at the caret one character at a time, settling after
    /// each. A newline splits the block. A non-empty selection is deleted
    /// first.
    pub fn type_text(&mut self, text: &str) -> Result<Patch, EditError> {
        let mut patch = self.delete_selection()?;
        for c in text.chars() {
            let at = self.document.caret().ok_or(EditError::NoCaret)?;
            let cmd = if c == '\n' {
                Cmd::SplitBlock { at }
            } else {
                Cmd::InsertText {
                    at,
                    text: c.to_string(),
                }
            };
            patch.absorb(self.apply(cmd)?);
        }
        Ok(patch)
    }

    /// Deletes the selection, or the character before the caret. At the
    /// start of a block it does nothing: joining blocks is left to the host,
    /// which owns paragraph structure.
    pub fn backspace(&mut self) -> Result<Patch, EditError> {
        let selection = self.document.selection().ok_or(EditError::NoCaret)?;
        if !selection.is_collapsed() {
            return self.delete_selection();
        }
        let caret = selection.focus;
        let from = if caret.offset > 0 {
            Point::new(caret.node, caret.offset - 1)
        } else {
            match self.previous_text_end(caret.node) {
                Some(end) => {
                    let to = end;
                    return self.apply(Cmd::DeleteRange {
                        from: Point::new(end.node, end.offset - 1),
                        to,
                    });
                }
                None => return Ok(self.unchanged()),
            }
        };
        self.apply(Cmd::DeleteRange { from, to: caret })
    }

    pub fn complete_reference(&mut self, target_id: &str) -> Patch {
        let mut patch = self.engine.complete_reference(&mut self.document, target_id);
        patch.version = self.document.version();
        patch
    }

    pub fn refresh_block(&mut self, block: BlockId) -> Patch {
        let mut patch = self.engine.refresh_block(&mut self.document, block);
        patch.version = self.document.version();
        patch
    }

    pub fn classify(&self, key: NodeKey) -> Option<Classification> {
        self.engine.classify(&self.document, key)
    }

    pub fn activate(&self, key: NodeKey) -> Option<Activation> {
        self.engine.activate(&self.document, key)
    }

    fn delete_selection(&mut self) -> Result<Patch, EditError> {
        match self.document.selection() {
            Some(selection) if !selection.is_collapsed() => self.apply(Cmd::DeleteRange {
                from: selection.anchor,
                to: selection.focus,
            }),
            _ => Ok(self.unchanged()),
        }
    }

    /// End of the nearest earlier sibling that has text.
    fn previous_text_end(&self, key: NodeKey) -> Option<Point> {
        let mut previous = self.document.previous_sibling(key);
        while let Some(candidate) = previous {
            let node = self.document.node(candidate)?;
            if !node.is_placeholder() && node.char_len() > 0 {
                return Some(Point::new(candidate, node.char_len()));
            }
            previous = self.document.previous_sibling(candidate);
        }
        None
    }

    fn unchanged(&self) -> Patch {
        Patch {
            selection: self.document.selection(),
            version: self.document.version(),
            ..Patch::default()
        }
    }
}

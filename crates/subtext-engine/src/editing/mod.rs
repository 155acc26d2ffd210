/*!
 * # Editing Core Module
 *
 * The document tree the engine settles and the edits applied to it.
 *
 * ## Architecture Overview
 *
 * ### 1. The Host Seam
 * - The engine only sees the tree through the **`TreeHost`** trait
 * - Hosts own node storage, sibling order and node identity (`NodeKey`)
 * - Hosts declare what they can store (`HostCapabilities`), checked once on attach
 *
 * ### 2. Command-Based Editing
 * - All edits to the in-crate `Document` are **`Cmd`**s
 * - `Document::apply` returns a `DirtySet`: the nodes whose text changed and
 *   the blocks whose child list changed
 * - The `Editor` feeds every `DirtySet` straight into a settlement pass
 *
 * ### 3. Selection
 * - Points are (node, character offset) pairs
 * - During a settlement pass the engine carries the selection itself and
 *   writes it back when the pass ends
 *
 * ### 4. Patches
 * - Every settled edit yields a **`Patch`**: changed blocks, counts of
 *   recognitions, demotions, merges and placeholder churn, and the new selection
 *
 * ## Module Structure
 *
 * - **`host`**: `TreeHost`, `HostCapabilities`, `DirtySet`
 * - **`document`**: the reference in-memory host
 * - **`commands`**: `Cmd` and `EditError`
 * - **`selection`**: `Point`, `Selection` and offset relocation
 * - **`patch`**: settlement results
 * - **`editor`**: `Document` plus `Engine`, settling after each command
 *
 * ## Usage Pattern
 *
 * ```rust
 * use subtext_engine::editing::{Cmd, Document, Editor, TreeHost};
 * use subtext_engine::engine::Engine;
 * use subtext_engine::references::NoReferences;
 *
 * let engine = Engine::standard(NoReferences).unwrap();
 * let mut editor = Editor::new(Document::from_text("Visit "), engine).unwrap();
 *
 * let patch = editor.type_text("[[Ben Follington]]").unwrap();
 * assert_eq!(patch.recognized, 1);
 * assert_eq!(editor.document().to_text(), "Visit [[Ben Follington]]");
 * ```
 */

pub mod commands;
pub mod document;
pub mod editor;
pub mod host;
pub mod patch;
pub mod selection;

pub use commands::{Cmd, EditError};
pub use document::Document;
pub use editor::Editor;
pub use host::{DirtySet, HostCapabilities, TreeHost};
pub use patch::Patch;
pub use selection::{Point, Selection};

pub mod editing;
pub mod engine;
pub mod io;
pub mod models;
pub mod parsing;
pub mod references;
pub mod snapshot;


// Re-export key types for easier usage
pub use editing::{
    Cmd, DirtySet, Document, EditError, Editor, HostCapabilities, Patch, Point, Selection,
    TreeHost,
};
pub use engine::{Activation, Classification, Engine, SetupError};
pub use io::*;
pub use models::*;
pub use parsing::{GrammarError, GrammarSet};
pub use references::{InMemoryResolver, NoReferences, ReferenceResolver, Resolution};

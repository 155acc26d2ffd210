pub mod block;
pub mod entity;
pub mod node;

pub use block::BlockId;
pub use entity::{EntityKind, Format, Role, UnknownEntityKind};
pub use node::{InlineNode, NodeKey, PlaceholderContent};

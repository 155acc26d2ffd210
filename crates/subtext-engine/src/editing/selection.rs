use serde::Serialize;

use crate::models::NodeKey;

/// A position inside a node's text, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub node: NodeKey,
    pub offset: usize,
}

impl Point {
    pub fn new(node: NodeKey, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The live selection. A caret is a selection whose anchor equals its focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn caret(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn touches(&self, node: NodeKey) -> bool {
        self.anchor.node == node || self.focus.node == node
    }

    /// Applies `relocate` to both points.
    pub fn remap(&mut self, mut relocate: impl FnMut(Point) -> Point) {
        self.anchor = relocate(self.anchor);
        self.focus = relocate(self.focus);
    }
}

/// Maps a point inside `source` onto the pieces `source` was cut into.
///
/// `pieces` lists each resulting node with its length, in order. An offset
/// belongs to the piece whose range contains it; the end of the text belongs
/// to the last piece.
pub fn relocate_into_pieces(point: Point, source: NodeKey, pieces: &[(NodeKey, usize)]) -> Point {
    if point.node != source {
        return point;
    }
    let mut start = 0;
    for (index, (key, len)) in pieces.iter().enumerate() {
        let end = start + len;
        let last = index + 1 == pieces.len();
        if point.offset < end || last {
            return Point::new(*key, point.offset.saturating_sub(start).min(*len));
        }
        start = end;
    }
    point
}

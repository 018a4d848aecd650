//! Core types for node identity.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;

/// Anything that can name a node: hashable, comparable and printable.
///
/// Nodes exist implicitly as the endpoints referenced by components, so a
/// label type only has to support equality lookups and display.
pub trait NodeLabel: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

impl<T> NodeLabel for T where T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

/// A cell on a rectangular placement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Create a grid position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

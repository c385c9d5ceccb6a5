//! Ordered sequence nodes

use crate::tree::{Mapping, Node, Scalar};

/// An ordered, index-addressable list of nodes
///
/// No uniqueness constraint on items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    items: Vec<Node>,
}

impl Sequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the node at an index
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    /// Get the mutable node at an index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)
    }

    /// Append a node
    pub fn push(&mut self, node: impl Into<Node>) {
        self.items.push(node.into());
    }

    /// Insert a node at an index, shifting subsequent items
    pub fn insert(&mut self, index: usize, node: impl Into<Node>) {
        let index = index.min(self.items.len());
        self.items.insert(index, node.into());
    }

    /// Remove and return the node at an index
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Iterate over items in order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter()
    }

    /// Iterate over items in order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.items.iter_mut()
    }

    /// Iterate over items that are mappings
    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.items.iter().filter_map(Node::as_mapping)
    }

    /// Iterate over items that are scalars
    pub fn scalars(&self) -> impl Iterator<Item = &Scalar> {
        self.items.iter().filter_map(Node::as_scalar)
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

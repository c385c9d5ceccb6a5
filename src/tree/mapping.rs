//! Ordered mapping nodes

use crate::core::error::BuildError;
use crate::tree::{Node, NodeKind, Scalar, Sequence};

/// An ordered map from unique scalar keys to child nodes
///
/// Key order is insertion order unless explicitly sorted. Keys are
/// case-sensitive and unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(Scalar, Node)>,
}

impl Mapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.value() == key)
    }

    /// Get the node at a key
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.index_of(key).map(|i| &self.entries[i].1)
    }

    /// Get the mutable node at a key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        let i = self.index_of(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Get the mapping at a key, or `None` if absent or not a mapping
    pub fn get_mapping(&self, key: &str) -> Option<&Mapping> {
        self.get(key).and_then(Node::as_mapping)
    }

    /// Get the mutable mapping at a key, or `None` if absent or not a mapping
    pub fn get_mapping_mut(&mut self, key: &str) -> Option<&mut Mapping> {
        self.get_mut(key).and_then(Node::as_mapping_mut)
    }

    /// Get the sequence at a key, or `None` if absent or not a sequence
    pub fn get_sequence(&self, key: &str) -> Option<&Sequence> {
        self.get(key).and_then(Node::as_sequence)
    }

    /// Get the mutable sequence at a key, or `None` if absent or not a sequence
    pub fn get_sequence_mut(&mut self, key: &str) -> Option<&mut Sequence> {
        self.get_mut(key).and_then(Node::as_sequence_mut)
    }

    /// Get the scalar at a key, or `None` if absent or not a scalar
    pub fn get_scalar(&self, key: &str) -> Option<&Scalar> {
        self.get(key).and_then(Node::as_scalar)
    }

    /// Get the mutable scalar at a key, or `None` if absent or not a scalar
    pub fn get_scalar_mut(&mut self, key: &str) -> Option<&mut Scalar> {
        self.get_mut(key).and_then(Node::as_scalar_mut)
    }

    /// Walk a key path where every intermediate node must be a mapping
    ///
    /// Returns `None` on any missing key or wrong-shaped intermediate;
    /// path lookups never fail hard.
    pub fn get_at(&self, keys: &[&str]) -> Option<&Node> {
        let (last, prefix) = keys.split_last()?;
        let mut current = self;
        for key in prefix {
            current = current.get_mapping(key)?;
        }
        current.get(last)
    }

    /// Get the mapping at a key path, or `None`
    pub fn get_mapping_at(&self, keys: &[&str]) -> Option<&Mapping> {
        self.get_at(keys).and_then(Node::as_mapping)
    }

    /// Get the sequence at a key path, or `None`
    pub fn get_sequence_at(&self, keys: &[&str]) -> Option<&Sequence> {
        self.get_at(keys).and_then(Node::as_sequence)
    }

    /// Get the scalar at a key path, or `None`
    pub fn get_scalar_at(&self, keys: &[&str]) -> Option<&Scalar> {
        self.get_at(keys).and_then(Node::as_scalar)
    }

    /// Get or create the mapping at a key
    ///
    /// Returns the existing mapping, converts an empty scalar placeholder,
    /// or appends an empty mapping for a missing key. Fails with
    /// [`BuildError::ShapeMismatch`] if the key holds an incompatible
    /// non-empty node. Idempotent: calling twice returns the same node.
    pub fn ensure_mapping(&mut self, key: &str) -> Result<&mut Mapping, BuildError> {
        self.ensure(key, NodeKind::Mapping)?;
        Ok(self
            .get_mapping_mut(key)
            .unwrap_or_else(|| unreachable!("ensure created a mapping at '{key}'")))
    }

    /// Get or create the sequence at a key; see [`Mapping::ensure_mapping`]
    pub fn ensure_sequence(&mut self, key: &str) -> Result<&mut Sequence, BuildError> {
        self.ensure(key, NodeKind::Sequence)?;
        Ok(self
            .get_sequence_mut(key)
            .unwrap_or_else(|| unreachable!("ensure created a sequence at '{key}'")))
    }

    /// Get or create the scalar at a key; see [`Mapping::ensure_mapping`]
    pub fn ensure_scalar(&mut self, key: &str) -> Result<&mut Scalar, BuildError> {
        self.ensure(key, NodeKind::Scalar)?;
        Ok(self
            .get_scalar_mut(key)
            .unwrap_or_else(|| unreachable!("ensure created a scalar at '{key}'")))
    }

    fn ensure(&mut self, key: &str, kind: NodeKind) -> Result<(), BuildError> {
        let fresh = || -> Node {
            match kind {
                NodeKind::Mapping => Mapping::new().into(),
                NodeKind::Sequence => Sequence::new().into(),
                NodeKind::Scalar => Scalar::empty().into(),
            }
        };

        match self.index_of(key) {
            None => {
                self.entries.push((Scalar::new(key), fresh()));
                Ok(())
            }
            Some(i) => {
                let node = &mut self.entries[i].1;
                if node.kind() == kind {
                    return Ok(());
                }
                if node.is_empty_scalar() {
                    *node = fresh();
                    return Ok(());
                }
                Err(BuildError::ShapeMismatch {
                    key: key.to_string(),
                    expected: kind,
                    found: node.kind(),
                })
            }
        }
    }

    /// Set the node at a key
    ///
    /// Preserves the key's position if it already exists, otherwise appends.
    pub fn set(&mut self, key: impl Into<Scalar>, value: impl Into<Node>) {
        let key = key.into();
        let value = value.into();
        match self.index_of(key.value()) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert a key at an arbitrary position, shifting subsequent keys
    ///
    /// If the key already exists elsewhere it is repositioned with the new
    /// value. Used to produce specific field orderings (e.g. `apiVersion`,
    /// `kind`, `metadata` first) without rebuilding the structure.
    pub fn insert(&mut self, index: usize, key: impl Into<Scalar>, value: impl Into<Node>) {
        let key = key.into();
        let value = value.into();
        let mut index = index.min(self.entries.len());
        if let Some(existing) = self.index_of(key.value()) {
            self.entries.remove(existing);
            if existing < index {
                index -= 1;
            }
        }
        self.entries.insert(index, (key, value));
    }

    /// Remove a key, returning its node
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let i = self.index_of(key)?;
        Some(self.entries.remove(i).1)
    }

    /// Reorder entries by key, lexicographically
    ///
    /// Used to produce deterministic label/annotation emission.
    pub fn sort_by_key(&mut self) {
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    /// Iterate over entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Node)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate over entries in order, with mutable values
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Scalar, &mut Node)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Iterate over keys in order
    pub fn keys(&self) -> impl Iterator<Item = &Scalar> {
        self.entries.iter().map(|(k, _)| k)
    }
}

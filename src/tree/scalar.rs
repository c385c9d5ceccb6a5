//! Scalar leaf nodes

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Serialization style for a scalar value
///
/// Style affects only how the value is emitted, never its semantic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// A leaf value in a document tree
#[derive(Debug, Clone)]
pub struct Scalar {
    value: String,
    pub style: ScalarStyle,
}

impl Scalar {
    /// Create a plain scalar from a value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            style: ScalarStyle::Plain,
        }
    }

    /// Create an empty scalar placeholder
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Create a scalar with an explicit style
    pub fn with_style(value: impl Into<String>, style: ScalarStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    /// The scalar's string value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the scalar's value, keeping its style
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Whether the value is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// Equality and ordering compare the value only; style is presentation.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::new(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_style() {
        let plain = Scalar::new("hello");
        let quoted = Scalar::with_style("hello", ScalarStyle::DoubleQuoted);
        assert_eq!(plain, quoted);
    }

    #[test]
    fn test_empty_scalar() {
        assert!(Scalar::empty().is_empty());
        assert!(!Scalar::new("x").is_empty());
    }

    #[test]
    fn test_ordering_by_value() {
        let a = Scalar::new("apple");
        let b = Scalar::with_style("banana", ScalarStyle::SingleQuoted);
        assert!(a < b);
    }
}

//! Step ordering keys
//!
//! A `Step` is a variable-length integer tuple used as the total-order sort
//! key for pipeline actions. Comparison pads the shorter tuple with trailing
//! zeros before lexicographic comparison, so any new step can be inserted
//! strictly between two existing ones by appending a component: between `[6]`
//! and `[7]` sits `[6, 1]`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An ordered, variable-length sequence of integers plus a description
///
/// Immutable value object. Ordering and equality consider only the numbers;
/// the description is diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    description: String,
    numbers: Vec<i64>,
}

impl Step {
    /// Create a step from a description and number tuple
    pub fn new(description: impl Into<String>, numbers: impl Into<Vec<i64>>) -> Self {
        Self {
            description: description.into(),
            numbers: numbers.into(),
        }
    }

    /// The human-readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The ordering tuple
    pub fn numbers(&self) -> &[i64] {
        &self.numbers
    }

    /// First built-in phase: initial resource population
    pub fn populate_resources() -> Self {
        Self::new("populate-resources", [1])
    }

    /// Clean up imported or populated resources
    pub fn sanitize() -> Self {
        Self::new("sanitize", [2])
    }

    /// Generate new resources from scratch
    pub fn generate_resources() -> Self {
        Self::new("generate-resources", [3])
    }

    /// Generate resources that read resources produced earlier
    pub fn generate_resources_based_on_others() -> Self {
        Self::new("generate-resources-based-on-others", [4])
    }

    /// Modify existing resources in place
    pub fn modify() -> Self {
        Self::new("modify", [5])
    }

    /// Declare provisioner ordering constraints
    pub fn specify_provisioner_dependencies() -> Self {
        Self::new("specify-provisioner-dependencies", [6])
    }

    /// Final phase: emit build artifacts
    pub fn output() -> Self {
        Self::new("output", [7])
    }

    /// Derive a step ordered strictly after this one but before the next
    /// built-in phase, by appending a tuple component
    pub fn followed_by(&self, description: impl Into<String>, number: i64) -> Self {
        let mut numbers = self.numbers.clone();
        numbers.push(number);
        Self::new(description, numbers)
    }
}

// Pad-then-lexicographic: [5] == [5, 0] and [5, 2] > [5].
impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Step {}

impl PartialOrd for Step {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Step {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.numbers.len().max(other.numbers.len());
        for i in 0..len {
            let a = self.numbers.get(i).copied().unwrap_or(0);
            let b = other.numbers.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.description, self.numbers)
    }
}

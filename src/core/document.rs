//! Manifest documents

use crate::core::error::BuildError;
use crate::tree::{yaml, Mapping, Node, Scalar};

/// One manifest artifact, backed by a mapping tree
///
/// A document belongs to at most one [`DocumentGroup`](crate::core::DocumentGroup)
/// at a time; the back-reference is the owning group's path and is managed
/// by the group on add/remove.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Explicit file name within the group, if any
    pub path: Option<String>,

    /// The document content
    pub root: Mapping,

    group: Option<String>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from an existing root mapping
    pub fn from_root(root: Mapping) -> Self {
        Self {
            path: None,
            root,
            group: None,
        }
    }

    /// Parse a document from a single YAML document's text
    pub fn from_yaml(text: &str) -> Result<Self, BuildError> {
        match yaml::parse(text)? {
            Node::Mapping(root) => Ok(Self::from_root(root)),
            other => Err(BuildError::UnsupportedYaml(format!(
                "document root must be a mapping, found {}",
                other.kind()
            ))),
        }
    }

    /// Set the explicit file name
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Path of the owning group, if any
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub(crate) fn set_group(&mut self, group: &str) {
        self.group = Some(group.to_string());
    }

    pub(crate) fn clear_group(&mut self) {
        self.group = None;
    }

    /// The document's `apiVersion`, if present
    pub fn api_version(&self) -> Option<&str> {
        self.root.get_scalar("apiVersion").map(Scalar::value)
    }

    /// The document's `kind`, if present
    pub fn kind(&self) -> Option<&str> {
        self.root.get_scalar("kind").map(Scalar::value)
    }

    /// The document's `.metadata.name`, if present
    pub fn name(&self) -> Option<&str> {
        self.root
            .get_scalar_at(&["metadata", "name"])
            .map(Scalar::value)
    }

    /// The document's `.metadata.namespace`, if present
    pub fn namespace(&self) -> Option<&str> {
        self.root
            .get_scalar_at(&["metadata", "namespace"])
            .map(Scalar::value)
    }

    /// Whether the document is of the given `(apiVersion, kind)` variant
    pub fn matches_kind(&self, api_version: &str, kind: &str) -> bool {
        self.api_version() == Some(api_version) && self.kind() == Some(kind)
    }

    /// Default file name derived from kind and name
    pub fn default_file_name(&self) -> String {
        let mut stem = String::new();
        if let Some(kind) = self.kind() {
            stem.push_str(&kind.to_lowercase());
        }
        if let Some(name) = self.name() {
            if !stem.is_empty() {
                stem.push('-');
            }
            stem.push_str(&name.to_lowercase());
        }
        if stem.is_empty() {
            stem.push_str("document");
        }
        format!("{stem}.yaml")
    }

    /// File name within the group: the explicit path or the default name
    pub fn file_name(&self) -> String {
        self.path.clone().unwrap_or_else(|| self.default_file_name())
    }

    /// Full output path: `group/file_name` when grouped
    pub fn full_path(&self) -> String {
        match &self.group {
            Some(group) => format!("{}/{}", group, self.file_name()),
            None => self.file_name(),
        }
    }

    /// Ordering key for deterministic clash resolution
    pub(crate) fn sort_key(&self) -> (String, String, String, String) {
        (
            self.api_version().unwrap_or_default().to_string(),
            self.kind().unwrap_or_default().to_string(),
            self.namespace().unwrap_or_default().to_string(),
            self.name().unwrap_or_default().to_string(),
        )
    }

    /// Serialize the document to YAML text
    pub fn to_yaml(&self) -> Result<String, BuildError> {
        yaml::serialize(&Node::Mapping(self.root.clone()))
    }
}

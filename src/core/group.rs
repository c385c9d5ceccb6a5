//! Document groups

use crate::core::{document::Document, error::BuildError};
use std::collections::BTreeMap;

/// A non-manifest file emitted alongside a group's documents
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalFile {
    pub path: String,
    pub content: String,
}

impl AdditionalFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A named collection of documents, the unit of provisioning
///
/// The group owns its documents: adding and removing set and clear the
/// document's group back-reference as a paired operation.
#[derive(Debug, Clone, Default)]
pub struct DocumentGroup {
    /// Directory path of the group within the build output
    pub path: String,

    documents: Vec<Document>,

    /// Additional files emitted alongside the documents
    pub additional_files: Vec<AdditionalFile>,

    created_by: Option<String>,
}

impl DocumentGroup {
    /// Create an empty group
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// The documents in insertion order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The documents, mutable for in-place tree edits
    pub fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the group holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Add a document, taking ownership and setting its back-reference
    pub fn add_document(&mut self, mut document: Document) {
        document.set_group(&self.path);
        self.documents.push(document);
    }

    /// Remove and return the document at an index, clearing its back-reference
    pub fn remove_document(&mut self, index: usize) -> Option<Document> {
        if index >= self.documents.len() {
            return None;
        }
        let mut document = self.documents.remove(index);
        document.clear_group();
        Some(document)
    }

    /// Remove all documents matching a predicate
    pub fn remove_documents_where<F>(&mut self, mut predicate: F) -> Vec<Document>
    where
        F: FnMut(&Document) -> bool,
    {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.documents.len() {
            if predicate(&self.documents[i]) {
                let mut document = self.documents.remove(i);
                document.clear_group();
                removed.push(document);
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Reassign every document and additional file to another group
    ///
    /// Atomic from the caller's perspective: after the call, no document
    /// carries a stale back-reference. Document order is preserved.
    pub fn move_to(&mut self, other: &mut DocumentGroup) {
        for mut document in self.documents.drain(..) {
            document.set_group(&other.path);
            other.documents.push(document);
        }
        other.additional_files.append(&mut self.additional_files);
    }

    /// Identifier of the component that created this group, if recorded
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub(crate) fn set_created_by(&mut self, component: Option<String>) {
        self.created_by = component;
    }

    /// Add an additional file
    pub fn add_file(&mut self, file: AdditionalFile) {
        self.additional_files.push(file);
    }

    /// Make every document's output path unique within the group
    ///
    /// Documents sharing a default file name are sorted by
    /// `(apiVersion, kind, namespace, name)` and suffixed `-0`, `-1`, ... in
    /// that order, so the result is independent of insertion order. A
    /// remaining duplicate after suffixing is reported as
    /// [`BuildError::DuplicatePath`].
    pub fn fix_name_clashes(&mut self) -> Result<(), BuildError> {
        let mut by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, document) in self.documents.iter().enumerate() {
            by_name.entry(document.file_name()).or_default().push(i);
        }

        for (name, mut indices) in by_name {
            if indices.len() < 2 {
                continue;
            }
            indices.sort_by_key(|&i| self.documents[i].sort_key());
            let (stem, extension) = match name.rsplit_once('.') {
                Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
                None => (name, String::new()),
            };
            for (suffix, &i) in indices.iter().enumerate() {
                self.documents[i].path = Some(format!("{stem}-{suffix}{extension}"));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for document in &self.documents {
            let path = document.full_path();
            if !seen.insert(path.clone()) {
                return Err(BuildError::DuplicatePath {
                    group: self.path.clone(),
                    path,
                });
            }
        }
        Ok(())
    }
}

//! Build context - shared state threaded through one build

use crate::core::{document::Document, group::DocumentGroup};
use crate::provision::ProvisionerGraph;
use std::collections::HashMap;
use uuid::Uuid;

/// Catalog of known Kubernetes resource kinds
///
/// Populated by an early pipeline phase and read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct KubernetesResourceInfo {
    entries: HashMap<(String, String), bool>,
}

impl KubernetesResourceInfo {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource kind and whether it is namespace-scoped
    pub fn register(&mut self, api_version: &str, kind: &str, namespaced: bool) {
        self.entries
            .insert((api_version.to_string(), kind.to_string()), namespaced);
    }

    /// Whether the catalog knows this `(apiVersion, kind)`
    pub fn contains(&self, api_version: &str, kind: &str) -> bool {
        self.entries
            .contains_key(&(api_version.to_string(), kind.to_string()))
    }

    /// Whether the resource is namespace-scoped; unknown kinds report false
    pub fn is_namespaced(&self, api_version: &str, kind: &str) -> bool {
        self.entries
            .get(&(api_version.to_string(), kind.to_string()))
            .copied()
            .unwrap_or(false)
    }
}

/// Mutable shared state for one build
///
/// Created once per `Builder::build` invocation and discarded when the
/// pipeline finishes. Owns the document groups, the resource catalog, a
/// free-form data bag and the provisioner graph under construction.
#[derive(Debug, Default)]
pub struct BuildContext {
    /// Unique id for this build
    pub build_id: Uuid,

    groups: Vec<DocumentGroup>,

    /// Resource existence and namespace-scope lookups
    pub resource_info: KubernetesResourceInfo,

    /// Free-form data shared between components
    pub custom_data: HashMap<String, serde_json::Value>,

    /// Provisioner ordering constraints declared so far
    pub provisioning: ProvisionerGraph,
}

impl BuildContext {
    /// Create a fresh context
    pub fn new() -> Self {
        Self {
            build_id: Uuid::new_v4(),
            ..Self::default()
        }
    }

    /// The document groups in registration order
    pub fn groups(&self) -> &[DocumentGroup] {
        &self.groups
    }

    /// The document groups, mutable
    pub fn groups_mut(&mut self) -> &mut [DocumentGroup] {
        &mut self.groups
    }

    /// Find a group by path
    pub fn group(&self, path: &str) -> Option<&DocumentGroup> {
        self.groups.iter().find(|g| g.path == path)
    }

    /// Find a group by path, mutable
    pub fn group_mut(&mut self, path: &str) -> Option<&mut DocumentGroup> {
        self.groups.iter_mut().find(|g| g.path == path)
    }

    /// Get or create the group at a path
    pub fn ensure_group(&mut self, path: &str) -> &mut DocumentGroup {
        if let Some(i) = self.groups.iter().position(|g| g.path == path) {
            return &mut self.groups[i];
        }
        self.groups.push(DocumentGroup::new(path));
        self.groups.last_mut().unwrap_or_else(|| unreachable!())
    }

    /// Add a group, recording the creating component's identifier
    pub fn add_group(&mut self, mut group: DocumentGroup, created_by: Option<&str>) {
        group.set_created_by(created_by.map(str::to_string));
        self.groups.push(group);
    }

    /// Iterate over every document in every group
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.groups.iter().flat_map(|g| g.documents().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_info_lookups() {
        let mut info = KubernetesResourceInfo::new();
        info.register("apps/v1", "Deployment", true);
        info.register("v1", "Namespace", false);

        assert!(info.contains("apps/v1", "Deployment"));
        assert!(info.is_namespaced("apps/v1", "Deployment"));
        assert!(!info.is_namespaced("v1", "Namespace"));
        assert!(!info.contains("v1", "Unknown"));
        assert!(!info.is_namespaced("v1", "Unknown"));
    }

    #[test]
    fn test_ensure_group_is_idempotent() {
        let mut ctx = BuildContext::new();
        ctx.ensure_group("workloads");
        ctx.ensure_group("workloads");
        assert_eq!(ctx.groups().len(), 1);
    }

    #[test]
    fn test_add_group_records_creator() {
        let mut ctx = BuildContext::new();
        ctx.add_group(DocumentGroup::new("namespaces"), Some("ns-component"));
        assert_eq!(
            ctx.group("namespaces").unwrap().created_by(),
            Some("ns-component")
        );
    }

    #[test]
    fn test_documents_spans_groups() {
        let mut ctx = BuildContext::new();
        ctx.ensure_group("a")
            .add_document(Document::from_yaml("kind: ConfigMap\n").unwrap());
        ctx.ensure_group("b")
            .add_document(Document::from_yaml("kind: Secret\n").unwrap());
        assert_eq!(ctx.documents().count(), 2);
    }
}

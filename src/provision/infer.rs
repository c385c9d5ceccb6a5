//! Default provisioner dependency inference
//!
//! Namespaces and custom resource definitions must reach the cluster before
//! anything that lives in them. This built-in component scans every
//! document once after all modify-phase mutations are complete and adds an
//! edge from the owning group of each Namespace/CRD to the owning group of
//! every document that references it. Self-edges within one group are
//! suppressed.

use crate::core::{BuildContext, Component, Document, Step};
use tracing::debug;

const COMPONENT_ID: &str = "default-provisioner-dependencies";

/// The built-in dependency inference component
///
/// Registered at the specify-provisioner-dependencies phase.
pub fn default_dependency_component() -> Component {
    Component::named(COMPONENT_ID)
        .with_type("provisioner-dependencies")
        .with_action(Step::specify_provisioner_dependencies(), |ctx| {
            infer_default_dependencies(ctx);
            Ok(())
        })
}

/// What a prerequisite document provides to other documents
#[derive(Debug)]
enum Provides {
    /// A Namespace with this name
    Namespace(String),
    /// A CRD declaring these `(apiVersion, kind)` combinations
    Definitions(Vec<(String, String)>),
}

/// Scan all documents and declare inferred edges on the context's graph
pub fn infer_default_dependencies(ctx: &mut BuildContext) {
    let mut prerequisites: Vec<(String, Provides)> = Vec::new();
    for group in ctx.groups() {
        for document in group.documents() {
            if is_namespace(document) {
                if let Some(name) = document.name() {
                    prerequisites.push((group.path.clone(), Provides::Namespace(name.to_string())));
                }
            } else if is_custom_resource_definition(document) {
                let definitions = declared_kinds(document);
                if !definitions.is_empty() {
                    prerequisites.push((group.path.clone(), Provides::Definitions(definitions)));
                }
            }
        }
    }

    // One full rescan of every document against every prerequisite.
    let mut edges: Vec<(String, String)> = Vec::new();
    for group in ctx.groups() {
        for document in group.documents() {
            for (owner, provides) in &prerequisites {
                if *owner == group.path {
                    continue;
                }
                let depends = match provides {
                    Provides::Namespace(name) => document.namespace() == Some(name.as_str()),
                    Provides::Definitions(kinds) => kinds.iter().any(|(api_version, kind)| {
                        document.matches_kind(api_version, kind)
                    }),
                };
                if depends {
                    edges.push((owner.clone(), group.path.clone()));
                }
            }
        }
    }

    for (before, after) in edges {
        debug!(%before, %after, "inferred provisioner dependency");
        ctx.provisioning.group_before(&before, &after);
    }
}

fn is_namespace(document: &Document) -> bool {
    document.matches_kind("v1", "Namespace")
}

fn is_custom_resource_definition(document: &Document) -> bool {
    document.kind() == Some("CustomResourceDefinition")
        && document
            .api_version()
            .is_some_and(|v| v.starts_with("apiextensions.k8s.io/"))
}

/// The `(apiVersion, kind)` combinations a CRD declares
fn declared_kinds(document: &Document) -> Vec<(String, String)> {
    let Some(spec) = document.root.get_mapping("spec") else {
        return Vec::new();
    };
    let Some(group) = spec.get_scalar("group") else {
        return Vec::new();
    };
    let Some(kind) = spec.get_scalar_at(&["names", "kind"]) else {
        return Vec::new();
    };

    let mut versions: Vec<String> = Vec::new();
    if let Some(list) = spec.get_sequence("versions") {
        for version in list.mappings() {
            if let Some(name) = version.get_scalar("name") {
                versions.push(name.value().to_string());
            }
        }
    }
    // Legacy apiextensions.k8s.io/v1beta1 single-version field
    if let Some(version) = spec.get_scalar("version") {
        if !versions.iter().any(|v| v == version.value()) {
            versions.push(version.value().to_string());
        }
    }

    versions
        .into_iter()
        .map(|v| (format!("{}/{}", group.value(), v), kind.value().to_string()))
        .collect()
}

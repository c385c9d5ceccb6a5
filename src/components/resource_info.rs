//! Resource catalog seeding component

use crate::core::{Component, Step};

// (apiVersion, kind, namespaced)
const WELL_KNOWN: &[(&str, &str, bool)] = &[
    ("v1", "ConfigMap", true),
    ("v1", "Endpoints", true),
    ("v1", "Namespace", false),
    ("v1", "PersistentVolume", false),
    ("v1", "PersistentVolumeClaim", true),
    ("v1", "Pod", true),
    ("v1", "Secret", true),
    ("v1", "Service", true),
    ("v1", "ServiceAccount", true),
    ("apps/v1", "DaemonSet", true),
    ("apps/v1", "Deployment", true),
    ("apps/v1", "ReplicaSet", true),
    ("apps/v1", "StatefulSet", true),
    ("batch/v1", "CronJob", true),
    ("batch/v1", "Job", true),
    ("networking.k8s.io/v1", "Ingress", true),
    ("networking.k8s.io/v1", "NetworkPolicy", true),
    ("rbac.authorization.k8s.io/v1", "ClusterRole", false),
    ("rbac.authorization.k8s.io/v1", "ClusterRoleBinding", false),
    ("rbac.authorization.k8s.io/v1", "Role", true),
    ("rbac.authorization.k8s.io/v1", "RoleBinding", true),
    ("storage.k8s.io/v1", "StorageClass", false),
    ("apiextensions.k8s.io/v1", "CustomResourceDefinition", false),
];

/// Built-in populate-phase component seeding the resource catalog
///
/// Registers the core well-known kinds so namespace-scope lookups work
/// without asking a live cluster.
pub fn well_known_resources_component() -> Component {
    Component::named("well-known-resources")
        .with_type("resource-info")
        .with_action(Step::populate_resources(), |ctx| {
            for &(api_version, kind, namespaced) in WELL_KNOWN {
                ctx.resource_info.register(api_version, kind, namespaced);
            }
            Ok(())
        })
}

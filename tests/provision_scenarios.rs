//! Scenario tests for provisioner dependency resolution

mod helpers;

use helpers::*;
use kubeforge::components::well_known_resources_component;
use kubeforge::core::{BuildError, Builder};
use kubeforge::provision::{default_dependency_component, ProvisionerGraph};

const NAMESPACE: &str = "\
apiVersion: v1
kind: Namespace
metadata:
  name: shop
";

const WORKLOAD: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: checkout
  namespace: shop
";

const CRD: &str = "\
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: caches.store.example.com
spec:
  group: store.example.com
  names:
    kind: Cache
    plural: caches
  versions:
    - name: v1alpha1
      served: true
";

const CUSTOM_RESOURCE: &str = "\
apiVersion: store.example.com/v1alpha1
kind: Cache
metadata:
  name: sessions
";

/// Namespaced documents order their group after the namespace's group
#[test]
fn test_namespace_edges_inferred_across_groups() {
    let builder = Builder::new()
        .with_component(well_known_resources_component())
        .with_component(import("cluster", NAMESPACE))
        .with_component(import("apps", WORKLOAD))
        .with_component(default_dependency_component());

    let (_ctx, plan) = builder.build_plan().unwrap();
    assert_plan_order(&plan, "apply(cluster)", "apply(apps)");
}

/// Custom resources order their group after the defining CRD's group
#[test]
fn test_crd_edges_inferred_across_groups() {
    let builder = Builder::new()
        .with_component(import("crds", CRD))
        .with_component(import("resources", CUSTOM_RESOURCE))
        .with_component(default_dependency_component());

    let (_ctx, plan) = builder.build_plan().unwrap();
    assert_plan_order(&plan, "apply(crds)", "apply(resources)");
}

/// A namespace living next to its consumers creates no self-edge
#[test]
fn test_same_group_namespace_needs_no_edge() {
    let both = format!("{NAMESPACE}---\n{WORKLOAD}");
    let builder = Builder::new()
        .with_component(import("everything", &both))
        .with_component(default_dependency_component());

    let (mut ctx, _plan) = builder.build_plan().unwrap();
    assert!(!ctx.provisioning.has_group_edge("everything", "everything"));

    ctx.provisioning.apply("everything");
    let plan = ctx.provisioning.resolve().unwrap();
    assert_eq!(plan.nodes.len(), 1);
    assert!(plan.nodes[0].deps.is_empty());
}

/// Contradictory edges resolve to a cycle error naming the members
#[test]
fn test_cycle_lists_participating_nodes() {
    let mut graph = ProvisionerGraph::new();
    graph.group_before("a", "b");
    graph.group_before("b", "c");
    graph.group_before("c", "a");

    let err = graph.resolve().unwrap_err();
    let BuildError::CycleDetected { nodes } = err else {
        panic!("unexpected error: {err:?}");
    };
    for member in ["apply(a)", "apply(b)", "apply(c)"] {
        assert!(
            nodes.iter().any(|n| n == member),
            "missing {member} in {nodes:?}"
        );
    }
}

/// Unconstrained nodes keep declaration order in the resolved plan
#[test]
fn test_resolution_breaks_ties_by_declaration_order() {
    let mut graph = ProvisionerGraph::new();
    graph.apply("zeta");
    graph.apply("alpha");
    graph.apply("midway");

    let plan = graph.resolve().unwrap();
    let order: Vec<&str> = plan.nodes.iter().map(|n| n.group.as_str()).collect();
    assert_eq!(order, vec!["zeta", "alpha", "midway"]);
}

/// Wait nodes always come after their group's apply node
#[test]
fn test_wait_implies_apply_first() {
    let mut graph = ProvisionerGraph::new();
    graph.wait("db");

    let plan = graph.resolve().unwrap();
    let labels: Vec<String> = plan
        .nodes
        .iter()
        .map(|n| node_label(n.kind, &n.group))
        .collect();
    assert_eq!(labels, vec!["apply(db)", "wait(db)"]);
    assert_eq!(plan.nodes[1].deps, vec![0]);
}

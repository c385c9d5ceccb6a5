//! Scenario tests for the staged build pipeline

mod helpers;

use helpers::*;
use kubeforge::components::{field_ordering_component, sanitize_component};
use kubeforge::core::{BuildError, Builder, Step};
use std::sync::{Arc, Mutex};

const STACK: &str = "\
apiVersion: v1
kind: Namespace
metadata:
  name: shop
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: checkout
  namespace: shop
status:
  replicas: 0
---
apiVersion: v1
kind: Service
metadata:
  name: checkout
  namespace: shop
";

/// Actions run in step order no matter which component registered first
#[test]
fn test_actions_run_in_step_order_across_components() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let builder = Builder::new()
        .with_component(tracing_component("out", Step::output(), trace.clone()))
        .with_component(tracing_component("mod", Step::modify(), trace.clone()))
        .with_component(tracing_component("pop", Step::populate_resources(), trace.clone()));

    builder.build().unwrap();
    assert_eq!(*trace.lock().unwrap(), vec!["pop", "mod", "out"]);
}

/// Equal steps fall back to registration order
#[test]
fn test_equal_steps_keep_registration_order() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let builder = Builder::new()
        .with_component(tracing_component("first", Step::modify(), trace.clone()))
        .with_component(tracing_component("second", Step::modify(), trace.clone()));

    builder.build().unwrap();
    assert_eq!(*trace.lock().unwrap(), vec!["first", "second"]);
}

/// A `followed_by` step slots between its base and the next phase
#[test]
fn test_followed_by_runs_between_phases() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let after_modify = Step::modify().followed_by("patch", 1);
    let builder = Builder::new()
        .with_component(tracing_component("deps", Step::specify_provisioner_dependencies(), trace.clone()))
        .with_component(tracing_component("patch", after_modify, trace.clone()))
        .with_component(tracing_component("mod", Step::modify(), trace.clone()));

    builder.build().unwrap();
    assert_eq!(*trace.lock().unwrap(), vec!["mod", "patch", "deps"]);
}

/// Identical component sets produce byte-identical output
#[test]
fn test_builds_are_deterministic() {
    let builder = Builder::new()
        .with_component(import("shop", STACK))
        .with_component(sanitize_component())
        .with_component(field_ordering_component());

    let render = |builder: &Builder| -> String {
        let ctx = builder.build().unwrap();
        ctx.groups()
            .iter()
            .flat_map(|g| g.documents())
            .map(|d| format!("# {}\n{}", d.full_path(), d.to_yaml().unwrap()))
            .collect()
    };

    assert_eq!(render(&builder), render(&builder));
}

/// A failing action aborts the build and names its component and step
#[test]
fn test_component_failure_is_attributed() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let builder = Builder::new()
        .with_component(
            kubeforge::core::Component::named("exploding")
                .with_action(Step::sanitize(), |_ctx| anyhow::bail!("manifest rejected")),
        )
        .with_component(tracing_component("later", Step::output(), trace.clone()));

    let err = builder.build().unwrap_err();
    match err {
        BuildError::ComponentFailure { component, step, source } => {
            assert_eq!(component, "exploding");
            assert!(step.contains("sanitize"));
            assert!(source.to_string().contains("manifest rejected"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Nothing past the failure ran
    assert!(trace.lock().unwrap().is_empty());
}

/// Clashing output names get deterministic suffixes at the output phase
#[test]
fn test_name_clashes_resolved_deterministically() {
    let clashing = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  namespace: a
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  namespace: b
";
    let builder = Builder::new().with_component(import("cfg", clashing));
    let mut ctx = builder.build().unwrap();
    ctx.group_mut("cfg").unwrap().fix_name_clashes().unwrap();

    let names: Vec<String> = ctx
        .group("cfg")
        .unwrap()
        .documents()
        .iter()
        .map(|d| d.file_name())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(
        sorted,
        vec!["configmap-settings-0.yaml", "configmap-settings-1.yaml"]
    );

    // Suffix assignment follows (apiVersion, kind, namespace, name), not
    // insertion order
    let by_namespace = |ns: &str| {
        ctx.group("cfg")
            .unwrap()
            .documents()
            .iter()
            .find(|d| d.namespace() == Some(ns))
            .unwrap()
            .file_name()
    };
    assert_eq!(by_namespace("a"), "configmap-settings-0.yaml");
    assert_eq!(by_namespace("b"), "configmap-settings-1.yaml");
}

/// Tree ensure calls reject nodes of the wrong kind with a shape error
#[test]
fn test_shape_mismatch_surfaces_from_actions() {
    let manifest = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
";
    let builder = Builder::new()
        .with_component(import("cfg", manifest))
        .with_component(
            kubeforge::core::Component::named("bad-shape").with_action(Step::modify(), |ctx| {
                let group = ctx.group_mut("cfg").unwrap();
                let doc = &mut group.documents_mut()[0];
                // "kind" holds a scalar; asking for a mapping must fail
                doc.root.ensure_mapping("kind")?;
                Ok(())
            }),
        );

    let err = builder.build().unwrap_err();
    let BuildError::ComponentFailure { source, .. } = err else {
        panic!("unexpected error: {err:?}");
    };
    let shape = source.downcast_ref::<BuildError>().unwrap();
    assert!(matches!(shape, BuildError::ShapeMismatch { key, .. } if key == "kind"));
}

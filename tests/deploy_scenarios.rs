//! End-to-end scenarios: bundle config through build, plan and deployment

mod helpers;

use helpers::*;
use kubeforge::core::BundleConfig;
use kubeforge::provision::{DeployExecutor, DeployOptions, ProvisionState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Write manifest files for a bundle into a fresh temp directory
fn write_manifests(tag: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kubeforge-{}-{}", tag, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        std::fs::write(dir.join(name), content).unwrap();
    }
    dir
}

#[tokio::test]
async fn test_bundle_deploys_groups_in_declared_order() {
    let dir = write_manifests(
        "order",
        &[
            (
                "ns.yaml",
                "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: shop\n",
            ),
            (
                "app.yaml",
                "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: shop\n",
            ),
        ],
    );

    let yaml = format!(
        r#"
name: "shop"
groups:
  - name: "cluster"
    manifests: ["{ns}"]
    wait: true
  - name: "apps"
    manifests: ["{app}"]
    depends_on: ["cluster"]
"#,
        ns = dir.join("ns.yaml").display(),
        app = dir.join("app.yaml").display(),
    );

    let config = BundleConfig::from_yaml(&yaml).unwrap();
    let (ctx, plan) = config.to_builder().unwrap().build_plan().unwrap();

    let runtime = Arc::new(MockRuntime::new());
    let executor = DeployExecutor::new(runtime.clone(), DeployOptions::default());
    let report = executor.execute(&ctx, &plan).await;

    assert!(report.is_success(), "deployment failed: {}", report.summary());
    assert_eq!(
        runtime.calls(),
        vec![
            "apply cluster".to_string(),
            "wait cluster".to_string(),
            "apply apps".to_string(),
        ]
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_failed_apply_cancels_downstream_groups() {
    let dir = write_manifests(
        "cancel",
        &[(
            "cm.yaml",
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: shared\n",
        )],
    );
    let manifest = dir.join("cm.yaml").display().to_string();

    let yaml = format!(
        r#"
name: "cascade"
groups:
  - name: "base"
    manifests: ["{manifest}"]
  - name: "middle"
    manifests: ["{manifest}"]
    depends_on: ["base"]
  - name: "top"
    manifests: ["{manifest}"]
    depends_on: ["middle"]
  - name: "aside"
    manifests: ["{manifest}"]
"#
    );

    let config = BundleConfig::from_yaml(&yaml).unwrap();
    let (ctx, plan) = config.to_builder().unwrap().build_plan().unwrap();

    let runtime = Arc::new(MockRuntime::new().with_failing_apply("base"));
    let executor = DeployExecutor::new(runtime.clone(), DeployOptions::default());
    let report = executor.execute(&ctx, &plan).await;

    assert!(!report.is_success());
    let by_group = |g: &str| report.nodes.iter().find(|n| n.group == g).unwrap();
    assert_eq!(by_group("base").state, ProvisionState::Failed);
    // Cancellation propagates transitively
    assert_eq!(by_group("middle").state, ProvisionState::Ordered);
    assert_eq!(by_group("top").state, ProvisionState::Ordered);
    assert!(by_group("top").error.is_some());
    // Independent branches still run
    assert_eq!(by_group("aside").state, ProvisionState::Applied);
    assert!(!runtime.calls().contains(&"apply middle".to_string()));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_stalled_wait_times_out_and_cancels_dependents() {
    let dir = write_manifests(
        "timeout",
        &[(
            "db.yaml",
            "apiVersion: apps/v1\nkind: StatefulSet\nmetadata:\n  name: db\n",
        )],
    );
    let manifest = dir.join("db.yaml").display().to_string();

    let yaml = format!(
        r#"
name: "stalled"
groups:
  - name: "db"
    manifests: ["{manifest}"]
    wait: true
  - name: "app"
    manifests: ["{manifest}"]
    depends_on: ["db"]
"#
    );

    let config = BundleConfig::from_yaml(&yaml).unwrap();
    let (ctx, plan) = config.to_builder().unwrap().build_plan().unwrap();

    let runtime = Arc::new(MockRuntime::new().with_stalled_wait("db"));
    let executor = DeployExecutor::new(
        runtime,
        DeployOptions {
            wait_timeout: Duration::from_millis(50),
        },
    );
    let report = executor.execute(&ctx, &plan).await;

    let by = |g: &str, label: &str| {
        report
            .nodes
            .iter()
            .find(|n| n.group == g && node_label(n.kind, &n.group) == label)
            .unwrap()
    };
    assert_eq!(by("db", "apply(db)").state, ProvisionState::Applied);
    assert_eq!(by("db", "wait(db)").state, ProvisionState::Failed);
    assert!(by("db", "wait(db)")
        .error
        .as_deref()
        .unwrap()
        .contains("timed out"));
    assert_eq!(by("app", "apply(app)").state, ProvisionState::Ordered);

    std::fs::remove_dir_all(&dir).ok();
}

/// The inference component is part of every bundle build
#[test]
fn test_bundle_infers_namespace_dependency_without_declaration() {
    let dir = write_manifests(
        "infer",
        &[
            (
                "ns.yaml",
                "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: infra\n",
            ),
            (
                "svc.yaml",
                "apiVersion: v1\nkind: Service\nmetadata:\n  name: gw\n  namespace: infra\n",
            ),
        ],
    );

    let yaml = format!(
        r#"
name: "inferred"
groups:
  - name: "namespaces"
    manifests: ["{ns}"]
  - name: "services"
    manifests: ["{svc}"]
"#,
        ns = dir.join("ns.yaml").display(),
        svc = dir.join("svc.yaml").display(),
    );

    let config = BundleConfig::from_yaml(&yaml).unwrap();
    let (_ctx, plan) = config.to_builder().unwrap().build_plan().unwrap();
    assert_plan_order(&plan, "apply(namespaces)", "apply(services)");

    std::fs::remove_dir_all(&dir).ok();
}

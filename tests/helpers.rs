//! Test utility functions for kubeforge

use async_trait::async_trait;
use kubeforge::core::{Component, DocumentGroup, Step};
use kubeforge::components::{import_component, ManifestSource};
use kubeforge::provision::{DeployPlan, DeployRuntime, ProvisionKind, RuntimeError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Runtime that records call order and fails or stalls on demand
pub struct MockRuntime {
    calls: Mutex<Vec<String>>,
    fail_apply: Vec<String>,
    stall_wait: Vec<String>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_apply: Vec::new(),
            stall_wait: Vec::new(),
        }
    }

    /// Fail `apply` for the named group
    pub fn with_failing_apply(mut self, group: &str) -> Self {
        self.fail_apply.push(group.to_string());
        self
    }

    /// Never complete `wait_ready` for the named group
    pub fn with_stalled_wait(mut self, group: &str) -> Self {
        self.stall_wait.push(group.to_string());
        self
    }

    /// Recorded calls, in order, as "apply <group>" / "wait <group>"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

// Tests share one runtime through an `Arc`; the library's delegating
// `DeployRuntime for Arc<T>` impl lets the same instance go to the executor.
#[async_trait]
impl DeployRuntime for MockRuntime {
    async fn apply(&self, group: &DocumentGroup) -> Result<(), RuntimeError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("apply {}", group.path));
        if self.fail_apply.contains(&group.path) {
            return Err(RuntimeError::Api(format!(
                "apply of {} rejected",
                group.path
            )));
        }
        Ok(())
    }

    async fn wait_ready(&self, group: &DocumentGroup) -> Result<(), RuntimeError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("wait {}", group.path));
        if self.stall_wait.contains(&group.path) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(())
    }
}

/// Component importing one in-memory manifest into a group
pub fn import(group: &str, text: &str) -> Component {
    import_component(group, vec![ManifestSource::new("inline", text)])
}

/// Component appending its name to a shared trace when its action runs
pub fn tracing_component(name: &str, step: Step, trace: Arc<Mutex<Vec<String>>>) -> Component {
    let label = name.to_string();
    Component::named(name).with_action(step, move |_ctx| {
        trace.lock().unwrap().push(label.clone());
        Ok(())
    })
}

/// Label a plan node the way `ProvisionerNode` displays
pub fn node_label(kind: ProvisionKind, group: &str) -> String {
    match kind {
        ProvisionKind::Apply => format!("apply({group})"),
        ProvisionKind::Wait => format!("wait({group})"),
    }
}

/// Assert one labeled plan node sorts before another
pub fn assert_plan_order(plan: &DeployPlan, before: &str, after: &str) {
    let labels: Vec<String> = plan
        .nodes
        .iter()
        .map(|n| node_label(n.kind, &n.group))
        .collect();
    let before_pos = labels
        .iter()
        .position(|l| l == before)
        .unwrap_or_else(|| panic!("node '{before}' not in plan: {labels:?}"));
    let after_pos = labels
        .iter()
        .position(|l| l == after)
        .unwrap_or_else(|| panic!("node '{after}' not in plan: {labels:?}"));
    assert!(
        before_pos < after_pos,
        "expected '{before}' before '{after}' in {labels:?}"
    );
}

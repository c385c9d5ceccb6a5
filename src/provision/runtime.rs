//! Deployment runtime - executes a resolved plan against a cluster
//!
//! The build pipeline is synchronous; deployment is not. Independent
//! branches of the plan's DAG run concurrently, a wait node blocks only its
//! own dependents, and a failure or timeout cancels not-yet-started
//! transitive dependents without touching already-running independent
//! branches.

use crate::core::{BuildContext, BuildError, DocumentGroup};
use crate::provision::graph::{DeployPlan, ProvisionKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

/// Error types for deployment runtime operations
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("API error: {0}")]
    Api(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Trait for the external apply/wait runtime
///
/// The engine hands over one document group at a time; the runtime talks to
/// the actual cluster.
#[async_trait]
pub trait DeployRuntime: Send + Sync {
    /// Apply the group's documents to the cluster
    async fn apply(&self, group: &DocumentGroup) -> Result<(), RuntimeError>;

    /// Block until the group's applied resources report ready
    async fn wait_ready(&self, group: &DocumentGroup) -> Result<(), RuntimeError>;
}

// Shared runtimes delegate, so callers can hold on to an `Arc` they also
// hand to the executor.
#[async_trait]
impl<T: DeployRuntime + ?Sized> DeployRuntime for Arc<T> {
    async fn apply(&self, group: &DocumentGroup) -> Result<(), RuntimeError> {
        (**self).apply(group).await
    }

    async fn wait_ready(&self, group: &DocumentGroup) -> Result<(), RuntimeError> {
        (**self).wait_ready(group).await
    }
}

/// Provisioning lifecycle of a document group's plan node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisionState {
    /// No constraints declared yet
    Unprovisioned,
    /// Ordering constraints declared, not yet sorted
    DependenciesDeclared,
    /// Position assigned by topological sort
    Ordered,
    /// Apply finished successfully
    Applied,
    /// Wait finished successfully
    Waited,
    /// Apply or wait failed, or the wait timed out
    Failed,
}

/// Outcome of one plan node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeReport {
    pub group: String,
    pub kind: ProvisionKind,
    pub state: ProvisionState,
    /// Failure or cancellation detail; cancelled nodes stay `Ordered`
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Outcome of a full plan execution, one entry per node in plan order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployReport {
    pub nodes: Vec<NodeReport>,
}

impl DeployReport {
    /// Whether every node finished successfully
    pub fn is_success(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| matches!(n.state, ProvisionState::Applied | ProvisionState::Waited))
    }

    /// Nodes that failed outright
    pub fn failed(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes
            .iter()
            .filter(|n| n.state == ProvisionState::Failed)
    }

    /// Nodes that never ran because an upstream dependency failed
    pub fn cancelled(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes
            .iter()
            .filter(|n| n.state == ProvisionState::Ordered && n.error.is_some())
    }

    /// One-line summary for logs and CLI output
    pub fn summary(&self) -> String {
        let ok = self
            .nodes
            .iter()
            .filter(|n| matches!(n.state, ProvisionState::Applied | ProvisionState::Waited))
            .count();
        format!(
            "{}/{} nodes succeeded, {} failed, {} cancelled",
            ok,
            self.nodes.len(),
            self.failed().count(),
            self.cancelled().count()
        )
    }
}

/// Options for plan execution
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Deadline applied to each wait node individually
    pub wait_timeout: Duration,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeStatus {
    Pending,
    Running,
    Done,
    Failed,
    Cancelled,
}

/// Executes a deployment plan against a [`DeployRuntime`]
pub struct DeployExecutor<R> {
    runtime: Arc<R>,
    options: DeployOptions,
}

impl<R: DeployRuntime + 'static> DeployExecutor<R> {
    pub fn new(runtime: R, options: DeployOptions) -> Self {
        Self {
            runtime: Arc::new(runtime),
            options,
        }
    }

    /// Execute every plan node, honoring the DAG's ordering
    ///
    /// Returns a per-node report; partial success is reported, not raised.
    pub async fn execute(&self, ctx: &BuildContext, plan: &DeployPlan) -> DeployReport {
        let n = plan.nodes.len();
        info!(nodes = n, "starting deployment");

        let groups: HashMap<String, DocumentGroup> = ctx
            .groups()
            .iter()
            .map(|g| (g.path.clone(), g.clone()))
            .collect();

        let mut status = vec![NodeStatus::Pending; n];
        let mut reports: Vec<NodeReport> = plan
            .nodes
            .iter()
            .map(|node| NodeReport {
                group: node.group.clone(),
                kind: node.kind,
                state: ProvisionState::Ordered,
                error: None,
                started_at: None,
                finished_at: None,
            })
            .collect();

        let mut remaining = n;
        let mut tasks: JoinSet<(usize, Result<(), String>, bool)> = JoinSet::new();

        while remaining > 0 {
            // Propagate cancellation to dependents of failed nodes before
            // scheduling anything new.
            loop {
                let mut progressed = false;
                for i in 0..n {
                    if status[i] != NodeStatus::Pending {
                        continue;
                    }
                    let blocked = plan.nodes[i].deps.iter().any(|&d| {
                        matches!(status[d], NodeStatus::Failed | NodeStatus::Cancelled)
                    });
                    if blocked {
                        status[i] = NodeStatus::Cancelled;
                        reports[i].error =
                            Some("cancelled: upstream dependency failed".to_string());
                        remaining -= 1;
                        progressed = true;
                        warn!(node = %reports[i].group, "node cancelled");
                    }
                }
                if !progressed {
                    break;
                }
            }
            if remaining == 0 {
                break;
            }

            // Schedule every node whose dependencies are all done.
            for i in 0..n {
                if status[i] != NodeStatus::Pending {
                    continue;
                }
                let ready = plan.nodes[i]
                    .deps
                    .iter()
                    .all(|&d| status[d] == NodeStatus::Done);
                if !ready {
                    continue;
                }

                let node = &plan.nodes[i];
                let Some(group) = groups.get(&node.group).cloned() else {
                    status[i] = NodeStatus::Failed;
                    reports[i].state = ProvisionState::Failed;
                    reports[i].error =
                        Some(BuildError::UnknownGroup(node.group.clone()).to_string());
                    remaining -= 1;
                    continue;
                };

                status[i] = NodeStatus::Running;
                reports[i].started_at = Some(Utc::now());
                debug!(node = %reports[i].group, kind = ?node.kind, "node started");

                let runtime = self.runtime.clone();
                let kind = node.kind;
                let wait_timeout = self.options.wait_timeout;
                let group_path = node.group.clone();
                tasks.spawn(async move {
                    match kind {
                        ProvisionKind::Apply => {
                            let result = runtime.apply(&group).await;
                            (i, result.map_err(|e| e.to_string()), false)
                        }
                        ProvisionKind::Wait => {
                            match timeout(wait_timeout, runtime.wait_ready(&group)).await {
                                Ok(result) => (i, result.map_err(|e| e.to_string()), false),
                                Err(_) => {
                                    let err = BuildError::WaitTimeout {
                                        group: group_path,
                                        timeout_secs: wait_timeout.as_secs(),
                                    };
                                    (i, Err(err.to_string()), true)
                                }
                            }
                        }
                    }
                });
            }

            let Some(joined) = tasks.join_next().await else {
                // Nothing running and nothing cancellable: the plan's
                // topological order guarantees this only happens when done.
                break;
            };
            match joined {
                Ok((i, Ok(()), _)) => {
                    status[i] = NodeStatus::Done;
                    reports[i].state = match plan.nodes[i].kind {
                        ProvisionKind::Apply => ProvisionState::Applied,
                        ProvisionKind::Wait => ProvisionState::Waited,
                    };
                    reports[i].finished_at = Some(Utc::now());
                    remaining -= 1;
                    debug!(node = %reports[i].group, "node succeeded");
                }
                Ok((i, Err(error), timed_out)) => {
                    status[i] = NodeStatus::Failed;
                    reports[i].state = ProvisionState::Failed;
                    reports[i].finished_at = Some(Utc::now());
                    remaining -= 1;
                    if timed_out {
                        warn!(node = %reports[i].group, %error, "wait timed out");
                    } else {
                        warn!(node = %reports[i].group, %error, "node failed");
                    }
                    reports[i].error = Some(error);
                }
                Err(join_error) => {
                    warn!(%join_error, "deployment task aborted unexpectedly");
                }
            }
        }

        let report = DeployReport { nodes: reports };
        info!("deployment finished: {}", report.summary());
        report
    }
}

//! Provisioning - dependency graph and deployment execution
//!
//! Build-time: components declare ordering edges between per-group apply
//! and wait nodes, resolved into a topologically sorted plan. Deploy-time:
//! the plan is executed concurrently against an external runtime.

pub mod graph;
pub mod infer;
pub mod runtime;

pub use graph::{DeployPlan, NodeId, PlanNode, ProvisionKind, ProvisionerGraph, ProvisionerNode};
pub use infer::default_dependency_component;
pub use runtime::{
    DeployExecutor, DeployOptions, DeployReport, DeployRuntime, NodeReport, ProvisionState,
    RuntimeError,
};

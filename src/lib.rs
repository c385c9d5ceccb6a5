//! kubeforge - staged Kubernetes manifest builder
//!
//! Components contribute actions to numbered build steps; the builder runs
//! them in order over a shared context holding document groups, resource
//! metadata and a provisioner dependency graph. The resolved graph can be
//! deployed through any [`provision::DeployRuntime`].

pub mod cli;
pub mod components;
pub mod core;
pub mod provision;
pub mod tree;

// Re-export commonly used types
pub use core::{
    Action, BuildContext, BuildError, Builder, BundleConfig, Component, Document, DocumentGroup,
    GroupConfig, KubernetesResourceInfo, Step,
};
pub use provision::{
    DeployExecutor, DeployOptions, DeployPlan, DeployReport, DeployRuntime, ProvisionKind,
    ProvisionState, ProvisionerGraph, RuntimeError,
};
pub use tree::{Mapping, Node, Scalar, ScalarStyle, Sequence};

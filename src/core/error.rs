//! Build error taxonomy

use crate::tree::NodeKind;
use thiserror::Error;

/// Errors surfaced by the build pipeline
///
/// Shape, path and cycle errors are structural and always fatal to the
/// build. Component failures are fatal but attributable to a specific
/// component and step. Wait timeouts are runtime-phase errors reported per
/// dependency-graph node.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A tree-model ensure call found a node of the wrong kind at a key
    #[error("key '{key}' holds a {found} where a {expected} was required")]
    ShapeMismatch {
        key: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// Two documents in one group resolve to the same output path
    #[error("duplicate document path '{path}' in group '{group}'")]
    DuplicatePath { group: String, path: String },

    /// The provisioner edge set is not a DAG
    #[error("provisioner dependency cycle: {}", nodes.join(" -> "))]
    CycleDetected { nodes: Vec<String> },

    /// An action callback failed; the build aborts at that step
    #[error("component '{component}' failed at step {step}: {source}")]
    ComponentFailure {
        component: String,
        step: String,
        #[source]
        source: anyhow::Error,
    },

    /// A live wait exceeded its deadline
    #[error("timed out after {timeout_secs}s waiting for group '{group}'")]
    WaitTimeout { group: String, timeout_secs: u64 },

    /// A provisioner node references a group missing from the context
    #[error("unknown document group '{0}'")]
    UnknownGroup(String),

    /// Malformed YAML input
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Well-formed YAML the tree model cannot represent
    #[error("unsupported YAML structure: {0}")]
    UnsupportedYaml(String),
}

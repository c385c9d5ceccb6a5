//! Provisioner dependency graph
//!
//! Each document group participates in deployment through apply and wait
//! nodes. Components declare directed ordering edges between nodes; at the
//! end of a build the edge set must form a DAG, which is topologically
//! sorted into the deployment plan.

use crate::core::error::BuildError;
use crate::provision::runtime::ProvisionState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// The operation a provisioner node performs against the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionKind {
    /// Apply the group's documents
    Apply,
    /// Block dependents until the group's resources report ready
    Wait,
}

/// Handle to a node in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// An apply or wait operation attached to a document group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionerNode {
    pub group: String,
    pub kind: ProvisionKind,
}

impl fmt::Display for ProvisionerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProvisionKind::Apply => write!(f, "apply({})", self.group),
            ProvisionKind::Wait => write!(f, "wait({})", self.group),
        }
    }
}

/// One entry of a resolved deployment plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNode {
    pub group: String,
    pub kind: ProvisionKind,
    /// Indices into the plan of the nodes this one depends on
    pub deps: Vec<usize>,
}

/// A dependency-ordered deployment plan
///
/// Nodes appear in a valid topological order; `deps` preserve the DAG
/// structure so independent branches can execute concurrently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployPlan {
    pub nodes: Vec<PlanNode>,
}

impl DeployPlan {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The set of provisioner nodes and ordering edges declared during a build
#[derive(Debug, Clone, Default)]
pub struct ProvisionerGraph {
    nodes: Vec<ProvisionerNode>,
    edges: BTreeSet<(usize, usize)>,
}

impl ProvisionerGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// The nodes in registration order
    pub fn nodes(&self) -> &[ProvisionerNode] {
        &self.nodes
    }

    /// Find or create the node for a group and kind
    pub fn node(&mut self, group: &str, kind: ProvisionKind) -> NodeId {
        if let Some(i) = self
            .nodes
            .iter()
            .position(|n| n.group == group && n.kind == kind)
        {
            return NodeId(i);
        }
        self.nodes.push(ProvisionerNode {
            group: group.to_string(),
            kind,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Find or create the apply node for a group
    pub fn apply(&mut self, group: &str) -> NodeId {
        self.node(group, ProvisionKind::Apply)
    }

    /// Find or create the wait node for a group
    ///
    /// The wait is ordered after the group's own apply.
    pub fn wait(&mut self, group: &str) -> NodeId {
        let apply = self.apply(group);
        let wait = self.node(group, ProvisionKind::Wait);
        self.run_before(apply, wait);
        wait
    }

    /// Order `a` before `b`
    pub fn run_before(&mut self, a: NodeId, b: NodeId) {
        self.edges.insert((a.0, b.0));
    }

    /// Order `a` after `b`; the symmetric inverse of [`run_before`]
    ///
    /// [`run_before`]: ProvisionerGraph::run_before
    pub fn run_after(&mut self, a: NodeId, b: NodeId) {
        self.run_before(b, a);
    }

    /// Order one group's apply before another group's apply
    pub fn group_before(&mut self, before: &str, after: &str) {
        let a = self.apply(before);
        let b = self.apply(after);
        self.run_before(a, b);
    }

    /// Whether the edge `a -> b` exists
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains(&(a.0, b.0))
    }

    /// Provisioning state of a group before the graph is resolved
    ///
    /// A group nothing has declared constraints for is `Unprovisioned`;
    /// once it owns a node it is `DependenciesDeclared`. Later states are
    /// assigned by resolution and execution.
    pub fn state_of(&self, group: &str) -> ProvisionState {
        if self.nodes.iter().any(|n| n.group == group) {
            ProvisionState::DependenciesDeclared
        } else {
            ProvisionState::Unprovisioned
        }
    }

    /// Whether any edge exists from a node of `before` to a node of `after`
    pub fn has_group_edge(&self, before: &str, after: &str) -> bool {
        self.edges.iter().any(|&(from, to)| {
            self.nodes[from].group == before && self.nodes[to].group == after
        })
    }

    /// Topologically sort the nodes into a deployment plan
    ///
    /// Ties break by node registration order, so resolution is
    /// deterministic. A cycle fails the build with the cycle's members.
    pub fn resolve(&self) -> Result<DeployPlan, BuildError> {
        let mut indegree = vec![0usize; self.nodes.len()];
        for &(_, to) in &self.edges {
            indegree[to] += 1;
        }

        let mut ready: BTreeSet<usize> = indegree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        let mut position = HashMap::new();
        while let Some(&next) = ready.iter().next() {
            ready.remove(&next);
            position.insert(next, order.len());
            order.push(next);
            for &(from, to) in &self.edges {
                if from == next {
                    indegree[to] -= 1;
                    if indegree[to] == 0 {
                        ready.insert(to);
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let remaining: HashSet<usize> = (0..self.nodes.len())
                .filter(|i| !position.contains_key(i))
                .collect();
            let cycle = self.find_cycle(&remaining);
            return Err(BuildError::CycleDetected {
                nodes: cycle.iter().map(|&i| self.nodes[i].to_string()).collect(),
            });
        }

        let nodes = order
            .iter()
            .map(|&i| PlanNode {
                group: self.nodes[i].group.clone(),
                kind: self.nodes[i].kind,
                deps: self
                    .edges
                    .iter()
                    .filter(|&&(_, to)| to == i)
                    .map(|&(from, _)| position[&from])
                    .collect(),
            })
            .collect();

        Ok(DeployPlan { nodes })
    }

    // Every node left over from Kahn's algorithm has a predecessor among
    // the leftovers, so walking predecessors must revisit a node; the
    // repeated segment is a simple cycle.
    fn find_cycle(&self, remaining: &HashSet<usize>) -> Vec<usize> {
        let start = match remaining.iter().min() {
            Some(&i) => i,
            None => return Vec::new(),
        };

        let mut path = vec![start];
        loop {
            let current = *path.last().unwrap_or_else(|| unreachable!());
            let predecessor = self
                .edges
                .iter()
                .filter(|&&(from, to)| to == current && remaining.contains(&from))
                .map(|&(from, _)| from)
                .min();
            let Some(predecessor) = predecessor else {
                return path;
            };
            if let Some(first) = path.iter().position(|&n| n == predecessor) {
                // path[first..] walked backwards is the cycle; repeat the
                // entry node at both ends for display
                let mut cycle: Vec<usize> = path[first..].to_vec();
                cycle.reverse();
                cycle.insert(0, predecessor);
                return cycle;
            }
            path.push(predecessor);
        }
    }
}

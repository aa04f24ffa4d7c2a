//! The mutation plan: a dependency graph of primitive writes.
//!
//! Dependencies are never stored separately. A node depends on every node
//! whose column it reads through a [`Binding::Pending`], so the graph cannot
//! drift from the values that actually flow between statements.

use crate::{MutationError, MutationResult, NestedPath};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tether_core::Value;

/// Identifier of a node within one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanNodeId(pub usize);

impl fmt::Display for PlanNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// A column value, known now or produced by another node.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Literal(Value),
    /// The `column` of the row returned by `node`.
    Pending { node: PlanNodeId, column: String },
}

impl Binding {
    pub fn pending(node: PlanNodeId, column: impl Into<String>) -> Self {
        Self::Pending {
            node,
            column: column.into(),
        }
    }

    /// The producing node, if the value is not yet known.
    pub fn producer(&self) -> Option<PlanNodeId> {
        match self {
            Binding::Literal(_) => None,
            Binding::Pending { node, .. } => Some(*node),
        }
    }
}

/// Ordered `(column, binding)` pairs.
pub type Bindings = Vec<(String, Binding)>;

/// A primitive operation against one table.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOperation {
    Insert { values: Bindings },
    Update { assignments: Bindings, predicate: Bindings },
    Delete { predicate: Bindings },
    /// Read a row by unique key; used to resolve and verify connect targets.
    Lookup { predicate: Bindings },
}

impl PlanOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            PlanOperation::Insert { .. } => "insert",
            PlanOperation::Update { .. } => "update",
            PlanOperation::Delete { .. } => "delete",
            PlanOperation::Lookup { .. } => "lookup",
        }
    }

    /// Every binding the operation reads, written columns first.
    pub fn bindings(&self) -> impl Iterator<Item = &(String, Binding)> {
        let (written, predicate) = match self {
            PlanOperation::Insert { values } => (Some(values), None),
            PlanOperation::Update {
                assignments,
                predicate,
            } => (Some(assignments), Some(predicate)),
            PlanOperation::Delete { predicate } | PlanOperation::Lookup { predicate } => (None, Some(predicate)),
        };
        written.into_iter().flatten().chain(predicate.into_iter().flatten())
    }

    /// Columns this operation writes.
    fn written_mut(&mut self) -> Option<&mut Bindings> {
        match self {
            PlanOperation::Insert { values } => Some(values),
            PlanOperation::Update { assignments, .. } => Some(assignments),
            PlanOperation::Delete { .. } | PlanOperation::Lookup { .. } => None,
        }
    }
}

/// Where a node sits relative to the node that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Root,
    /// Produces a key the parent stores; runs before the parent.
    Forward,
    /// Consumes the parent's key; runs after the parent.
    Reverse,
}

/// One primitive write (or key lookup) within a request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    pub id: PlanNodeId,
    pub table: String,
    pub operation: PlanOperation,
    /// Input location the node was built from.
    pub path: NestedPath,
    /// Columns to return: read by dependents or requested by the caller.
    pub returning: BTreeSet<String>,
    pub role: NodeRole,
}

impl PlanNode {
    /// Nodes whose returned columns this node reads.
    pub fn producers(&self) -> BTreeSet<PlanNodeId> {
        self.operation.bindings().filter_map(|(_, b)| b.producer()).collect()
    }

    /// Whether absence of a matching row is an error.
    pub fn expects_row(&self) -> bool {
        !matches!(self.operation, PlanOperation::Insert { .. })
    }
}

/// Plan of one request. Owned by that request and discarded after it completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationPlan {
    nodes: Vec<PlanNode>,
}

impl MutationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; bindings in `operation` that are pending mark their producers' columns as returned.
    pub fn add_node(
        &mut self,
        table: impl Into<String>,
        operation: PlanOperation,
        path: NestedPath,
        role: NodeRole,
    ) -> PlanNodeId {
        let id = PlanNodeId(self.nodes.len());
        let pending: Vec<(PlanNodeId, String)> = operation
            .bindings()
            .filter_map(|(_, b)| match b {
                Binding::Pending { node, column } => Some((*node, column.clone())),
                Binding::Literal(_) => None,
            })
            .collect();

        self.nodes.push(PlanNode {
            id,
            table: table.into(),
            operation,
            path,
            returning: BTreeSet::new(),
            role,
        });

        for (producer, column) in pending {
            self.require(producer, column);
        }
        id
    }

    /// Bind a written column of `node`.
    ///
    /// Binding the same column twice is a validation error: it means two parts
    /// of the input disagree about one value.
    pub fn bind(
        &mut self,
        node: PlanNodeId,
        column: impl Into<String>,
        binding: Binding,
        path: &NestedPath,
    ) -> MutationResult<()> {
        let column = column.into();
        let producer = match &binding {
            Binding::Pending { node, column } => Some((*node, column.clone())),
            Binding::Literal(_) => None,
        };

        let target = self
            .nodes
            .get_mut(node.0)
            .ok_or_else(|| MutationError::validation(path, format!("Unknown plan node {}", node)))?;
        let written = target
            .operation
            .written_mut()
            .ok_or_else(|| MutationError::validation(path, format!("{} writes no columns", node)))?;

        if written.iter().any(|(c, _)| *c == column) {
            return Err(MutationError::validation(
                path,
                format!("Column {} of {} is supplied more than once", column, target.table),
            ));
        }
        written.push((column, binding));

        if let Some((producer, produced)) = producer {
            self.require(producer, produced);
        }
        Ok(())
    }

    /// Ask `node` to return `column`.
    pub fn require(&mut self, node: PlanNodeId, column: impl Into<String>) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.returning.insert(column.into());
        }
    }

    // ==================== Lookups ====================

    pub fn node(&self, id: PlanNodeId) -> Option<&PlanNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node, always the first one added.
    pub fn root(&self) -> Option<&PlanNode> {
        self.nodes.iter().find(|n| n.role == NodeRole::Root)
    }

    /// Producer to consumer edges, sorted.
    pub fn edges(&self) -> Vec<(PlanNodeId, PlanNodeId)> {
        let mut edges: Vec<(PlanNodeId, PlanNodeId)> = self
            .nodes
            .iter()
            .flat_map(|n| n.producers().into_iter().map(move |p| (p, n.id)))
            .collect();
        edges.sort();
        edges
    }

    // ==================== Ordering ====================

    /// Topological order of the nodes (Kahn's algorithm, lowest id first among ready nodes).
    ///
    /// Every node comes after the nodes it reads from: forward children before
    /// their parent, reverse children after it.
    pub fn ordered(&self) -> MutationResult<Vec<PlanNodeId>> {
        let mut indegree: BTreeMap<PlanNodeId, usize> = BTreeMap::new();
        let mut consumers: BTreeMap<PlanNodeId, Vec<PlanNodeId>> = BTreeMap::new();

        for node in &self.nodes {
            let producers = node.producers();
            indegree.insert(node.id, producers.len());
            for producer in producers {
                consumers.entry(producer).or_default().push(node.id);
            }
        }

        let mut ready: BTreeSet<PlanNodeId> = indegree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(id) = ready.pop_first() {
            order.push(id);
            for consumer in consumers.get(&id).into_iter().flatten() {
                if let Some(d) = indegree.get_mut(consumer) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(*consumer);
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck = self
                .nodes
                .iter()
                .find(|n| !order.contains(&n.id))
                .map(|n| n.path.clone())
                .unwrap_or_default();
            return Err(MutationError::validation(&stuck, "Nested input forms a dependency cycle"));
        }

        Ok(order)
    }
}

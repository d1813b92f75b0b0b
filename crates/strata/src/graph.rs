//! Graph model adapter.
//!
//! Converts the concept/connection lists supplied by the data service into the
//! engine's internal [`Graph`]: a directed graph with forward and reverse
//! adjacency whose node and edge indices follow input order. Input order is the
//! deterministic tie-break used throughout layout.
//!
//! Building is pure and either succeeds completely or fails with the first
//! [`GraphError`] found; nothing is dropped or repaired.

use indexmap::{IndexMap, map::Entry};
use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use strata_core::{
    identifier::Id,
    model::{ConceptNode, Connection},
};

use crate::{GraphError, StrataError};

/// A full snapshot of the graph model as exchanged with the data service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<ConceptNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<ConceptNode>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    /// Parses a snapshot from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Snapshot`] if the document is malformed or uses
    /// an unknown node or connection type.
    pub fn from_json(source: &str) -> Result<Self, StrataError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Builds the internal graph for this snapshot.
    ///
    /// # Errors
    ///
    /// See [`build_graph`].
    pub fn build(&self) -> Result<Graph, GraphError> {
        build_graph(&self.nodes, &self.connections)
    }
}

/// The engine's internal representation of one graph snapshot.
///
/// Node indices and edge indices are assigned in input order and never
/// reused within a snapshot.
#[derive(Debug, Clone)]
pub struct Graph {
    graph: DiGraph<ConceptNode, Connection>,
    node_ids: IndexMap<Id, NodeIndex>,
    edge_ids: IndexMap<Id, EdgeIndex>,
}

/// Builds a [`Graph`] from node and connection lists.
///
/// # Errors
///
/// - [`GraphError::DuplicateNode`] if two nodes share an id.
/// - [`GraphError::DuplicateConnection`] if two connections share an id.
/// - [`GraphError::DanglingEdge`] if a connection endpoint is not a node of
///   the snapshot. The source endpoint is checked first.
///
/// # Examples
///
/// ```
/// use strata::{
///     build_graph,
///     identifier::Id,
///     model::{ConceptKind, ConceptNode, Connection, ConnectionKind},
/// };
///
/// let nodes = vec![
///     ConceptNode::new("vars", "Variables", ConceptKind::Concept),
///     ConceptNode::new("loops", "Loops", ConceptKind::Concept),
/// ];
/// let connections = vec![Connection::new("c1", "vars", "loops", ConnectionKind::Prerequisite)];
///
/// let graph = build_graph(&nodes, &connections).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.successors(Id::new("vars")), vec![Id::new("loops")]);
/// ```
pub fn build_graph(nodes: &[ConceptNode], connections: &[Connection]) -> Result<Graph, GraphError> {
    debug!(nodes = nodes.len(), connections = connections.len(); "Building graph");

    let mut graph = DiGraph::with_capacity(nodes.len(), connections.len());
    let mut node_ids = IndexMap::with_capacity(nodes.len());

    for node in nodes {
        match node_ids.entry(node.id()) {
            Entry::Occupied(_) => return Err(GraphError::DuplicateNode { id: node.id() }),
            Entry::Vacant(entry) => {
                entry.insert(graph.add_node(node.clone()));
            }
        }
    }

    let mut edge_ids = IndexMap::with_capacity(connections.len());
    for connection in connections {
        let endpoint = |id: Id| {
            node_ids
                .get(&id)
                .copied()
                .ok_or(GraphError::DanglingEdge {
                    edge: connection.id(),
                    missing: id,
                })
        };
        let source = endpoint(connection.from())?;
        let target = endpoint(connection.to())?;

        match edge_ids.entry(connection.id()) {
            Entry::Occupied(_) => {
                return Err(GraphError::DuplicateConnection {
                    id: connection.id(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(graph.add_edge(source, target, connection.clone()));
            }
        }
        trace!(edge:% = connection.id(), from:% = connection.from(), to:% = connection.to(); "Added connection");
    }

    Ok(Graph {
        graph,
        node_ids,
        edge_ids,
    })
}

impl Graph {
    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of connections.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns an iterator over all nodes in input order.
    pub fn nodes(&self) -> impl Iterator<Item = &ConceptNode> {
        self.graph.node_weights()
    }

    /// Returns an iterator over all connections in input order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edge_weights()
    }

    /// Returns an iterator over node ids in input order.
    pub fn node_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.node_ids.keys().copied()
    }

    /// Returns an iterator over `(connection id, from, to)` in input order.
    pub fn edge_endpoints(&self) -> impl Iterator<Item = (Id, Id, Id)> + '_ {
        self.connections()
            .map(|connection| (connection.id(), connection.from(), connection.to()))
    }

    /// Returns the node with the given id, if present.
    pub fn node(&self, id: Id) -> Option<&ConceptNode> {
        self.node_ids
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Returns the connection with the given id, if present.
    pub fn connection(&self, id: Id) -> Option<&Connection> {
        self.edge_ids
            .get(&id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    /// Checks if a node with the given id exists.
    pub fn contains_node(&self, id: Id) -> bool {
        self.node_ids.contains_key(&id)
    }

    /// Checks if a connection with the given id exists.
    pub fn contains_connection(&self, id: Id) -> bool {
        self.edge_ids.contains_key(&id)
    }

    /// Returns the targets of the node's outgoing connections, in input order.
    ///
    /// A target appears once per connection. Unknown ids yield an empty list.
    pub fn successors(&self, id: Id) -> Vec<Id> {
        self.adjacent(id, Direction::Outgoing)
    }

    /// Returns the sources of the node's incoming connections, in input order.
    pub fn predecessors(&self, id: Id) -> Vec<Id> {
        self.adjacent(id, Direction::Incoming)
    }

    /// Returns nodes without incoming connections, in input order.
    pub fn roots(&self) -> impl Iterator<Item = &ConceptNode> {
        self.graph.node_indices().filter_map(|idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_none()
                .then(|| &self.graph[idx])
        })
    }

    /// Returns the underlying directed graph.
    pub(crate) fn inner(&self) -> &DiGraph<ConceptNode, Connection> {
        &self.graph
    }

    fn adjacent(&self, id: Id, direction: Direction) -> Vec<Id> {
        let Some(&idx) = self.node_ids.get(&id) else {
            return Vec::new();
        };

        // petgraph walks adjacency newest-first; restore input order.
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| {
                let connection = edge.weight();
                match direction {
                    Direction::Outgoing => connection.to(),
                    Direction::Incoming => connection.from(),
                }
            })
            .collect()
    }
}

//! Cycle handling for ranking.
//!
//! Concept graphs may contain cycles (mutually "related" concepts). Ranking
//! needs a DAG, so every DFS back edge is reversed for ranking purposes only;
//! the output edge keeps its original direction. Self-loops never constrain a
//! rank and are left out of the ranking graph entirely.

use std::collections::HashSet;

use log::trace;
use petgraph::{
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::{DfsEvent, depth_first_search},
};

/// One ranking constraint: `upper` must be ranked strictly before `lower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RankingEdge {
    pub(super) upper: usize,
    pub(super) lower: usize,
}

/// The acyclic view of a graph used by ranking and ordering.
#[derive(Debug)]
pub(super) struct RankingEdges {
    edges: Vec<RankingEdge>,
    reversed: HashSet<EdgeIndex>,
}

impl RankingEdges {
    /// Returns the ranking constraints, in input edge order.
    pub(super) fn edges(&self) -> &[RankingEdge] {
        &self.edges
    }

    /// Checks whether the given input edge was reversed for ranking.
    pub(super) fn is_reversed(&self, edge: EdgeIndex) -> bool {
        self.reversed.contains(&edge)
    }

    pub(super) fn reversed_count(&self) -> usize {
        self.reversed.len()
    }
}

/// Computes the ranking constraints of `graph`.
///
/// The DFS starts from every node in input order, so the set of reversed
/// edges depends only on the input.
pub(super) fn ranking_edges<N, E>(graph: &DiGraph<N, E>) -> RankingEdges {
    let mut back_edges: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    depth_first_search(graph, graph.node_indices(), |event| {
        if let DfsEvent::BackEdge(source, target) = event {
            back_edges.insert((source, target));
        }
    });

    let mut edges = Vec::with_capacity(graph.edge_count());
    let mut reversed = HashSet::new();
    for edge in graph.edge_indices() {
        let (source, target) = graph
            .edge_endpoints(edge)
            .expect("Edge index should exist");
        if source == target {
            continue;
        }

        // Parallel edges share endpoints, so they are classified together.
        if back_edges.contains(&(source, target)) {
            trace!(edge = edge.index(); "Reversing back edge for ranking");
            reversed.insert(edge);
            edges.push(RankingEdge {
                upper: target.index(),
                lower: source.index(),
            });
        } else {
            edges.push(RankingEdge {
                upper: source.index(),
                lower: target.index(),
            });
        }
    }

    RankingEdges { edges, reversed }
}

//! Longest-path rank assignment.
//!
//! Every node gets the length of the longest path reaching it from a source
//! of the ranking DAG. Sources get rank 0, and a prerequisite chain never
//! shares a rank with anything that transitively depends on it.

use log::trace;
use petgraph::{algo::toposort, graph::DiGraph};

use super::acyclic::RankingEdges;

/// Assigns a rank to each of the `node_count` nodes.
///
/// # Panics
///
/// Panics if `ranking` still contains a cycle. Cycle removal guarantees it
/// does not, so reaching the panic means the engine is broken.
pub(super) fn assign(node_count: usize, ranking: &RankingEdges) -> Vec<usize> {
    let mut dag: DiGraph<(), ()> = DiGraph::with_capacity(node_count, ranking.edges().len());
    for _ in 0..node_count {
        dag.add_node(());
    }
    dag.extend_with_edges(
        ranking
            .edges()
            .iter()
            .map(|edge| (edge.upper as u32, edge.lower as u32)),
    );

    let sorted = toposort(&dag, None).unwrap_or_else(|cycle| {
        panic!(
            "Ranking graph still has a cycle through node {} after back-edge reversal",
            cycle.node_id().index()
        )
    });

    let mut ranks = vec![0; node_count];
    for node in sorted {
        let rank = ranks[node.index()];
        for next in dag.neighbors(node) {
            let next_rank = &mut ranks[next.index()];
            *next_rank = (*next_rank).max(rank + 1);
        }
        trace!(node = node.index(), rank; "Ranked node");
    }
    ranks
}

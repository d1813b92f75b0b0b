//! Ordering within ranks.
//!
//! Starts from input order and runs a fixed number of barycenter sweeps,
//! alternating downward (keys from neighbors in the rank above) and upward
//! (keys from neighbors in the rank below). Edges spanning several ranks
//! never contribute to a key. Exact key ties fall back to input order. After every sweep the adjacent-rank crossings are counted and the
//! ordering with the fewest crossings seen so far is kept.

use log::{debug, trace};

use super::acyclic::RankingEdges;

/// Nodes grouped by rank, each rank listed in drawing order.
pub(super) type Layers = Vec<Vec<usize>>;

/// Orders the nodes of every rank.
///
/// `ranks[n]` is the rank of node `n`; node indices double as input order.
pub(super) fn order_layers(ranks: &[usize], ranking: &RankingEdges, passes: usize) -> Layers {
    let rank_count = ranks.iter().max().map_or(0, |max| max + 1);
    let mut layers: Layers = vec![Vec::new(); rank_count];
    for (node, &rank) in ranks.iter().enumerate() {
        layers[rank].push(node);
    }

    let mut upper_neighbors = vec![Vec::new(); ranks.len()];
    let mut lower_neighbors = vec![Vec::new(); ranks.len()];
    for edge in ranking.edges() {
        if ranks[edge.lower] != ranks[edge.upper] + 1 {
            continue;
        }
        upper_neighbors[edge.lower].push(edge.upper);
        lower_neighbors[edge.upper].push(edge.lower);
    }

    let mut positions = vec![0; ranks.len()];
    update_positions(&layers, &mut positions);

    let mut best = layers.clone();
    let mut best_crossings = count_crossings(&layers, ranks, ranking, &positions);
    debug!(crossings = best_crossings, passes; "Ordering ranks");

    for pass in 0..passes {
        if best_crossings == 0 {
            break;
        }

        if pass % 2 == 0 {
            for rank in 1..layers.len() {
                sweep(&mut layers[rank], &upper_neighbors, &mut positions);
            }
        } else {
            for rank in (0..layers.len().saturating_sub(1)).rev() {
                sweep(&mut layers[rank], &lower_neighbors, &mut positions);
            }
        }

        let crossings = count_crossings(&layers, ranks, ranking, &positions);
        trace!(pass, crossings; "Ordering pass complete");
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
        }
    }

    debug!(crossings = best_crossings; "Ordering complete");
    best
}

/// Reorders one rank by the barycenter of each node's neighbors.
fn sweep(layer: &mut [usize], neighbors: &[Vec<usize>], positions: &mut [usize]) {
    let mut keyed: Vec<(f64, usize)> = layer
        .iter()
        .map(|&node| {
            let adjacent = &neighbors[node];
            let key = if adjacent.is_empty() {
                positions[node] as f64
            } else {
                let sum: usize = adjacent.iter().map(|&n| positions[n]).sum();
                sum as f64 / adjacent.len() as f64
            };
            (key, node)
        })
        .collect();

    keyed.sort_by(|(key_a, node_a), (key_b, node_b)| {
        key_a.total_cmp(key_b).then(node_a.cmp(node_b))
    });

    for (order, (_, node)) in keyed.into_iter().enumerate() {
        layer[order] = node;
        positions[node] = order;
    }
}

fn update_positions(layers: &Layers, positions: &mut [usize]) {
    for layer in layers {
        for (order, &node) in layer.iter().enumerate() {
            positions[node] = order;
        }
    }
}

/// Counts crossings among edges joining adjacent ranks.
///
/// Edges spanning more than one rank are not counted.
fn count_crossings(
    layers: &Layers,
    ranks: &[usize],
    ranking: &RankingEdges,
    positions: &[usize],
) -> usize {
    let mut by_rank: Vec<Vec<(usize, usize)>> = vec![Vec::new(); layers.len()];
    for edge in ranking.edges() {
        let rank = ranks[edge.upper];
        if ranks[edge.lower] == rank + 1 {
            by_rank[rank].push((positions[edge.upper], positions[edge.lower]));
        }
    }

    by_rank
        .into_iter()
        .map(|mut pairs| {
            pairs.sort_unstable();
            let mut lower: Vec<usize> = pairs.into_iter().map(|(_, lower)| lower).collect();
            count_inversions(&mut lower)
        })
        .sum()
}

/// Counts pairs `i < j` with `values[i] > values[j]`, sorting `values`.
fn count_inversions(values: &mut [usize]) -> usize {
    if values.len() < 2 {
        return 0;
    }

    let mid = values.len() / 2;
    let mut inversions =
        count_inversions(&mut values[..mid]) + count_inversions(&mut values[mid..]);

    let mut merged = Vec::with_capacity(values.len());
    let (mut i, mut j) = (0, mid);
    while i < mid && j < values.len() {
        if values[i] <= values[j] {
            merged.push(values[i]);
            i += 1;
        } else {
            inversions += mid - i;
            merged.push(values[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&values[i..mid]);
    merged.extend_from_slice(&values[j..]);
    values.copy_from_slice(&merged);

    inversions
}

//! Property tests for the layered layout engine.
//!
//! Graphs are generated with arbitrary edges, so they include cycles,
//! self-loops and parallel connections.

use proptest::prelude::*;

use strata::{
    Graph, Orientation, build_graph,
    config::LayoutConfig,
    geometry::Size,
    identifier::Id,
    layout::{Engine, Layout},
    model::{ConceptKind, ConceptNode, Connection, ConnectionKind},
};

// ===================
// Strategies
// ===================

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (1usize..12)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..(n * 3))))
        .prop_map(|(n, edges)| {
            let nodes: Vec<_> = (0..n)
                .map(|i| ConceptNode::new(format!("n{i}").as_str(), "", ConceptKind::Concept))
                .collect();
            let connections: Vec<_> = edges
                .into_iter()
                .enumerate()
                .map(|(i, (from, to))| {
                    Connection::new(
                        format!("e{i}").as_str(),
                        format!("n{from}").as_str(),
                        format!("n{to}").as_str(),
                        ConnectionKind::Related,
                    )
                })
                .collect();
            build_graph(&nodes, &connections).expect("Generated graph should be valid")
        })
}

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::TopToBottom), Just(Orientation::LeftToRight)]
}

// ===================
// Property Test Functions
// ===================

/// Every edge not involved in cycle breaking points strictly down the ranks.
fn check_rank_monotonicity(graph: &Graph, layout: &Layout) -> Result<(), TestCaseError> {
    for (edge, from, to) in graph.edge_endpoints() {
        if from == to {
            continue;
        }
        let rank_from = layout.node(from).unwrap().rank();
        let rank_to = layout.node(to).unwrap().rank();
        if layout.edge(edge).unwrap().is_reversed() {
            prop_assert!(rank_from >= rank_to + 1, "reversed edge {edge} is not upward");
        } else {
            prop_assert!(rank_to >= rank_from + 1, "edge {edge} is not downward");
        }
    }
    Ok(())
}

/// Nodes sharing a rank have distinct orders and sit a full step apart.
fn check_no_overlap(layout: &Layout, config: &LayoutConfig) -> Result<(), TestCaseError> {
    let step = match layout.orientation() {
        Orientation::TopToBottom => config.node_size().width(),
        Orientation::LeftToRight => config.node_size().height(),
    } + config.node_gap();

    for (i, a) in layout.nodes().iter().enumerate() {
        for b in &layout.nodes()[i + 1..] {
            if a.rank() != b.rank() {
                continue;
            }
            prop_assert_ne!(a.order(), b.order());
            let separation = match layout.orientation() {
                Orientation::TopToBottom => (a.position().x() - b.position().x()).abs(),
                Orientation::LeftToRight => (a.position().y() - b.position().y()).abs(),
            };
            prop_assert!(separation >= step - 1e-3, "{} and {} overlap", a.id(), b.id());
        }
    }
    Ok(())
}

/// Bends never land inside a node.
fn check_bends_avoid_nodes(layout: &Layout) -> Result<(), TestCaseError> {
    for edge in layout.edges() {
        if edge.from() == edge.to() {
            continue;
        }
        prop_assert!(edge.points().len() <= 3);
        for bend in edge.bends() {
            let probe = bend.to_bounds(Size::new(1.0, 1.0));
            for node in layout.nodes() {
                prop_assert!(
                    !node.bounds().intersects(&probe),
                    "bend of {} is inside {}",
                    edge.id(),
                    node.id()
                );
            }
        }
    }
    Ok(())
}

/// Output follows input order and covers every node and connection.
fn check_input_order(graph: &Graph, layout: &Layout) -> Result<(), TestCaseError> {
    let node_ids: Vec<Id> = layout.nodes().iter().map(|node| node.id()).collect();
    let edge_ids: Vec<Id> = layout.edges().iter().map(|edge| edge.id()).collect();
    prop_assert_eq!(node_ids, graph.node_ids().collect::<Vec<_>>());
    prop_assert_eq!(
        edge_ids,
        graph.edge_endpoints().map(|(id, _, _)| id).collect::<Vec<_>>()
    );
    Ok(())
}

proptest! {
    #[test]
    fn layout_is_deterministic(graph in graph_strategy(), orientation in orientation_strategy()) {
        let engine = Engine::default();
        prop_assert_eq!(engine.layout(&graph, orientation), engine.layout(&graph, orientation));
    }

    #[test]
    fn ranks_are_monotonic(graph in graph_strategy()) {
        let layout = Engine::default().layout(&graph, Orientation::TopToBottom);
        check_rank_monotonicity(&graph, &layout)?;
    }

    #[test]
    fn same_rank_nodes_do_not_overlap(
        graph in graph_strategy(),
        orientation in orientation_strategy(),
    ) {
        let config = LayoutConfig::default();
        let layout = Engine::new(config.clone()).layout(&graph, orientation);
        check_no_overlap(&layout, &config)?;
    }

    #[test]
    fn bends_avoid_nodes(graph in graph_strategy(), orientation in orientation_strategy()) {
        let layout = Engine::default().layout(&graph, orientation);
        check_bends_avoid_nodes(&layout)?;
    }

    #[test]
    fn output_follows_input_order(graph in graph_strategy()) {
        let layout = Engine::default().layout(&graph, Orientation::LeftToRight);
        check_input_order(&graph, &layout)?;
    }
}

//! Lays out a small curriculum, drags one concept and prints the scene.
//!
//! Run with `RUST_LOG=debug` and a logger of your choice to see the engine's
//! structured logs.

use strata::{
    GraphView, StrataError,
    config::AppConfig,
    geometry::Point,
    identifier::Id,
    interaction::{InputEvent, PointerTarget},
    model::{ConceptKind, ConceptNode, Connection, ConnectionKind},
};

fn main() -> Result<(), StrataError> {
    let nodes = vec![
        ConceptNode::new("ownership", "Ownership", ConceptKind::Concept),
        ConceptNode::new("borrowing", "Borrowing", ConceptKind::Concept),
        ConceptNode::new("lifetimes", "Lifetimes", ConceptKind::Topic),
        ConceptNode::new("async", "Async Rust", ConceptKind::Course),
    ];
    let connections = vec![
        Connection::new("c1", "ownership", "borrowing", ConnectionKind::Prerequisite),
        Connection::new("c2", "borrowing", "lifetimes", ConnectionKind::Prerequisite),
        Connection::new("c3", "ownership", "async", ConnectionKind::BuildsOn),
        Connection::new("c4", "lifetimes", "async", ConnectionKind::Prerequisite),
    ];

    let mut view = GraphView::new(nodes, connections, &AppConfig::default())?;

    let async_id = Id::new("async");
    let start = view
        .interaction()
        .position_of(async_id)
        .unwrap_or_default();
    view.handle(InputEvent::PointerDown {
        target: PointerTarget::Node(async_id),
        position: start,
    })?;
    view.handle(InputEvent::PointerMove {
        position: start.add_point(Point::new(120.0, 0.0)),
    })?;

    println!("{}", serde_json::to_string_pretty(&view.scene())?);
    Ok(())
}

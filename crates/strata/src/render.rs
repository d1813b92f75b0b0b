//! Render binding.
//!
//! A one-way projection of graph, layout and interaction state into flat
//! primitives a host UI can draw without knowing anything about the engine.
//! Nothing here mutates state.

use serde::Serialize;

use strata_core::{
    geometry::{Point, Size},
    identifier::Id,
    model::{ConceptKind, ConnectionKind},
};

use crate::{
    graph::Graph,
    interaction::{InteractionManager, Mode, Viewport},
    layout::{Layout, LayoutEdge, Orientation},
};

/// A node as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: Id,
    pub title: String,
    pub kind: ConceptKind,
    /// Displayed center in graph space.
    pub position: Point,
    pub size: Size,
    pub selected: bool,
    pub dragging: bool,
    /// The node a connection is currently being drawn from.
    pub connect_source: bool,
}

/// A connection as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEdge {
    pub id: Id,
    pub kind: ConnectionKind,
    pub points: Vec<Point>,
    pub selected: bool,
}

/// The rubber-band edge shown while connecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectionPreview {
    pub from: Id,
    pub start: Point,
    pub cursor: Point,
}

/// Everything needed to draw one frame. Coordinates are in graph space; apply
/// `viewport` to reach the screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub preview: Option<ConnectionPreview>,
    pub viewport: Viewport,
}

/// Projects the current state into a [`Scene`].
///
/// Nodes and edges missing from `graph` are skipped.
pub fn project(graph: &Graph, layout: &Layout, interaction: &InteractionManager) -> Scene {
    let state = interaction.state();
    let (dragged, connect_from) = match *state.mode() {
        Mode::Dragging { node, .. } => (Some(node), None),
        Mode::Connecting { from, .. } => (None, Some(from)),
        Mode::Idle | Mode::PanningViewport { .. } => (None, None),
    };

    let nodes = layout
        .nodes()
        .iter()
        .filter_map(|layout_node| {
            let id = layout_node.id();
            let concept = graph.node(id)?;
            Some(RenderNode {
                id,
                title: concept.title().to_string(),
                kind: concept.kind(),
                position: interaction
                    .position_of(id)
                    .unwrap_or(layout_node.position()),
                size: layout_node.size(),
                selected: state.selected_node() == Some(id),
                dragging: dragged == Some(id),
                connect_source: connect_from == Some(id),
            })
        })
        .collect();

    let edges = layout
        .edges()
        .iter()
        .filter_map(|edge| {
            let connection = graph.connection(edge.id())?;
            Some(RenderEdge {
                id: edge.id(),
                kind: connection.kind(),
                points: displaced_points(edge, interaction),
                selected: state.selected_edge() == Some(edge.id()),
            })
        })
        .collect();

    let preview = match *state.mode() {
        Mode::Connecting { from, cursor } => {
            interaction
                .position_of(from)
                .zip(layout.node(from))
                .map(|(center, node)| ConnectionPreview {
                    from,
                    start: trailing_side(layout.orientation(), center, node.size()),
                    cursor,
                })
        }
        _ => None,
    };

    Scene {
        nodes,
        edges,
        preview,
        viewport: *state.viewport(),
    }
}

/// Follows moved endpoints. Bends are dropped once an endpoint moves, since
/// they no longer sit in a gap; a self-loop moves as a whole.
fn displaced_points(edge: &LayoutEdge, interaction: &InteractionManager) -> Vec<Point> {
    let from = interaction.displacement_of(edge.from());
    let to = interaction.displacement_of(edge.to());
    if from.is_none() && to.is_none() {
        return edge.points().to_vec();
    }

    if edge.from() == edge.to() {
        let offset = from.unwrap_or_default();
        return edge.points().iter().map(|p| p.add_point(offset)).collect();
    }

    vec![
        edge.start().add_point(from.unwrap_or_default()),
        edge.end().add_point(to.unwrap_or_default()),
    ]
}

fn trailing_side(orientation: Orientation, center: Point, size: Size) -> Point {
    orientation.point(
        orientation.flow_of(center) + orientation.flow_extent(size) / 2.0,
        orientation.cross_of(center),
    )
}

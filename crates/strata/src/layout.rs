//! Layered layout engine.
//!
//! A simplified Sugiyama pipeline over a [`Graph`]:
//!
//! 1. [`acyclic`] reverses DFS back edges so ranking sees a DAG.
//! 2. [`rank`] assigns longest-path ranks.
//! 3. [`order`] orders nodes within ranks with barycenter sweeps.
//! 4. [`position`] turns rank/order into coordinates.
//! 5. [`route`] produces edge polylines.
//!
//! The whole pass is deterministic: the same graph and orientation always
//! produce an identical [`Layout`]. Ties anywhere are broken by input order.

mod acyclic;
mod order;
mod position;
mod rank;
mod route;

use std::{collections::HashMap, fmt, str::FromStr};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use strata_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{config::LayoutConfig, graph::Graph};

/// Flow direction of the layered drawing.
///
/// The names match external configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Ranks stacked top to bottom; order runs along x.
    #[default]
    #[serde(rename = "tb")]
    TopToBottom,
    /// Ranks placed left to right; order runs along y.
    #[serde(rename = "lr")]
    LeftToRight,
}

impl Orientation {
    /// Builds a point from a flow-axis and a cross-axis coordinate.
    pub(crate) fn point(self, flow: f32, cross: f32) -> Point {
        match self {
            Self::TopToBottom => Point::new(cross, flow),
            Self::LeftToRight => Point::new(flow, cross),
        }
    }

    /// Returns the coordinate of `point` along the flow axis.
    pub(crate) fn flow_of(self, point: Point) -> f32 {
        match self {
            Self::TopToBottom => point.y(),
            Self::LeftToRight => point.x(),
        }
    }

    /// Returns the coordinate of `point` along the cross axis.
    pub(crate) fn cross_of(self, point: Point) -> f32 {
        match self {
            Self::TopToBottom => point.x(),
            Self::LeftToRight => point.y(),
        }
    }

    /// Returns the extent of `size` along the flow axis.
    pub(crate) fn flow_extent(self, size: Size) -> f32 {
        match self {
            Self::TopToBottom => size.height(),
            Self::LeftToRight => size.width(),
        }
    }

    /// Returns the extent of `size` along the cross axis.
    pub(crate) fn cross_extent(self, size: Size) -> f32 {
        match self {
            Self::TopToBottom => size.width(),
            Self::LeftToRight => size.height(),
        }
    }

    fn direction(self) -> EdgeDirection {
        match self {
            Self::TopToBottom => EdgeDirection::TopToBottom,
            Self::LeftToRight => EdgeDirection::LeftToRight,
        }
    }
}

impl FromStr for Orientation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tb" | "TB" => Ok(Self::TopToBottom),
            "lr" | "LR" => Ok(Self::LeftToRight),
            _ => Err("Unsupported orientation, expected `tb` or `lr`"),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopToBottom => write!(f, "tb"),
            Self::LeftToRight => write!(f, "lr"),
        }
    }
}

/// Resolved drawing direction of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    TopToBottom,
    LeftToRight,
}

/// A positioned concept node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    id: Id,
    rank: usize,
    order: usize,
    position: Point,
    size: Size,
}

impl LayoutNode {
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the layer index (longest-path distance from a source).
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the position index among nodes sharing the rank.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the node's center in graph space.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }
}

/// A routed connection.
///
/// `from`/`to` always report the connection's original direction, even when
/// the edge was reversed to break a cycle during ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    id: Id,
    from: Id,
    to: Id,
    points: Vec<Point>,
    direction: EdgeDirection,
    reversed: bool,
}

impl LayoutEdge {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    /// Returns the polyline: start point, bend points, end point.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the first point of the polyline.
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// Returns the last point of the polyline.
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Returns the points between start and end.
    pub fn bends(&self) -> &[Point] {
        &self.points[1..self.points.len() - 1]
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    /// Returns `true` if the edge was reversed for ranking to break a cycle.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }
}

/// Output of one layout pass.
///
/// Nodes and edges are listed in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    orientation: Orientation,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    #[serde(skip)]
    node_lookup: HashMap<Id, usize>,
    #[serde(skip)]
    edge_lookup: HashMap<Id, usize>,
}

impl Layout {
    fn new(orientation: Orientation, nodes: Vec<LayoutNode>, edges: Vec<LayoutEdge>) -> Self {
        let node_lookup = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect();
        let edge_lookup = edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| (edge.id, idx))
            .collect();
        Self {
            orientation,
            nodes,
            edges,
            node_lookup,
            edge_lookup,
        }
    }

    /// Creates a layout with no nodes.
    pub fn empty(orientation: Orientation) -> Self {
        Self::new(orientation, Vec::new(), Vec::new())
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn node(&self, id: Id) -> Option<&LayoutNode> {
        self.node_lookup.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn edge(&self, id: Id) -> Option<&LayoutEdge> {
        self.edge_lookup.get(&id).map(|&idx| &self.edges[idx])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the union of all node bounds, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(LayoutNode::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

/// The layered layout engine.
///
/// # Examples
///
/// ```
/// use strata::{build_graph, layout::{Engine, Orientation}, model::*};
///
/// let nodes = vec![
///     ConceptNode::new("a", "A", ConceptKind::Concept),
///     ConceptNode::new("b", "B", ConceptKind::Skill),
/// ];
/// let connections = vec![Connection::new("ab", "a", "b", ConnectionKind::Prerequisite)];
/// let graph = build_graph(&nodes, &connections).unwrap();
///
/// let layout = Engine::default().layout(&graph, Orientation::TopToBottom);
/// assert_eq!(layout.node("a".into()).unwrap().rank(), 0);
/// assert_eq!(layout.node("b".into()).unwrap().rank(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    /// Create a new layout engine from the given configuration
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Computes a layered drawing of `graph`.
    ///
    /// # Panics
    ///
    /// Panics if cycle removal leaves a cycle behind. That is a bug in the
    /// engine, never a property of the input.
    pub fn layout(&self, graph: &Graph, orientation: Orientation) -> Layout {
        if graph.is_empty() {
            debug!("Graph is empty, returning empty layout");
            return Layout::empty(orientation);
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            orientation:%;
            "Computing layered layout"
        );

        let inner = graph.inner();
        let ranking = acyclic::ranking_edges(inner);
        let ranks = rank::assign(inner.node_count(), &ranking);
        let layers = order::order_layers(&ranks, &ranking, self.config.ordering_passes());
        let metrics = position::Metrics::new(&self.config, orientation);
        let positions = position::assign(&layers, inner.node_count(), &metrics);

        let mut orders = vec![0; inner.node_count()];
        for layer in &layers {
            for (order, &node) in layer.iter().enumerate() {
                orders[node] = order;
            }
        }

        let nodes = inner
            .node_indices()
            .map(|idx| LayoutNode {
                id: inner[idx].id(),
                rank: ranks[idx.index()],
                order: orders[idx.index()],
                position: positions[idx.index()],
                size: metrics.node_size(),
            })
            .collect();

        let router = route::Router::new(&metrics, &ranks, &layers, &positions);
        let edges = inner
            .edge_indices()
            .map(|edge| {
                let (source, target) = inner
                    .edge_endpoints(edge)
                    .expect("Edge index should exist");
                let connection = &inner[edge];
                let reversed = ranking.is_reversed(edge);
                LayoutEdge {
                    id: connection.id(),
                    from: connection.from(),
                    to: connection.to(),
                    points: router.route(source.index(), target.index()),
                    direction: orientation.direction(),
                    reversed,
                }
            })
            .collect();

        let layout = Layout::new(orientation, nodes, edges);
        debug!(
            ranks = layers.len(),
            reversed_edges = ranking.reversed_count();
            "Layout complete"
        );
        layout
    }
}

/// Lays out `graph` with the default engine configuration.
pub fn layout(graph: &Graph, orientation: Orientation) -> Layout {
    Engine::default().layout(graph, orientation)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use strata_core::model::{ConceptKind, ConceptNode, Connection, ConnectionKind};

    use super::*;
    use crate::graph::build_graph;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
        let nodes: Vec<_> = nodes
            .iter()
            .map(|id| ConceptNode::new(*id, *id, ConceptKind::Concept))
            .collect();
        let connections: Vec<_> = edges
            .iter()
            .map(|(from, to)| {
                Connection::new(
                    format!("{from}->{to}").as_str(),
                    *from,
                    *to,
                    ConnectionKind::Prerequisite,
                )
            })
            .collect();
        build_graph(&nodes, &connections).unwrap()
    }

    fn node(layout: &Layout, id: &str) -> LayoutNode {
        layout.node(Id::new(id)).cloned().unwrap()
    }

    fn edge(layout: &Layout, id: &str) -> LayoutEdge {
        layout.edge(Id::new(id)).cloned().unwrap()
    }

    #[test]
    fn test_empty_graph_yields_empty_layout() {
        let layout = layout(&graph(&[], &[]), Orientation::TopToBottom);

        assert!(layout.is_empty());
        assert!(layout.edges().is_empty());
        assert_eq!(layout.bounds(), None);
    }

    #[test]
    fn test_single_node() {
        let layout = layout(&graph(&["solo"], &[]), Orientation::TopToBottom);
        let solo = node(&layout, "solo");

        assert_eq!(solo.rank(), 0);
        assert_eq!(solo.order(), 0);
        assert_eq!(solo.position(), Point::new(80.0, 24.0));
    }

    #[test]
    fn test_diamond() {
        let g = graph(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );
        let layout = layout(&g, Orientation::TopToBottom);

        let (a, b, c, d) = (
            node(&layout, "A"),
            node(&layout, "B"),
            node(&layout, "C"),
            node(&layout, "D"),
        );
        assert_eq!(a.rank(), 0);
        assert_eq!(b.rank(), 1);
        assert_eq!(c.rank(), 1);
        assert_eq!(d.rank(), 2);
        assert_ne!(b.order(), c.order());

        // Both incoming edges end at D's single top-center connection point.
        let bd = edge(&layout, "B->D");
        let cd = edge(&layout, "C->D");
        let top_center = Point::new(d.position().x(), d.bounds().min_y());
        assert_eq!(bd.end(), top_center);
        assert_eq!(cd.end(), top_center);
        assert!(bd.bends().is_empty());
        assert!(cd.bends().is_empty());

        // A and D are centered over the two-node middle rank.
        assert!(approx_eq!(f32, a.position().x(), b.position().midpoint(c.position()).x()));
        assert!(approx_eq!(f32, d.position().x(), a.position().x()));
    }

    #[test]
    fn test_two_cycle_reverses_one_edge() {
        let g = graph(&["X", "Y"], &[("X", "Y"), ("Y", "X")]);
        let layout = layout(&g, Orientation::TopToBottom);

        let (x, y) = (node(&layout, "X"), node(&layout, "Y"));
        assert_eq!(x.rank(), 0);
        assert_eq!(y.rank(), 1);

        let xy = edge(&layout, "X->Y");
        let yx = edge(&layout, "Y->X");
        assert!(!xy.is_reversed());
        assert!(yx.is_reversed());
        assert_eq!(yx.from(), Id::new("Y"));
        assert_eq!(yx.to(), Id::new("X"));

        // The reversed edge leaves Y upward and enters X from below.
        assert_eq!(yx.start(), Point::new(y.position().x(), y.bounds().min_y()));
        assert_eq!(yx.end(), Point::new(x.position().x(), x.bounds().max_y()));
    }

    #[test]
    fn test_self_loop_does_not_affect_rank() {
        let g = graph(&["a", "b"], &[("a", "a"), ("a", "b")]);
        let layout = layout(&g, Orientation::TopToBottom);

        assert_eq!(node(&layout, "a").rank(), 0);
        assert_eq!(node(&layout, "b").rank(), 1);

        let self_loop = edge(&layout, "a->a");
        assert!(!self_loop.is_reversed());
        assert_eq!(self_loop.points().len(), 4);
    }

    #[test]
    fn test_left_to_right_swaps_axes() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
        let tb = layout(&g, Orientation::TopToBottom);
        let lr = layout(&g, Orientation::LeftToRight);

        for id in ["a", "b", "c"] {
            assert_eq!(node(&tb, id).rank(), node(&lr, id).rank());
            assert_eq!(node(&tb, id).order(), node(&lr, id).order());
        }

        let (a, b) = (node(&lr, "a"), node(&lr, "b"));
        assert!(b.position().x() > a.position().x());

        let ab = edge(&lr, "a->b");
        assert_eq!(ab.direction(), EdgeDirection::LeftToRight);
        assert_eq!(ab.start(), Point::new(a.bounds().max_x(), a.position().y()));
        assert_eq!(ab.end(), Point::new(b.bounds().min_x(), b.position().y()));
    }

    #[test]
    fn test_long_edge_gets_single_bend_between_nodes() {
        // a -> b -> c and a -> c: a->c spans two ranks and passes rank 1.
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        let layout = layout(&g, Orientation::TopToBottom);

        let ac = edge(&layout, "a->c");
        assert_eq!(ac.bends().len(), 1);

        let bend = ac.bends()[0];
        let b = node(&layout, "b");
        assert_eq!(bend.y(), b.position().y());
        assert!(!b.bounds().intersects(&bend.to_bounds(Size::new(1.0, 1.0))));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let g = graph(
            &["a", "b", "c", "d", "e", "f"],
            &[
                ("a", "d"),
                ("b", "d"),
                ("c", "e"),
                ("a", "f"),
                ("e", "a"),
                ("d", "f"),
                ("f", "b"),
            ],
        );
        let first = layout(&g, Orientation::TopToBottom);
        let second = layout(&g, Orientation::TopToBottom);
        assert_eq!(first, second);
    }

    #[test]
    fn test_orientation_from_str() {
        assert_eq!("tb".parse::<Orientation>(), Ok(Orientation::TopToBottom));
        assert_eq!("LR".parse::<Orientation>(), Ok(Orientation::LeftToRight));
        assert!("diagonal".parse::<Orientation>().is_err());
        assert_eq!(Orientation::LeftToRight.to_string(), "lr");
    }

    #[test]
    fn test_bounds_cover_all_nodes() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
        let layout = layout(&g, Orientation::TopToBottom);
        let bounds = layout.bounds().unwrap();

        assert_eq!(bounds.min_x(), 0.0);
        assert_eq!(bounds.min_y(), 0.0);
        // Two nodes on rank 1: 160 + 40 + 160.
        assert_eq!(bounds.width(), 360.0);
        // Two ranks: 48 + 80 + 48.
        assert_eq!(bounds.height(), 176.0);
    }
}

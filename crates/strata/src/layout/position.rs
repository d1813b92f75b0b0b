//! Coordinate assignment.
//!
//! Ranks advance along the flow axis by `node extent + rank_gap`. Within a
//! rank, nodes advance along the cross axis by `node extent + node_gap`, and
//! each rank is centered against the widest one. Positions are node centers.

use strata_core::geometry::{Point, Size};

use super::{Orientation, order::Layers};
use crate::config::LayoutConfig;

/// Spacing parameters resolved for one orientation.
#[derive(Debug, Clone, Copy)]
pub(super) struct Metrics {
    orientation: Orientation,
    node_size: Size,
    node_gap: f32,
    rank_gap: f32,
}

impl Metrics {
    pub(super) fn new(config: &LayoutConfig, orientation: Orientation) -> Self {
        Self {
            orientation,
            node_size: config.node_size(),
            node_gap: config.node_gap(),
            rank_gap: config.rank_gap(),
        }
    }

    pub(super) fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub(super) fn node_size(&self) -> Size {
        self.node_size
    }

    pub(super) fn node_gap(&self) -> f32 {
        self.node_gap
    }

    /// Node extent along the flow axis.
    pub(super) fn flow_extent(&self) -> f32 {
        self.orientation.flow_extent(self.node_size)
    }

    /// Node extent along the cross axis.
    pub(super) fn cross_extent(&self) -> f32 {
        self.orientation.cross_extent(self.node_size)
    }

    /// Distance between the centers of adjacent nodes in a rank.
    fn cross_step(&self) -> f32 {
        self.cross_extent() + self.node_gap
    }

    /// Flow coordinate of the centers on `rank`.
    pub(super) fn rank_center(&self, rank: usize) -> f32 {
        rank as f32 * (self.flow_extent() + self.rank_gap) + self.flow_extent() / 2.0
    }

    /// Cross coordinate of the center of slot `order` in a rank of `len`
    /// nodes, when the widest rank holds `widest` nodes.
    fn slot_center(&self, order: usize, len: usize, widest: usize) -> f32 {
        let offset = (widest - len) as f32 * self.cross_step() / 2.0;
        offset + order as f32 * self.cross_step() + self.cross_extent() / 2.0
    }
}

/// Returns the center of every node, indexed by node.
pub(super) fn assign(layers: &Layers, node_count: usize, metrics: &Metrics) -> Vec<Point> {
    let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
    let mut positions = vec![Point::default(); node_count];

    for (rank, layer) in layers.iter().enumerate() {
        let flow = metrics.rank_center(rank);
        for (order, &node) in layer.iter().enumerate() {
            let cross = metrics.slot_center(order, layer.len(), widest);
            positions[node] = metrics.orientation().point(flow, cross);
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(orientation: Orientation) -> Metrics {
        Metrics::new(&LayoutConfig::default(), orientation)
    }

    #[test]
    fn test_rank_centers() {
        let tb = metrics(Orientation::TopToBottom);
        assert_eq!(tb.rank_center(0), 24.0);
        assert_eq!(tb.rank_center(1), 152.0);
        assert_eq!(tb.rank_center(2), 280.0);

        let lr = metrics(Orientation::LeftToRight);
        assert_eq!(lr.rank_center(1), 160.0 + 80.0 + 80.0);
    }

    #[test]
    fn test_narrow_ranks_are_centered() {
        let layers = vec![vec![0], vec![1, 2, 3]];
        let positions = assign(&layers, 4, &metrics(Orientation::TopToBottom));

        assert_eq!(positions[1], Point::new(80.0, 152.0));
        assert_eq!(positions[2], Point::new(280.0, 152.0));
        assert_eq!(positions[3], Point::new(480.0, 152.0));
        assert_eq!(positions[0], Point::new(280.0, 24.0));
    }

    #[test]
    fn test_left_to_right_swaps_axes() {
        let layers = vec![vec![0, 1]];
        let positions = assign(&layers, 2, &metrics(Orientation::LeftToRight));

        // Cross axis is y: height 48 plus a 40 gap.
        assert_eq!(positions[0], Point::new(80.0, 24.0));
        assert_eq!(positions[1], Point::new(80.0, 112.0));
    }
}

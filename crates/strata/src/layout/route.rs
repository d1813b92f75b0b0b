//! Edge routing.
//!
//! Edges leave the source on its trailing side (bottom for top-to-bottom,
//! right for left-to-right) and enter the target on its leading side. An edge
//! pointing against the flow swaps sides. Edges spanning more than one rank
//! get a single bend on the middle rank, placed in the gap between nodes that
//! is closest to the straight line. Self-loops wrap around the cross-axis side
//! of their node.

use strata_core::geometry::Point;

use super::{order::Layers, position::Metrics};

pub(super) struct Router<'a> {
    metrics: &'a Metrics,
    ranks: &'a [usize],
    layers: &'a Layers,
    positions: &'a [Point],
}

impl<'a> Router<'a> {
    pub(super) fn new(
        metrics: &'a Metrics,
        ranks: &'a [usize],
        layers: &'a Layers,
        positions: &'a [Point],
    ) -> Self {
        Self {
            metrics,
            ranks,
            layers,
            positions,
        }
    }

    /// Returns the polyline from `source` to `target`.
    pub(super) fn route(&self, source: usize, target: usize) -> Vec<Point> {
        if source == target {
            return self.self_loop(source);
        }

        let (source_rank, target_rank) = (self.ranks[source], self.ranks[target]);
        let (start, end) = if source_rank <= target_rank {
            (self.trailing(source), self.leading(target))
        } else {
            (self.leading(source), self.trailing(target))
        };

        let (lo, hi) = (source_rank.min(target_rank), source_rank.max(target_rank));
        if hi - lo <= 1 {
            return vec![start, end];
        }

        let bend = self.bend((lo + hi) / 2, start, end);
        vec![start, bend, end]
    }

    /// Center of the side facing the next rank.
    fn trailing(&self, node: usize) -> Point {
        self.side(node, self.metrics.flow_extent() / 2.0)
    }

    /// Center of the side facing the previous rank.
    fn leading(&self, node: usize) -> Point {
        self.side(node, -self.metrics.flow_extent() / 2.0)
    }

    fn side(&self, node: usize, flow_offset: f32) -> Point {
        let orientation = self.metrics.orientation();
        let center = self.positions[node];
        orientation.point(
            orientation.flow_of(center) + flow_offset,
            orientation.cross_of(center),
        )
    }

    /// Places the bend of a long edge on `rank`.
    fn bend(&self, rank: usize, start: Point, end: Point) -> Point {
        let orientation = self.metrics.orientation();
        let flow = self.metrics.rank_center(rank);

        let (start_flow, end_flow) = (orientation.flow_of(start), orientation.flow_of(end));
        let (start_cross, end_cross) = (orientation.cross_of(start), orientation.cross_of(end));
        let t = (flow - start_flow) / (end_flow - start_flow);
        let line_cross = start_cross + t * (end_cross - start_cross);

        let half_extent = self.metrics.cross_extent() / 2.0;
        let half_gap = self.metrics.node_gap() / 2.0;
        let centers: Vec<f32> = self.layers[rank]
            .iter()
            .map(|&node| orientation.cross_of(self.positions[node]))
            .collect();

        let Some(&first) = centers.first() else {
            return orientation.point(flow, line_cross);
        };

        let gaps = std::iter::once(first - half_extent - half_gap)
            .chain(centers.iter().map(|center| center + half_extent + half_gap));

        let mut best = line_cross;
        let mut best_distance = f32::INFINITY;
        for gap in gaps {
            let distance = (gap - line_cross).abs();
            if distance < best_distance {
                best = gap;
                best_distance = distance;
            }
        }

        orientation.point(flow, best)
    }

    /// Loop out of and back into the node's far cross-axis side.
    fn self_loop(&self, node: usize) -> Vec<Point> {
        let orientation = self.metrics.orientation();
        let center = self.positions[node];
        let flow = orientation.flow_of(center);
        let side = orientation.cross_of(center) + self.metrics.cross_extent() / 2.0;
        let outer = side + self.metrics.node_gap() / 2.0;
        let quarter = self.metrics.flow_extent() / 4.0;

        vec![
            orientation.point(flow - quarter, side),
            orientation.point(flow - quarter, outer),
            orientation.point(flow + quarter, outer),
            orientation.point(flow + quarter, side),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LayoutConfig, layout::Orientation};

    fn metrics(orientation: Orientation) -> Metrics {
        Metrics::new(&LayoutConfig::default(), orientation)
    }

    #[test]
    fn test_adjacent_ranks_are_straight() {
        let metrics = metrics(Orientation::TopToBottom);
        let ranks = [0, 1];
        let layers = vec![vec![0], vec![1]];
        let positions = [Point::new(80.0, 24.0), Point::new(80.0, 152.0)];
        let router = Router::new(&metrics, &ranks, &layers, &positions);

        assert_eq!(
            router.route(0, 1),
            vec![Point::new(80.0, 48.0), Point::new(80.0, 128.0)]
        );
        // Against the flow: leave from the top, arrive at the bottom.
        assert_eq!(
            router.route(1, 0),
            vec![Point::new(80.0, 128.0), Point::new(80.0, 48.0)]
        );
    }

    #[test]
    fn test_long_edge_bends_into_nearest_gap() {
        let metrics = metrics(Orientation::TopToBottom);
        // Rank 1 holds two nodes at x 80 and 280; the edge runs at x 180.
        let ranks = [0, 1, 1, 2];
        let layers = vec![vec![0], vec![1, 2], vec![3]];
        let positions = [
            Point::new(180.0, 24.0),
            Point::new(80.0, 152.0),
            Point::new(280.0, 152.0),
            Point::new(180.0, 280.0),
        ];
        let router = Router::new(&metrics, &ranks, &layers, &positions);

        let points = router.route(0, 3);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Point::new(180.0, 152.0));
    }

    #[test]
    fn test_bend_tie_takes_first_gap() {
        let metrics = metrics(Orientation::TopToBottom);
        let ranks = [0, 1, 2];
        let layers = vec![vec![0], vec![1], vec![2]];
        let positions = [
            Point::new(80.0, 24.0),
            Point::new(80.0, 152.0),
            Point::new(80.0, 280.0),
        ];
        let router = Router::new(&metrics, &ranks, &layers, &positions);

        assert_eq!(router.route(0, 2)[1], Point::new(-20.0, 152.0));
    }

    #[test]
    fn test_self_loop_wraps_cross_side() {
        let metrics = metrics(Orientation::TopToBottom);
        let ranks = [0];
        let layers = vec![vec![0]];
        let positions = [Point::new(80.0, 24.0)];
        let router = Router::new(&metrics, &ranks, &layers, &positions);

        assert_eq!(
            router.route(0, 0),
            vec![
                Point::new(160.0, 12.0),
                Point::new(180.0, 12.0),
                Point::new(180.0, 36.0),
                Point::new(160.0, 36.0),
            ]
        );
    }
}

//! Pan and zoom transform between screen and graph space.

use serde::{Deserialize, Serialize};

use strata_core::geometry::Point;

/// Maps graph space to screen space as `screen = graph * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pan: Point,
    zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::default(),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(pan: Point, zoom: f32) -> Self {
        Self { pan, zoom }
    }

    /// Returns the screen-space offset of the graph origin.
    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub(crate) fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    pub fn screen_to_graph(&self, screen: Point) -> Point {
        screen.sub_point(self.pan).scale(1.0 / self.zoom)
    }

    pub fn graph_to_screen(&self, graph: Point) -> Point {
        graph.scale(self.zoom).add_point(self.pan)
    }

    /// Multiplies the zoom by `factor`, clamped to `[min, max]`, keeping the
    /// graph point under the screen-space `anchor` in place.
    pub(crate) fn zoom_at(&mut self, factor: f32, anchor: Point, min: f32, max: f32) {
        let zoom = (self.zoom * factor).clamp(min, max);
        let ratio = zoom / self.zoom;
        self.pan = anchor.sub_point(anchor.sub_point(self.pan).scale(ratio));
        self.zoom = zoom;
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_identity_by_default() {
        let viewport = Viewport::default();
        let point = Point::new(12.0, -3.0);

        assert_eq!(viewport.screen_to_graph(point), point);
        assert_eq!(viewport.graph_to_screen(point), point);
    }

    #[test]
    fn test_screen_graph_round_trip() {
        let viewport = Viewport::new(Point::new(30.0, -10.0), 2.0);
        let graph = viewport.screen_to_graph(Point::new(50.0, 50.0));

        assert_eq!(graph, Point::new(10.0, 30.0));
        assert_eq!(viewport.graph_to_screen(graph), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut viewport = Viewport::new(Point::new(20.0, 10.0), 1.0);
        let anchor = Point::new(100.0, 60.0);
        let before = viewport.screen_to_graph(anchor);

        viewport.zoom_at(1.5, anchor, 0.1, 10.0);
        let after = viewport.screen_to_graph(anchor);

        assert!(approx_eq!(f32, viewport.zoom(), 1.5));
        assert!(approx_eq!(f32, before.x(), after.x(), epsilon = 1e-4));
        assert!(approx_eq!(f32, before.y(), after.y(), epsilon = 1e-4));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::default();

        viewport.zoom_at(100.0, Point::default(), 0.1, 10.0);
        assert_eq!(viewport.zoom(), 10.0);

        viewport.zoom_at(0.0001, Point::default(), 0.1, 10.0);
        assert_eq!(viewport.zoom(), 0.1);
    }
}

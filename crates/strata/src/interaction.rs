//! Interaction state machine.
//!
//! [`InteractionManager`] turns discrete, already hit-tested input events into
//! mode transitions on [`InteractionState`]. It never runs layout: dragging
//! only moves a preview layered over the last [`Layout`], panning and zooming
//! only touch the [`Viewport`]. Graph mutations leave the manager as
//! [`Command`]s for the owner of the graph to apply.
//!
//! ```text
//!            down(Node)
//!         ┌──────────────────► Dragging ────────────┐
//!         │  down(Port)                             │
//!   Idle ─┼──────────────────► Connecting ──────────┤ up / Esc
//!     ▲   │  down(Background)                       │
//!     │   └──────────────────► PanningViewport ─────┤
//!     └─────────────────────────────────────────────┘
//! ```

mod viewport;

use std::{collections::HashMap, rc::Rc};

use log::{debug, trace, warn};
use serde::Serialize;

use strata_core::{geometry::Point, identifier::Id};

use crate::{config::InteractionConfig, layout::Layout};

pub use viewport::Viewport;

/// What the pointer was over, as resolved by the host's hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The body of a node.
    Node(Id),
    /// The connection handle of a node.
    Port(Id),
    /// A routed connection.
    Edge(Id),
    /// Empty canvas.
    Background,
}

/// A discrete input event. Positions are in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { target: PointerTarget, position: Point },
    PointerMove { position: Point },
    PointerUp { target: PointerTarget, position: Point },
    KeyEscape,
    /// Scales the viewport by `factor` around the screen-space `anchor`.
    Zoom { factor: f32, anchor: Point },
}

/// The current gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    /// A node follows the pointer. `position` is the preview center in graph
    /// space; `grab_offset` is the pointer's offset from that center.
    Dragging {
        node: Id,
        grab_offset: Point,
        position: Point,
    },
    /// A connection is being drawn from `from` to the graph-space `cursor`.
    Connecting { from: Id, cursor: Point },
    /// The viewport follows the pointer. `origin` is the screen position the
    /// gesture started at and `pan_start` the pan offset at that moment.
    PanningViewport { origin: Point, pan_start: Point },
}

/// Everything the host needs to reflect the current gesture.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InteractionState {
    mode: Mode,
    selected_node: Option<Id>,
    selected_edge: Option<Id>,
    viewport: Viewport,
}

impl InteractionState {
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selected_node(&self) -> Option<Id> {
        self.selected_node
    }

    pub fn selected_edge(&self) -> Option<Id> {
        self.selected_edge
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn clear_selection(&mut self) {
        self.selected_node = None;
        self.selected_edge = None;
    }
}

/// A connection the user asked for. Not yet validated against the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionCandidate {
    pub from: Id,
    pub to: Id,
}

/// Side effects requested by a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Add a connection to the graph.
    Connect(ConnectionCandidate),
    /// A drag ended and `node` now sits at the graph-space `position` until
    /// the next structural edit.
    CommitPosition { node: Id, position: Point },
}

/// Finite-state machine over pointer and keyboard input.
///
/// Holds a shared reference to the last computed layout, plus the user's
/// position overrides on top of it.
#[derive(Debug)]
pub struct InteractionManager {
    state: InteractionState,
    layout: Rc<Layout>,
    overrides: HashMap<Id, Point>,
    config: InteractionConfig,
}

impl InteractionManager {
    pub fn new(layout: Rc<Layout>, config: InteractionConfig) -> Self {
        Self {
            state: InteractionState::default(),
            layout,
            overrides: HashMap::new(),
            config,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn layout(&self) -> &Rc<Layout> {
        &self.layout
    }

    /// Returns the committed override for `node`, if the user moved it.
    pub fn override_of(&self, node: Id) -> Option<Point> {
        self.overrides.get(&node).copied()
    }

    /// Returns the displayed center of `node`: the drag preview if it is being
    /// dragged, else its override, else its layout position.
    pub fn position_of(&self, node: Id) -> Option<Point> {
        match self.state.mode {
            Mode::Dragging {
                node: dragged,
                position,
                ..
            } if dragged == node => return Some(position),
            _ => {}
        }

        self.override_of(node)
            .or_else(|| self.layout.node(node).map(|n| n.position()))
    }

    /// Returns how far `node` is displayed from its layout position, or
    /// `None` if it is not displaced.
    pub fn displacement_of(&self, node: Id) -> Option<Point> {
        let base = self.layout.node(node)?.position();
        let displayed = self.position_of(node)?;
        let offset = displayed.sub_point(base);
        (!offset.is_zero()).then_some(offset)
    }

    /// Feeds one event through the state machine.
    pub fn handle(&mut self, event: InputEvent) -> Option<Command> {
        trace!(event:?, mode:? = self.state.mode; "Handling input event");

        match event {
            InputEvent::PointerDown { target, position } => {
                self.pointer_down(target, position);
                None
            }
            InputEvent::PointerMove { position } => {
                self.pointer_move(position);
                None
            }
            InputEvent::PointerUp { target, position } => self.pointer_up(target, position),
            InputEvent::KeyEscape => {
                self.escape();
                None
            }
            InputEvent::Zoom { factor, anchor } => {
                self.zoom(factor, anchor);
                None
            }
        }
    }

    /// Swaps in a freshly computed layout after a structural edit.
    ///
    /// Overrides are dropped since ranks and order may have changed. Gestures
    /// and selections that refer to items missing from `layout` are reset;
    /// everything else, including the viewport, is kept.
    pub fn on_layout(&mut self, layout: Rc<Layout>) {
        let cleared = self.overrides.len();
        self.overrides.clear();
        self.layout = layout;

        let gesture_node = match self.state.mode {
            Mode::Dragging { node, .. } => Some(node),
            Mode::Connecting { from, .. } => Some(from),
            Mode::Idle | Mode::PanningViewport { .. } => None,
        };
        if let Some(node) = gesture_node.filter(|&node| self.layout.node(node).is_none()) {
            debug!(node:%; "Gesture node was removed, returning to idle");
            self.state.mode = Mode::Idle;
        }

        let layout = &self.layout;
        self.state.selected_node = self
            .state
            .selected_node
            .filter(|&node| layout.node(node).is_some());
        self.state.selected_edge = self
            .state
            .selected_edge
            .filter(|&edge| layout.edge(edge).is_some());

        debug!(cleared_overrides = cleared; "Interaction state reconciled with new layout");
    }

    fn pointer_down(&mut self, target: PointerTarget, position: Point) {
        if self.state.mode != Mode::Idle {
            trace!("Ignoring pointer down outside idle mode");
            return;
        }

        let pointer = self.state.viewport.screen_to_graph(position);
        match target {
            PointerTarget::Node(node) => {
                let Some(center) = self.position_of(node) else {
                    warn!(node:%; "Pointer down on a node missing from the layout");
                    return;
                };
                self.state.selected_node = Some(node);
                self.state.selected_edge = None;
                self.state.mode = Mode::Dragging {
                    node,
                    grab_offset: pointer.sub_point(center),
                    position: center,
                };
                debug!(node:%; "Started dragging");
            }
            PointerTarget::Port(node) => {
                if self.layout.node(node).is_none() {
                    warn!(node:%; "Pointer down on a port of a node missing from the layout");
                    return;
                }
                self.state.mode = Mode::Connecting {
                    from: node,
                    cursor: pointer,
                };
                debug!(from:% = node; "Started connecting");
            }
            PointerTarget::Edge(edge) => {
                if self.layout.edge(edge).is_none() {
                    warn!(edge:%; "Pointer down on an edge missing from the layout");
                    return;
                }
                self.state.selected_edge = Some(edge);
                self.state.selected_node = None;
                debug!(edge:%; "Selected edge");
            }
            PointerTarget::Background => {
                self.state.clear_selection();
                self.state.mode = Mode::PanningViewport {
                    origin: position,
                    pan_start: self.state.viewport.pan(),
                };
                debug!("Started panning");
            }
        }
    }

    fn pointer_move(&mut self, position: Point) {
        let pointer = self.state.viewport.screen_to_graph(position);
        match &mut self.state.mode {
            Mode::Idle => {}
            Mode::Dragging {
                grab_offset,
                position: preview,
                ..
            } => {
                *preview = pointer.sub_point(*grab_offset);
            }
            Mode::Connecting { cursor, .. } => {
                *cursor = pointer;
            }
            Mode::PanningViewport { origin, pan_start } => {
                let pan = pan_start.add_point(position.sub_point(*origin));
                self.state.viewport.set_pan(pan);
            }
        }
    }

    fn pointer_up(&mut self, target: PointerTarget, position: Point) -> Option<Command> {
        self.pointer_move(position);

        match std::mem::take(&mut self.state.mode) {
            Mode::Idle => None,
            Mode::Dragging {
                node,
                position: preview,
                ..
            } => {
                let before = self.position_of(node);
                if before == Some(preview) {
                    trace!(node:%; "Drag ended without movement");
                    return None;
                }
                self.overrides.insert(node, preview);
                debug!(node:%, position:? = preview; "Committed position override");
                Some(Command::CommitPosition {
                    node,
                    position: preview,
                })
            }
            Mode::Connecting { from, .. } => {
                let PointerTarget::Port(to) = target else {
                    debug!(from:%; "Connection cancelled");
                    return None;
                };
                if to == from || self.layout.node(to).is_none() {
                    debug!(from:%, to:%; "Ignoring connection to self or missing node");
                    return None;
                }
                debug!(from:%, to:%; "Connection requested");
                Some(Command::Connect(ConnectionCandidate { from, to }))
            }
            Mode::PanningViewport { .. } => {
                debug!(pan:? = self.state.viewport.pan(); "Finished panning");
                None
            }
        }
    }

    fn escape(&mut self) {
        match std::mem::take(&mut self.state.mode) {
            Mode::Idle => self.state.clear_selection(),
            Mode::Dragging { node, .. } => debug!(node:%; "Drag cancelled"),
            Mode::Connecting { from, .. } => debug!(from:%; "Connection cancelled"),
            Mode::PanningViewport { pan_start, .. } => {
                self.state.viewport.set_pan(pan_start);
                debug!("Panning cancelled");
            }
        }
    }

    fn zoom(&mut self, factor: f32, anchor: Point) {
        if !(factor.is_finite() && factor > 0.0) {
            warn!(factor; "Ignoring invalid zoom factor");
            return;
        }

        let before = self.state.viewport.pan();
        self.state.viewport.zoom_at(
            factor,
            anchor,
            self.config.min_zoom(),
            self.config.max_zoom(),
        );

        // Keep an ongoing pan consistent with the zoom's own pan adjustment.
        if let Mode::PanningViewport { pan_start, .. } = &mut self.state.mode {
            let shift = self.state.viewport.pan().sub_point(before);
            *pan_start = pan_start.add_point(shift);
        }
        trace!(zoom = self.state.viewport.zoom(); "Zoomed viewport");
    }
}

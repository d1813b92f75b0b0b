//! Graph view session.
//!
//! [`GraphView`] is what a host embeds. It owns the current snapshot and
//! drives the rest of the engine: every structural edit is validated by
//! rebuilding the [`Graph`], then laid out from scratch and handed to the
//! [`InteractionManager`]. Pointer input only reaches the manager, so drags
//! and pans never trigger layout.

use std::rc::Rc;

use log::{debug, info};

use strata_core::{
    identifier::Id,
    model::{ConceptNode, Connection, ConnectionKind},
};

use crate::{
    GraphError, StrataError,
    config::AppConfig,
    graph::{Graph, GraphSnapshot},
    interaction::{Command, ConnectionCandidate, InputEvent, InteractionManager},
    layout::{Engine, Layout, Orientation},
    render::{self, Scene},
};

/// A live, editable view of one knowledge graph.
#[derive(Debug)]
pub struct GraphView {
    snapshot: GraphSnapshot,
    graph: Graph,
    engine: Engine,
    orientation: Orientation,
    layout: Rc<Layout>,
    interaction: InteractionManager,
}

impl GraphView {
    /// Builds, validates and lays out the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Config`] for an unusable configuration and
    /// [`StrataError::Graph`] if the snapshot does not form a valid graph.
    pub fn new(
        nodes: Vec<ConceptNode>,
        connections: Vec<Connection>,
        config: &AppConfig,
    ) -> Result<Self, StrataError> {
        config.validate()?;

        let snapshot = GraphSnapshot::new(nodes, connections);
        let graph = snapshot.build()?;
        let engine = Engine::new(config.layout().clone());
        let orientation = config.layout().orientation();
        let layout = Rc::new(engine.layout(&graph, orientation));
        let interaction = InteractionManager::new(layout.clone(), config.interaction().clone());

        info!(nodes = graph.node_count(), edges = graph.edge_count(); "Graph view created");

        Ok(Self {
            snapshot,
            graph,
            engine,
            orientation,
            layout,
            interaction,
        })
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn layout(&self) -> &Rc<Layout> {
        &self.layout
    }

    pub fn interaction(&self) -> &InteractionManager {
        &self.interaction
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Projects the current state for drawing.
    pub fn scene(&self) -> Scene {
        render::project(&self.graph, &self.layout, &self.interaction)
    }

    /// Replaces the whole graph with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Graph`] and keeps the current graph if the new
    /// snapshot is invalid.
    pub fn replace_snapshot(&mut self, snapshot: GraphSnapshot) -> Result<(), StrataError> {
        self.apply(snapshot)
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if the id is taken.
    pub fn add_node(&mut self, node: ConceptNode) -> Result<(), StrataError> {
        let mut snapshot = self.snapshot.clone();
        snapshot.nodes.push(node);
        self.apply(snapshot)
    }

    /// Removes a node together with every connection touching it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if there is no such node.
    pub fn remove_node(&mut self, id: Id) -> Result<(), StrataError> {
        if !self.graph.contains_node(id) {
            return Err(GraphError::UnknownNode { id }.into());
        }

        let mut snapshot = self.snapshot.clone();
        snapshot.nodes.retain(|node| node.id() != id);
        snapshot
            .connections
            .retain(|connection| !connection.touches(id));
        self.apply(snapshot)
    }

    /// Adds a connection.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateConnection`] if the id is taken and
    /// [`GraphError::DanglingEdge`] if an endpoint does not exist.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), StrataError> {
        let mut snapshot = self.snapshot.clone();
        snapshot.connections.push(connection);
        self.apply(snapshot)
    }

    /// Removes a connection.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownConnection`] if there is no such
    /// connection.
    pub fn remove_connection(&mut self, id: Id) -> Result<(), StrataError> {
        if !self.graph.contains_connection(id) {
            return Err(GraphError::UnknownConnection { id }.into());
        }

        let mut snapshot = self.snapshot.clone();
        snapshot
            .connections
            .retain(|connection| connection.id() != id);
        self.apply(snapshot)
    }

    /// Lays the graph out again in `orientation`.
    ///
    /// Position overrides are dropped since they refer to the old drawing.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }

        info!(orientation:%; "Changing orientation");
        self.orientation = orientation;
        self.relayout();
    }

    /// Feeds an input event through the interaction manager.
    ///
    /// A requested connection is added to the graph before returning, with
    /// a generated id and kind [`ConnectionKind::Related`]. The returned
    /// command tells the caller what the gesture did.
    ///
    /// # Errors
    ///
    /// Returns the graph error if a requested connection cannot be added. The
    /// graph is unchanged in that case.
    pub fn handle(&mut self, event: InputEvent) -> Result<Option<Command>, StrataError> {
        let command = self.interaction.handle(event);
        if let Some(Command::Connect(candidate)) = command {
            let connection = Connection::new(
                self.connection_id(candidate),
                candidate.from,
                candidate.to,
                ConnectionKind::Related,
            );
            self.add_connection(connection)?;
        }
        Ok(command)
    }

    /// Picks `from->to`, or `from->to#n` with the smallest free `n >= 2`.
    fn connection_id(&self, candidate: ConnectionCandidate) -> Id {
        let base = format!("{}->{}", candidate.from, candidate.to);
        let mut id = Id::new(&base);
        let mut suffix = 2;
        while self.graph.contains_connection(id) {
            id = Id::new(&format!("{base}#{suffix}"));
            suffix += 1;
        }
        id
    }

    fn apply(&mut self, snapshot: GraphSnapshot) -> Result<(), StrataError> {
        let graph = snapshot.build()?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Structural edit accepted"
        );
        self.snapshot = snapshot;
        self.graph = graph;
        self.relayout();
        Ok(())
    }

    fn relayout(&mut self) {
        self.layout = Rc::new(self.engine.layout(&self.graph, self.orientation));
        self.interaction.on_layout(self.layout.clone());
    }
}

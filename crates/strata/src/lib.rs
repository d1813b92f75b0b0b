//! Strata - Deterministic layered layout and interaction state for knowledge graphs.
//!
//! Turns a snapshot of concepts and the connections between them into a
//! layered drawing, and tracks the pointer gestures a host UI applies to it.
//! The host owns hit-testing and painting; Strata owns geometry and state.

pub mod config;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod view;

mod error;

pub use strata_core::{geometry, identifier, model};

pub use error::{GraphError, StrataError};
pub use graph::{Graph, GraphSnapshot, build_graph};
pub use layout::{Layout, Orientation};
pub use view::GraphView;

use std::{fs, path::Path};

use log::{debug, info, trace};

use config::AppConfig;
use layout::Engine;

/// Builder for laying out graph snapshots in one shot.
///
/// For a long-lived, editable graph use [`GraphView`] instead.
///
/// # Examples
///
/// ```
/// use strata::{LayoutBuilder, Orientation};
///
/// let source = r#"{
///     "nodes": [
///         {"id": "vars", "title": "Variables", "type": "concept"},
///         {"id": "loops", "title": "Loops", "type": "skill"}
///     ],
///     "connections": [
///         {"id": "c1", "from": "vars", "to": "loops", "type": "prerequisite"}
///     ]
/// }"#;
///
/// let builder = LayoutBuilder::default();
/// let snapshot = builder.parse(source).expect("Failed to parse snapshot");
/// let layout = builder
///     .layout(&snapshot, Orientation::TopToBottom)
///     .expect("Failed to lay out snapshot");
/// assert_eq!(layout.nodes().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    config: AppConfig,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Snapshot`] for malformed JSON or unknown types.
    pub fn parse(&self, source: &str) -> Result<GraphSnapshot, StrataError> {
        info!("Parsing snapshot");
        let snapshot = GraphSnapshot::from_json(source)?;
        debug!(
            nodes = snapshot.nodes.len(),
            connections = snapshot.connections.len();
            "Snapshot parsed"
        );
        Ok(snapshot)
    }

    /// Validate a snapshot and lay it out.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Config`] for an unusable configuration and
    /// [`StrataError::Graph`] if the snapshot does not form a valid graph.
    pub fn layout(
        &self,
        snapshot: &GraphSnapshot,
        orientation: Orientation,
    ) -> Result<Layout, StrataError> {
        self.config.validate()?;
        let graph = snapshot.build()?;
        let layout = Engine::new(self.config.layout().clone()).layout(&graph, orientation);
        trace!(layout:?; "Computed layout");
        Ok(layout)
    }

    /// Serialize a layout as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Snapshot`] if serialization fails.
    pub fn to_json(&self, layout: &Layout) -> Result<String, StrataError> {
        Ok(serde_json::to_string_pretty(layout)?)
    }

    /// Write a layout as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Io`] if the file cannot be written.
    pub fn write_json(&self, layout: &Layout, path: impl AsRef<Path>) -> Result<(), StrataError> {
        let path = path.as_ref();
        let json = self.to_json(layout)?;
        fs::write(path, json)?;
        info!(path:? = path; "Layout written");
        Ok(())
    }
}

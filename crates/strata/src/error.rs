//! Error types for Strata operations.
//!
//! [`GraphError`] covers input-data problems detected while building the
//! internal graph. [`StrataError`] is the top-level error returned by the
//! session and snapshot APIs.

use std::io;

use thiserror::Error;

use strata_core::identifier::Id;

/// Input-data errors raised by the graph model adapter.
///
/// These are reported before any layout is attempted. The adapter never
/// guesses which duplicate to keep or silently drops an edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Duplicate node id `{id}`")]
    DuplicateNode { id: Id },

    #[error("Connection `{edge}` references missing node `{missing}`")]
    DanglingEdge { edge: Id, missing: Id },

    #[error("Duplicate connection id `{id}`")]
    DuplicateConnection { id: Id },

    #[error("Node `{id}` does not exist")]
    UnknownNode { id: Id },

    #[error("Connection `{id}` does not exist")]
    UnknownConnection { id: Id },
}

/// The main error type for Strata operations.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

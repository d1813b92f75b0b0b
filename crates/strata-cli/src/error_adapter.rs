//! Error adapter for converting StrataError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Every error gets a
//! stable code; graph errors also get a hint on how to fix the snapshot.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use strata::{GraphError, StrataError};

/// Adapter rendering a [`StrataError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a StrataError);

impl ErrorAdapter<'_> {
    fn code_str(&self) -> &'static str {
        match self.0 {
            StrataError::Io(_) => "strata::io",
            StrataError::Snapshot(_) => "strata::snapshot",
            StrataError::Config(_) => "strata::config",
            StrataError::Graph(err) => match err {
                GraphError::DuplicateNode { .. } => "strata::graph::duplicate_node",
                GraphError::DanglingEdge { .. } => "strata::graph::dangling_edge",
                GraphError::DuplicateConnection { .. } => "strata::graph::duplicate_connection",
                GraphError::UnknownNode { .. } => "strata::graph::unknown_node",
                GraphError::UnknownConnection { .. } => "strata::graph::unknown_connection",
            },
        }
    }

    fn help_text(&self) -> Option<String> {
        match self.0 {
            StrataError::Graph(GraphError::DuplicateNode { id }) => {
                Some(format!("Node ids must be unique; rename one of the `{id}` nodes"))
            }
            StrataError::Graph(GraphError::DanglingEdge { edge, missing }) => Some(format!(
                "Add a node with id `{missing}` or remove connection `{edge}`"
            )),
            StrataError::Graph(GraphError::DuplicateConnection { id }) => Some(format!(
                "Connection ids must be unique; rename one of the `{id}` connections"
            )),
            StrataError::Snapshot(_) => Some(
                "Expected {\"nodes\": [...], \"connections\": [...]} with a known `type` on every entry"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_text()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use strata::identifier::Id;

    use super::*;

    fn code(err: &StrataError) -> String {
        ErrorAdapter(err).code().unwrap().to_string()
    }

    #[test]
    fn test_graph_error_codes() {
        let err = StrataError::from(GraphError::DanglingEdge {
            edge: Id::new("c1"),
            missing: Id::new("ghost"),
        });
        assert_eq!(code(&err), "strata::graph::dangling_edge");

        let help = ErrorAdapter(&err).help().unwrap().to_string();
        assert!(help.contains("ghost"));
        assert!(help.contains("c1"));

        let err = StrataError::from(GraphError::DuplicateNode { id: Id::new("a") });
        assert_eq!(code(&err), "strata::graph::duplicate_node");
    }

    #[test]
    fn test_non_graph_error_codes() {
        let err = StrataError::Config("bad".to_string());
        assert_eq!(code(&err), "strata::config");
        assert!(ErrorAdapter(&err).help().is_none());

        let err = StrataError::from(std::io::Error::other("disk"));
        assert_eq!(code(&err), "strata::io");
        assert_eq!(ErrorAdapter(&err).to_string(), "I/O error: disk");
    }

    #[test]
    fn test_report_renders() {
        let err = StrataError::from(GraphError::DuplicateConnection { id: Id::new("c") });
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &ErrorAdapter(&err))
            .unwrap();

        assert!(out.contains("Duplicate connection id"));
    }
}

//! Error types for Topograph.
//!
//! Two families live here. `GraphError` is what queries and health updates
//! can return at runtime. `TopologyError` is raised while a topology is
//! being loaded and validated, before any query runs.

use std::io;
use thiserror::Error;

/// Errors returned by graph queries and health updates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The referenced vertex key does not exist in the graph.
    #[error("vertex not found: {0}")]
    NotFound(String),

    /// A structural invariant was violated after the graph was built.
    ///
    /// This points at corrupt graph data, never at a bad caller key.
    #[error("internal graph error: {0}")]
    Internal(String),
}

impl GraphError {
    /// Returns true for the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NotFound(_))
    }
}

/// Errors raised while loading a topology document.
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("failed to read topology: {0}")]
    Io(#[from] io::Error),

    #[error("invalid topology document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("edge '{edge}' references unknown vertex '{vertex}'")]
    DanglingEdge { edge: String, vertex: String },

    #[error("duplicate vertex key: {0}")]
    DuplicateVertex(String),

    #[error("duplicate edge key: {0}")]
    DuplicateEdge(String),

    /// A vertex or edge was declared with an empty key.
    #[error("empty {0} key")]
    EmptyKey(&'static str),
}

/// Result alias for graph queries.
pub type Result<T> = std::result::Result<T, GraphError>;

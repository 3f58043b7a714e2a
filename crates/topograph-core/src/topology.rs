//! The topology document a graph is built from.

use crate::error::TopologyError;
use crate::model::{Edge, Vertex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Raw topology as read from disk.
///
/// Nothing is validated here. `GraphBuilder` checks keys and endpoints when
/// it turns the document into a graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub vertices: Vec<Vertex>,

    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Topology {
    /// Parses a topology from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a topology file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TopologyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

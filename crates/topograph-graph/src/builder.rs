//! Graph builder for constructing the topology graph.
//!
//! The builder is the only place structure is created. It validates keys
//! and edge endpoints as they arrive, so a graph that makes it out of
//! `build` never holds a dangling or duplicate reference.

use crate::graph::{NodeId, TopologyGraph};
use std::collections::HashSet;
use topograph_core::{Edge, Topology, TopologyError, Vertex};
use tracing::debug;

/// Builds a TopologyGraph from vertices and edges.
///
/// Vertices must be added before the edges that reference them.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: TopologyGraph,
    /// Edge keys seen so far, for duplicate detection.
    edge_keys: HashSet<String>,
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex, rejecting empty and duplicate keys.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<NodeId, TopologyError> {
        if vertex.key.is_empty() {
            return Err(TopologyError::EmptyKey("vertex"));
        }
        if self.graph.get_index(&vertex.key).is_some() {
            return Err(TopologyError::DuplicateVertex(vertex.key));
        }

        Ok(self.graph.add_vertex(vertex))
    }

    /// Adds an edge whose endpoints are already in the graph.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), TopologyError> {
        if edge.key.is_empty() {
            return Err(TopologyError::EmptyKey("edge"));
        }
        if self.edge_keys.contains(&edge.key) {
            return Err(TopologyError::DuplicateEdge(edge.key));
        }

        let from = self.endpoint(&edge, &edge.source)?;
        let to = self.endpoint(&edge, &edge.target)?;

        self.edge_keys.insert(edge.key.clone());
        self.graph.add_edge(from, to, edge);
        Ok(())
    }

    fn endpoint(&self, edge: &Edge, key: &str) -> Result<NodeId, TopologyError> {
        self.graph
            .get_index(key)
            .ok_or_else(|| TopologyError::DanglingEdge {
                edge: edge.key.clone(),
                vertex: key.to_string(),
            })
    }

    /// Adds every vertex and then every edge of a topology document.
    pub fn add_topology(&mut self, topology: Topology) -> Result<(), TopologyError> {
        for vertex in topology.vertices {
            self.add_vertex(vertex)?;
        }
        for edge in topology.edges {
            self.add_edge(edge)?;
        }
        Ok(())
    }

    /// Finishes building and returns the graph.
    pub fn build(self) -> TopologyGraph {
        debug!(
            "Built topology graph: {} vertices, {} edges",
            self.graph.vertex_count(),
            self.graph.edge_count()
        );
        self.graph
    }
}

impl TopologyGraph {
    /// Builds a graph from a topology document.
    pub fn from_topology(topology: Topology) -> Result<Self, TopologyError> {
        let mut builder = GraphBuilder::new();
        builder.add_topology(topology)?;
        Ok(builder.build())
    }
}

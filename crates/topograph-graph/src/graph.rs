//! Core graph data structure.
//!
//! The TopologyGraph wraps petgraph and adds a key index for O(1) vertex
//! lookup. Structure is fixed once the builder hands the graph over; only
//! the health overlay changes afterwards.

use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use topograph_core::{Edge, GraphError, Result, Vertex};

/// Unique identifier for a vertex in the graph.
pub type NodeId = NodeIndex;

/// Unique identifier for an edge in the graph.
pub type EdgeId = EdgeIndex;

/// The service dependency graph.
///
/// Vertices and edges are stored in flat petgraph arenas; edges hold
/// source/target indexes rather than references, so cycles are harmless.
/// Indexes are assigned in insertion order and never reused because
/// nothing is ever removed.
#[derive(Debug, Default)]
pub struct TopologyGraph {
    /// The underlying petgraph graph.
    graph: DiGraph<Vertex, Edge>,

    /// Maps vertex keys to graph node indexes.
    key_index: HashMap<String, NodeId>,
}

impl TopologyGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex. Key uniqueness is the builder's job.
    pub(crate) fn add_vertex(&mut self, vertex: Vertex) -> NodeId {
        let key = vertex.key.clone();
        let index = self.graph.add_node(vertex);
        self.key_index.insert(key, index);
        index
    }

    /// Adds an edge between two existing vertices.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId, edge: Edge) -> EdgeId {
        self.graph.add_edge(from, to, edge)
    }

    /// Gets the node index for a key.
    pub fn get_index(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    /// Resolves a key to its node index, failing with `NotFound`.
    pub fn resolve(&self, key: &str) -> Result<NodeId> {
        self.get_index(key)
            .ok_or_else(|| GraphError::NotFound(key.to_string()))
    }

    /// Gets a vertex by key.
    pub fn get_vertex(&self, key: &str) -> Result<&Vertex> {
        let index = self.resolve(key)?;
        self.vertex_at(index)
    }

    /// Gets a vertex by index.
    ///
    /// Indexes come from this graph, so a miss means the graph is corrupt.
    pub fn vertex_at(&self, index: NodeId) -> Result<&Vertex> {
        self.graph.node_weight(index).ok_or_else(|| {
            GraphError::Internal(format!("no vertex at index {}", index.index()))
        })
    }

    /// Gets an edge by index.
    pub fn edge_at(&self, index: EdgeId) -> Result<&Edge> {
        self.graph.edge_weight(index).ok_or_else(|| {
            GraphError::Internal(format!("no edge at index {}", index.index()))
        })
    }

    /// Edges whose source is `key`, in insertion order.
    pub fn out_edges(&self, key: &str) -> Result<Vec<&Edge>> {
        let index = self.resolve(key)?;
        Ok(self
            .edges_directed(index, Direction::Outgoing)
            .into_iter()
            .map(|edge_ref| edge_ref.weight())
            .collect())
    }

    /// Edges whose target is `key`, in insertion order.
    pub fn in_edges(&self, key: &str) -> Result<Vec<&Edge>> {
        let index = self.resolve(key)?;
        Ok(self
            .edges_directed(index, Direction::Incoming)
            .into_iter()
            .map(|edge_ref| edge_ref.weight())
            .collect())
    }

    /// Adjacent edges of a node in insertion order.
    ///
    /// petgraph walks adjacency lists newest-first, so the edges are
    /// re-sorted by index to keep traversal order stable.
    pub(crate) fn edges_directed(
        &self,
        index: NodeId,
        direction: Direction,
    ) -> Vec<EdgeReference<'_, Edge>> {
        let mut edges: Vec<_> = self.graph.edges_directed(index, direction).collect();
        edges.sort_by_key(|edge_ref| edge_ref.id());
        edges
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.graph.node_weights()
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TopologyGraph {
        let mut graph = TopologyGraph::new();
        let api = graph.add_vertex(Vertex::new("api", "API"));
        let auth = graph.add_vertex(Vertex::new("auth", "Auth"));
        let db = graph.add_vertex(Vertex::new("db", "DB"));
        graph.add_edge(api, auth, Edge::new("api-auth", "api", "auth"));
        graph.add_edge(api, db, Edge::new("api-db", "api", "db"));
        graph.add_edge(auth, db, Edge::new("auth-db", "auth", "db"));
        graph
    }

    #[test]
    fn test_get_vertex() {
        let graph = sample();
        assert_eq!(graph.get_vertex("auth").unwrap().label, "Auth");
        assert_eq!(
            graph.get_vertex("zz").unwrap_err(),
            GraphError::NotFound("zz".into())
        );
    }

    #[test]
    fn test_adjacency_keeps_insertion_order() {
        let graph = sample();

        let out: Vec<&str> = graph
            .out_edges("api")
            .unwrap()
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(out, vec!["api-auth", "api-db"]);

        let incoming: Vec<&str> = graph
            .in_edges("db")
            .unwrap()
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(incoming, vec!["api-db", "auth-db"]);
    }

    #[test]
    fn test_adjacency_of_missing_key() {
        let graph = sample();
        assert!(graph.out_edges("nope").unwrap_err().is_not_found());
        assert!(graph.in_edges("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_counts_and_iteration() {
        let graph = sample();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);

        let keys: Vec<&str> = graph.vertices().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["api", "auth", "db"]);
        assert_eq!(graph.edges().count(), 3);
    }

    #[test]
    fn test_index_out_of_range_is_internal() {
        let graph = sample();
        let err = graph.vertex_at(NodeId::new(42)).unwrap_err();
        assert!(matches!(err, GraphError::Internal(_)));
    }
}

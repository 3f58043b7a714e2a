//! The health engine: topology plus health overlay behind one handle.
//!
//! This is the surface the adapters talk to. Every operation takes vertex
//! keys, resolves them once, and delegates to the assembler or the overlay.
//! The engine is `Send + Sync`; share it with `Arc` and call it from any
//! number of threads.

use crate::graph::TopologyGraph;
use crate::health::HealthOverlay;
use crate::query::{QueryKind, Subgraph, SubgraphAssembler, Summary};
use std::path::Path;
use topograph_core::{Result, Topology, TopologyError, VertexInfo};
use tracing::info;

#[derive(Debug)]
pub struct HealthEngine {
    graph: TopologyGraph,
    health: HealthOverlay,
}

impl HealthEngine {
    /// Wraps a built graph with an all-healthy overlay.
    pub fn new(graph: TopologyGraph) -> Self {
        let health = HealthOverlay::new(graph.vertex_count());
        Self { graph, health }
    }

    /// Validates a topology document and builds an engine from it.
    pub fn from_topology(topology: Topology) -> std::result::Result<Self, TopologyError> {
        Ok(Self::new(TopologyGraph::from_topology(topology)?))
    }

    /// Loads a topology file and builds an engine from it.
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, TopologyError> {
        let path = path.as_ref();
        let engine = Self::from_topology(Topology::from_path(path)?)?;
        info!(
            "Loaded topology from {}: {} vertices, {} edges",
            path.display(),
            engine.graph.vertex_count(),
            engine.graph.edge_count()
        );
        Ok(engine)
    }

    /// The underlying graph.
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    fn assembler(&self) -> SubgraphAssembler<'_> {
        SubgraphAssembler::new(&self.graph, &self.health)
    }

    /// Totals and the current unhealthy set.
    ///
    /// Never fails on a graph that came out of the builder. An internal
    /// inconsistency degrades to an empty unhealthy list.
    pub fn summary(&self) -> Summary {
        self.assembler().summary().unwrap_or_else(|_| Summary {
            total_vertices: self.graph.vertex_count(),
            total_edges: self.graph.edge_count(),
            unhealthy_vertices: Vec::new(),
        })
    }

    pub fn get_vertex(&self, key: &str) -> Result<VertexInfo> {
        let index = self.graph.resolve(key)?;
        self.assembler().vertex(index)
    }

    /// Vertices that depend on `key`, directly or (with `all`) transitively.
    pub fn dependents(&self, key: &str, all: bool) -> Result<Subgraph> {
        self.query(key, QueryKind::Dependents { all })
    }

    /// Vertices `key` depends on, directly or (with `all`) transitively.
    pub fn dependencies(&self, key: &str, all: bool) -> Result<Subgraph> {
        self.query(key, QueryKind::Dependencies { all })
    }

    pub fn neighbors(&self, key: &str) -> Result<Subgraph> {
        self.query(key, QueryKind::Neighbors)
    }

    /// Shortest path from `source` to `target`.
    ///
    /// An unreachable target gives an empty subgraph, not an error.
    pub fn path(&self, source: &str, target: &str) -> Result<Subgraph> {
        let to = self.graph.resolve(target)?;
        self.query(source, QueryKind::Path { to })
    }

    pub fn lineage(&self, key: &str) -> Result<Subgraph> {
        self.query(key, QueryKind::Lineage)
    }

    fn query(&self, key: &str, kind: QueryKind) -> Result<Subgraph> {
        let principal = self.graph.resolve(key)?;
        self.assembler().assemble(principal, kind)
    }

    /// Sets a vertex's health flag. Returns whether it changed.
    pub fn set_vertex_health(&self, key: &str, healthy: bool) -> Result<bool> {
        let index = self.graph.resolve(key)?;
        self.health.set(index, healthy)
    }

    /// Marks every vertex healthy.
    pub fn clear_health_status(&self) {
        self.health.clear_all();
    }

    /// All currently unhealthy vertices in insertion order.
    pub fn unhealthy_snapshot(&self) -> Vec<VertexInfo> {
        self.summary().unhealthy_vertices
    }
}

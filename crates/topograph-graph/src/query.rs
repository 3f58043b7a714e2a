//! Query results and the subgraph assembler.
//!
//! The assembler does no graph walking of its own. It picks a traversal
//! based on the query kind, then joins the raw indexes with vertex data and
//! the current health flags to produce a `Subgraph`.

use crate::graph::{NodeId, TopologyGraph};
use crate::health::{HealthOverlay, HealthView};
use crate::traversal::Traversal;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use topograph_core::{Edge, Result, VertexInfo};

/// The kinds of subgraph query the engine answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Who depends on the principal.
    Dependents { all: bool },
    /// What the principal depends on.
    Dependencies { all: bool },
    /// One hop in both directions.
    Neighbors,
    /// Shortest directed path from the principal to `to`.
    Path { to: NodeId },
    /// All transitive dependencies and dependents.
    Lineage,
}

impl QueryKind {
    /// Whether the query expands transitively.
    pub fn is_transitive(&self) -> bool {
        match self {
            QueryKind::Dependents { all } | QueryKind::Dependencies { all } => *all,
            QueryKind::Lineage => true,
            QueryKind::Neighbors | QueryKind::Path { .. } => false,
        }
    }
}

/// A titled slice of the topology returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
    /// Human-readable description of the query.
    pub title: String,
    /// The vertex the query was anchored on.
    pub principal: VertexInfo,
    /// Whether transitive expansion was applied.
    pub all: bool,
    pub vertices: Vec<VertexInfo>,
    pub edges: Vec<Edge>,
    /// Vertices to emphasize. Path waypoints for path queries.
    pub highlights: Vec<VertexInfo>,
}

impl Subgraph {
    /// Keys of the included vertices, in order.
    pub fn vertex_keys(&self) -> Vec<&str> {
        self.vertices.iter().map(|v| v.key.as_str()).collect()
    }

    /// Keys of the included edges, in order.
    pub fn edge_keys(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.key.as_str()).collect()
    }

    /// Keys of the highlighted vertices, in order.
    pub fn highlight_keys(&self) -> Vec<&str> {
        self.highlights.iter().map(|v| v.key.as_str()).collect()
    }
}

/// Graph totals and the current unhealthy set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_vertices: usize,
    pub total_edges: usize,
    pub unhealthy_vertices: Vec<VertexInfo>,
}

/// Composes traversal output and health flags into a `Subgraph`.
pub struct SubgraphAssembler<'a> {
    graph: &'a TopologyGraph,
    health: &'a HealthOverlay,
}

impl<'a> SubgraphAssembler<'a> {
    pub fn new(graph: &'a TopologyGraph, health: &'a HealthOverlay) -> Self {
        Self { graph, health }
    }

    /// Runs the traversal for `kind` anchored on `principal`.
    pub fn assemble(&self, principal: NodeId, kind: QueryKind) -> Result<Subgraph> {
        let (traversal, highlight) = match kind {
            QueryKind::Dependents { all } => {
                (self.graph.reach(principal, Direction::Incoming, all)?, false)
            }
            QueryKind::Dependencies { all } => {
                (self.graph.reach(principal, Direction::Outgoing, all)?, false)
            }
            QueryKind::Neighbors => (self.graph.neighbors(principal)?, false),
            QueryKind::Path { to } => (
                self.graph
                    .shortest_path(principal, to)?
                    .unwrap_or_default(),
                true,
            ),
            QueryKind::Lineage => (self.graph.lineage(principal)?, false),
        };

        let title = self.title(principal, kind)?;

        // One read guard for the whole result so it is a single snapshot
        let view = self.health.read();
        let principal = self.info(&view, principal)?;
        let vertices = traversal
            .vertices
            .iter()
            .map(|&index| self.info(&view, index))
            .collect::<Result<Vec<_>>>()?;
        drop(view);

        let edges = self.edges(&traversal)?;
        let highlights = if highlight {
            vertices.clone()
        } else {
            Vec::new()
        };

        Ok(Subgraph {
            title,
            principal,
            all: kind.is_transitive(),
            vertices,
            edges,
            highlights,
        })
    }

    /// Builds the summary from one consistent health snapshot.
    pub fn summary(&self) -> Result<Summary> {
        let view = self.health.read();
        let unhealthy_vertices = view
            .unhealthy()
            .into_iter()
            .map(|index| self.info(&view, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Summary {
            total_vertices: self.graph.vertex_count(),
            total_edges: self.graph.edge_count(),
            unhealthy_vertices,
        })
    }

    /// Annotates a single vertex with its current health.
    pub fn vertex(&self, index: NodeId) -> Result<VertexInfo> {
        self.info(&self.health.read(), index)
    }

    fn info(&self, view: &HealthView<'_>, index: NodeId) -> Result<VertexInfo> {
        let vertex = self.graph.vertex_at(index)?;
        Ok(VertexInfo::new(vertex, view.is_healthy(index)?))
    }

    fn edges(&self, traversal: &Traversal) -> Result<Vec<Edge>> {
        traversal
            .edges
            .iter()
            .map(|&index| self.graph.edge_at(index).cloned())
            .collect()
    }

    fn title(&self, principal: NodeId, kind: QueryKind) -> Result<String> {
        let key = &self.graph.vertex_at(principal)?.key;
        Ok(match kind {
            QueryKind::Dependents { .. } => format!("dependents of {key}"),
            QueryKind::Dependencies { .. } => format!("dependencies of {key}"),
            QueryKind::Neighbors => format!("neighbors of {key}"),
            QueryKind::Path { to } => {
                format!("path from {key} to {}", self.graph.vertex_at(to)?.key)
            }
            QueryKind::Lineage => format!("lineage of {key}"),
        })
    }
}

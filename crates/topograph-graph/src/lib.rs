//! Topograph Graph - Dependency graph engine
//!
//! This crate holds the service topology in memory and answers questions
//! about it: who depends on a component, what it depends on, how two
//! components are connected, and which components are currently unhealthy.
//!
//! # Architecture
//!
//! - `TopologyGraph` stores vertices and edges in petgraph arenas with a key
//!   index. Structure never changes after the builder finishes.
//! - Traversals (BFS reachability, neighbors, shortest path, lineage) are
//!   methods on the graph and return plain index sets.
//! - `HealthOverlay` keeps the health flags behind one read/write lock.
//! - `SubgraphAssembler` joins traversal output with health into results.
//! - `HealthEngine` ties it together and is what adapters hold.
//!
//! # Example
//!
//! ```
//! use topograph_core::{Edge, Vertex};
//! use topograph_graph::{GraphBuilder, HealthEngine};
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_vertex(Vertex::new("api", "API Gateway")).unwrap();
//! builder.add_vertex(Vertex::new("db", "Orders DB")).unwrap();
//! builder.add_edge(Edge::new("api-db", "api", "db")).unwrap();
//!
//! let engine = HealthEngine::new(builder.build());
//! engine.set_vertex_health("db", false).unwrap();
//!
//! let dependents = engine.dependents("db", true).unwrap();
//! assert_eq!(dependents.vertex_keys(), vec!["api"]);
//! ```

mod builder;
mod engine;
mod graph;
mod health;
mod query;
mod traversal;

pub use builder::GraphBuilder;
pub use engine::HealthEngine;
pub use graph::{EdgeId, NodeId, TopologyGraph};
pub use health::{HealthOverlay, HealthView};
pub use query::{QueryKind, Subgraph, SubgraphAssembler, Summary};
pub use traversal::Traversal;

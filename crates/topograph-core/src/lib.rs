//! Topograph Core - Topology model for the health monitor
//!
//! This crate defines the data that flows through every other Topograph
//! crate: components (vertices), dependency relations (edges), the topology
//! document they are loaded from, and the error types shared by the engine
//! and its adapters.
//!
//! # Example
//!
//! ```
//! use topograph_core::Topology;
//!
//! let topology = Topology::from_json(r#"{
//!     "vertices": [
//!         {"key": "api", "label": "API Gateway", "class": "service"},
//!         {"key": "db", "label": "Orders DB", "class": "database"}
//!     ],
//!     "edges": [
//!         {"key": "api-db", "source": "api", "target": "db"}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(topology.vertices.len(), 2);
//! ```

mod error;
mod model;
mod topology;

pub use error::{GraphError, Result, TopologyError};
pub use model::{Edge, Vertex, VertexInfo};
pub use topology::Topology;

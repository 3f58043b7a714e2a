//! Vertices and edges of the service topology.
//!
//! A `Vertex` is the immutable part of a component: its key, display label
//! and class. Health is not stored here. The engine joins the live health
//! flag in at query time and hands out a `VertexInfo` instead.

use serde::{Deserialize, Serialize};

/// A component in the topology.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    /// Stable unique identifier.
    pub key: String,

    /// Display name.
    pub label: String,

    /// Free-form component class, e.g. "service" or "database".
    #[serde(default)]
    pub class: String,
}

impl Vertex {
    /// Creates a vertex with an empty class.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            class: String::new(),
        }
    }

    /// Sets the component class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }
}

/// A directed dependency: `source` depends on `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier.
    pub key: String,

    /// Key of the dependent vertex.
    pub source: String,

    /// Key of the vertex being depended on.
    pub target: String,

    /// Free-form relation class, e.g. "http" or "queue".
    #[serde(default)]
    pub class: String,
}

impl Edge {
    /// Creates an edge with an empty class.
    pub fn new(
        key: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
            target: target.into(),
            class: String::new(),
        }
    }

    /// Sets the relation class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }
}

/// A vertex annotated with its health at the time of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexInfo {
    pub key: String,
    pub label: String,
    pub class: String,
    pub healthy: bool,
}

impl VertexInfo {
    pub fn new(vertex: &Vertex, healthy: bool) -> Self {
        Self {
            key: vertex.key.clone(),
            label: vertex.label.clone(),
            class: vertex.class.clone(),
            healthy,
        }
    }
}

//! Health overlay for the topology graph.
//!
//! Health is the only state that changes after the graph is built. All of
//! it sits behind a single overlay-wide lock: readers share it, and a
//! writer holds it exclusively for one flag or for a bulk reset.

use crate::graph::NodeId;
use parking_lot::{RwLock, RwLockReadGuard};
use topograph_core::{GraphError, Result};

/// Per-vertex health flags, indexed by node index.
#[derive(Debug)]
pub struct HealthOverlay {
    flags: RwLock<Vec<bool>>,
}

impl HealthOverlay {
    /// Creates an overlay for `len` vertices, all healthy.
    pub fn new(len: usize) -> Self {
        Self {
            flags: RwLock::new(vec![true; len]),
        }
    }

    /// Sets one vertex's flag.
    ///
    /// Returns whether the stored value changed. Setting the value a vertex
    /// already has is a no-op.
    pub fn set(&self, index: NodeId, healthy: bool) -> Result<bool> {
        let mut flags = self.flags.write();
        let flag = flags.get_mut(index.index()).ok_or_else(|| {
            GraphError::Internal(format!("no health flag for index {}", index.index()))
        })?;

        let changed = *flag != healthy;
        *flag = healthy;
        Ok(changed)
    }

    /// Marks every vertex healthy.
    pub fn clear_all(&self) {
        self.flags.write().fill(true);
    }

    /// Takes a read snapshot for annotating several vertices consistently.
    pub fn read(&self) -> HealthView<'_> {
        HealthView {
            flags: self.flags.read(),
        }
    }

    /// Returns the indexes of all unhealthy vertices in insertion order.
    pub fn unhealthy(&self) -> Vec<NodeId> {
        self.read().unhealthy()
    }

    /// Returns the number of tracked vertices.
    pub fn len(&self) -> usize {
        self.flags.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A consistent view of the overlay.
///
/// Writers are blocked for as long as the view is alive.
pub struct HealthView<'a> {
    flags: RwLockReadGuard<'a, Vec<bool>>,
}

impl HealthView<'_> {
    /// Gets the flag for a vertex.
    pub fn is_healthy(&self, index: NodeId) -> Result<bool> {
        self.flags.get(index.index()).copied().ok_or_else(|| {
            GraphError::Internal(format!("no health flag for index {}", index.index()))
        })
    }

    /// Indexes of all unhealthy vertices in insertion order.
    pub fn unhealthy(&self) -> Vec<NodeId> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, healthy)| !**healthy)
            .map(|(index, _)| NodeId::new(index))
            .collect()
    }
}

//! [`SharedGraph`]: a graph behind a reader-writer lock.
//!
//! Searches take the shared (read) side for their whole run; structural
//! mutation takes the exclusive (write) side. Search engines keep their
//! scratch state and caches to themselves, so any number of searches may
//! run concurrently on one graph.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::graph::Graph;

/// Cloneable handle to a [`Graph`] guarded by a reader-writer lock.
///
/// Cloning the handle shares the same graph.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<Graph>>,
}

impl SharedGraph {
    pub fn new(graph: Graph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Shared access. Blocks while a writer holds the lock.
    pub fn read(&self) -> RwLockReadGuard<'_, Graph> {
        self.inner.read()
    }

    /// Exclusive access. Blocks until all readers are gone.
    pub fn write(&self) -> RwLockWriteGuard<'_, Graph> {
        self.inner.write()
    }

    /// Run `f` with exclusive access and return its result.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Current structural version (takes the read lock briefly).
    pub fn version(&self) -> u64 {
        self.inner.read().version()
    }

    /// Whether both handles point at the same graph.
    pub fn ptr_eq(&self, other: &SharedGraph) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Graph> for SharedGraph {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

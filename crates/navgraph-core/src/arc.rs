//! Directed weighted edges.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::error::GraphError;
use crate::node::NodeId;

/// Names an arc by its ordered endpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcKey {
    pub from: NodeId,
    pub to: NodeId,
}

impl ArcKey {
    #[inline]
    pub const fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// The same endpoints in the opposite direction.
    #[inline]
    pub const fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for ArcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A directed edge between two distinct nodes.
///
/// The length is the Euclidean distance between the endpoint positions. It
/// is computed on first use and kept until either endpoint moves. Two arcs
/// are equal when they join the same ordered pair, whatever their weight.
#[derive(Debug, Clone)]
pub struct Arc {
    start: NodeId,
    end: NodeId,
    weight: f64,
    pub(crate) passable: bool,
    length: OnceLock<f64>,
}

impl Arc {
    pub(crate) fn new(start: NodeId, end: NodeId, weight: f64) -> Result<Self, GraphError> {
        if start == end {
            return Err(GraphError::SameEndpoints(start));
        }
        check_weight(weight)?;
        Ok(Self {
            start,
            end,
            weight,
            passable: true,
            length: OnceLock::new(),
        })
    }

    #[inline]
    pub fn start(&self) -> NodeId {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NodeId {
        self.end
    }

    #[inline]
    pub fn key(&self) -> ArcKey {
        ArcKey::new(self.start, self.end)
    }

    /// Cost multiplier applied to the length.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: f64) -> Result<(), GraphError> {
        check_weight(weight)?;
        self.weight = weight;
        Ok(())
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// The cached length, if it has been computed since the endpoints last
    /// moved.
    pub fn cached_length(&self) -> Option<f64> {
        self.length.get().copied()
    }

    pub(crate) fn length_or_init(&self, compute: impl FnOnce() -> f64) -> f64 {
        *self.length.get_or_init(compute)
    }

    pub(crate) fn invalidate_length(&mut self) {
        self.length.take();
    }
}

impl PartialEq for Arc {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Arc {}

impl Hash for Arc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} (w={})", self.start, self.end, self.weight)
    }
}

fn check_weight(weight: f64) -> Result<(), GraphError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight(weight))
    }
}

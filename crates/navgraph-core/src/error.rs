use std::fmt;

use crate::node::NodeId;

/// Errors raised by graph mutation and geometry helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The node is not part of the graph.
    NodeNotFound(NodeId),
    /// An arc was requested from a node to itself.
    SameEndpoints(NodeId),
    /// An arc for this ordered pair is already registered.
    ArcExists { from: NodeId, to: NodeId },
    /// No arc for this ordered pair.
    ArcNotFound { from: NodeId, to: NodeId },
    /// Arc weights must be finite and non-negative.
    InvalidWeight(f64),
    /// A zero-length vector cannot be normalized.
    ZeroLengthVector,
    /// Every node id of the `u32` id space has been handed out.
    CapacityExceeded,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id} is not in the graph"),
            Self::SameEndpoints(id) => write!(f, "arc endpoints are both {id}"),
            Self::ArcExists { from, to } => write!(f, "arc {from} -> {to} already exists"),
            Self::ArcNotFound { from, to } => write!(f, "no arc {from} -> {to}"),
            Self::InvalidWeight(w) => write!(f, "invalid arc weight {w}"),
            Self::ZeroLengthVector => write!(f, "cannot normalize a zero-length vector"),
            Self::CapacityExceeded => write!(f, "graph has run out of node ids"),
        }
    }
}

impl std::error::Error for GraphError {}

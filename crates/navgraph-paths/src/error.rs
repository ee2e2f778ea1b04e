use std::fmt;

use navgraph_core::GraphError;

/// Errors raised by the search engines.
///
/// A search that completes without reaching its target is not an error; it
/// returns `Ok(false)`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// A caller-supplied value is unusable (missing endpoint, balance
    /// outside `[0, 1]`, ...).
    InvalidArgument(String),
    /// The engine is not in a state that allows the call (results read
    /// before a search ended, engine used on a graph it was not bound to).
    InvalidOperation(&'static str),
    /// A wave cache entry or back-pointer chain does not lead to the target.
    /// Handled inside the wave engine; never returned by a public search.
    CacheInconsistency(String),
    /// A search tree outgrew the `u32` track id space.
    CapacityExceeded,
    /// A graph operation failed.
    Graph(GraphError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(s) => write!(f, "invalid argument: {s}"),
            Self::InvalidOperation(s) => write!(f, "invalid operation: {s}"),
            Self::CacheInconsistency(s) => write!(f, "wave cache inconsistency: {s}"),
            Self::CapacityExceeded => write!(f, "search ran out of track ids"),
            Self::Graph(e) => write!(f, "graph error: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for SearchError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

use navgraph_core::{ArcKey, Graph, NodeId, Point3};

use crate::error::SearchError;
use crate::path::SearchPath;

/// Query surface shared by every search engine.
///
/// An engine is bound to one graph instance when created. Results of the
/// last search stay readable until the next `search`, `reset` or `rebase`.
/// Every result accessor fails with [`SearchError::InvalidOperation`] until
/// a search has ended.
pub trait PathSearch {
    /// Search for a path from `start` to `end`. `Ok(false)` means the search
    /// completed without reaching `end`.
    fn search(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Result<bool, SearchError>;

    fn search_ended(&self) -> bool;

    fn path_found(&self) -> bool;

    /// The path found by the last search, or `None` if there was none.
    fn path(&self) -> Result<Option<&SearchPath>, SearchError>;

    /// Forget the last result and any cached state, keeping the graph
    /// binding.
    fn reset(&mut self);

    /// Bind the engine to another graph instance, clearing all cached state.
    fn rebase(&mut self, graph: &Graph);

    /// Node sequence of the path; empty if none was found.
    fn path_nodes(&self) -> Result<Vec<NodeId>, SearchError> {
        Ok(self.path()?.map(|p| p.nodes().to_vec()).unwrap_or_default())
    }

    fn path_arcs(&self) -> Result<Vec<ArcKey>, SearchError> {
        Ok(self.path()?.map(SearchPath::arcs).unwrap_or_default())
    }

    fn path_coordinates(&self, graph: &Graph) -> Result<Vec<Point3>, SearchError> {
        Ok(self
            .path()?
            .map(|p| p.coordinates(graph))
            .unwrap_or_default())
    }

    /// Number of arcs on the path; 0 if none was found.
    fn arc_count(&self) -> Result<usize, SearchError> {
        Ok(self.path()?.map_or(0, SearchPath::arc_count))
    }

    /// Total `weight * length` of the path; infinite if none was found.
    fn cost(&self) -> Result<f64, SearchError> {
        Ok(self.path()?.map_or(f64::INFINITY, SearchPath::cost))
    }
}

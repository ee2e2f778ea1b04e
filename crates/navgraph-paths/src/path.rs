use navgraph_core::{ArcKey, Graph, NodeId, Point3};

use crate::error::SearchError;

/// A path found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath {
    nodes: Vec<NodeId>,
    cost: f64,
    length: f64,
}

impl SearchPath {
    pub(crate) fn new(nodes: Vec<NodeId>, cost: f64, length: f64) -> Self {
        Self {
            nodes,
            cost,
            length,
        }
    }

    /// Build a path from a node sequence, summing cost and length over the
    /// arcs joining consecutive nodes.
    ///
    /// Returns `None` if some consecutive pair is not joined by an arc.
    pub fn from_nodes(graph: &Graph, nodes: Vec<NodeId>) -> Option<Self> {
        let mut cost = 0.0;
        let mut length = 0.0;
        for pair in nodes.windows(2) {
            let arc = graph.arc(pair[0], pair[1])?;
            cost += graph.arc_cost(arc);
            length += graph.arc_length(arc);
        }
        Some(Self::new(nodes, cost, length))
    }

    /// Nodes from start to end, both included.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Sum of `weight * length` over the arcs.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Sum of arc lengths.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn arc_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn arcs(&self) -> Vec<ArcKey> {
        self.nodes
            .windows(2)
            .map(|pair| ArcKey::new(pair[0], pair[1]))
            .collect()
    }

    /// Positions of the path nodes. Nodes removed from `graph` since the
    /// search are skipped.
    pub fn coordinates(&self, graph: &Graph) -> Vec<Point3> {
        self.nodes.iter().filter_map(|&id| graph.position(id)).collect()
    }
}

/// Where an engine stands between searches.
#[derive(Debug, Clone, Default)]
pub(crate) enum SearchState {
    #[default]
    Idle,
    Ended(Option<SearchPath>),
}

impl SearchState {
    pub(crate) fn ended(&self) -> bool {
        matches!(self, SearchState::Ended(_))
    }

    pub(crate) fn found(&self) -> bool {
        matches!(self, SearchState::Ended(Some(_)))
    }

    pub(crate) fn path(&self) -> Result<Option<&SearchPath>, SearchError> {
        match self {
            SearchState::Idle => Err(SearchError::InvalidOperation(
                "search results read before a search ended",
            )),
            SearchState::Ended(path) => Ok(path.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_nodes_sums_arcs() {
        let mut g = Graph::new();
        let a = g.add_node(Point3::new(1.0, 0.0, 0.0));
        let b = g.add_node(Point3::new(2.0, 0.0, 0.0));
        let c = g.add_node(Point3::new(2.0, 2.0, 0.0));
        g.connect(a, b, 3.0).unwrap();
        g.connect(b, c, 1.0).unwrap();

        let p = SearchPath::from_nodes(&g, vec![a, b, c]).unwrap();
        assert_eq!(p.cost(), 5.0);
        assert_eq!(p.length(), 3.0);
        assert_eq!(p.arc_count(), 2);
        assert_eq!(p.arcs(), vec![ArcKey::new(a, b), ArcKey::new(b, c)]);
        assert_eq!(p.start(), Some(a));
        assert_eq!(p.end(), Some(c));
        assert_eq!(
            p.coordinates(&g),
            vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 2.0, 0.0)
            ]
        );
        assert!(SearchPath::from_nodes(&g, vec![a, c]).is_none());
    }

    #[test]
    fn idle_state_refuses_results() {
        let s = SearchState::Idle;
        assert!(!s.ended());
        assert!(matches!(s.path(), Err(SearchError::InvalidOperation(_))));
        let s = SearchState::Ended(None);
        assert!(s.ended());
        assert!(!s.found());
        assert_eq!(s.path(), Ok(None));
    }
}

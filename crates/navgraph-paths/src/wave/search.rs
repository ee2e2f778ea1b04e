use navgraph_core::{Graph, NodeId};

use super::source::WaveSource;
use crate::config::WaveConfig;
use crate::error::SearchError;
use crate::path::{SearchPath, SearchState};
use crate::traits::PathSearch;

/// Path search answered from a [`WaveSource`]'s cache when possible.
///
/// A query reuses the cached wave if `start` already has a settled weight
/// toward `end`, and only propagates further otherwise. Unusable endpoints
/// (absent, impassable, or at the origin) are reported as "not found"
/// rather than as errors.
#[derive(Debug, Clone)]
pub struct WaveSearch {
    source: WaveSource,
    state: SearchState,
    relaxations: usize,
    cache_hit: bool,
}

impl WaveSearch {
    pub fn new(graph: &Graph) -> Self {
        Self::with_config(graph, WaveConfig::default())
    }

    pub fn with_config(graph: &Graph, config: WaveConfig) -> Self {
        Self {
            source: WaveSource::with_config(graph, config),
            state: SearchState::Idle,
            relaxations: 0,
            cache_hit: false,
        }
    }

    pub fn source(&self) -> &WaveSource {
        &self.source
    }

    #[cfg(test)]
    pub(crate) fn source_mut(&mut self) -> &mut WaveSource {
        &mut self.source
    }

    /// Relaxations performed by the last search; 0 when it was answered
    /// entirely from the cache.
    pub fn relaxations(&self) -> usize {
        self.relaxations
    }

    /// Whether the last search was answered without propagating.
    pub fn cache_hit(&self) -> bool {
        self.cache_hit
    }

    /// Sum of arc lengths along the path; infinite if none was found.
    pub fn path_length(&self) -> Result<f64, SearchError> {
        Ok(self.state.path()?.map_or(f64::INFINITY, SearchPath::length))
    }

    fn usable_endpoint(graph: &Graph, id: NodeId) -> bool {
        graph
            .node(id)
            .is_some_and(|n| n.is_passable() && !n.position().is_origin())
    }

    fn found(&mut self, path: SearchPath) -> bool {
        self.state = SearchState::Ended(Some(path));
        true
    }

    fn not_found(&mut self) -> bool {
        self.state = SearchState::Ended(None);
        false
    }
}

impl PathSearch for WaveSearch {
    fn search(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Result<bool, SearchError> {
        if graph.id() != self.source.graph_id() {
            return Err(SearchError::InvalidOperation(
                "engine used on a graph it is not bound to; rebase it first",
            ));
        }
        self.state = SearchState::Idle;
        self.relaxations = 0;
        self.cache_hit = false;

        if !Self::usable_endpoint(graph, start) || !Self::usable_endpoint(graph, end) {
            log::debug!("wave {start} -> {end}: unusable endpoint");
            return Ok(self.not_found());
        }

        self.source.retarget(graph, end)?;

        if self.source.is_settled(start) {
            match self.source.reconstruct(graph, start) {
                Ok(path) => {
                    self.cache_hit = true;
                    log::debug!("wave {start} -> {end}: cache hit");
                    return Ok(self.found(path));
                }
                Err(e) => log::debug!("wave {start} -> {end}: cached chain unusable: {e}"),
            }
        }

        self.relaxations = self.source.propagate(graph, start)?;

        match self.source.reconstruct(graph, start) {
            Ok(path) => {
                log::debug!(
                    "wave {start} -> {end}: found after {} relaxations",
                    self.relaxations
                );
                Ok(self.found(path))
            }
            Err(e) => {
                if self.source.is_settled(start) {
                    log::warn!("wave {start} -> {end}: clearing cache: {e}");
                } else {
                    log::debug!("wave {start} -> {end}: unreachable");
                }
                self.source.invalidate();
                Ok(self.not_found())
            }
        }
    }

    fn search_ended(&self) -> bool {
        self.state.ended()
    }

    fn path_found(&self) -> bool {
        self.state.found()
    }

    fn path(&self) -> Result<Option<&SearchPath>, SearchError> {
        self.state.path()
    }

    fn reset(&mut self) {
        self.source.invalidate();
        self.state = SearchState::Idle;
        self.relaxations = 0;
        self.cache_hit = false;
    }

    fn rebase(&mut self, graph: &Graph) {
        self.source.rebase(graph);
        self.state = SearchState::Idle;
        self.relaxations = 0;
        self.cache_hit = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgraph_core::{Lattice, Point3};
    use rand::{Rng, SeedableRng};

    /// Reverse Bellman-Ford by arc length over usable arcs: exact distance
    /// from every node to `end`, infinite where unreachable.
    fn lengths_to(g: &Graph, end: NodeId) -> Vec<f64> {
        let mut dist = vec![f64::INFINITY; g.slot_count()];
        dist[end.index()] = 0.0;
        for _ in 0..g.node_count() {
            let mut changed = false;
            for arc in g.arcs() {
                if !arc.is_passable() || !g.is_passable(arc.start()) || !g.is_passable(arc.end()) {
                    continue;
                }
                let cand = dist[arc.end().index()] + g.arc_length(arc);
                if cand < dist[arc.start().index()] {
                    dist[arc.start().index()] = cand;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        dist
    }

    fn grid() -> Lattice {
        Lattice::new(5, 5, 1, 1.0, 1.0).unwrap()
    }

    #[test]
    fn repeated_query_hits_cache() {
        let l = grid();
        let g = &l.graph;
        let start = l.at(0, 0, 0).unwrap();
        let end = l.at(4, 3, 0).unwrap();
        let mut w = WaveSearch::new(g);

        assert!(w.search(g, start, end).unwrap());
        assert!(w.relaxations() > 0);
        assert!(!w.cache_hit());
        let first = w.path_nodes().unwrap();
        assert_eq!(w.path_length().unwrap(), 7.0);

        assert!(w.search(g, start, end).unwrap());
        assert_eq!(w.relaxations(), 0);
        assert!(w.cache_hit());
        assert_eq!(w.path_nodes().unwrap(), first);
    }

    #[test]
    fn nodes_settled_earlier_are_cache_hits() {
        let l = grid();
        let g = &l.graph;
        let end = l.at(4, 4, 0).unwrap();
        let mut w = WaveSearch::new(g);
        w.search(g, l.at(0, 0, 0).unwrap(), end).unwrap();
        // Closer to the target than the first start, so already settled.
        assert!(w.search(g, l.at(3, 4, 0).unwrap(), end).unwrap());
        assert!(w.cache_hit());
        assert_eq!(w.path_length().unwrap(), 1.0);
    }

    #[test]
    fn mutation_forces_recompute() {
        let mut l = grid();
        let start = l.at(0, 0, 0).unwrap();
        let end = l.at(4, 0, 0).unwrap();
        let mut w = WaveSearch::new(&l.graph);
        w.search(&l.graph, start, end).unwrap();
        let version = l.graph.version();

        let a = l.at(1, 0, 0).unwrap();
        let b = l.at(2, 0, 0).unwrap();
        l.graph.disconnect(a, b).unwrap();
        assert_ne!(l.graph.version(), version);

        assert!(w.search(&l.graph, start, end).unwrap());
        assert!(w.relaxations() > 0);
        assert!(!w.cache_hit());
        let nodes = w.path_nodes().unwrap();
        assert!(!nodes.windows(2).any(|p| p[0] == a && p[1] == b));
        assert_eq!(w.path_length().unwrap(), 6.0);
    }

    #[test]
    fn blocked_node_is_avoided_after_cache() {
        let mut l = grid();
        let start = l.at(0, 0, 0).unwrap();
        let end = l.at(4, 0, 0).unwrap();
        let mut w = WaveSearch::new(&l.graph);
        w.search(&l.graph, start, end).unwrap();
        assert_eq!(w.path_length().unwrap(), 4.0);

        let wall = l.at(2, 0, 0).unwrap();
        l.graph.set_node_passable(wall, false).unwrap();
        assert!(w.search(&l.graph, start, end).unwrap());
        assert!(!w.path_nodes().unwrap().contains(&wall));
        assert_eq!(w.path_length().unwrap(), 6.0);
    }

    #[test]
    fn unusable_endpoints_are_not_found() {
        let mut g = Graph::new();
        let origin = g.add_node(Point3::ORIGIN);
        let a = g.add_node(Point3::new(1.0, 0.0, 0.0));
        let b = g.add_node(Point3::new(2.0, 0.0, 0.0));
        let c = g.add_node(Point3::new(3.0, 0.0, 0.0));
        g.connect_both(origin, a, 1.0).unwrap();
        g.connect_both(a, b, 1.0).unwrap();
        g.connect_both(b, c, 1.0).unwrap();
        g.set_node_passable(c, false).unwrap();
        let gone = g.add_node(Point3::new(4.0, 0.0, 0.0));
        g.remove_node(gone).unwrap();

        let mut w = WaveSearch::new(&g);
        for (s, e) in [(origin, b), (b, origin), (a, c), (c, a), (a, gone), (gone, a)] {
            assert!(!w.search(&g, s, e).unwrap());
            assert!(w.search_ended());
            assert!(!w.path_found());
            assert_eq!(w.path_nodes().unwrap(), Vec::<NodeId>::new());
        }
        assert!(w.search(&g, a, b).unwrap());
    }

    #[test]
    fn disconnected_target_clears_cache() {
        let mut g = Graph::new();
        let a = g.add_node(Point3::new(1.0, 1.0, 1.0));
        let b = g.add_node(Point3::new(2.0, 1.0, 1.0));
        let c = g.add_node(Point3::new(5.0, 5.0, 5.0));
        g.connect_both(a, b, 1.0).unwrap();

        let mut w = WaveSearch::new(&g);
        assert!(!w.search(&g, a, c).unwrap());
        assert_eq!(w.source().target(), None);
        assert_eq!(w.cost().unwrap(), f64::INFINITY);
        assert_eq!(w.path_length().unwrap(), f64::INFINITY);
    }

    #[test]
    fn corrupt_cache_is_cleared() {
        let l = grid();
        let g = &l.graph;
        let start = l.at(0, 0, 0).unwrap();
        let end = l.at(4, 4, 0).unwrap();
        let mut w = WaveSearch::new(g);
        w.search(g, start, end).unwrap();

        // Point start at a node it has no arc to.
        let far = l.at(3, 3, 0).unwrap();
        w.source_mut().inject_weight(start, 1.0, Some(far));
        assert!(!w.search(g, start, end).unwrap());
        assert_eq!(w.source().target(), None);

        assert!(w.search(g, start, end).unwrap());
        assert_eq!(w.path_length().unwrap(), 8.0);
    }

    #[test]
    fn lengths_match_brute_force_on_random_graphs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xa11e);
        for _ in 0..20 {
            let mut g = Graph::new();
            let ids: Vec<NodeId> = (0..30)
                .map(|_| {
                    g.add_node(Point3::new(
                        rng.random_range(1.0..10.0),
                        rng.random_range(1.0..10.0),
                        rng.random_range(1.0..10.0),
                    ))
                })
                .collect();
            for _ in 0..100 {
                let a = ids[rng.random_range(0..ids.len())];
                let b = ids[rng.random_range(0..ids.len())];
                if a != b && g.arc(a, b).is_none() {
                    g.connect(a, b, rng.random_range(0.5..3.0)).unwrap();
                }
            }
            for &id in ids.iter().skip(1).take(4) {
                g.set_node_passable(id, false).unwrap();
            }

            // One engine and one target per graph, so later starts resume
            // the frontier left by earlier ones.
            let end = ids[0];
            let expected = lengths_to(&g, end);
            let mut w = WaveSearch::new(&g);
            for _ in 0..20 {
                let start = ids[rng.random_range(0..ids.len())];
                let want = if g.is_passable(start) {
                    expected[start.index()]
                } else {
                    f64::INFINITY
                };
                let found = w.search(&g, start, end).unwrap();
                assert_eq!(found, want.is_finite());
                if found {
                    assert!((w.path_length().unwrap() - want).abs() < 1e-9);
                    let nodes = w.path_nodes().unwrap();
                    let path = SearchPath::from_nodes(&g, nodes).unwrap();
                    assert!((path.length() - want).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn results_need_a_search() {
        let l = grid();
        let mut w = WaveSearch::new(&l.graph);
        assert!(matches!(w.path_nodes(), Err(SearchError::InvalidOperation(_))));
        assert!(matches!(w.path_length(), Err(SearchError::InvalidOperation(_))));
        w.search(&l.graph, l.at(0, 0, 0).unwrap(), l.at(1, 1, 0).unwrap())
            .unwrap();
        w.reset();
        assert!(!w.search_ended());
        assert!(w.path_arcs().is_err());
    }

    #[test]
    fn rebase_switches_graphs() {
        let l = grid();
        let copy = l.graph.clone();
        let start = l.at(0, 0, 0).unwrap();
        let end = l.at(2, 2, 0).unwrap();
        let mut w = WaveSearch::new(&l.graph);
        assert!(matches!(
            w.search(&copy, start, end),
            Err(SearchError::InvalidOperation(_))
        ));
        w.rebase(&copy);
        assert!(w.search(&copy, start, end).unwrap());
        assert_eq!(w.arc_count().unwrap(), 4);
    }
}

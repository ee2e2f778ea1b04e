use navgraph_core::{Graph, NodeId, SharedGraph};

use crate::astar::AStarSearch;
use crate::config::{SearchConfig, WaveConfig};
use crate::error::SearchError;
use crate::path::SearchPath;
use crate::stats::{NoStats, SearchOutcome, SearchStats};
use crate::traits::PathSearch;
use crate::wave::WaveSearch;

/// Which engine produced the last dispatched result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Engine {
    Wave,
    AStar,
}

/// Front door for path queries: cached wave search first, A* when the wave
/// cannot answer.
///
/// Result accessors reflect whichever engine answered the last query.
#[derive(Debug, Clone)]
pub struct SearchDispatcher<S: SearchStats = NoStats> {
    wave: WaveSearch,
    astar: AStarSearch,
    stats: S,
    engine: Option<Engine>,
    fallbacks: usize,
}

impl SearchDispatcher<NoStats> {
    pub fn new(graph: &Graph) -> Self {
        Self::with_stats(graph, NoStats)
    }
}

impl<S: SearchStats> SearchDispatcher<S> {
    pub fn with_stats(graph: &Graph, stats: S) -> Self {
        Self {
            wave: WaveSearch::new(graph),
            astar: AStarSearch::new(graph),
            stats,
            engine: None,
            fallbacks: 0,
        }
    }

    pub fn with_configs(graph: &Graph, config: SearchConfig, wave: WaveConfig, stats: S) -> Self {
        Self {
            wave: WaveSearch::with_config(graph, wave),
            astar: AStarSearch::with_config(graph, config),
            stats,
            engine: None,
            fallbacks: 0,
        }
    }

    /// Configure the A* fallback.
    pub fn set_config(&mut self, config: SearchConfig) {
        self.astar.set_config(config);
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    pub fn into_stats(self) -> S {
        self.stats
    }

    /// Engine that answered the last query, if it completed.
    pub fn engine(&self) -> Option<Engine> {
        self.engine
    }

    /// Queries handed over to A* so far.
    pub fn fallbacks(&self) -> usize {
        self.fallbacks
    }

    pub fn wave(&self) -> &WaveSearch {
        &self.wave
    }

    pub fn astar(&self) -> &AStarSearch {
        &self.astar
    }

    #[cfg(test)]
    pub(crate) fn wave_mut(&mut self) -> &mut WaveSearch {
        &mut self.wave
    }

    /// Run a query while holding the read lock of `graph`.
    pub fn search_shared(
        &mut self,
        graph: &SharedGraph,
        start: NodeId,
        end: NodeId,
    ) -> Result<bool, SearchError> {
        let guard = graph.read();
        self.search(&guard, start, end)
    }

    fn active(&self) -> Option<&dyn PathSearch> {
        let engine: &dyn PathSearch = match self.engine? {
            Engine::Wave => &self.wave,
            Engine::AStar => &self.astar,
        };
        Some(engine)
    }

    fn run(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Result<bool, SearchError> {
        match self.wave.search(graph, start, end) {
            Ok(true) => {
                self.engine = Some(Engine::Wave);
                return Ok(true);
            }
            Ok(false) => log::debug!("wave found no path {start} -> {end}; trying A*"),
            Err(e) => log::debug!("wave search {start} -> {end} failed: {e}; trying A*"),
        }
        self.fallbacks += 1;
        let found = self.astar.search(graph, start, end)?;
        self.engine = Some(Engine::AStar);
        Ok(found)
    }
}

impl<S: SearchStats> PathSearch for SearchDispatcher<S> {
    fn search(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Result<bool, SearchError> {
        self.engine = None;
        self.stats.search_started(end);
        let result = self.run(graph, start, end);
        let outcome = match &result {
            Ok(_) => SearchOutcome::from_path(self.path()?),
            Err(_) => SearchOutcome::NOT_FOUND,
        };
        self.stats.search_finished(end, outcome);
        result
    }

    fn search_ended(&self) -> bool {
        self.active().is_some_and(|e| e.search_ended())
    }

    fn path_found(&self) -> bool {
        self.active().is_some_and(|e| e.path_found())
    }

    fn path(&self) -> Result<Option<&SearchPath>, SearchError> {
        match self.engine {
            Some(Engine::Wave) => self.wave.path(),
            Some(Engine::AStar) => self.astar.path(),
            None => Err(SearchError::InvalidOperation(
                "search results read before a search ended",
            )),
        }
    }

    fn reset(&mut self) {
        self.wave.reset();
        self.astar.reset();
        self.engine = None;
    }

    fn rebase(&mut self, graph: &Graph) {
        self.wave.rebase(graph);
        self.astar.rebase(graph);
        self.engine = None;
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::stats::TargetTally;
    use navgraph_core::{Lattice, Point3};

    fn diamond() -> (Graph, [NodeId; 4]) {
        let mut g = Graph::new();
        let a = g.add_node(Point3::new(0.0, 0.0, 1.0));
        let b = g.add_node(Point3::new(1.0, 0.0, 1.0));
        let c = g.add_node(Point3::new(0.0, 1.0, 1.0));
        let d = g.add_node(Point3::new(1.0, 1.0, 1.0));
        g.connect(a, b, 1.0).unwrap();
        g.connect(a, c, 2.0).unwrap();
        g.connect(b, d, 1.0).unwrap();
        g.connect(c, d, 1.0).unwrap();
        (g, [a, b, c, d])
    }

    #[test]
    fn wave_answers_when_it_can() {
        let l = Lattice::new(4, 4, 2, 1.0, 1.0).unwrap();
        let g = &l.graph;
        let start = l.at(0, 0, 0).unwrap();
        let end = l.at(3, 3, 1).unwrap();
        let mut d = SearchDispatcher::new(g);
        assert!(d.search(g, start, end).unwrap());
        assert_eq!(d.engine(), Some(Engine::Wave));
        assert_eq!(d.arc_count().unwrap(), 7);
        assert!(d.search(g, start, end).unwrap());
        assert!(d.wave().cache_hit());
        assert_eq!(d.fallbacks(), 0);
    }

    #[test]
    fn corrupt_cache_falls_back_to_astar() {
        let (g, [a, _, _, dn]) = diamond();
        let mut d = SearchDispatcher::with_configs(
            &g,
            SearchConfig::dijkstra(),
            WaveConfig::default(),
            NoStats,
        );
        assert!(d.search(&g, a, dn).unwrap());
        assert_eq!(d.engine(), Some(Engine::Wave));

        // a -> a has no arc, so the cached chain is broken.
        d.wave_mut().source_mut().inject_weight(a, 0.5, Some(a));
        assert!(d.search(&g, a, dn).unwrap());
        assert_eq!(d.engine(), Some(Engine::AStar));
        assert_eq!(d.fallbacks(), 1);

        let mut direct = AStarSearch::with_config(&g, SearchConfig::dijkstra());
        direct.search(&g, a, dn).unwrap();
        assert_eq!(d.path_nodes().unwrap(), direct.path_nodes().unwrap());
        assert_eq!(d.cost().unwrap(), direct.cost().unwrap());
        assert_eq!(d.cost().unwrap(), 2.0);
    }

    #[test]
    fn origin_endpoint_falls_back() {
        let mut g = Graph::new();
        let o = g.add_node(Point3::ORIGIN);
        let a = g.add_node(Point3::new(1.0, 0.0, 0.0));
        g.connect(o, a, 1.0).unwrap();
        let mut d = SearchDispatcher::new(&g);
        assert!(d.search(&g, o, a).unwrap());
        assert_eq!(d.engine(), Some(Engine::AStar));
        assert_eq!(d.path_nodes().unwrap(), vec![o, a]);
    }

    #[test]
    fn missing_node_is_an_error() {
        let (mut g, [a, b, ..]) = diamond();
        g.remove_node(b).unwrap();
        let mut d = SearchDispatcher::with_stats(&g, TargetTally::new());
        assert!(matches!(
            d.search(&g, a, b),
            Err(SearchError::InvalidArgument(_))
        ));
        assert!(!d.search_ended());
        assert!(d.path_nodes().is_err());
        assert_eq!(d.stats().get(b).not_found, 1);
    }

    #[test]
    fn not_found_is_reported_by_astar() {
        let (mut g, [a, b, c, dn]) = diamond();
        g.disconnect(b, dn).unwrap();
        g.disconnect(c, dn).unwrap();
        let mut d = SearchDispatcher::new(&g);
        assert!(!d.search(&g, a, dn).unwrap());
        assert_eq!(d.engine(), Some(Engine::AStar));
        assert!(d.search_ended());
        assert!(!d.path_found());
        assert_eq!(d.cost().unwrap(), f64::INFINITY);
    }

    #[test]
    fn stats_see_every_query() {
        let (g, [a, b, c, dn]) = diamond();
        let mut d = SearchDispatcher::with_stats(&g, TargetTally::new());
        d.search(&g, a, dn).unwrap();
        d.search(&g, c, dn).unwrap();
        d.search(&g, dn, a).unwrap();
        d.search(&g, a, b).unwrap();

        let t = d.into_stats();
        assert_eq!(t.get(dn).started, 2);
        assert_eq!(t.get(dn).found, 2);
        assert_eq!(t.get(dn).hops, 3);
        assert_eq!(t.get(a).not_found, 1);
        assert_eq!(t.total(), 4);
        assert_eq!(t.popular()[0], (dn, 2));
    }

    #[test]
    fn shared_graph_across_threads() {
        let l = Lattice::new(6, 6, 3, 1.0, 1.0).unwrap();
        let ids = l.ids().to_vec();
        let shared = SharedGraph::new(l.graph);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                let ids = ids.clone();
                thread::spawn(move || {
                    let mut d = SearchDispatcher::new(&shared.read());
                    let end = ids[t];
                    let mut costs = Vec::new();
                    for &start in ids.iter().rev().take(10) {
                        assert!(d.search_shared(&shared, start, end).unwrap());
                        costs.push(d.cost().unwrap());
                    }
                    costs
                })
            })
            .collect();

        let graph = shared.read();
        for (t, h) in handles.into_iter().enumerate() {
            let costs = h.join().unwrap();
            let mut check = AStarSearch::with_config(&graph, SearchConfig::dijkstra());
            for (&start, cost) in ids.iter().rev().take(10).zip(costs) {
                check.search(&graph, start, ids[t]).unwrap();
                assert!((check.cost().unwrap() - cost).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn writer_changes_are_seen() {
        let (g, [a, b, c, dn]) = diamond();
        let shared = SharedGraph::from(g);
        let mut d = SearchDispatcher::new(&shared.read());
        d.search_shared(&shared, a, dn).unwrap();
        assert_eq!(d.path_nodes().unwrap(), vec![a, b, dn]);

        shared.mutate(|g| g.set_node_passable(b, false)).unwrap();
        d.search_shared(&shared, a, dn).unwrap();
        assert_eq!(d.path_nodes().unwrap(), vec![a, c, dn]);
        assert!(d.wave().relaxations() > 0);
    }

    #[test]
    fn rebase_and_reset() {
        let (g, [a, _, _, dn]) = diamond();
        let copy = g.clone();
        let mut d = SearchDispatcher::new(&g);
        assert!(d.search(&copy, a, dn).is_err());
        d.rebase(&copy);
        assert!(d.search(&copy, a, dn).unwrap());
        d.reset();
        assert_eq!(d.engine(), None);
        assert!(d.path().is_err());
    }
}

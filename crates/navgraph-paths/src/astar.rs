//! Best-first search with a tunable Dijkstra-heuristic balance.

use navgraph_core::{Graph, GraphId, NodeId, Point3};

use crate::config::{Balance, SearchConfig};
use crate::distance::Heuristic;
use crate::error::SearchError;
use crate::path::{SearchPath, SearchState};
use crate::sortable::SortableList;
use crate::track::{Track, TrackArena, TrackId, TrackRef};
use crate::traits::PathSearch;

/// A* over a [`Graph`].
///
/// Open and closed sets hold [`TrackRef`]s; the open set is kept sorted by
/// evaluation so the next track to expand sits at its front. A node reached
/// again is admitted only if the new track is strictly cheaper than the one
/// already open or closed for it, which then gets replaced.
///
/// All scratch state belongs to the instance, so independent searches on a
/// shared graph each use their own `AStarSearch`.
#[derive(Debug, Clone)]
pub struct AStarSearch {
    config: SearchConfig,
    graph: GraphId,
    tracks: TrackArena,
    open: SortableList<TrackRef>,
    closed: SortableList<TrackRef>,
    target: Option<(NodeId, Point3)>,
    state: SearchState,
    expanded: usize,
}

impl AStarSearch {
    /// Create an engine bound to `graph` with the default settings.
    pub fn new(graph: &Graph) -> Self {
        Self::with_config(graph, SearchConfig::default())
    }

    pub fn with_config(graph: &Graph, config: SearchConfig) -> Self {
        Self {
            config,
            graph: graph.id(),
            tracks: TrackArena::new(),
            open: SortableList::sorted(),
            closed: SortableList::new(),
            target: None,
            state: SearchState::Idle,
            expanded: 0,
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Set the Dijkstra-heuristic balance. Fails outside `[0, 1]`.
    pub fn set_balance(&mut self, balance: f64) -> Result<(), SearchError> {
        self.config.balance = Balance::new(balance)?;
        Ok(())
    }

    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.config.heuristic = heuristic;
    }

    /// Number of tracks expanded by the last search.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Id of the graph this engine is bound to.
    pub fn graph_id(&self) -> GraphId {
        self.graph
    }

    fn estimate(&self, at: Point3) -> f64 {
        match self.target {
            Some((_, goal)) => self.config.heuristic.estimate(at, goal),
            None => 0.0,
        }
    }

    fn init(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Result<(), SearchError> {
        if graph.id() != self.graph {
            return Err(SearchError::InvalidOperation(
                "engine used on a graph it is not bound to; rebase it first",
            ));
        }
        let start_pos = graph
            .position(start)
            .ok_or_else(|| SearchError::InvalidArgument(format!("start node {start} not in graph")))?;
        let end_pos = graph
            .position(end)
            .ok_or_else(|| SearchError::InvalidArgument(format!("end node {end} not in graph")))?;

        self.state = SearchState::Idle;
        self.tracks.clear();
        self.open.clear();
        self.closed.clear();
        self.expanded = 0;
        self.target = Some((end, end_pos));

        let origin = Track::origin(start, self.estimate(start_pos), self.config.balance);
        let id = self.tracks.push(origin)?;
        self.open.push(TrackRef::new(id, &origin));
        Ok(())
    }

    /// Expand `current`: offer a track for every passable arc to a passable
    /// node.
    fn expand(&mut self, graph: &Graph, current: TrackRef) -> Result<(), SearchError> {
        let Some(&track) = self.tracks.get(current.id) else {
            return Ok(());
        };
        self.expanded += 1;

        for arc in graph.outgoing(current.node) {
            let next = arc.end();
            if !arc.is_passable() || !graph.is_passable(next) {
                continue;
            }
            let cost = track.cost() + graph.arc_cost(arc);

            if let Some(i) = self.open.position(|e| e.same_end_node(next)) {
                if self.open.get(i).is_some_and(|e| e.cost <= cost) {
                    continue;
                }
                self.open.remove(i);
            } else if let Some(i) = self.closed.position(|e| e.same_end_node(next)) {
                if self.closed.get(i).is_some_and(|e| e.cost <= cost) {
                    continue;
                }
                self.closed.remove(i);
            }

            let estimate = graph.position(next).map_or(0.0, |p| self.estimate(p));
            let step = track.step(
                current.id,
                next,
                graph.arc_cost(arc),
                estimate,
                self.config.balance,
            );
            let id = self.tracks.push(step)?;
            self.open.push(TrackRef::new(id, &step));
        }
        Ok(())
    }

    fn finish(&mut self, graph: &Graph, goal: Option<TrackId>) {
        let path = goal.and_then(|id| {
            let track = self.tracks.get(id)?;
            let nodes = self.tracks.nodes_to(id);
            let length = SearchPath::from_nodes(graph, nodes.clone()).map_or(0.0, |p| p.length());
            Some(SearchPath::new(nodes, track.cost(), length))
        });
        self.state = SearchState::Ended(path);
    }
}

impl PathSearch for AStarSearch {
    fn search(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Result<bool, SearchError> {
        self.init(graph, start, end)?;

        let goal = loop {
            let Some(current) = self.open.take_min() else {
                break None;
            };
            if current.node == end {
                self.open.clear();
                break Some(current.id);
            }
            self.closed.push(current);
            self.expand(graph, current)?;
        };

        self.finish(graph, goal);
        let found = self.state.found();
        log::debug!(
            "astar {start} -> {end}: found={found} expanded={} tracks={}",
            self.expanded,
            self.tracks.len()
        );
        Ok(found)
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
        self.tracks.clear();
        self.open.clear();
        self.closed.clear();
        self.target = None;
        self.state = SearchState::Idle;
        self.expanded = 0;
    }

    fn rebase(&mut self, graph: &Graph) {
        self.reset();
        self.graph = graph.id();
    }
}

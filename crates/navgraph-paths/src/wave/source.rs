use std::cmp::Ordering;
use std::collections::BinaryHeap;

use navgraph_core::{Graph, GraphId, NodeId};

use super::weight::{SourceId, WaveWeight};
use crate::config::WaveConfig;
use crate::error::SearchError;
use crate::path::SearchPath;

/// Frontier entry, ordered so `BinaryHeap` pops the smallest distance first.
#[derive(Copy, Clone, Debug)]
struct FrontEntry {
    node: NodeId,
    distance: f64,
}

impl Ord for FrontEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then(other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontEntry {}

/// Reverse shortest-path propagation from one target, memoized across
/// queries.
///
/// The source floods backwards along incoming arcs from its target and
/// records, per node, the distance to the target and the next node on the
/// way there. The flood stops as soon as the requested start is settled; its
/// frontier is kept so a later query toward the same target resumes where
/// the last one stopped.
///
/// Cached weights live in a table owned by the source rather than in the
/// graph, so propagation only ever needs shared access to the graph and
/// independent sources never touch each other's data. Weights are stamped
/// with the source id and a generation number; bumping the generation
/// discards them all at once.
#[derive(Debug, Clone)]
pub struct WaveSource {
    id: SourceId,
    graph: GraphId,
    graph_version: u64,
    target: Option<NodeId>,
    generation: u32,
    frontier: BinaryHeap<FrontEntry>,
    weights: Vec<Option<WaveWeight>>,
    relaxations: usize,
    config: WaveConfig,
}

impl WaveSource {
    pub fn new(graph: &Graph) -> Self {
        Self::with_config(graph, WaveConfig::default())
    }

    pub fn with_config(graph: &Graph, config: WaveConfig) -> Self {
        Self {
            id: SourceId::fresh(),
            graph: graph.id(),
            graph_version: graph.version(),
            target: None,
            generation: 0,
            frontier: BinaryHeap::new(),
            weights: Vec::new(),
            relaxations: 0,
            config,
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn graph_id(&self) -> GraphId {
        self.graph
    }

    pub fn config(&self) -> WaveConfig {
        self.config
    }

    /// The node the wave currently flows toward.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Relaxations performed since the source was created.
    pub fn relaxations(&self) -> usize {
        self.relaxations
    }

    /// Entries waiting in the frontier, stale ones included.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// The cached weight of `node`, if it belongs to the current generation.
    pub fn weight(&self, node: NodeId) -> Option<&WaveWeight> {
        self.weights
            .get(node.index())?
            .as_ref()
            .filter(|w| w.is_valid_for(self.id, self.generation))
    }

    /// Settled distance from `node` to the target.
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        self.weight(node).filter(|w| w.settled).map(|w| w.distance)
    }

    pub fn is_settled(&self, node: NodeId) -> bool {
        self.weight(node).is_some_and(|w| w.settled)
    }

    fn check_bound(&self, graph: &Graph) -> Result<(), SearchError> {
        if graph.id() == self.graph {
            Ok(())
        } else {
            Err(SearchError::InvalidOperation(
                "wave source used on a graph it is not bound to; rebase it first",
            ))
        }
    }

    fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped around: old stamps could match again.
            self.weights.fill(None);
            self.generation = 1;
        }
        self.frontier.clear();
    }

    fn store(&mut self, node: NodeId, distance: f64, next: Option<NodeId>, settled: bool) {
        let idx = node.index();
        if idx >= self.weights.len() {
            self.weights.resize(idx + 1, None);
        }
        self.weights[idx] = Some(WaveWeight {
            source: self.id,
            generation: self.generation,
            distance,
            next,
            settled,
        });
    }

    /// Mark the popped entry settled. Returns its distance, or `None` for a
    /// stale entry.
    fn settle(&mut self, entry: FrontEntry) -> Option<f64> {
        let (id, generation) = (self.id, self.generation);
        let w = self.weights.get_mut(entry.node.index())?.as_mut()?;
        if !w.is_valid_for(id, generation) || w.settled || entry.distance > w.distance {
            return None;
        }
        w.settled = true;
        Some(w.distance)
    }

    /// Point the wave at `end`.
    ///
    /// If the target changed, or the graph changed since the wave was
    /// seeded, all cached weights are dropped and the frontier restarts from
    /// `end` at distance 0. Returns whether that happened.
    pub fn retarget(&mut self, graph: &Graph, end: NodeId) -> Result<bool, SearchError> {
        self.check_bound(graph)?;
        if !graph.contains(end) {
            return Err(SearchError::InvalidArgument(format!(
                "wave target {end} not in graph"
            )));
        }
        if self.target == Some(end) && self.graph_version == graph.version() {
            return Ok(false);
        }

        self.next_generation();
        self.target = Some(end);
        self.graph_version = graph.version();
        if self.weights.len() < graph.slot_count() {
            self.weights.resize(graph.slot_count(), None);
        }
        self.store(end, 0.0, None, false);
        self.frontier.push(FrontEntry {
            node: end,
            distance: 0.0,
        });
        log::debug!(
            "wave {:?} seeded at {end}, generation {}",
            self.id,
            self.generation
        );
        Ok(true)
    }

    /// Advance the wave until `start` is settled or the frontier runs dry.
    ///
    /// Returns the number of relaxations performed.
    pub fn propagate(&mut self, graph: &Graph, start: NodeId) -> Result<usize, SearchError> {
        self.check_bound(graph)?;
        if self.target.is_none() {
            return Err(SearchError::InvalidOperation(
                "wave propagated before a target was set",
            ));
        }
        if graph.version() != self.graph_version {
            return Err(SearchError::InvalidOperation(
                "graph changed since the wave was seeded; retarget first",
            ));
        }

        let before = self.relaxations;
        while !self.is_settled(start) {
            let Some(entry) = self.frontier.pop() else {
                break;
            };
            let Some(distance) = self.settle(entry) else {
                continue;
            };
            for arc in graph.incoming(entry.node) {
                let prev = arc.start();
                if !arc.is_passable() || !graph.is_passable(prev) {
                    continue;
                }
                let candidate = distance + graph.arc_length(arc);
                if self
                    .weight(prev)
                    .is_some_and(|w| w.settled || w.distance <= candidate)
                {
                    continue;
                }
                self.store(prev, candidate, Some(entry.node), false);
                self.frontier.push(FrontEntry {
                    node: prev,
                    distance: candidate,
                });
                self.relaxations += 1;
            }
        }

        let done = self.relaxations - before;
        log::trace!(
            "wave {:?} toward {:?}: {done} relaxations, {} queued",
            self.id,
            self.target,
            self.frontier.len()
        );
        Ok(done)
    }

    /// Follow `next` pointers from `start` to the target.
    ///
    /// Every step must have a settled weight of the current generation and
    /// a passable arc into a passable node. The walk is cut off after
    /// `node_count + chain_guard_slack` nodes.
    pub fn reconstruct(&self, graph: &Graph, start: NodeId) -> Result<SearchPath, SearchError> {
        self.check_bound(graph)?;
        let target = self
            .target
            .ok_or_else(|| SearchError::CacheInconsistency("wave has no target".into()))?;
        let limit = graph.node_count() + self.config.chain_guard_slack;

        let mut nodes = vec![start];
        let mut cost = 0.0;
        let mut length = 0.0;
        let mut cur = start;
        while cur != target {
            let next = self
                .weight(cur)
                .filter(|w| w.settled)
                .and_then(|w| w.next)
                .ok_or_else(|| {
                    SearchError::CacheInconsistency(format!("{cur} has no usable wave weight"))
                })?;
            let arc = graph.arc(cur, next).ok_or_else(|| {
                SearchError::CacheInconsistency(format!("wave points along missing arc {cur} -> {next}"))
            })?;
            if !arc.is_passable() || !graph.is_passable(next) {
                return Err(SearchError::CacheInconsistency(format!(
                    "wave points along blocked arc {cur} -> {next}"
                )));
            }
            cost += graph.arc_cost(arc);
            length += graph.arc_length(arc);
            nodes.push(next);
            if nodes.len() > limit {
                return Err(SearchError::CacheInconsistency(format!(
                    "wave chain from {start} exceeds {limit} nodes"
                )));
            }
            cur = next;
        }
        Ok(SearchPath::new(nodes, cost, length))
    }

    /// Drop every cached weight and the frontier. The next `retarget`
    /// reseeds the wave.
    pub fn invalidate(&mut self) {
        self.next_generation();
        self.target = None;
    }

    /// Bind to another graph, dropping all cached state.
    pub fn rebase(&mut self, graph: &Graph) {
        self.invalidate();
        self.weights.clear();
        self.graph = graph.id();
        self.graph_version = graph.version();
    }

    #[cfg(test)]
    pub(crate) fn inject_weight(&mut self, node: NodeId, distance: f64, next: Option<NodeId>) {
        self.store(node, distance, next, true);
    }
}

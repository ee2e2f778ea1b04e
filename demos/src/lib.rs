//! Scenario driver shared by the demo binaries.
//!
//! Builds a graph, blocks a share of its nodes, then fires a stream of
//! queries at a handful of popular targets through a [`SearchDispatcher`],
//! the workload the wave cache is made for.

use navgraph_core::{Graph, GraphError, Lattice, NodeId, random_geometric};
use navgraph_paths::{Engine, PathSearch, SearchDispatcher, SearchError, TargetTally};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Which kind of graph to build.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Layout {
    /// `n * n * depth` lattice with unit spacing.
    Lattice { n: usize, depth: usize },
    /// Random geometric graph.
    Scatter { count: usize, extent: f64, radius: f64 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scenario {
    pub layout: Layout,
    pub seed: u64,
    /// Share of nodes made impassable, in `[0, 1]`.
    pub blocked: f64,
    pub targets: usize,
    pub queries: usize,
    /// Block one more node every this many queries; 0 never does.
    pub churn_every: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            layout: Layout::Lattice { n: 16, depth: 4 },
            seed: 7,
            blocked: 0.15,
            targets: 4,
            queries: 400,
            churn_every: 100,
        }
    }
}

/// Totals gathered while running a [`Scenario`].
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub nodes: usize,
    pub arcs: usize,
    pub found: usize,
    pub not_found: usize,
    pub cache_hits: usize,
    pub fallbacks: usize,
    pub relaxations: usize,
    pub mutations: usize,
    pub tally: TargetTally,
}

#[derive(Debug)]
pub enum DemoError {
    Graph(GraphError),
    Search(SearchError),
    Empty,
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Graph(e) => write!(f, "graph: {e}"),
            DemoError::Search(e) => write!(f, "search: {e}"),
            DemoError::Empty => write!(f, "scenario has no passable nodes"),
        }
    }
}

impl std::error::Error for DemoError {}

impl From<GraphError> for DemoError {
    fn from(e: GraphError) -> Self {
        DemoError::Graph(e)
    }
}

impl From<SearchError> for DemoError {
    fn from(e: SearchError) -> Self {
        DemoError::Search(e)
    }
}

const BURST: usize = 10;

fn build(layout: Layout, rng: &mut StdRng) -> Result<Graph, GraphError> {
    match layout {
        Layout::Lattice { n, depth } => Ok(Lattice::new(n, n, depth, 1.0, 1.0)?.graph),
        Layout::Scatter {
            count,
            extent,
            radius,
        } => random_geometric(rng, count, extent, radius, 1.0),
    }
}

fn pick(rng: &mut StdRng, ids: &[NodeId]) -> Option<NodeId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[rng.random_range(0..ids.len())])
    }
}

impl Scenario {
    pub fn run(&self) -> Result<Report, DemoError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut graph = build(self.layout, &mut rng)?;

        let all: Vec<NodeId> = graph.node_ids().collect();
        for &id in &all {
            if rng.random_bool(self.blocked.clamp(0.0, 1.0)) {
                graph.set_node_passable(id, false)?;
            }
        }
        let mut open: Vec<NodeId> = all
            .iter()
            .copied()
            .filter(|&id| graph.is_passable(id))
            .collect();

        let targets: Vec<NodeId> = (0..self.targets.max(1))
            .filter_map(|_| pick(&mut rng, &open))
            .collect();
        if targets.is_empty() {
            return Err(DemoError::Empty);
        }

        let mut report = Report {
            nodes: graph.node_count(),
            arcs: graph.arc_count(),
            ..Report::default()
        };
        log::debug!(
            "scenario graph: {} nodes, {} arcs, {} open, targets {targets:?}",
            graph.node_count(),
            graph.arc_count(),
            open.len()
        );
        let mut dispatcher = SearchDispatcher::with_stats(&graph, TargetTally::new());

        for q in 0..self.queries {
            if self.churn_every > 0 && q > 0 && q % self.churn_every == 0 {
                // Never block a target, so popular queries keep making sense.
                if let Some(victim) = pick(&mut rng, &open).filter(|v| !targets.contains(v)) {
                    log::debug!("query {q}: blocking {victim}");
                    graph.set_node_passable(victim, false)?;
                    open.retain(|&id| id != victim);
                    report.mutations += 1;
                }
            }

            let Some(start) = pick(&mut rng, &open) else {
                break;
            };
            // Queries arrive in bursts toward one target at a time.
            let end = targets[(q / BURST) % targets.len()];
            if dispatcher.search(&graph, start, end)? {
                report.found += 1;
            } else {
                report.not_found += 1;
            }
            if dispatcher.engine() == Some(Engine::Wave) {
                report.relaxations += dispatcher.wave().relaxations();
                if dispatcher.wave().cache_hit() {
                    report.cache_hits += 1;
                }
            }
        }

        report.fallbacks = dispatcher.fallbacks();
        report.tally = dispatcher.into_stats();
        log::info!(
            "scenario done: {} found, {} not found, {} cache hits, {} fallbacks",
            report.found,
            report.not_found,
            report.cache_hits,
            report.fallbacks
        );
        Ok(report)
    }
}

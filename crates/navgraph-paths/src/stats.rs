use std::collections::HashMap;

use navgraph_core::NodeId;

use crate::path::SearchPath;

/// What a finished search reports to a [`SearchStats`] collector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub found: bool,
    /// Arcs on the path; 0 when nothing was found.
    pub hops: usize,
    /// Path cost; infinite when nothing was found.
    pub cost: f64,
}

impl SearchOutcome {
    pub const NOT_FOUND: SearchOutcome = SearchOutcome {
        found: false,
        hops: 0,
        cost: f64::INFINITY,
    };

    pub fn from_path(path: Option<&SearchPath>) -> Self {
        match path {
            Some(p) => SearchOutcome {
                found: true,
                hops: p.arc_count(),
                cost: p.cost(),
            },
            None => Self::NOT_FOUND,
        }
    }
}

/// Receives a notification when a dispatched search starts and ends.
///
/// Collectors only ever see the target node and the outcome.
pub trait SearchStats {
    fn search_started(&mut self, target: NodeId);

    fn search_finished(&mut self, target: NodeId, outcome: SearchOutcome);
}

/// Collector that ignores everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoStats;

impl SearchStats for NoStats {
    fn search_started(&mut self, _target: NodeId) {}

    fn search_finished(&mut self, _target: NodeId, _outcome: SearchOutcome) {}
}

/// Counters kept per target by [`TargetTally`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetCounts {
    pub started: usize,
    pub found: usize,
    pub not_found: usize,
    pub hops: usize,
}

/// In-memory collector counting searches per target.
#[derive(Clone, Debug, Default)]
pub struct TargetTally {
    targets: HashMap<NodeId, TargetCounts>,
}

impl TargetTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: NodeId) -> TargetCounts {
        self.targets.get(&target).copied().unwrap_or_default()
    }

    /// Targets ordered by how often they were searched for, most popular
    /// first.
    pub fn popular(&self) -> Vec<(NodeId, usize)> {
        let mut v: Vec<_> = self
            .targets
            .iter()
            .map(|(&id, c)| (id, c.started))
            .collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        v
    }

    pub fn total(&self) -> usize {
        self.targets.values().map(|c| c.started).sum()
    }
}

impl SearchStats for TargetTally {
    fn search_started(&mut self, target: NodeId) {
        self.targets.entry(target).or_default().started += 1;
    }

    fn search_finished(&mut self, target: NodeId, outcome: SearchOutcome) {
        let c = self.targets.entry(target).or_default();
        if outcome.found {
            c.found += 1;
            c.hops += outcome.hops;
        } else {
            c.not_found += 1;
        }
    }
}

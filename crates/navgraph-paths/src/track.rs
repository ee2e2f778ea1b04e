//! A* search-tree nodes.
//!
//! Tracks live in a [`TrackArena`] and point at their predecessor by
//! [`TrackId`]; following the parents from any track yields the path back to
//! the search start. The arena is cleared when a new search starts.

use std::cmp::Ordering;

use navgraph_core::NodeId;

use crate::config::Balance;
use crate::error::SearchError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u32);

impl TrackId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The id for slot `index`, or `None` past the `u32` id space.
    #[inline]
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }
}

/// One step of a candidate path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Track {
    node: NodeId,
    cost: f64,
    hops: u32,
    parent: Option<TrackId>,
    evaluation: f64,
}

impl Track {
    /// The zero-cost track a search starts from.
    pub fn origin(node: NodeId, estimate: f64, balance: Balance) -> Self {
        Self {
            node,
            cost: 0.0,
            hops: 0,
            parent: None,
            evaluation: balance.evaluate(0.0, estimate),
        }
    }

    /// The track reached by stepping from `self` (stored as `id`) to `node`.
    pub fn step(
        &self,
        id: TrackId,
        node: NodeId,
        step_cost: f64,
        estimate: f64,
        balance: Balance,
    ) -> Self {
        let cost = self.cost + step_cost;
        Self {
            node,
            cost,
            hops: self.hops + 1,
            parent: Some(id),
            evaluation: balance.evaluate(cost, estimate),
        }
    }

    /// The frontier node this track ends on.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Cost from the search start.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of arcs from the search start.
    #[inline]
    pub fn hops(&self) -> u32 {
        self.hops
    }

    #[inline]
    pub fn parent(&self) -> Option<TrackId> {
        self.parent
    }

    /// Blended cost and estimate the frontier is ordered by.
    #[inline]
    pub fn evaluation(&self) -> f64 {
        self.evaluation
    }
}

/// Append-only storage for the tracks of one search.
#[derive(Debug, Clone, Default)]
pub struct TrackArena {
    tracks: Vec<Track>,
}

impl TrackArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `track`. Fails once 2^32 tracks have been pushed since the
    /// last [`clear`](Self::clear).
    pub fn push(&mut self, track: Track) -> Result<TrackId, SearchError> {
        let id = TrackId::from_index(self.tracks.len()).ok_or(SearchError::CapacityExceeded)?;
        self.tracks.push(track);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Nodes from the search start to the track `id`.
    ///
    /// The walk is bounded by the arena size, so a corrupted parent chain
    /// cannot loop forever.
    pub fn nodes_to(&self, id: TrackId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut cur = Some(id);
        while let Some(tid) = cur {
            let Some(track) = self.get(tid) else {
                break;
            };
            nodes.push(track.node);
            if nodes.len() > self.tracks.len() {
                break;
            }
            cur = track.parent;
        }
        nodes.reverse();
        nodes
    }
}

/// Open/closed set entry: a track id with the keys needed to rank and
/// match it without touching the arena.
///
/// Ordered by evaluation, then by track id so every entry is distinct.
#[derive(Copy, Clone, Debug)]
pub struct TrackRef {
    pub id: TrackId,
    pub node: NodeId,
    pub cost: f64,
    pub evaluation: f64,
}

impl TrackRef {
    pub fn new(id: TrackId, track: &Track) -> Self {
        Self {
            id,
            node: track.node,
            cost: track.cost,
            evaluation: track.evaluation,
        }
    }

    /// Whether both entries stand for the same graph node.
    #[inline]
    pub fn same_end_node(&self, other: NodeId) -> bool {
        self.node == other
    }
}

impl PartialEq for TrackRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TrackRef {}

impl PartialOrd for TrackRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TrackRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.evaluation
            .total_cmp(&other.evaluation)
            .then(self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgraph_core::{Graph, Point3};

    fn ids(n: usize) -> Vec<NodeId> {
        let mut g = Graph::new();
        (0..n)
            .map(|i| g.add_node(Point3::new(i as f64 + 1.0, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn step_accumulates() {
        let n = ids(3);
        let mut arena = TrackArena::new();
        let t0 = Track::origin(n[0], 10.0, Balance::EVEN);
        assert_eq!(t0.evaluation(), 5.0);
        let id0 = arena.push(t0).unwrap();
        let t1 = t0.step(id0, n[1], 2.0, 4.0, Balance::EVEN);
        assert_eq!(t1.cost(), 2.0);
        assert_eq!(t1.hops(), 1);
        assert_eq!(t1.evaluation(), 3.0);
        let id1 = arena.push(t1).unwrap();
        let t2 = t1.step(id1, n[2], 3.0, 0.0, Balance::DIJKSTRA);
        assert_eq!(t2.cost(), 5.0);
        assert_eq!(t2.evaluation(), 5.0);
        let id2 = arena.push(t2).unwrap();
        assert_eq!(arena.nodes_to(id2), n);
        assert_eq!(arena.nodes_to(id0), vec![n[0]]);
    }

    #[test]
    fn track_refs_order_by_evaluation_then_id() {
        let n = ids(2);
        let mut arena = TrackArena::new();
        let a = Track::origin(n[0], 2.0, Balance::GREEDY);
        let b = Track::origin(n[1], 1.0, Balance::GREEDY);
        let ra = TrackRef::new(arena.push(a).unwrap(), &a);
        let rb = TrackRef::new(arena.push(b).unwrap(), &b);
        let rc = TrackRef::new(arena.push(b).unwrap(), &b);
        assert!(rb < ra);
        assert!(rb < rc);
        assert_ne!(rb, rc);
        assert!(rb.same_end_node(n[1]));
        assert!(rb.same_end_node(rc.node));
    }

    #[test]
    fn clear_resets_ids() {
        let n = ids(1);
        let mut arena = TrackArena::new();
        arena.push(Track::origin(n[0], 0.0, Balance::EVEN)).unwrap();
        arena.clear();
        assert!(arena.is_empty());
        let id = arena.push(Track::origin(n[0], 0.0, Balance::EVEN)).unwrap();
        assert_eq!(id.index(), 0);
    }

    #[test]
    fn track_ids_stop_at_u32_range() {
        assert_eq!(TrackId::from_index(3), Some(TrackId(3)));
        assert_eq!(TrackId::from_index(u32::MAX as usize), Some(TrackId(u32::MAX)));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(TrackId::from_index(u32::MAX as usize + 1), None);
    }
}

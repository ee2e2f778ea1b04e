//! Graph vertices.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::arc::Arc;
use crate::geom::Point3;

/// Opaque identity of a node within one [`Graph`](crate::Graph).
///
/// Ids are handed out by the graph and never reused, so two nodes at the
/// same coordinates remain distinct vertices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Slot index of this node, suitable for side tables.
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

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vertex: a position, a passability flag and its adjacency.
///
/// Outgoing arcs are owned here, keyed by their end node. Incoming arcs are
/// owned by their start node; this node only records who points at it.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    position: Point3,
    pub(crate) passable: bool,
    pub(crate) outgoing: BTreeMap<NodeId, Arc>,
    pub(crate) incoming: BTreeSet<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, position: Point3) -> Self {
        Self {
            id,
            position,
            passable: true,
            outgoing: BTreeMap::new(),
            incoming: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Point3 {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point3) {
        self.position = position;
        for arc in self.outgoing.values_mut() {
            arc.invalidate_length();
        }
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Arcs leaving this node, ordered by end node id.
    pub fn outgoing(&self) -> impl Iterator<Item = &Arc> + '_ {
        self.outgoing.values()
    }

    /// The arc from this node to `to`, if any.
    pub fn arc_to(&self, to: NodeId) -> Option<&Arc> {
        self.outgoing.get(&to)
    }

    /// Start nodes of the arcs entering this node.
    pub fn incoming(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming.iter().copied()
    }

    pub fn has_incoming_from(&self, from: NodeId) -> bool {
        self.incoming.contains(&from)
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }

    /// Whether no arc touches this node.
    pub fn is_isolated(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}

//! The [`Graph`] container.
//!
//! Nodes live in an arena indexed by [`NodeId`]. There is no separate edge
//! index: each arc is stored once in its start node and registered by id in
//! its end node, and traversal goes through that adjacency.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::arc::{Arc, ArcKey};
use crate::error::GraphError;
use crate::geom::{BoundingBox, Point3};
use crate::node::{Node, NodeId};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Graph`] instance.
///
/// Search engines remember the id of the graph they were bound to and
/// refuse to run against another one until rebased.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph#{}", self.0)
    }
}

/// Outcome of [`Graph::compact`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CompactReport {
    pub arcs_removed: usize,
    pub nodes_removed: usize,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A mutable, weighted, directed graph embedded in 3-D space.
///
/// Every mutation that can change a search result bumps [`version`], which
/// consumers use as a cheap "did anything change" token.
///
/// [`version`]: Graph::version
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    nodes: Vec<Option<Node>>,
    node_count: usize,
    arc_count: usize,
    version: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Graph {
    /// The clone is a different graph instance and gets a fresh id.
    fn clone(&self) -> Self {
        Self {
            id: GraphId::next(),
            nodes: self.nodes.clone(),
            node_count: self.node_count,
            arc_count: self.arc_count,
            version: self.version,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: GraphId::next(),
            nodes: Vec::with_capacity(capacity),
            node_count: 0,
            arc_count: 0,
            version: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Structural version, bumped on every mutation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// One past the largest [`NodeId::index`] ever handed out. Side tables
    /// indexed by node id need this many slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    // -----------------------------------------------------------------------
    // Node access
    // -----------------------------------------------------------------------

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Position of a node, if present.
    #[inline]
    pub fn position(&self, id: NodeId) -> Option<Point3> {
        self.node(id).map(Node::position)
    }

    /// Whether the node exists and is passable.
    #[inline]
    pub fn is_passable(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_passable)
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().flatten()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(Node::id)
    }

    // -----------------------------------------------------------------------
    // Arc access
    // -----------------------------------------------------------------------

    pub fn arc(&self, from: NodeId, to: NodeId) -> Option<&Arc> {
        self.node(from)?.arc_to(to)
    }

    /// Every arc in the graph, grouped by start node.
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> + '_ {
        self.nodes().flat_map(Node::outgoing)
    }

    /// Arcs leaving `id`. Empty if the node is absent.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Arc> + '_ {
        self.node(id).into_iter().flat_map(Node::outgoing)
    }

    /// Arcs entering `id`. Empty if the node is absent.
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Arc> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(Node::incoming)
            .filter_map(move |from| self.arc(from, id))
    }

    /// Euclidean length of an arc, cached in the arc until an endpoint moves.
    ///
    /// Returns `f64::INFINITY` for an arc whose endpoint is missing from this
    /// graph; such arcs are reported by [`validate`](Self::validate).
    pub fn arc_length(&self, arc: &Arc) -> f64 {
        if let Some(len) = arc.cached_length() {
            return len;
        }
        match (self.position(arc.start()), self.position(arc.end())) {
            (Some(a), Some(b)) => arc.length_or_init(|| a.distance(b)),
            _ => f64::INFINITY,
        }
    }

    /// `weight * length` of an arc.
    #[inline]
    pub fn arc_cost(&self, arc: &Arc) -> f64 {
        arc.weight() * self.arc_length(arc)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Insert a new passable node at `position`.
    ///
    /// # Panics
    ///
    /// If the graph has already handed out 2^32 node ids. Use
    /// [`try_add_node`](Self::try_add_node) to handle that case.
    pub fn add_node(&mut self, position: Point3) -> NodeId {
        match self.try_add_node(position) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Insert a new passable node, failing with
    /// [`GraphError::CapacityExceeded`] once the id space is used up.
    pub fn try_add_node(&mut self, position: Point3) -> Result<NodeId, GraphError> {
        let id = NodeId::from_index(self.nodes.len()).ok_or(GraphError::CapacityExceeded)?;
        self.nodes.push(Some(Node::new(id, position)));
        self.node_count += 1;
        self.bump();
        Ok(id)
    }

    /// Return the closest existing node within `epsilon` of `position`, or
    /// insert a new one there.
    pub fn add_node_merged(&mut self, position: Point3, epsilon: f64) -> NodeId {
        match self.closest_node(position, true) {
            Some((id, dist)) if dist <= epsilon => id,
            _ => self.add_node(position),
        }
    }

    /// Detach and remove a node.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        self.isolate(id)?;
        let node = self
            .nodes
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(GraphError::NodeNotFound(id))?;
        self.node_count -= 1;
        self.bump();
        Ok(node)
    }

    /// Remove every arc touching `id`, in both directions. Returns how many
    /// arcs were removed.
    pub fn isolate(&mut self, id: NodeId) -> Result<usize, GraphError> {
        let node = self.node_mut(id)?;
        let outgoing: Vec<NodeId> = std::mem::take(&mut node.outgoing).into_keys().collect();
        let incoming: Vec<NodeId> = std::mem::take(&mut node.incoming).into_iter().collect();

        let mut removed = outgoing.len();
        for to in outgoing {
            if let Ok(n) = self.node_mut(to) {
                n.incoming.remove(&id);
            }
        }
        for from in incoming {
            if let Ok(n) = self.node_mut(from) {
                if n.outgoing.remove(&id).is_some() {
                    removed += 1;
                }
            }
        }

        self.arc_count -= removed;
        if removed > 0 {
            self.bump();
        }
        Ok(removed)
    }

    /// Add a one-way arc `from -> to`.
    pub fn connect(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<(), GraphError> {
        self.check_connectable(from, to, weight)?;
        let arc = Arc::new(from, to, weight)?;
        self.node_mut(from)?.outgoing.insert(to, arc);
        self.node_mut(to)?.incoming.insert(from);
        self.arc_count += 1;
        self.bump();
        Ok(())
    }

    /// Add arcs in both directions with the same weight. Either both arcs
    /// are added or neither is.
    pub fn connect_both(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<(), GraphError> {
        self.check_connectable(a, b, weight)?;
        self.check_connectable(b, a, weight)?;
        self.connect(a, b, weight)?;
        self.connect(b, a, weight)
    }

    fn check_connectable(&self, from: NodeId, to: NodeId, weight: f64) -> Result<(), GraphError> {
        let start = self.node(from).ok_or(GraphError::NodeNotFound(from))?;
        if !self.contains(to) {
            return Err(GraphError::NodeNotFound(to));
        }
        // Validates endpoints and weight before anything is touched.
        Arc::new(from, to, weight)?;
        if start.arc_to(to).is_some() {
            return Err(GraphError::ArcExists { from, to });
        }
        Ok(())
    }

    /// Remove the arc `from -> to` from both of its endpoints.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> Result<Arc, GraphError> {
        if !self.contains(to) {
            return Err(GraphError::NodeNotFound(to));
        }
        let arc = self
            .node_mut(from)?
            .outgoing
            .remove(&to)
            .ok_or(GraphError::ArcNotFound { from, to })?;
        self.node_mut(to)?.incoming.remove(&from);
        self.arc_count -= 1;
        self.bump();
        Ok(arc)
    }

    /// Set a node's passability. Every arc touching the node takes the same
    /// flag.
    pub fn set_node_passable(&mut self, id: NodeId, passable: bool) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        node.passable = passable;
        for arc in node.outgoing.values_mut() {
            arc.passable = passable;
        }
        let incoming: Vec<NodeId> = node.incoming.iter().copied().collect();
        for from in incoming {
            if let Ok(arc) = self.arc_mut(from, id) {
                arc.passable = passable;
            }
        }
        self.bump();
        Ok(())
    }

    pub fn set_arc_passable(
        &mut self,
        from: NodeId,
        to: NodeId,
        passable: bool,
    ) -> Result<(), GraphError> {
        self.arc_mut(from, to)?.passable = passable;
        self.bump();
        Ok(())
    }

    pub fn set_arc_weight(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<(), GraphError> {
        self.arc_mut(from, to)?.set_weight(weight)?;
        self.bump();
        Ok(())
    }

    fn arc_mut(&mut self, from: NodeId, to: NodeId) -> Result<&mut Arc, GraphError> {
        self.node_mut(from)?
            .outgoing
            .get_mut(&to)
            .ok_or(GraphError::ArcNotFound { from, to })
    }

    /// Move a node. Cached lengths of every arc touching it are dropped.
    pub fn set_position(&mut self, id: NodeId, position: Point3) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        node.set_position(position);
        let incoming: Vec<NodeId> = node.incoming.iter().copied().collect();
        for from in incoming {
            if let Ok(arc) = self.arc_mut(from, id) {
                arc.invalidate_length();
            }
        }
        self.bump();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Spatial queries
    // -----------------------------------------------------------------------

    /// Smallest box containing every node, or `None` for an empty graph.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.nodes().map(Node::position))
    }

    /// The node closest to `point` and its Euclidean distance.
    ///
    /// Impassable nodes are skipped unless `ignore_passability` is set. Ties
    /// go to the lowest id.
    pub fn closest_node(&self, point: Point3, ignore_passability: bool) -> Option<(NodeId, f64)> {
        if !point.is_finite() {
            return None;
        }
        let mut best: Option<(NodeId, f64)> = None;
        for node in self.nodes() {
            if !ignore_passability && !node.is_passable() {
                continue;
            }
            let d2 = node.position().distance_squared(point);
            if best.is_none_or(|(_, b)| d2 < b) {
                best = Some((node.id(), d2));
            }
        }
        best.map(|(id, d2)| (id, d2.sqrt()))
    }

    /// [`closest_node`](Self::closest_node) for two points in one pass. A
    /// non-finite point gets `None`.
    pub fn closest_nodes(
        &self,
        a: Point3,
        b: Point3,
        ignore_passability: bool,
    ) -> (Option<(NodeId, f64)>, Option<(NodeId, f64)>) {
        let mut best_a: Option<(NodeId, f64)> = None;
        let mut best_b: Option<(NodeId, f64)> = None;
        let (want_a, want_b) = (a.is_finite(), b.is_finite());
        if !want_a && !want_b {
            return (None, None);
        }
        for node in self.nodes() {
            if !ignore_passability && !node.is_passable() {
                continue;
            }
            let p = node.position();
            let da = p.distance_squared(a);
            if want_a && best_a.is_none_or(|(_, d)| da < d) {
                best_a = Some((node.id(), da));
            }
            let db = p.distance_squared(b);
            if want_b && best_b.is_none_or(|(_, d)| db < d) {
                best_b = Some((node.id(), db));
            }
        }
        (
            best_a.map(|(id, d2)| (id, d2.sqrt())),
            best_b.map(|(id, d2)| (id, d2.sqrt())),
        )
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Drop impassable arcs, then impassable nodes.
    pub fn compact(&mut self) -> CompactReport {
        let dead_arcs: Vec<ArcKey> = self
            .arcs()
            .filter(|arc| !arc.is_passable())
            .map(Arc::key)
            .collect();
        let dead_nodes: Vec<NodeId> = self
            .nodes()
            .filter(|node| !node.is_passable())
            .map(Node::id)
            .collect();

        let mut report = CompactReport::default();
        for key in dead_arcs {
            if self.disconnect(key.from, key.to).is_ok() {
                report.arcs_removed += 1;
            }
        }
        for id in dead_nodes {
            if let Ok(removed) = self.isolate(id) {
                report.arcs_removed += removed;
            }
            if self.remove_node(id).is_ok() {
                report.nodes_removed += 1;
            }
        }
        log::info!(
            "compact: removed {} arcs and {} nodes",
            report.arcs_removed,
            report.nodes_removed
        );
        report
    }

    /// Check adjacency consistency and repair what can be repaired.
    ///
    /// An arc whose end node is missing, whose endpoints disagree with the
    /// node holding it, or whose end node lacks the reciprocal incoming
    /// registration is disabled (made impassable), not removed. Incoming
    /// registrations with no backing arc are dropped. Returns the number of
    /// inconsistencies found.
    pub fn validate(&mut self) -> usize {
        let mut broken_arcs: Vec<ArcKey> = Vec::new();
        let mut stale_incoming: Vec<(NodeId, NodeId)> = Vec::new();

        for node in self.nodes() {
            let id = node.id();
            for (&to, arc) in &node.outgoing {
                let reciprocal = self.node(to).is_some_and(|end| end.has_incoming_from(id));
                if arc.start() != id || arc.end() != to || !reciprocal {
                    log::warn!("validate: inconsistent arc {id} -> {to}");
                    broken_arcs.push(ArcKey::new(id, to));
                }
            }
            for from in node.incoming() {
                let backed = self.node(from).is_some_and(|start| start.arc_to(id).is_some());
                if !backed {
                    log::warn!("validate: {id} lists missing arc from {from}");
                    stale_incoming.push((id, from));
                }
            }
        }

        let errors = broken_arcs.len() + stale_incoming.len();
        for key in broken_arcs {
            if let Ok(arc) = self.arc_mut(key.from, key.to) {
                arc.passable = false;
            }
        }
        for (id, from) in stale_incoming {
            if let Ok(node) = self.node_mut(id) {
                node.incoming.remove(&from);
            }
        }
        if errors > 0 {
            self.bump();
        }
        errors
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

use navgraph_core::NodeId;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`WaveSource`](super::WaveSource).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Cached distance from one node to the wave's current target.
///
/// An entry only counts while its `source` and `generation` match the
/// engine reading it; bumping the engine's generation therefore discards
/// every entry at once without touching them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveWeight {
    pub source: SourceId,
    pub generation: u32,
    /// Sum of arc lengths to the target along `next` pointers.
    pub distance: f64,
    /// The neighbour one step closer to the target; `None` on the target.
    pub next: Option<NodeId>,
    /// Whether `distance` is final for this generation.
    pub settled: bool,
}

impl WaveWeight {
    #[inline]
    pub fn is_valid_for(&self, source: SourceId, generation: u32) -> bool {
        self.source == source && self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ids_are_unique() {
        let a = SourceId::fresh();
        let b = SourceId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn validity_needs_source_and_generation() {
        let src = SourceId::fresh();
        let w = WaveWeight {
            source: src,
            generation: 3,
            distance: 1.5,
            next: None,
            settled: true,
        };
        assert!(w.is_valid_for(src, 3));
        assert!(!w.is_valid_for(src, 4));
        assert!(!w.is_valid_for(SourceId::fresh(), 3));
    }
}

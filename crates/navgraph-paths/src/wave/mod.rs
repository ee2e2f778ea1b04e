//! Incremental reverse-propagation search.
//!
//! A [`WaveSource`] floods distances backwards from a fixed target and keeps
//! them between queries; [`WaveSearch`] answers `start -> target` queries
//! from that cache, propagating further only when `start` is not yet
//! settled. Any change to the graph's version discards the cache on the next
//! query.

mod search;
mod source;
mod weight;

pub use search::WaveSearch;
pub use source::WaveSource;
pub use weight::{SourceId, WaveWeight};

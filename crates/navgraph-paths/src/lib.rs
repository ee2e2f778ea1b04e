//! Shortest-path search over [`navgraph_core::Graph`].
//!
//! Two engines share one query surface ([`PathSearch`]):
//!
//! - **A\*** with a tunable balance between path cost and heuristic
//!   estimate ([`AStarSearch`]); balance 1 is plain Dijkstra.
//! - **Wave** search ([`WaveSearch`]), which floods distances backwards from
//!   the target and memoizes them, so repeated queries toward a popular
//!   target are answered without searching again.
//!
//! [`SearchDispatcher`] tries the wave first and falls back to A* whenever
//! the wave cannot produce a path, so a broken cache costs time, never
//! correctness.
//!
//! # Concurrency
//!
//! Every engine keeps its scratch state and cache to itself and only reads
//! the graph. Any number of engines can therefore search one
//! [`SharedGraph`](navgraph_core::SharedGraph) under its read lock while
//! mutations take the write lock; a mutation bumps the graph version, which
//! invalidates wave caches on their next query.
//!
//! | Type | Role |
//! |---|---|
//! | [`SortableList`] | open/closed sets for A* |
//! | [`Track`], [`TrackArena`] | A* search tree |
//! | [`WaveSource`], [`WaveWeight`] | reverse propagation and its cache |
//! | [`SearchStats`] | per-target notifications from the dispatcher |

mod astar;
mod config;
mod dispatcher;
mod distance;
mod error;
mod path;
mod sortable;
mod stats;
mod track;
mod traits;
mod wave;

pub use astar::AStarSearch;
pub use config::{Balance, SearchConfig, WaveConfig};
pub use dispatcher::{Engine, SearchDispatcher};
pub use distance::{Heuristic, chebyshev, euclidean, manhattan};
pub use error::SearchError;
pub use path::SearchPath;
pub use sortable::{Admission, SortableList};
pub use stats::{NoStats, SearchOutcome, SearchStats, TargetCounts, TargetTally};
pub use track::{Track, TrackArena, TrackId, TrackRef};
pub use traits::PathSearch;
pub use wave::{SourceId, WaveSearch, WaveSource, WaveWeight};

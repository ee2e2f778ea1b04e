//! Weighted directed graphs embedded in 3-D space.
//!
//! This crate provides the data model shared by the *navgraph* search
//! engines: geometry primitives, nodes with passability flags, arcs with
//! lazily cached lengths, the [`Graph`] container with its structural
//! version counter, and [`SharedGraph`], a reader-writer locked handle for
//! running searches concurrently with occasional mutation.

pub mod arc;
pub mod error;
pub mod generate;
pub mod geom;
pub mod graph;
pub mod node;
pub mod shared;

pub use arc::{Arc, ArcKey};
pub use error::GraphError;
pub use generate::{Lattice, random_geometric};
pub use geom::{BoundingBox, Point3, Vec3};
pub use graph::{CompactReport, Graph, GraphId};
pub use node::{Node, NodeId};
pub use shared::SharedGraph;

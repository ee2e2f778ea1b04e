//! Graph generators for demos, benchmarks and tests.

use rand::Rng;

use crate::error::GraphError;
use crate::geom::Point3;
use crate::graph::Graph;
use crate::node::NodeId;

/// A 3-D grid of nodes joined to their axis neighbours in both directions.
#[derive(Debug, Clone)]
pub struct Lattice {
    pub graph: Graph,
    dims: (usize, usize, usize),
    ids: Vec<NodeId>,
}

impl Lattice {
    /// Build an `nx * ny * nz` lattice with the given spacing and arc weight.
    ///
    /// Cell `(i, j, k)` sits at `((i + 1) * spacing, (j + 1) * spacing,
    /// (k + 1) * spacing)`, so no node lands on the origin.
    pub fn new(nx: usize, ny: usize, nz: usize, spacing: f64, weight: f64) -> Result<Self, GraphError> {
        let mut graph = Graph::with_capacity(nx * ny * nz);
        let mut ids = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    ids.push(graph.add_node(Point3::new(
                        (i + 1) as f64 * spacing,
                        (j + 1) as f64 * spacing,
                        (k + 1) as f64 * spacing,
                    )));
                }
            }
        }
        let mut lattice = Self {
            graph,
            dims: (nx, ny, nz),
            ids,
        };
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let here = lattice.ids[lattice.flat(i, j, k)];
                    for (di, dj, dk) in [(1, 0, 0), (0, 1, 0), (0, 0, 1)] {
                        if let Some(there) = lattice.at(i + di, j + dj, k + dk) {
                            lattice.graph.connect_both(here, there, weight)?;
                        }
                    }
                }
            }
        }
        Ok(lattice)
    }

    #[inline]
    fn flat(&self, i: usize, j: usize, k: usize) -> usize {
        let (nx, ny, _) = self.dims;
        (k * ny + j) * nx + i
    }

    /// The node at cell `(i, j, k)`, if inside the lattice.
    pub fn at(&self, i: usize, j: usize, k: usize) -> Option<NodeId> {
        let (nx, ny, nz) = self.dims;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        Some(self.ids[self.flat(i, j, k)])
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    /// Node ids in x-major, then y, then z order.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }
}

/// Scatter `count` nodes uniformly in the cube `[-extent, extent)^3` and
/// join every pair closer than `radius` in both directions.
pub fn random_geometric<R: Rng>(
    rng: &mut R,
    count: usize,
    extent: f64,
    radius: f64,
    weight: f64,
) -> Result<Graph, GraphError> {
    let mut graph = Graph::with_capacity(count);
    let mut placed: Vec<(NodeId, Point3)> = Vec::with_capacity(count);
    for _ in 0..count {
        let p = Point3::new(
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
        );
        let id = graph.add_node(p);
        for &(other, q) in &placed {
            if p.distance(q) < radius {
                graph.connect_both(id, other, weight)?;
            }
        }
        placed.push((id, p));
    }
    Ok(graph)
}

use navgraph_core::Point3;

/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(a: Point3, b: Point3) -> f64 {
    a.distance(b)
}

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point3, b: Point3) -> f64 {
    a.manhattan_distance(b)
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point3, b: Point3) -> f64 {
    a.chebyshev_distance(b)
}

/// Distance estimate used by A* to rank frontier tracks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
}

impl Heuristic {
    /// Estimated distance from `from` to `to`.
    #[inline]
    pub fn estimate(self, from: Point3, to: Point3) -> f64 {
        match self {
            Heuristic::Euclidean => euclidean(from, to),
            Heuristic::Manhattan => manhattan(from, to),
            Heuristic::Chebyshev => chebyshev(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristics_disagree_off_axis() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::new(3.0, 4.0, 1.0);
        assert_eq!(Heuristic::Euclidean.estimate(a, b), (4.0f64 + 9.0).sqrt());
        assert_eq!(Heuristic::Manhattan.estimate(a, b), 5.0);
        assert_eq!(Heuristic::Chebyshev.estimate(a, b), 3.0);
    }

    #[test]
    fn heuristics_agree_on_axis() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::new(1.0, 1.0, 6.0);
        for h in [Heuristic::Euclidean, Heuristic::Manhattan, Heuristic::Chebyshev] {
            assert_eq!(h.estimate(a, b), 5.0);
        }
    }
}

//! Per-engine search settings.
//!
//! Each engine owns its own copy, so two searches with different settings
//! can run side by side.

use std::fmt;

use crate::distance::Heuristic;
use crate::error::SearchError;

/// Dijkstra-heuristic balance `a` in `[0, 1]`.
///
/// A* ranks a track by `a * cost + (1 - a) * estimate`. At 1 the search is
/// plain Dijkstra (optimal, explores more); at 0 it is greedy best-first
/// (fast, no optimality guarantee).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Balance(f64);

impl Balance {
    pub const DIJKSTRA: Balance = Balance(1.0);
    pub const GREEDY: Balance = Balance(0.0);
    pub const EVEN: Balance = Balance(0.5);

    /// Fails with [`SearchError::InvalidArgument`] outside `[0, 1]` or for NaN.
    pub fn new(value: f64) -> Result<Self, SearchError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Balance(value))
        } else {
            Err(SearchError::InvalidArgument(format!(
                "balance {value} is outside [0, 1]"
            )))
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Blend a cost-so-far with a remaining-distance estimate.
    #[inline]
    pub fn evaluate(self, cost: f64, estimate: f64) -> f64 {
        if self.0 == 1.0 {
            // Skip the estimate entirely so an infinite one cannot turn
            // into NaN.
            return cost;
        }
        self.0 * cost + (1.0 - self.0) * estimate
    }
}

impl Default for Balance {
    fn default() -> Self {
        Balance::EVEN
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Balance {
    type Error = SearchError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Balance::new(value)
    }
}

impl From<Balance> for f64 {
    fn from(b: Balance) -> f64 {
        b.0
    }
}

/// Settings read by A* at search time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    pub balance: Balance,
}

impl SearchConfig {
    /// Pure Dijkstra: always optimal.
    pub fn dijkstra() -> Self {
        Self {
            heuristic: Heuristic::default(),
            balance: Balance::DIJKSTRA,
        }
    }
}

/// Settings for the wave engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveConfig {
    /// Extra steps allowed beyond the node count when walking a cached
    /// back-pointer chain. A longer walk means the chain loops.
    pub chain_guard_slack: usize,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            chain_guard_slack: 1,
        }
    }
}

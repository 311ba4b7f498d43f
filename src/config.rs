//! Rule parameters shared by every puzzle.

use serde::{Deserialize, Serialize};

/// Tolerances and limits applied by the placement rules and constraints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Most bridges allowed between any unordered pair of islands (default: 2).
    pub max_num_bridges: usize,

    /// Allowed difference between a fixed bridge length and the Euclidean island distance (default: 0.01).
    pub length_tolerance: f64,

    /// Slack on the interpolation parameter when projecting a tile onto a bridge (default: 0.01).
    pub projection_tolerance: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_num_bridges: 2,
            length_tolerance: 0.01,
            projection_tolerance: 0.01,
        }
    }
}

impl RulesConfig {
    /// Set [`Self::max_num_bridges`].
    pub fn with_max_num_bridges(mut self, max: usize) -> Self {
        self.max_num_bridges = max;
        self
    }

    /// Set [`Self::length_tolerance`].
    pub fn with_length_tolerance(mut self, tolerance: f64) -> Self {
        self.length_tolerance = tolerance;
        self
    }

    /// Set [`Self::projection_tolerance`].
    pub fn with_projection_tolerance(mut self, tolerance: f64) -> Self {
        self.projection_tolerance = tolerance;
        self
    }
}

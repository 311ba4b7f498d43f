use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Identifier of an [`Island`].
pub type IslandId = String;

const NUM_BRIDGES_PREFIX: &str = "num_bridges=";

/// A fixed anchor on the grid that bridges connect.
///
/// `constraints` holds free-form strings. Only `num_bridges=N` is understood here; anything else is
/// carried along untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Island {
    /// Unique within a puzzle.
    pub id: IslandId,
    /// Grid tile the island occupies.
    pub location: Location,
    /// Free-form constraint strings.
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl Island {
    /// An island with no constraint strings.
    pub fn new(id: impl Into<IslandId>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
            constraints: Vec::new(),
        }
    }

    /// Append a constraint string such as `num_bridges=2`.
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    /// The bridge count this island asks for, parsed from its first well-formed `num_bridges=N` entry.
    pub fn num_bridges(&self) -> Option<usize> {
        self.constraints.iter()
            .filter_map(|c| c.trim().strip_prefix(NUM_BRIDGES_PREFIX))
            .find_map(|n| n.trim().parse().ok())
    }
}

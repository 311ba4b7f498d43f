use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

use crate::location::Location;

/// A compass step on the square grid. North is toward `y = 0`.
#[derive(Copy, Clone, VariantArray, EnumString, Display, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Direction {
    /// Toward `y = 0`.
    #[strum(to_string = "N", serialize = "North")]
    #[serde(alias = "N")]
    North,
    /// Away from `y = 0`.
    #[strum(to_string = "S", serialize = "South")]
    #[serde(alias = "S")]
    South,
    /// Away from `x = 0`.
    #[strum(to_string = "E", serialize = "East")]
    #[serde(alias = "E")]
    East,
    /// Toward `x = 0`.
    #[strum(to_string = "W", serialize = "West")]
    #[serde(alias = "W")]
    West,
}

impl Direction {
    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// No bounds are checked; stepping north of row 0 or west of column 0 yields a location no grid contains.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::North => location.offset_by((0, -1)),
            Self::South => location.offset_by((0, 1)),
            Self::West => location.offset_by((-1, 0)),
            Self::East => location.offset_by((1, 0)),
        }
    }

    /// The opposite step.
    pub fn invert(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// All four neighbors of `location`, tagged with the step that reaches them.
    pub fn neighbors_of(location: Location) -> impl Iterator<Item = (Self, Location)> {
        Self::VARIANTS.iter().map(move |dir| (*dir, dir.attempt_from(location)))
    }

    /// The step from `a` to `b`, if the two are orthogonally adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }
}

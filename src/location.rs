use std::num::NonZero;

use ndarray::Ix;
use serde::{Deserialize, Serialize};

pub(crate) type Coord = usize;
/// A nonzero board extent, used for both width and height.
pub type Dimension = NonZero<Coord>;

/// A location `(x, y)` on a grid. The top left corner is `Location(0, 0)`.
///
/// The same type is used for puzzle-local tiles and world-map tiles; [`Bounds`] converts between the two.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Offset by a signed delta. Stepping off the top or left edge wraps to a huge coordinate,
    /// which every bounds check downstream treats as out of range.
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// Whether this location lies in a `dims.0` by `dims.1` grid.
    pub fn within(&self, dims: (Dimension, Dimension)) -> bool {
        self.0 < dims.0.get() && self.1 < dims.1.get()
    }

    /// Whether this location is on the outermost ring of a `dims` grid.
    pub fn on_perimeter(&self, dims: (Dimension, Dimension)) -> bool {
        self.within(dims)
            && (self.0 == 0 || self.1 == 0 || self.0 == dims.0.get() - 1 || self.1 == dims.1.get() - 1)
    }

    /// Manhattan distance; 1 means the two tiles share an edge.
    pub fn manhattan(&self, other: Location) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    pub(crate) fn as_f64(&self) -> (f64, f64) {
        (self.0 as f64, self.1 as f64)
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

/// A rectangle of world-map tiles occupied by one puzzle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// World location of the puzzle's local `Location(0, 0)`.
    pub origin: Location,
    /// Width in tiles.
    pub width: Coord,
    /// Height in tiles.
    pub height: Coord,
}

impl Bounds {
    /// Bounds of a `width` by `height` puzzle placed at `origin`.
    pub fn new(origin: Location, width: Coord, height: Coord) -> Self {
        Self { origin, width, height }
    }

    /// Whether the world tile lies inside these bounds.
    pub fn contains(&self, world: Location) -> bool {
        world.0 >= self.origin.0
            && world.1 >= self.origin.1
            && world.0 < self.origin.0 + self.width
            && world.1 < self.origin.1 + self.height
    }

    /// Translate a local tile to the world map. Nothing is bounds-checked.
    pub fn to_world(&self, local: Location) -> Location {
        Location(self.origin.0 + local.0, self.origin.1 + local.1)
    }

    /// Convert a world tile to local coordinates, if it falls inside these bounds.
    pub fn to_local(&self, world: Location) -> Option<Location> {
        if self.contains(world) {
            Some(Location(world.0 - self.origin.0, world.1 - self.origin.1))
        } else {
            None
        }
    }
}

//! Per-tile traversability, derived on demand from water, terrain and bridges.
//!
//! This is a view for pathing and rendering. Nothing in puzzle solving reads it.

use std::collections::HashSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geometry::Span;
use crate::location::{Dimension, Location};

/// How a tile can be walked over.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Connectivity {
    /// Not walkable.
    Blocked,
    /// Walkable at bridge/deck height.
    PassableHigh,
    /// Walkable at ground height.
    PassableLow,
}

/// Terrain flags of one tile.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Terrain {
    /// Floats when wet.
    pub pontoon: bool,
    /// Rocky ground.
    pub rocky: bool,
    /// Impassable.
    pub obstacle: bool,
}

/// Classify every tile of a `dims` grid.
///
/// Priority, first match wins: obstacle is blocked; under a bridge is high; a pontoon is high when
/// floating and low when dry; other water is blocked; dry rocky ground is blocked; anything else is low.
/// Tiles under a bridge are those strictly between its endpoints.
pub fn classify(
    dims: (Dimension, Dimension),
    has_water: &dyn Fn(Location) -> bool,
    terrain: Option<&dyn Fn(Location) -> Terrain>,
    spans: &[Span],
) -> Array2<Connectivity> {
    let covered: HashSet<Location> = spans.iter().flat_map(Span::tiles_between).collect();

    Array2::from_shape_fn((dims.1.get(), dims.0.get()), |index| {
        let location = Location::from(index);
        let terrain = terrain.map(|t| t(location)).unwrap_or_default();
        let water = has_water(location);

        if terrain.obstacle {
            Connectivity::Blocked
        } else if covered.contains(&location) {
            Connectivity::PassableHigh
        } else if terrain.pontoon {
            if water { Connectivity::PassableHigh } else { Connectivity::PassableLow }
        } else if water || terrain.rocky {
            Connectivity::Blocked
        } else {
            Connectivity::PassableLow
        }
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use super::{classify, Connectivity, Terrain};
    use crate::geometry::Span;
    use crate::location::Location;

    #[test]
    fn priority_order() {
        let dims = (NonZero::new(5).unwrap(), NonZero::new(1).unwrap());
        let water = |l: Location| l.0 >= 1;
        let terrain = |l: Location| match l.0 {
            1 => Terrain { obstacle: true, ..Default::default() },
            3 => Terrain { pontoon: true, ..Default::default() },
            _ => Terrain::default(),
        };
        let spans = [Span::new(Location(0, 0), Location(3, 0))];

        let grid = classify(dims, &water, Some(&terrain), &spans);
        let row: Vec<Connectivity> = grid.row(0).to_vec();
        assert_eq!(row, vec![
            Connectivity::PassableLow,
            // obstacle beats the bridge over it
            Connectivity::Blocked,
            Connectivity::PassableHigh,
            Connectivity::PassableHigh,
            Connectivity::Blocked,
        ]);
    }

    #[test]
    fn dry_tiles_without_terrain() {
        let dims = (NonZero::new(2).unwrap(), NonZero::new(2).unwrap());
        let rocky = |l: Location| Terrain { rocky: l == Location(1, 1), ..Default::default() };
        let dry_pontoon = |_: Location| Terrain { pontoon: true, ..Default::default() };

        let grid = classify(dims, &|_: Location| false, Some(&rocky), &[]);
        assert_eq!(grid[[1, 1]], Connectivity::Blocked);
        assert_eq!(grid[[0, 1]], Connectivity::PassableLow);

        let grid = classify(dims, &|_: Location| false, Some(&dry_pontoon), &[]);
        assert!(grid.iter().all(|c| *c == Connectivity::PassableLow));

        let grid = classify(dims, &|_: Location| false, None, &[]);
        assert!(grid.iter().all(|c| *c == Connectivity::PassableLow));
    }
}

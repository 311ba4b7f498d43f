//! Puzzles whose tiles carry water.
//!
//! Water state is derived: after every change to bridges or edge inputs the whole grid is flooded again
//! from scratch, so callers never observe a half-updated grid.

use std::collections::{BTreeSet, HashSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bridge::{Bridge, BridgeId};
use crate::connectivity::{self, Connectivity, Terrain};
use crate::constraint::CheckContext;
use crate::definition::FlowPuzzleSpec;
use crate::direction::Direction;
use crate::error::PuzzleError;
use crate::geometry::Span;
use crate::location::Location;
use crate::puzzle::Puzzle;
use crate::validator::{ValidationReport, Validator};

/// Flow metadata of one tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTile {
    /// Where this tile sits.
    pub location: Location,
    /// Directions water leaves this tile in.
    #[serde(default)]
    pub outflow: BTreeSet<Direction>,
    /// Always wet unless blocked.
    #[serde(default)]
    pub is_source: bool,
    /// Never wet, never passes water on.
    #[serde(default)]
    pub obstacle: bool,
    /// Gets wet but does not pass water on.
    #[serde(default)]
    pub rocky: bool,
    /// Walkable when floating; see [`Connectivity`].
    #[serde(default)]
    pub pontoon: bool,
}

impl FlowTile {
    /// A plain tile with no outflow.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            outflow: BTreeSet::new(),
            is_source: false,
            obstacle: false,
            rocky: false,
            pontoon: false,
        }
    }

    /// Add outflow directions.
    pub fn flowing(mut self, directions: impl IntoIterator<Item = Direction>) -> Self {
        self.outflow.extend(directions);
        self
    }

    /// Mark as a water source.
    pub fn source(mut self) -> Self {
        self.is_source = true;
        self
    }

    /// Mark as an obstacle.
    pub fn obstacle(mut self) -> Self {
        self.obstacle = true;
        self
    }

    /// Mark as rocky.
    pub fn rocky(mut self) -> Self {
        self.rocky = true;
        self
    }

    /// Mark as carrying a pontoon.
    pub fn pontoon(mut self) -> Self {
        self.pontoon = true;
        self
    }

    /// The terrain flags used for [`Connectivity`] classification.
    pub fn terrain(&self) -> Terrain {
        Terrain {
            pontoon: self.pontoon,
            rocky: self.rocky,
            obstacle: self.obstacle,
        }
    }
}

/// A [`Puzzle`] extended with flow tiles and a water simulation.
///
/// Build one through [`PuzzleBuilder::build_flow`](crate::PuzzleBuilder::build_flow) or [`FlowPuzzle::from_spec`].
#[derive(Clone, Debug)]
pub struct FlowPuzzle {
    puzzle: Puzzle,
    tiles: Array2<Option<FlowTile>>,
    edge_inputs: BTreeSet<Location>,
    water: Array2<bool>,
    edge_outputs: BTreeSet<Location>,
}

impl FlowPuzzle {
    /// Tiles are assumed to be in bounds and unique; the builder checks both.
    pub(crate) fn new(puzzle: Puzzle, tiles: Vec<FlowTile>, edge_inputs: BTreeSet<Location>) -> Self {
        let shape = (puzzle.dims.1.get(), puzzle.dims.0.get());
        let mut grid: Array2<Option<FlowTile>> = Array2::from_elem(shape, None);
        for tile in tiles {
            if let Some(cell) = grid.get_mut(tile.location.as_index()) {
                *cell = Some(tile);
            }
        }

        let mut flow = Self {
            puzzle,
            tiles: grid,
            edge_inputs,
            water: Array2::from_elem(shape, false),
            edge_outputs: BTreeSet::new(),
        };
        flow.recompute();
        flow
    }

    /// Build from a loaded definition; see [`Puzzle::from_spec`].
    pub fn from_spec(spec: &FlowPuzzleSpec) -> Result<Self, PuzzleError> {
        let mut builder = Puzzle::builder_from_spec(&spec.puzzle)?;
        for tile in &spec.tiles {
            builder.add_flow_tile(tile.clone());
        }
        for input in &spec.edge_inputs {
            builder.add_edge_input(*input);
        }
        builder.build_flow()
    }

    /// The underlying puzzle. Mutate through [`FlowPuzzle`] so water stays current.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Flow metadata at `location`, if any.
    pub fn tile(&self, location: Location) -> Option<&FlowTile> {
        self.tiles.get(location.as_index()).and_then(Option::as_ref)
    }

    /// Every tile with flow metadata, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = &FlowTile> {
        self.tiles.iter().flatten()
    }

    /// Tiles currently fed from outside the puzzle.
    pub fn edge_inputs(&self) -> &BTreeSet<Location> {
        &self.edge_inputs
    }

    /// Watered tiles on the puzzle perimeter, as of the last recomputation.
    pub fn edge_outputs(&self) -> &BTreeSet<Location> {
        &self.edge_outputs
    }

    /// Whether `location` is wet.
    pub fn has_water(&self, location: Location) -> bool {
        self.water.get(location.as_index()).copied().unwrap_or(false)
    }

    /// Wet tiles, row by row.
    pub fn watered_tiles(&self) -> impl Iterator<Item = Location> + '_ {
        self.water.indexed_iter().filter(|(_, wet)| **wet).map(|(index, _)| Location::from(index))
    }

    /// Replace the set of tiles fed from outside the puzzle and re-flood. Out of bounds inputs are dropped.
    pub fn set_edge_inputs(&mut self, inputs: impl IntoIterator<Item = Location>) {
        let dims = self.puzzle.dims;
        self.edge_inputs = inputs.into_iter().filter(|l| l.within(dims)).collect();
        self.recompute();
    }

    /// [`Puzzle::place_bridge`], then re-flood.
    pub fn place_bridge(&mut self, id: &str, start: Location, end: Location) -> Result<(), PuzzleError> {
        self.puzzle.place_bridge(id, start, end)?;
        self.recompute();
        Ok(())
    }

    /// [`Puzzle::remove_bridge`], then re-flood.
    pub fn remove_bridge(&mut self, id: &str) -> Result<(), PuzzleError> {
        self.puzzle.remove_bridge(id)?;
        self.recompute();
        Ok(())
    }

    /// [`Puzzle::connect`] with this puzzle's placement rules, re-flooding on success.
    pub fn connect(&mut self, start_island: &str, end_island: &str, type_id: &str) -> Result<Option<BridgeId>, PuzzleError> {
        let start = self.puzzle.island(start_island).ok_or_else(|| PuzzleError::UnknownIsland(start_island.to_owned()))?.location;
        let end = self.puzzle.island(end_island).ok_or_else(|| PuzzleError::UnknownIsland(end_island.to_owned()))?.location;
        if self.puzzle.bridge_type(type_id).is_none() {
            return Err(PuzzleError::UnknownBridgeType(type_id.to_owned()));
        }

        if !self.could_place_bridge_of_type(start_island, end_island, Some(type_id)) {
            return Ok(None);
        }
        let Some(id) = self.puzzle.inventory.take(type_id).map(|b| b.id.clone()) else {
            return Ok(None);
        };

        self.place_bridge(&id, start, end)?;
        Ok(Some(id))
    }

    /// See [`Puzzle::bridges_at`].
    pub fn bridges_at(&self, location: Location) -> Vec<&Bridge> {
        self.puzzle.bridges_at(location)
    }

    /// [`Puzzle::could_place_bridge_of_type`], additionally requiring an axis-aligned span that passes
    /// over no obstacle tile.
    pub fn could_place_bridge_of_type(&self, start_island: &str, end_island: &str, type_id: Option<&str>) -> bool {
        if !self.puzzle.could_place_bridge_of_type(start_island, end_island, type_id) {
            return false;
        }
        let (Some(a), Some(b)) = (self.puzzle.island(start_island), self.puzzle.island(end_island)) else {
            return false;
        };

        let span = Span::new(a.location, b.location);
        span.is_axis_aligned() && !span.tiles_between().iter().any(|l| self.tile(*l).is_some_and(|t| t.obstacle))
    }

    /// Flood the grid from scratch.
    ///
    /// Obstacles and tiles under placed bridges are blocked. Unblocked edge inputs and sources are wet and
    /// queued; from there water follows each tile's outflow directions into known, unblocked neighbors.
    /// Rocky tiles get wet but are never queued.
    fn recompute(&mut self) {
        let blocked: HashSet<Location> = self.tiles()
            .filter(|t| t.obstacle)
            .map(|t| t.location)
            .chain(self.puzzle.placed_spans().flat_map(|s| s.tiles_between()))
            .collect();

        self.water.fill(false);
        let mut queue = VecDeque::new();

        let seeds = self.edge_inputs.iter().copied()
            .chain(self.tiles().filter(|t| t.is_source).map(|t| t.location))
            .collect::<Vec<_>>();
        for seed in seeds {
            if blocked.contains(&seed) {
                continue;
            }
            if let Some(wet) = self.water.get_mut(seed.as_index()) {
                if !*wet {
                    *wet = true;
                    queue.push_back(seed);
                }
            }
        }

        while let Some(location) = queue.pop_front() {
            let Some(tile) = self.tile(location) else { continue };
            let next = tile.outflow.iter()
                .map(|dir| dir.attempt_from(location))
                .filter_map(|n| self.tile(n).map(|t| (n, t.obstacle, t.rocky)))
                .collect::<Vec<_>>();

            for (neighbor, obstacle, rocky) in next {
                if obstacle || blocked.contains(&neighbor) {
                    continue;
                }
                let Some(wet) = self.water.get_mut(neighbor.as_index()) else { continue };
                let was_wet = *wet;
                *wet = true;
                if !rocky && !was_wet {
                    queue.push_back(neighbor);
                }
            }
        }

        let dims = self.puzzle.dims;
        self.edge_outputs = self.watered_tiles().filter(|l| l.on_perimeter(dims)).collect();

        debug!(
            puzzle = self.puzzle.id(),
            blocked = blocked.len(),
            wet = self.watered_tiles().count(),
            outputs = self.edge_outputs.len(),
            "recomputed water"
        );
    }

    /// Traversability of every tile under the current water and bridges.
    pub fn connectivity(&self) -> Array2<Connectivity> {
        let spans: Vec<Span> = self.puzzle.placed_spans().collect();
        let terrain = |l: Location| self.tile(l).map(FlowTile::terrain).unwrap_or_default();
        connectivity::classify(self.puzzle.dims, &|l: Location| self.has_water(l), Some(&terrain), &spans)
    }

    pub(crate) fn check_context(&self) -> CheckContext<'_> {
        CheckContext { puzzle: &self.puzzle, water: Some(&self.water) }
    }

    /// Run every constraint, with water-dependent ones seeing the current water grid.
    pub fn validate_all(&self) -> ValidationReport {
        Validator::new(self.puzzle.constraints()).validate_all(&self.check_context())
    }

    /// Whether every constraint is satisfied, water included.
    pub fn is_solved(&self) -> bool {
        self.validate_all().all_satisfied
    }
}

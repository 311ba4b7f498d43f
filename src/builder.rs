//! Chained construction of [`Puzzle`]s and [`FlowPuzzle`]s.

use std::collections::{BTreeSet, HashSet};
use std::num::NonZero;

use crate::bridge::{BridgeType, BridgeTypeId};
use crate::config::RulesConfig;
use crate::constraint::Constraint;
use crate::error::PuzzleError;
use crate::flow::{FlowPuzzle, FlowTile};
use crate::inventory::Inventory;
use crate::island::{Island, IslandId};
use crate::location::{Dimension, Location};
use crate::puzzle::Puzzle;

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// An island, flow tile or edge input was placed outside the bounds given by `dims`.
    FeatureOutOfBounds(Location),
    /// Two islands were given the same id.
    DuplicateIsland(IslandId),
    /// Two islands were placed on the same tile.
    IslandsOverlap(Location),
    /// A bridge type id was declared twice.
    DuplicateBridgeType(BridgeTypeId),
    /// A constraint names a bridge type the puzzle does not declare.
    UnknownBridgeType(BridgeTypeId),
    /// Two flow tiles were declared for the same location.
    DuplicateFlowTile(Location),
}

/// A builder for puzzles on a rectangular grid.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Every adding method records a [`BuilderInvalidReason`] instead of failing outright; once the builder is
/// invalid, further calls do nothing.
#[derive(Clone)]
pub struct PuzzleBuilder {
    id: String,
    // width, height
    dims: (Dimension, Dimension),
    islands: Vec<Island>,
    bridge_types: Vec<(BridgeType, usize)>,
    constraints: Vec<Constraint>,
    config: RulesConfig,
    invalid_reasons: Vec<BuilderInvalidReason>,
    flow_tiles: Vec<FlowTile>,
    edge_inputs: BTreeSet<Location>,
}

impl Default for PuzzleBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::new(5).unwrap(), NonZero::new(5).unwrap()))
    }
}

impl PuzzleBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(x, y)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            id: String::new(),
            dims,
            islands: Default::default(),
            bridge_types: Default::default(),
            constraints: Default::default(),
            config: Default::default(),
            invalid_reasons: Default::default(),
            flow_tiles: Default::default(),
            edge_inputs: Default::default(),
        }
    }

    #[inline]
    fn check_bounds(&mut self, location: Location) -> bool {
        if location.within(self.dims) {
            true
        } else {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds(location));
            false
        }
    }

    /// Set the puzzle id used in logs and by the water network.
    pub fn id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    /// Replace the whole [`RulesConfig`].
    pub fn config(&mut self, config: RulesConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Shorthand for replacing [`RulesConfig::max_num_bridges`].
    pub fn max_num_bridges(&mut self, max: usize) -> &mut Self {
        self.config.max_num_bridges = max;
        self
    }

    /// Add an island.
    ///
    /// May cause the builder to enter an invalid state if the island is out of bounds, or if its id or
    /// location is already taken.
    pub fn add_island(&mut self, island: Island) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.check_bounds(island.location) {
            return self;
        }

        if self.islands.iter().any(|other| other.id == island.id) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateIsland(island.id));
            return self;
        }

        if self.islands.iter().any(|other| other.location == island.location) {
            self.invalid_reasons.push(BuilderInvalidReason::IslandsOverlap(island.location));
            return self;
        }

        self.islands.push(island);
        self
    }

    /// Declare a bridge type with `count` tokens in the inventory.
    pub fn add_bridge_type(&mut self, bridge_type: BridgeType, count: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.bridge_types.iter().any(|(other, _)| other.id == bridge_type.id) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateBridgeType(bridge_type.id));
            return self;
        }

        self.bridge_types.push((bridge_type, count));
        self
    }

    /// Add a constraint. Adding any suppresses the derived [`Constraint::BridgeLength`] ones.
    pub fn add_constraint(&mut self, constraint: Constraint) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.constraints.push(constraint);
        self
    }

    /// Attach flow metadata to a tile. Only used by [`Self::build_flow`].
    pub fn add_flow_tile(&mut self, tile: FlowTile) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.check_bounds(tile.location) {
            return self;
        }

        if self.flow_tiles.iter().any(|other| other.location == tile.location) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateFlowTile(tile.location));
            return self;
        }

        self.flow_tiles.push(tile);
        self
    }

    /// Mark a tile as receiving water from outside the puzzle. Only used by [`Self::build_flow`].
    pub fn add_edge_input(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.check_bounds(location) {
            self.edge_inputs.insert(location);
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Puzzle`].
    ///
    /// With no constraints added, one [`Constraint::BridgeLength`] is derived per fixed-length bridge type.
    pub fn build(&self) -> Result<Puzzle, PuzzleError> {
        if !self.invalid_reasons.is_empty() {
            return Err(PuzzleError::InvalidBuild(self.invalid_reasons.clone()));
        }

        let declared: HashSet<&str> = self.bridge_types.iter().map(|(t, _)| t.id.as_str()).collect();
        let unknown = self.constraints.iter()
            .filter_map(|c| match c {
                Constraint::BridgeLength { type_id, .. } if !declared.contains(type_id.as_str()) => {
                    Some(BuilderInvalidReason::UnknownBridgeType(type_id.clone()))
                }
                _ => None,
            })
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            return Err(PuzzleError::InvalidBuild(unknown));
        }

        let constraints = if self.constraints.is_empty() {
            self.bridge_types.iter()
                .filter_map(|(t, _)| t.length.map(|length| Constraint::BridgeLength { type_id: t.id.clone(), length }))
                .collect()
        } else {
            self.constraints.clone()
        };

        let inventory = Inventory::with_counts(self.bridge_types.iter().map(|(t, count)| (t.id.as_str(), *count)));

        Ok(Puzzle {
            id: self.id.clone(),
            dims: self.dims,
            islands: self.islands.clone(),
            bridge_types: self.bridge_types.iter().map(|(t, _)| t.clone()).collect(),
            inventory,
            constraints,
            config: self.config,
        })
    }

    /// Convert the state of this builder into a [`FlowPuzzle`], running the first water recomputation.
    pub fn build_flow(&self) -> Result<FlowPuzzle, PuzzleError> {
        let puzzle = self.build()?;
        Ok(FlowPuzzle::new(puzzle, self.flow_tiles.clone(), self.edge_inputs.clone()))
    }
}

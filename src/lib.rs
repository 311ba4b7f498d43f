#![warn(missing_docs)]

//! # `riverlink`
//!
//! The rule and water-simulation core of a grid-based bridge-building puzzle.
//! Begin by building a puzzle with a [`PuzzleBuilder`] or from a loaded [`PuzzleSpec`] via [`Puzzle::from_spec`].
//! Place and remove bridge tokens through the [`Puzzle`], ask it which placements are legal, and run its
//! constraints with [`Puzzle::validate_all`] or [`Puzzle::is_solved`].
//!
//! Flow puzzles ([`FlowPuzzle`]) add per-tile flow metadata. Every bridge change re-floods the grid from the
//! puzzle's water sources and edge inputs; the wet tiles on the perimeter become the puzzle's edge outputs.
//!
//! On a world map, [`extract_channels`] traces the rivers joining puzzle regions once, ahead of time.
//! A [`WaterNetwork`] then turns one puzzle's edge outputs into flooded and drained river tiles and new
//! edge inputs for the puzzles downstream.
//!
//! # Internals
//! Everything is synchronous. Water is recomputed wholesale with a breadth-first flood of the whole grid
//! after each change.
//!
//! Bridges are straight segments between island locations. Crossing is decided by the sign of
//! orientation determinants, and tile coverage by projecting the tile onto the segment.

pub use bridge::{Bridge, BridgeId, BridgeType, BridgeTypeId, IslandCoverage, SpanRule};
pub use builder::{BuilderInvalidReason, PuzzleBuilder};
pub use channel::{extract_channels, ChannelEnd, EdgeTile, PuzzleId, PuzzleRegion, RiverChannel, TileMap, FLOWING_WATER_LAYER};
pub use config::RulesConfig;
pub use connectivity::{classify, Connectivity, Terrain};
pub use constraint::{CheckContext, Constraint, ConstraintKind, ConstraintResult, ElementId};
pub use definition::{BridgeTypeSpec, ConstraintSpec, FlowPuzzleSpec, PuzzleSpec, SpanKind};
pub use direction::Direction;
pub use error::PuzzleError;
pub use flow::{FlowPuzzle, FlowTile};
pub use geometry::Span;
pub use inventory::Inventory;
pub use island::{Island, IslandId};
pub use location::{Bounds, Dimension, Location};
pub use propagation::{PropagationResult, WaterNetwork};
pub use puzzle::Puzzle;
pub use validator::{ConstraintOutcome, ValidationReport, Validator};

pub(crate) mod location;
pub(crate) mod direction;
pub mod geometry;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod island;
pub(crate) mod bridge;
pub(crate) mod inventory;
pub mod definition;
pub mod builder;
pub(crate) mod puzzle;
pub mod constraint;
pub(crate) mod validator;
pub mod flow;
pub mod connectivity;
pub mod channel;
pub mod propagation;
mod tests;

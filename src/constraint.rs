//! Rules a finished puzzle has to satisfy.
//!
//! Constraints are a closed set, dispatched through [`Constraint::check`]. Loaded definitions name them by
//! [`ConstraintKind`] and are resolved with [`Constraint::from_spec`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use strum::{Display as StrumDisplay, EnumString, IntoStaticStr, VariantArray};

use crate::bridge::{BridgeId, BridgeTypeId};
use crate::definition::ConstraintSpec;
use crate::error::PuzzleError;
use crate::island::IslandId;
use crate::location::Location;
use crate::puzzle::Puzzle;

/// Names under which constraints appear in puzzle definitions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumString, IntoStaticStr, StrumDisplay, VariantArray)]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintKind {
    /// `all_bridges_placed`
    AllBridgesPlaced,
    /// `no_crossing`
    NoCrossing,
    /// `bridge_length`, params `type_id` and `length`
    BridgeLength,
    /// `must_have_water`, params `x` and `y`
    MustHaveWater,
    /// `island_bridge_count`
    IslandBridgeCount,
    /// `connected`
    Connected,
}

/// A puzzle element a constraint result points at.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementId {
    /// A bridge token.
    Bridge(BridgeId),
    /// An island.
    Island(IslandId),
    /// A grid tile.
    Tile(Location),
}

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementId::Bridge(id) => write!(f, "bridge {id}"),
            ElementId::Island(id) => write!(f, "island {id}"),
            ElementId::Tile(Location(x, y)) => write!(f, "tile ({x}, {y})"),
        }
    }
}

/// The outcome of one [`Constraint::check`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintResult {
    /// Whether the constraint holds.
    pub satisfied: bool,
    /// Elements to highlight. Empty when satisfied.
    pub affected: Vec<ElementId>,
    /// Human-readable reason for a failure.
    pub message: Option<String>,
}

impl ConstraintResult {
    /// A satisfied result.
    pub fn pass() -> Self {
        Self { satisfied: true, affected: Vec::new(), message: None }
    }

    /// An unsatisfied result pointing at `affected`.
    pub fn fail(affected: Vec<ElementId>, message: impl Into<String>) -> Self {
        Self { satisfied: false, affected, message: Some(message.into()) }
    }

    /// Passes iff nothing is affected.
    fn from_affected(affected: Vec<ElementId>, message: impl FnOnce(&[ElementId]) -> String) -> Self {
        if affected.is_empty() {
            Self::pass()
        } else {
            let message = message(&affected);
            Self::fail(affected, message)
        }
    }
}

/// What a constraint gets to look at: the puzzle, plus the water grid when the puzzle is a flow puzzle.
pub struct CheckContext<'a> {
    /// The puzzle under test.
    pub puzzle: &'a Puzzle,
    /// Wet tiles indexed `[y, x]`; `None` outside flow puzzles.
    pub water: Option<&'a Array2<bool>>,
}

/// One rule of a puzzle, with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Every token in the inventory is placed.
    AllBridgesPlaced,
    /// No two placed bridges cross, except where they share an endpoint.
    NoCrossing,
    /// Every placed bridge of `type_id` spans `length`.
    BridgeLength {
        /// The bridge type being measured.
        type_id: BridgeTypeId,
        /// Expected Euclidean span length.
        length: f64,
    },
    /// `location` currently carries water.
    MustHaveWater {
        /// Puzzle-local tile that must be wet.
        location: Location,
    },
    /// Every island with a `num_bridges=N` entry has exactly N bridge ends on it.
    IslandBridgeCount,
    /// The placed bridges join all islands into one group.
    Connected,
}

#[derive(Deserialize)]
struct BridgeLengthParams {
    #[serde(alias = "bridge_type", alias = "bridgeID", alias = "bridge_id")]
    type_id: BridgeTypeId,
    #[serde(alias = "expected_length", alias = "expectedLength")]
    length: f64,
}

#[derive(Deserialize)]
struct MustHaveWaterParams {
    x: usize,
    y: usize,
}

fn params<T: DeserializeOwned>(spec: &ConstraintSpec) -> Result<T, PuzzleError> {
    serde_json::from_value(spec.params.clone()).map_err(|source| PuzzleError::InvalidConstraintParams {
        kind: spec.kind.clone(),
        source,
    })
}

impl Constraint {
    /// Resolve a loaded constraint by kind name. Parameters are ignored for kinds that take none.
    pub fn from_spec(spec: &ConstraintSpec) -> Result<Self, PuzzleError> {
        let kind = ConstraintKind::from_str(&spec.kind).map_err(|_| PuzzleError::UnknownConstraint(spec.kind.clone()))?;

        Ok(match kind {
            ConstraintKind::AllBridgesPlaced => Self::AllBridgesPlaced,
            ConstraintKind::NoCrossing => Self::NoCrossing,
            ConstraintKind::BridgeLength => {
                let BridgeLengthParams { type_id, length } = params(spec)?;
                Self::BridgeLength { type_id, length }
            }
            ConstraintKind::MustHaveWater => {
                let MustHaveWaterParams { x, y } = params(spec)?;
                Self::MustHaveWater { location: Location(x, y) }
            }
            ConstraintKind::IslandBridgeCount => Self::IslandBridgeCount,
            ConstraintKind::Connected => Self::Connected,
        })
    }

    /// The name this constraint is loaded under.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::AllBridgesPlaced => ConstraintKind::AllBridgesPlaced,
            Self::NoCrossing => ConstraintKind::NoCrossing,
            Self::BridgeLength { .. } => ConstraintKind::BridgeLength,
            Self::MustHaveWater { .. } => ConstraintKind::MustHaveWater,
            Self::IslandBridgeCount => ConstraintKind::IslandBridgeCount,
            Self::Connected => ConstraintKind::Connected,
        }
    }

    /// Evaluate against the current state. Never mutates the puzzle.
    pub fn check(&self, ctx: &CheckContext) -> ConstraintResult {
        let puzzle = ctx.puzzle;
        match self {
            Self::AllBridgesPlaced => {
                let unplaced = puzzle.inventory().iter()
                    .filter(|b| !b.is_placed())
                    .map(|b| ElementId::Bridge(b.id.clone()))
                    .collect_vec();
                ConstraintResult::from_affected(unplaced, |u| format!("{} bridge(s) still unplaced", u.len()))
            }
            Self::NoCrossing => {
                let crossing = puzzle.placed_bridges()
                    .filter_map(|b| b.span().map(|s| (b, s)))
                    .collect_vec()
                    .into_iter()
                    .tuple_combinations()
                    .filter(|((_, s1), (_, s2))| !s1.shares_endpoint(s2) && s1.crosses(s2))
                    .flat_map(|((b1, _), (b2, _))| [b1.id.clone(), b2.id.clone()])
                    .unique()
                    .map(ElementId::Bridge)
                    .collect_vec();
                ConstraintResult::from_affected(crossing, |c| format!("{} bridge(s) cross another bridge", c.len()))
            }
            Self::BridgeLength { type_id, length } => {
                let tolerance = puzzle.config().length_tolerance;
                let wrong = puzzle.inventory().of_type(type_id)
                    .filter(|b| b.span().is_some_and(|s| (s.length() - length).abs() > tolerance))
                    .map(|b| ElementId::Bridge(b.id.clone()))
                    .collect_vec();
                ConstraintResult::from_affected(wrong, |w| format!("{} `{type_id}` bridge(s) do not span {length}", w.len()))
            }
            Self::MustHaveWater { location } => match ctx.water {
                None => ConstraintResult::fail(vec![ElementId::Tile(*location)], "puzzle has no water simulation"),
                Some(water) if water.get(location.as_index()).copied().unwrap_or(false) => ConstraintResult::pass(),
                Some(_) => ConstraintResult::fail(vec![ElementId::Tile(*location)], "tile is dry"),
            },
            Self::IslandBridgeCount => {
                let wrong = puzzle.islands().iter()
                    .filter_map(|island| island.num_bridges().map(|n| (island, n)))
                    .filter(|(island, n)| {
                        let ends = puzzle.placed_spans()
                            .map(|s| usize::from(s.start == island.location) + usize::from(s.end == island.location))
                            .sum::<usize>();
                        ends != *n
                    })
                    .map(|(island, _)| ElementId::Island(island.id.clone()))
                    .collect_vec();
                ConstraintResult::from_affected(wrong, |w| format!("{} island(s) have the wrong bridge count", w.len()))
            }
            Self::Connected => {
                let islands = puzzle.islands();
                if islands.len() < 2 {
                    return ConstraintResult::pass();
                }

                let mut graph: UnGraphMap<usize, ()> = UnGraphMap::with_capacity(islands.len(), puzzle.inventory().len());
                for index in 0..islands.len() {
                    graph.add_node(index);
                }
                let index_at = |location: Location| islands.iter().position(|i| i.location == location);
                for span in puzzle.placed_spans() {
                    if let (Some(a), Some(b)) = (index_at(span.start), index_at(span.end)) {
                        graph.add_edge(a, b, ());
                    }
                }

                let mut reached = vec![false; islands.len()];
                let mut bfs = Bfs::new(&graph, 0);
                while let Some(index) = bfs.next(&graph) {
                    reached[index] = true;
                }

                let cut_off = islands.iter()
                    .zip(reached)
                    .filter(|(_, reached)| !reached)
                    .map(|(island, _)| ElementId::Island(island.id.clone()))
                    .collect_vec();
                ConstraintResult::from_affected(cut_off, |c| format!("{} island(s) not connected to the rest", c.len()))
            }
        }
    }
}

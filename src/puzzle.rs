use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::ops::IndexMut;

use ndarray::Array2;
use tracing::debug;

use crate::bridge::{Bridge, BridgeId, BridgeType, BridgeTypeId, IslandCoverage};
use crate::builder::PuzzleBuilder;
use crate::config::RulesConfig;
use crate::constraint::{CheckContext, Constraint};
use crate::definition::PuzzleSpec;
use crate::error::PuzzleError;
use crate::geometry::Span;
use crate::inventory::Inventory;
use crate::island::Island;
use crate::location::{Dimension, Location};
use crate::validator::{ValidationReport, Validator};

/// A rectangular bridge puzzle: islands, the bridge inventory, and the constraints that define a solution.
///
/// [`Puzzle`]s should be built using a [`PuzzleBuilder`] or [`Puzzle::from_spec`].
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub(crate) id: String,
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) islands: Vec<Island>,
    pub(crate) bridge_types: Vec<BridgeType>,
    pub(crate) inventory: Inventory,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) config: RulesConfig,
}

impl Puzzle {
    /// Build a puzzle from a loaded definition.
    ///
    /// Constraint kinds are resolved here; an unknown kind or bad parameters is an error.
    pub fn from_spec(spec: &PuzzleSpec) -> Result<Self, PuzzleError> {
        Self::builder_from_spec(spec)?.build()
    }

    pub(crate) fn builder_from_spec(spec: &PuzzleSpec) -> Result<PuzzleBuilder, PuzzleError> {
        let mut builder = PuzzleBuilder::with_dims((spec.width, spec.height));
        builder.id(spec.id.clone());
        if let Some(max) = spec.max_num_bridges {
            builder.max_num_bridges(max);
        }
        for island in &spec.islands {
            builder.add_island(island.clone());
        }
        for bridge_type in &spec.bridge_types {
            builder.add_bridge_type(BridgeType::from(bridge_type), bridge_type.count);
        }
        for constraint in &spec.constraints {
            builder.add_constraint(Constraint::from_spec(constraint)?);
        }
        Ok(builder)
    }

    /// Puzzle id; may be empty.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `(width, height)`.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// Rule parameters.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Most bridges allowed between one pair of islands.
    pub fn max_num_bridges(&self) -> usize {
        self.config.max_num_bridges
    }

    /// Islands in declaration order.
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Direct access to the island list. Nothing is re-checked; keep ids and locations unique.
    pub fn islands_mut(&mut self) -> &mut Vec<Island> {
        &mut self.islands
    }

    /// The island with `id`.
    pub fn island(&self, id: &str) -> Option<&Island> {
        self.islands.iter().find(|i| i.id == id)
    }

    /// The island on `location`.
    pub fn island_at(&self, location: Location) -> Option<&Island> {
        self.islands.iter().find(|i| i.location == location)
    }

    /// Declared bridge types.
    pub fn bridge_types(&self) -> &[BridgeType] {
        &self.bridge_types
    }

    /// The bridge type with `id`.
    pub fn bridge_type(&self, id: &str) -> Option<&BridgeType> {
        self.bridge_types.iter().find(|t| t.id == id)
    }

    /// The bridge token pool.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The token with `id`.
    pub fn bridge(&self, id: &str) -> Option<&Bridge> {
        self.inventory.get(id)
    }

    /// Constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Unplaced tokens per bridge type.
    pub fn available_counts(&self) -> std::collections::BTreeMap<BridgeTypeId, usize> {
        self.inventory.available_counts()
    }

    /// Tokens currently on the board.
    pub fn placed_bridges(&self) -> impl Iterator<Item = &Bridge> {
        self.inventory.placed()
    }

    pub(crate) fn placed_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.inventory.placed().filter_map(Bridge::span)
    }

    /// Set the endpoints of bridge `id`, placing it. An already placed token is moved.
    ///
    /// No legality checks happen here; see [`Self::could_place_bridge_of_type`] and [`Self::connect`].
    pub fn place_bridge(&mut self, id: &str, start: Location, end: Location) -> Result<(), PuzzleError> {
        let bridge = self.inventory.get_mut(id).ok_or_else(|| PuzzleError::UnknownBridge(id.to_owned()))?;
        bridge.span = Some(Span::new(start, end));
        debug!(puzzle = %self.id, bridge = id, ?start, ?end, "placed bridge");
        Ok(())
    }

    /// Clear the endpoints of bridge `id`, returning it to the inventory.
    pub fn remove_bridge(&mut self, id: &str) -> Result<(), PuzzleError> {
        if !self.inventory.give_back(id) {
            return Err(PuzzleError::UnknownBridge(id.to_owned()));
        }
        debug!(puzzle = %self.id, bridge = id, "removed bridge");
        Ok(())
    }

    /// Number of placed bridges joining `a` and `b`, in either direction.
    pub fn bridges_between(&self, a: Location, b: Location) -> usize {
        let pair = Span::new(a, b).endpoints();
        self.placed_spans().filter(|s| s.endpoints() == pair).count()
    }

    /// Islands lying strictly between the endpoints of an axis-aligned span. Empty for any other span.
    fn islands_between(&self, span: &Span) -> impl Iterator<Item = &Island> + '_ {
        let span = *span;
        self.islands.iter().filter(move |island| {
            let Location(x, y) = island.location;
            if span.is_horizontal() {
                y == span.start.1 && x > span.start.0.min(span.end.0) && x < span.start.0.max(span.end.0)
            } else if span.is_vertical() {
                x == span.start.0 && y > span.start.1.min(span.end.1) && y < span.start.1.max(span.end.1)
            } else {
                false
            }
        })
    }

    /// Geometry-only legality of `span` for an optional bridge type.
    pub(crate) fn span_is_legal(&self, span: &Span, bridge_type: Option<&BridgeType>) -> bool {
        if let Some(bridge_type) = bridge_type {
            if !bridge_type.allows_span(span, self.config.length_tolerance) {
                return false;
            }
        }

        if span.is_axis_aligned() {
            let covers_island = self.islands_between(span).next().is_some();
            match bridge_type.map_or(IslandCoverage::Forbidden, |t| t.island_coverage) {
                IslandCoverage::Forbidden if covers_island => return false,
                IslandCoverage::Required if !covers_island => return false,
                _ => {}
            }
        }

        true
    }

    /// Whether a bridge could join islands `start_island` and `end_island`. Never mutates anything.
    ///
    /// False if the islands are the same or unknown, if the pair already holds
    /// [`max_num_bridges`](RulesConfig::max_num_bridges) bridges, or if the span breaks the rules of
    /// `type_id`. An unknown `type_id` is treated like `None`.
    pub fn could_place_bridge_of_type(&self, start_island: &str, end_island: &str, type_id: Option<&str>) -> bool {
        if start_island == end_island {
            return false;
        }
        let (Some(a), Some(b)) = (self.island(start_island), self.island(end_island)) else {
            return false;
        };
        self.could_place_span(Span::new(a.location, b.location), type_id)
    }

    /// [`Self::could_place_bridge_of_type`], addressing the islands by location.
    pub fn could_place_bridge_at(&self, start: Location, end: Location, type_id: Option<&str>) -> bool {
        if start == end || self.island_at(start).is_none() || self.island_at(end).is_none() {
            return false;
        }
        self.could_place_span(Span::new(start, end), type_id)
    }

    fn could_place_span(&self, span: Span, type_id: Option<&str>) -> bool {
        if self.bridges_between(span.start, span.end) >= self.config.max_num_bridges {
            return false;
        }
        self.span_is_legal(&span, type_id.and_then(|id| self.bridge_type(id)))
    }

    /// Every placed bridge whose segment passes through or ends on `location`.
    pub fn bridges_at(&self, location: Location) -> Vec<&Bridge> {
        let tolerance = self.config.projection_tolerance;
        self.placed_bridges()
            .filter(|b| b.span.is_some_and(|s| s.covers(location, tolerance)))
            .collect()
    }

    /// Take the first free token of `type_id` and place it between two islands, if that is legal.
    ///
    /// Returns `Ok(None)` when the placement is illegal or the type is exhausted.
    pub fn connect(&mut self, start_island: &str, end_island: &str, type_id: &str) -> Result<Option<BridgeId>, PuzzleError> {
        let start = self.island(start_island).ok_or_else(|| PuzzleError::UnknownIsland(start_island.to_owned()))?.location;
        let end = self.island(end_island).ok_or_else(|| PuzzleError::UnknownIsland(end_island.to_owned()))?.location;
        if self.bridge_type(type_id).is_none() {
            return Err(PuzzleError::UnknownBridgeType(type_id.to_owned()));
        }

        if !self.could_place_bridge_of_type(start_island, end_island, Some(type_id)) {
            return Ok(None);
        }
        let Some(id) = self.inventory.take(type_id).map(|b| b.id.clone()) else {
            return Ok(None);
        };

        self.place_bridge(&id, start, end)?;
        Ok(Some(id))
    }

    pub(crate) fn check_context(&self) -> CheckContext<'_> {
        CheckContext { puzzle: self, water: None }
    }

    /// Run every constraint against the current state.
    pub fn validate_all(&self) -> ValidationReport {
        Validator::new(&self.constraints).validate_all(&self.check_context())
    }

    /// Whether every constraint is satisfied.
    pub fn is_solved(&self) -> bool {
        self.validate_all().all_satisfied
    }
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut board: Array2<char> = Array2::from_elem((self.dims.1.get(), self.dims.0.get()), '.');

        let mut doubled: HashMap<Location, usize> = HashMap::new();
        for span in self.placed_spans() {
            for tile in span.tiles_between() {
                *doubled.entry(tile).or_insert(0) += 1;
            }
        }

        for span in self.placed_spans() {
            for tile in span.tiles_between() {
                let Some(cell) = board.get_mut(tile.as_index()) else { continue };
                let many = doubled.get(&tile).copied().unwrap_or(0) > 1;
                let glyph = if span.is_horizontal() {
                    if many { '=' } else { '-' }
                } else if span.is_vertical() {
                    if many { '‖' } else { '|' }
                } else if (span.end.0 > span.start.0) == (span.end.1 > span.start.1) {
                    '\\'
                } else {
                    '/'
                };
                // two different orientations over one tile
                *cell = if *cell != '.' && *cell != glyph { '+' } else { glyph };
            }
        }

        for island in &self.islands {
            let glyph = match island.num_bridges() {
                Some(n) if n < 10 => char::from_digit(n as u32, 10).unwrap_or('O'),
                _ => 'O',
            };
            if island.location.within(self.dims) {
                *board.index_mut(island.location.as_index()) = glyph;
            }
        }

        let mut out = String::with_capacity(board.nrows() * (board.ncols() + 1));
        for row in board.rows() {
            for col in row {
                out.push(*col);
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}

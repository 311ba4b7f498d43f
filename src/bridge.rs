use serde::{Deserialize, Serialize};

use crate::geometry::Span;
use crate::location::Location;

/// Identifier of a [`BridgeType`].
pub type BridgeTypeId = String;
/// Identifier of one [`Bridge`] token, `{type}-{n}`.
pub type BridgeId = String;

/// How a bridge type decides which spans it can make.
#[derive(Clone, Copy, Debug, Default)]
pub enum SpanRule {
    /// No span predicate; the type's fixed length (if any) is enforced instead.
    #[default]
    Unrestricted,
    /// Only 45 degree spans.
    Diagonal,
    /// A caller-supplied predicate over the two endpoints.
    Custom(fn(Location, Location) -> bool),
}

/// Whether a bridge type may pass over islands lying between its endpoints.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IslandCoverage {
    /// The span must be clear of islands.
    #[default]
    Forbidden,
    /// Islands in between are ignored.
    Allowed,
    /// At least one island must lie in between.
    Required,
}

/// A kind of bridge, shared by every token of that kind in an [`Inventory`](crate::Inventory).
#[derive(Clone, Debug)]
pub struct BridgeType {
    /// Unique within a puzzle.
    pub id: BridgeTypeId,
    /// Display colour. Not interpreted here.
    pub colour: String,
    /// Fixed span length; `None` allows any distance.
    pub length: Option<f64>,
    /// Width/style tag for renderers. Not interpreted here.
    pub style: String,
    /// Which spans this type can make.
    pub span_rule: SpanRule,
    /// Whether spans may or must pass over islands.
    pub island_coverage: IslandCoverage,
}

impl BridgeType {
    /// A variable-length, unrestricted type with no islands allowed underneath.
    pub fn new(id: impl Into<BridgeTypeId>) -> Self {
        Self {
            id: id.into(),
            colour: String::new(),
            length: None,
            style: String::new(),
            span_rule: SpanRule::default(),
            island_coverage: IslandCoverage::default(),
        }
    }

    /// Set a fixed length. Negative values (conventionally `-1`) mean variable length.
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = if length < 0.0 { None } else { Some(length) };
        self
    }

    /// Set [`Self::colour`].
    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = colour.into();
        self
    }

    /// Set [`Self::style`].
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set [`Self::span_rule`].
    pub fn with_span_rule(mut self, rule: SpanRule) -> Self {
        self.span_rule = rule;
        self
    }

    /// Set [`Self::island_coverage`].
    pub fn with_island_coverage(mut self, coverage: IslandCoverage) -> Self {
        self.island_coverage = coverage;
        self
    }

    /// Whether this type can make `span`, ignoring islands and other bridges.
    ///
    /// With no span predicate the fixed length (if any) is checked against the Euclidean span length;
    /// otherwise the predicate alone decides.
    pub fn allows_span(&self, span: &Span, length_tolerance: f64) -> bool {
        match self.span_rule {
            SpanRule::Unrestricted => match self.length {
                None => true,
                Some(length) => (span.length() - length).abs() <= length_tolerance,
            },
            SpanRule::Diagonal => span.is_diagonal(),
            SpanRule::Custom(predicate) => predicate(span.start, span.end),
        }
    }
}

/// One allocatable bridge token. Placed if and only if `span` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Bridge {
    /// Unique within the inventory.
    pub id: BridgeId,
    /// The [`BridgeType`] this token belongs to.
    pub type_id: BridgeTypeId,
    pub(crate) span: Option<Span>,
}

impl Bridge {
    pub(crate) fn new(id: BridgeId, type_id: BridgeTypeId) -> Self {
        Self { id, type_id, span: None }
    }

    /// The placed segment, if any.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Where the bridge was placed from.
    pub fn start(&self) -> Option<Location> {
        self.span.map(|s| s.start)
    }

    /// Where the bridge was placed to.
    pub fn end(&self) -> Option<Location> {
        self.span.map(|s| s.end)
    }

    /// Whether the token is on the board.
    pub fn is_placed(&self) -> bool {
        self.span.is_some()
    }
}

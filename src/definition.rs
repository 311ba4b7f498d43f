//! Loosely typed puzzle payloads, as handed over by whatever loads puzzle files.
//!
//! These mirror the shapes callers persist. They are turned into checked [`Puzzle`](crate::Puzzle)s and
//! [`FlowPuzzle`](crate::FlowPuzzle)s through [`Puzzle::from_spec`](crate::Puzzle::from_spec) and
//! [`FlowPuzzle::from_spec`](crate::FlowPuzzle::from_spec).

use serde::{Deserialize, Serialize};

use crate::bridge::{BridgeType, BridgeTypeId, IslandCoverage, SpanRule};
use crate::flow::FlowTile;
use crate::island::Island;
use crate::location::{Dimension, Location};

/// A constraint named by kind, with parameters left as raw JSON until the kind is known.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// A [`ConstraintKind`](crate::ConstraintKind) name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific parameters; may be absent.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ConstraintSpec {
    /// A constraint of `kind` with raw `params`.
    pub fn new(kind: impl Into<String>, params: serde_json::Value) -> Self {
        Self { kind: kind.into(), params }
    }
}

/// Span predicates a definition can name. Custom predicates can only be attached in code.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// [`SpanRule::Unrestricted`]
    #[default]
    Unrestricted,
    /// [`SpanRule::Diagonal`]
    Diagonal,
}

/// A bridge type declaration, plus how many tokens of it the puzzle holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BridgeTypeSpec {
    /// Bridge type id.
    pub id: BridgeTypeId,
    /// Display colour.
    #[serde(default)]
    pub colour: String,
    /// Fixed length; absent or negative means any length.
    #[serde(default)]
    pub length: Option<f64>,
    /// Style tag for renderers.
    #[serde(default)]
    pub style: String,
    /// Number of tokens of this type in the inventory.
    #[serde(default = "one")]
    pub count: usize,
    /// Span predicate.
    #[serde(default)]
    pub span: SpanKind,
    /// Island coverage policy.
    #[serde(default)]
    pub island_coverage: IslandCoverage,
}

fn one() -> usize {
    1
}

impl From<&BridgeTypeSpec> for BridgeType {
    fn from(spec: &BridgeTypeSpec) -> Self {
        let bridge_type = BridgeType::new(spec.id.clone())
            .with_colour(spec.colour.clone())
            .with_style(spec.style.clone())
            .with_span_rule(match spec.span {
                SpanKind::Unrestricted => SpanRule::Unrestricted,
                SpanKind::Diagonal => SpanRule::Diagonal,
            })
            .with_island_coverage(spec.island_coverage);

        match spec.length {
            Some(length) => bridge_type.with_length(length),
            None => bridge_type,
        }
    }
}

/// A whole puzzle definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    /// Puzzle id.
    pub id: String,
    /// Grid width.
    pub width: Dimension,
    /// Grid height.
    pub height: Dimension,
    /// Islands, with unique ids and locations.
    #[serde(default)]
    pub islands: Vec<Island>,
    /// Bridge types and their token counts.
    #[serde(default)]
    pub bridge_types: Vec<BridgeTypeSpec>,
    /// Resolved by kind name when the puzzle is built.
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
    /// Defaults to [`RulesConfig::max_num_bridges`](crate::RulesConfig::max_num_bridges).
    #[serde(default)]
    pub max_num_bridges: Option<usize>,
}

/// A [`PuzzleSpec`] with flow tiles, stored inline in the same object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowPuzzleSpec {
    /// The bridge puzzle.
    #[serde(flatten)]
    pub puzzle: PuzzleSpec,
    /// Tiles with no entry here carry no flow metadata.
    #[serde(default)]
    pub tiles: Vec<FlowTile>,
    /// Tiles fed from outside at load time.
    #[serde(default)]
    pub edge_inputs: Vec<Location>,
}

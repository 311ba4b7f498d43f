use thiserror::Error;

use crate::builder::BuilderInvalidReason;
use crate::island::IslandId;
use crate::bridge::{BridgeId, BridgeTypeId};

/// Caller-contract violations.
///
/// Negative answers such as "this bridge cannot go here" or "the puzzle is not solved" are plain values,
/// never one of these.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// No token has this id.
    #[error("no bridge token with id `{0}`")]
    UnknownBridge(BridgeId),
    /// No island has this id.
    #[error("no island with id `{0}`")]
    UnknownIsland(IslandId),
    /// No bridge type has this id.
    #[error("no bridge type with id `{0}`")]
    UnknownBridgeType(BridgeTypeId),
    /// A definition named a constraint kind that does not exist.
    #[error("unknown constraint kind `{0}`")]
    UnknownConstraint(String),
    /// A constraint's parameters did not match its kind.
    #[error("invalid parameters for constraint `{kind}`: {source}")]
    InvalidConstraintParams {
        /// The constraint kind as written.
        kind: String,
        /// What went wrong while reading the parameters.
        #[source]
        source: serde_json::Error,
    },
    /// The builder recorded at least one problem.
    #[error("puzzle definition is invalid: {0:?}")]
    InvalidBuild(Vec<BuilderInvalidReason>),
}

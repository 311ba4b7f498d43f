use tracing::debug;

use crate::constraint::{CheckContext, Constraint, ConstraintKind, ConstraintResult};

/// The result of one constraint, tagged with where it sits in the puzzle's constraint list.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintOutcome {
    /// Position in the puzzle's constraint list.
    pub index: usize,
    /// Kind of the constraint.
    pub kind: ConstraintKind,
    /// What the check found.
    pub result: ConstraintResult,
}

/// Every constraint's result, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    /// Whether every result is satisfied.
    pub all_satisfied: bool,
    /// One outcome per constraint.
    pub results: Vec<ConstraintOutcome>,
    /// Number of entries in `results` that are not satisfied.
    pub unsatisfied: usize,
}

impl ValidationReport {
    /// The unsatisfied outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &ConstraintOutcome> {
        self.results.iter().filter(|o| !o.result.satisfied)
    }
}

/// Runs a constraint list against live puzzle state. Nothing is cached between calls.
pub struct Validator<'a> {
    constraints: &'a [Constraint],
}

impl<'a> Validator<'a> {
    /// A validator over `constraints`.
    pub fn new(constraints: &'a [Constraint]) -> Self {
        Self { constraints }
    }

    /// Check every constraint against `ctx`.
    pub fn validate_all(&self, ctx: &CheckContext) -> ValidationReport {
        let results: Vec<ConstraintOutcome> = self.constraints.iter()
            .enumerate()
            .map(|(index, constraint)| ConstraintOutcome {
                index,
                kind: constraint.kind(),
                result: constraint.check(ctx),
            })
            .collect();
        let unsatisfied = results.iter().filter(|o| !o.result.satisfied).count();

        debug!(puzzle = ctx.puzzle.id(), constraints = results.len(), unsatisfied, "validated puzzle");

        ValidationReport {
            all_satisfied: unsatisfied == 0,
            results,
            unsatisfied,
        }
    }

    /// Whether every constraint holds in `ctx`.
    pub fn is_solved(&self, ctx: &CheckContext) -> bool {
        self.validate_all(ctx).all_satisfied
    }
}

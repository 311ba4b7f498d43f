//! Water moving between puzzles through river channels.
//!
//! One call handles one puzzle's outputs. Ordering across puzzles, and any iteration to a fixed point,
//! is up to the caller.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::channel::{PuzzleId, RiverChannel};
use crate::location::{Bounds, Location};

/// What changed on the world map after one puzzle's outputs were applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropagationResult {
    /// World tiles that were dry and are now flooded.
    pub newly_flooded: BTreeSet<Location>,
    /// World tiles that were flooded and are now dry.
    pub newly_drained: BTreeSet<Location>,
    /// Local edge-input tiles fed by the channels that are flooded now, per downstream puzzle.
    pub downstream_inputs: BTreeMap<PuzzleId, BTreeSet<Location>>,
    /// Downstream puzzles whose feeding channels changed state in this step.
    pub affected_puzzles: BTreeSet<PuzzleId>,
}

/// The channel graph of a map, plus which channels currently carry water.
#[derive(Clone, Debug, Default)]
pub struct WaterNetwork {
    channels: Vec<RiverChannel>,
    flooded: Vec<bool>,
}

impl WaterNetwork {
    /// A network with every channel dry.
    pub fn new(channels: Vec<RiverChannel>) -> Self {
        let flooded = vec![false; channels.len()];
        Self { channels, flooded }
    }

    /// Every channel, in id order.
    pub fn channels(&self) -> &[RiverChannel] {
        &self.channels
    }

    /// Channels whose water leaves puzzle `puzzle_id`.
    pub fn channels_from<'a>(&'a self, puzzle_id: &'a str) -> impl Iterator<Item = &'a RiverChannel> {
        self.channels.iter().filter(move |c| c.source.puzzle_id == puzzle_id)
    }

    /// A tile is flooded while any channel through it is.
    pub fn is_flooded(&self, tile: Location) -> bool {
        self.channels.iter()
            .zip(&self.flooded)
            .any(|(channel, flooded)| *flooded && channel.tiles.contains(&tile))
    }

    /// World tiles of every flooded channel.
    pub fn flooded_tiles(&self) -> BTreeSet<Location> {
        self.channels.iter()
            .zip(&self.flooded)
            .filter(|(_, flooded)| **flooded)
            .flat_map(|(channel, _)| channel.tiles.iter().copied())
            .collect()
    }

    /// Every edge input `puzzle_id` currently receives, from all flooded channels that end at it.
    pub fn edge_inputs_for(&self, puzzle_id: &str) -> BTreeSet<Location> {
        self.channels.iter()
            .zip(&self.flooded)
            .filter(|(channel, flooded)| **flooded && channel.target.puzzle_id == puzzle_id)
            .map(|(channel, _)| channel.target.local)
            .collect()
    }

    /// Drain every channel.
    pub fn reset(&mut self) {
        self.flooded.fill(false);
    }

    /// Apply `puzzle_id`'s current edge outputs (local coordinates within `bounds`).
    ///
    /// Each channel leaving this puzzle floods if its source edge tile is among the outputs and drains
    /// otherwise. Flooded channels feed their target's edge tile; drained ones feed nothing.
    pub fn compute_propagation(
        &mut self,
        puzzle_id: &str,
        current_edge_outputs: &BTreeSet<Location>,
        bounds: &Bounds,
    ) -> PropagationResult {
        let before = self.flooded_tiles();
        let outputs: BTreeSet<Location> = current_edge_outputs.iter().map(|l| bounds.to_world(*l)).collect();

        let mut result = PropagationResult::default();

        for (channel, flooded) in self.channels.iter().zip(self.flooded.iter_mut()) {
            if channel.source.puzzle_id != puzzle_id {
                continue;
            }

            let active = outputs.contains(&channel.source.world);
            if active {
                result.downstream_inputs
                    .entry(channel.target.puzzle_id.clone())
                    .or_default()
                    .insert(channel.target.local);
            }
            if *flooded != active {
                result.affected_puzzles.insert(channel.target.puzzle_id.clone());
            }
            *flooded = active;
        }

        let after = self.flooded_tiles();
        result.newly_flooded = after.difference(&before).copied().collect();
        result.newly_drained = before.difference(&after).copied().collect();

        debug!(
            puzzle = puzzle_id,
            flooded = result.newly_flooded.len(),
            drained = result.newly_drained.len(),
            downstream = result.downstream_inputs.len(),
            "propagated water"
        );

        result
    }
}

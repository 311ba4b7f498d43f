//! Static discovery of river channels linking puzzle regions on a world map.
//!
//! Run once per map. Each channel starts just outside one puzzle's edge tile and follows connected water
//! until it arrives next to an edge tile of a different puzzle.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::direction::Direction;
use crate::location::{Bounds, Location};

/// Identifier of a puzzle region on the world map.
pub type PuzzleId = String;

/// Name of the tile layer whose nonzero entries mark water.
pub const FLOWING_WATER_LAYER: &str = "flowingWater";

/// Named, row-major tile layers of a world map. `0` means no tile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    /// Map width in tiles.
    pub width: usize,
    /// Map height in tiles.
    pub height: usize,
    /// Layer name to `width * height` tile ids.
    #[serde(default)]
    pub layers: HashMap<String, Vec<u32>>,
}

impl TileMap {
    /// An empty map with no layers.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, layers: HashMap::new() }
    }

    /// Add or replace the layer `name`.
    pub fn with_layer(mut self, name: impl Into<String>, tiles: Vec<u32>) -> Self {
        self.layers.insert(name.into(), tiles);
        self
    }

    /// The water layer as a `height` by `width` grid, if present and correctly sized.
    fn water(&self) -> Option<Array2<bool>> {
        let Some(raw) = self.layers.get(FLOWING_WATER_LAYER) else {
            debug!("map has no {FLOWING_WATER_LAYER} layer");
            return None;
        };
        match Array2::from_shape_vec((self.height, self.width), raw.iter().map(|t| *t > 0).collect()) {
            Ok(grid) => Some(grid),
            Err(err) => {
                warn!(width = self.width, height = self.height, len = raw.len(), %err, "water layer does not match map size");
                None
            }
        }
    }
}

/// A puzzle edge tile in local coordinates, tagged with the side of the puzzle it faces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EdgeTile {
    /// Tile within the puzzle.
    pub local: Location,
    /// The side this tile faces; water leaves it in this direction.
    pub edge: Direction,
}

/// Where a puzzle sits on the world map and which of its tiles touch the outside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRegion {
    /// World rectangle of the puzzle.
    pub bounds: Bounds,
    /// Tiles water can enter or leave through.
    #[serde(default)]
    pub edge_tiles: Vec<EdgeTile>,
}

/// One end of a [`RiverChannel`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ChannelEnd {
    /// Puzzle owning the edge tile.
    pub puzzle_id: PuzzleId,
    /// Edge tile in the puzzle's local coordinates.
    pub local: Location,
    /// The same tile on the world map.
    pub world: Location,
}

/// Connected water tiles carrying water from one puzzle edge to another. One direction only; a river
/// that links two puzzles both ways is two channels.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RiverChannel {
    /// Index in the list returned by [`extract_channels`].
    pub id: usize,
    /// World tiles of the channel.
    pub tiles: BTreeSet<Location>,
    /// Edge tile the water leaves from.
    pub source: ChannelEnd,
    /// Edge tile the water arrives at.
    pub target: ChannelEnd,
}

/// Trace every channel on `map` between the given puzzle regions.
///
/// Regions are visited in id order and their edge tiles in declaration order, so channel ids are stable.
/// A map without a usable water layer has no channels.
pub fn extract_channels(map: &TileMap, regions: &BTreeMap<PuzzleId, PuzzleRegion>) -> Vec<RiverChannel> {
    let Some(water) = map.water() else {
        return Vec::new();
    };
    let is_water = |location: Location| water.get(location.as_index()).copied().unwrap_or(false);
    let outside_puzzles = |location: Location| !regions.values().any(|r| r.bounds.contains(location));

    let ends: Vec<ChannelEnd> = regions.iter()
        .flat_map(|(id, region)| region.edge_tiles.iter().map(move |edge| ChannelEnd {
            puzzle_id: id.clone(),
            local: edge.local,
            world: region.bounds.to_world(edge.local),
        }))
        .collect();

    let mut channels = Vec::new();

    for (id, region) in regions {
        for edge in &region.edge_tiles {
            let world = region.bounds.to_world(edge.local);
            let start = edge.edge.attempt_from(world);
            if !is_water(start) || !outside_puzzles(start) {
                continue;
            }

            let mut visited = BTreeSet::from([start]);
            let mut queue = VecDeque::from([start]);
            let mut target = None;

            while let Some(tile) = queue.pop_front() {
                if let Some(end) = ends.iter().find(|end| end.puzzle_id != *id && end.world.manhattan(tile) == 1) {
                    target = Some(end.clone());
                    break;
                }
                for (_, neighbor) in Direction::neighbors_of(tile) {
                    if is_water(neighbor) && outside_puzzles(neighbor) && visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }

            let Some(target) = target else {
                debug!(puzzle = %id, ?world, tiles = visited.len(), "water from edge reaches no other puzzle");
                continue;
            };

            debug!(source = %id, target = %target.puzzle_id, tiles = visited.len(), "traced river channel");
            channels.push(RiverChannel {
                id: channels.len(),
                tiles: visited,
                source: ChannelEnd {
                    puzzle_id: id.clone(),
                    local: edge.local,
                    world,
                },
                target,
            });
        }
    }

    info!(regions = regions.len(), channels = channels.len(), "extracted river channels");
    channels
}

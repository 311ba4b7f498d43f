#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::num::NonZero;

    use proptest::prelude::*;
    use serde_json::json;
    use strum::VariantArray;

    use crate::bridge::{BridgeType, IslandCoverage, SpanRule};
    use crate::builder::{BuilderInvalidReason, PuzzleBuilder};
    use crate::channel::{ChannelEnd, RiverChannel};
    use crate::constraint::{Constraint, ConstraintKind, ElementId};
    use crate::connectivity::Connectivity;
    use crate::definition::{FlowPuzzleSpec, PuzzleSpec};
    use crate::direction::Direction;
    use crate::error::PuzzleError;
    use crate::flow::{FlowPuzzle, FlowTile};
    use crate::island::Island;
    use crate::location::{Bounds, Dimension, Location};
    use crate::propagation::WaterNetwork;
    use crate::puzzle::Puzzle;

    fn dims(width: usize, height: usize) -> (Dimension, Dimension) {
        (NonZero::new(width).unwrap(), NonZero::new(height).unwrap())
    }

    fn two_islands() -> Puzzle {
        PuzzleBuilder::with_dims(dims(4, 4))
            .id("pair")
            .add_island(Island::new("a", Location(1, 1)).with_constraint("num_bridges=1"))
            .add_island(Island::new("b", Location(3, 1)).with_constraint("num_bridges=1"))
            .add_bridge_type(BridgeType::new("wood").with_colour("brown"), 1)
            .build()
            .unwrap()
    }

    #[test]
    fn place_and_remove_single_bridge() {
        let mut puzzle = two_islands();
        assert!(puzzle.could_place_bridge_at(Location(1, 1), Location(3, 1), Some("wood")));

        let id = puzzle.inventory().take("wood").unwrap().id.clone();
        puzzle.place_bridge(&id, Location(1, 1), Location(3, 1)).unwrap();
        assert_eq!(puzzle.available_counts()["wood"], 0);
        assert_eq!(puzzle.bridges_at(Location(2, 1)).iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec![id.as_str()]);
        assert_eq!(format!("{}", puzzle), "....
.1-1
....
....
");

        puzzle.remove_bridge(&id).unwrap();
        assert_eq!(puzzle.available_counts()["wood"], 1);
        assert!(puzzle.bridges_at(Location(2, 1)).is_empty());
    }

    #[test]
    fn unknown_bridge_is_an_error() {
        let mut puzzle = two_islands();
        assert!(matches!(puzzle.place_bridge("steel-1", Location(1, 1), Location(3, 1)), Err(PuzzleError::UnknownBridge(_))));
        assert!(matches!(puzzle.remove_bridge("steel-1"), Err(PuzzleError::UnknownBridge(_))));
        assert!(matches!(puzzle.connect("a", "nowhere", "wood"), Err(PuzzleError::UnknownIsland(_))));
        assert!(matches!(puzzle.connect("a", "b", "steel"), Err(PuzzleError::UnknownBridgeType(_))));
    }

    #[test]
    fn placement_predicates() {
        let puzzle = PuzzleBuilder::with_dims(dims(7, 3))
            .add_island(Island::new("a", Location(0, 1)))
            .add_island(Island::new("b", Location(3, 1)))
            .add_island(Island::new("c", Location(6, 1)))
            .add_bridge_type(BridgeType::new("wood"), 2)
            .add_bridge_type(BridgeType::new("plank").with_length(3.0), 2)
            .add_bridge_type(BridgeType::new("zipline").with_island_coverage(IslandCoverage::Allowed), 1)
            .add_bridge_type(BridgeType::new("viaduct").with_island_coverage(IslandCoverage::Required), 1)
            .build()
            .unwrap();

        assert!(!puzzle.could_place_bridge_of_type("a", "a", None));
        assert!(!puzzle.could_place_bridge_of_type("a", "nowhere", None));
        assert!(puzzle.could_place_bridge_of_type("a", "b", None));

        // b sits between a and c
        assert!(!puzzle.could_place_bridge_of_type("a", "c", Some("wood")));
        assert!(puzzle.could_place_bridge_of_type("a", "c", Some("zipline")));
        assert!(puzzle.could_place_bridge_of_type("a", "c", Some("viaduct")));
        assert!(!puzzle.could_place_bridge_of_type("a", "b", Some("viaduct")));

        assert!(puzzle.could_place_bridge_of_type("a", "b", Some("plank")));
        assert!(!puzzle.could_place_bridge_of_type("a", "c", Some("plank")));

        // unknown types fall back to the untyped rules
        assert!(puzzle.could_place_bridge_of_type("a", "b", Some("mystery")));
        assert!(!puzzle.could_place_bridge_of_type("a", "c", Some("mystery")));
    }

    #[test]
    fn diagonal_and_custom_span_rules() {
        fn only_rightward(a: Location, b: Location) -> bool {
            b.0 > a.0
        }

        let mut puzzle = PuzzleBuilder::with_dims(dims(4, 4))
            .add_island(Island::new("a", Location(0, 0)))
            .add_island(Island::new("b", Location(2, 2)))
            .add_island(Island::new("c", Location(3, 0)))
            .add_bridge_type(BridgeType::new("diag").with_span_rule(SpanRule::Diagonal), 1)
            .add_bridge_type(BridgeType::new("east").with_span_rule(SpanRule::Custom(only_rightward)), 1)
            .build()
            .unwrap();

        assert!(puzzle.could_place_bridge_of_type("a", "b", Some("diag")));
        assert!(!puzzle.could_place_bridge_of_type("a", "c", Some("diag")));
        assert!(puzzle.could_place_bridge_of_type("a", "c", Some("east")));
        assert!(!puzzle.could_place_bridge_of_type("c", "a", Some("east")));

        let id = puzzle.connect("a", "b", "diag").unwrap().unwrap();
        assert_eq!(puzzle.bridges_at(Location(1, 1)).len(), 1);
        assert!(puzzle.bridges_at(Location(1, 0)).is_empty());
        assert_eq!(puzzle.bridge(&id).unwrap().end(), Some(Location(2, 2)));
    }

    #[test]
    fn max_bridges_between_a_pair() {
        let mut puzzle = PuzzleBuilder::with_dims(dims(3, 1))
            .add_island(Island::new("a", Location(0, 0)))
            .add_island(Island::new("b", Location(2, 0)))
            .add_bridge_type(BridgeType::new("wood"), 3)
            .build()
            .unwrap();

        assert!(puzzle.connect("a", "b", "wood").unwrap().is_some());
        assert!(puzzle.connect("b", "a", "wood").unwrap().is_some());
        assert_eq!(puzzle.bridges_between(Location(0, 0), Location(2, 0)), 2);
        assert!(!puzzle.could_place_bridge_of_type("a", "b", Some("wood")));
        assert_eq!(puzzle.connect("a", "b", "wood").unwrap(), None);
        assert_eq!(puzzle.available_counts()["wood"], 1);
        assert_eq!(format!("{}", puzzle), "O=O\n");
    }

    #[test]
    fn doubled_vertical_bridge_renders() {
        let mut puzzle = PuzzleBuilder::with_dims(dims(1, 3))
            .add_island(Island::new("top", Location(0, 0)))
            .add_island(Island::new("bottom", Location(0, 2)).with_constraint("num_bridges=2"))
            .add_bridge_type(BridgeType::new("wood"), 2)
            .build()
            .unwrap();

        puzzle.connect("top", "bottom", "wood").unwrap().unwrap();
        assert_eq!(format!("{}", puzzle), "O\n|\n2\n");
        puzzle.connect("bottom", "top", "wood").unwrap().unwrap();
        assert_eq!(format!("{}", puzzle), "O\n‖\n2\n");
    }

    #[test]
    fn builder_rejects_bad_layouts() {
        let err = PuzzleBuilder::with_dims(dims(3, 3))
            .add_island(Island::new("a", Location(0, 0)))
            .add_island(Island::new("b", Location(0, 0)))
            .add_island(Island::new("c", Location(9, 9)))
            .build()
            .unwrap_err();
        // recording stops at the first problem
        assert!(matches!(err, PuzzleError::InvalidBuild(reasons) if reasons == vec![BuilderInvalidReason::IslandsOverlap(Location(0, 0))]));

        let mut builder = PuzzleBuilder::with_dims(dims(3, 3));
        builder.add_island(Island::new("a", Location(3, 0)));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds(Location(3, 0))]));

        let err = PuzzleBuilder::with_dims(dims(3, 3))
            .add_constraint(Constraint::BridgeLength { type_id: "ghost".into(), length: 1.0 })
            .build()
            .unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidBuild(reasons) if reasons == vec![BuilderInvalidReason::UnknownBridgeType("ghost".into())]));
    }

    fn plus_puzzle() -> Puzzle {
        PuzzleBuilder::with_dims(dims(5, 5))
            .add_island(Island::new("w", Location(0, 2)))
            .add_island(Island::new("e", Location(4, 2)))
            .add_island(Island::new("n", Location(2, 0)))
            .add_island(Island::new("s", Location(2, 4)))
            .add_bridge_type(BridgeType::new("wood"), 2)
            .add_constraint(Constraint::NoCrossing)
            .build()
            .unwrap()
    }

    #[test]
    fn crossing_bridges_are_reported() {
        let mut puzzle = plus_puzzle();
        puzzle.place_bridge("wood-1", Location(0, 2), Location(4, 2)).unwrap();
        puzzle.place_bridge("wood-2", Location(2, 0), Location(2, 4)).unwrap();

        let report = puzzle.validate_all();
        assert!(!report.all_satisfied);
        assert_eq!(report.unsatisfied, 1);
        let result = &report.results[0].result;
        assert!(result.affected.contains(&ElementId::Bridge("wood-1".into())));
        assert!(result.affected.contains(&ElementId::Bridge("wood-2".into())));
        assert_eq!(format!("{}", puzzle), "..O..
..|..
O-+-O
..|..
..O..
");
    }

    #[test]
    fn shared_endpoint_is_never_a_crossing() {
        let mut puzzle = plus_puzzle();
        // collinear and overlapping past the shared endpoint
        puzzle.place_bridge("wood-1", Location(0, 2), Location(4, 2)).unwrap();
        puzzle.place_bridge("wood-2", Location(0, 2), Location(2, 2)).unwrap();
        assert!(puzzle.is_solved());

        puzzle.place_bridge("wood-2", Location(0, 2), Location(2, 0)).unwrap();
        assert!(puzzle.is_solved());
    }

    #[test]
    fn validator_aggregates_every_constraint() {
        let mut puzzle = PuzzleBuilder::with_dims(dims(5, 5))
            .add_island(Island::new("a", Location(0, 0)).with_constraint("num_bridges=1"))
            .add_island(Island::new("b", Location(4, 0)).with_constraint("num_bridges=2"))
            .add_island(Island::new("c", Location(4, 4)).with_constraint("num_bridges=1"))
            .add_bridge_type(BridgeType::new("wood"), 2)
            .add_constraint(Constraint::AllBridgesPlaced)
            .add_constraint(Constraint::IslandBridgeCount)
            .add_constraint(Constraint::Connected)
            .add_constraint(Constraint::NoCrossing)
            .build()
            .unwrap();

        let report = puzzle.validate_all();
        assert_eq!(report.unsatisfied, 3);
        assert_eq!(
            report.failures().map(|o| o.kind).collect::<Vec<_>>(),
            vec![ConstraintKind::AllBridgesPlaced, ConstraintKind::IslandBridgeCount, ConstraintKind::Connected]
        );

        puzzle.connect("a", "b", "wood").unwrap().unwrap();
        let report = puzzle.validate_all();
        assert_eq!(report.results[2].result.affected, vec![ElementId::Island("c".into())]);

        puzzle.connect("b", "c", "wood").unwrap().unwrap();
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.validate_all().unsatisfied, 0);
    }

    #[test]
    fn length_constraints_derived_from_fixed_types() {
        let spec: PuzzleSpec = serde_json::from_value(json!({
            "id": "planks",
            "width": 5,
            "height": 1,
            "islands": [
                {"id": "a", "location": [0, 0]},
                {"id": "b", "location": [2, 0]},
                {"id": "c", "location": [4, 0]}
            ],
            "bridge_types": [
                {"id": "plank", "length": 2.0, "count": 2},
                {"id": "rope", "length": -1.0}
            ]
        }))
        .unwrap();

        let mut puzzle = Puzzle::from_spec(&spec).unwrap();
        assert_eq!(puzzle.constraints(), &[Constraint::BridgeLength { type_id: "plank".into(), length: 2.0 }]);
        assert_eq!(puzzle.bridge_type("rope").unwrap().length, None);
        assert_eq!(puzzle.max_num_bridges(), 2);

        puzzle.place_bridge("plank-1", Location(0, 0), Location(2, 0)).unwrap();
        assert!(puzzle.is_solved());
        puzzle.place_bridge("plank-2", Location(0, 0), Location(4, 0)).unwrap();
        let report = puzzle.validate_all();
        assert_eq!(report.results[0].result.affected, vec![ElementId::Bridge("plank-2".into())]);
    }

    #[test]
    fn spec_with_unknown_constraint_is_rejected() {
        let spec: PuzzleSpec = serde_json::from_value(json!({
            "id": "bad",
            "width": 2,
            "height": 2,
            "constraints": [{"type": "no_crossing"}, {"type": "sparkles", "params": {}}]
        }))
        .unwrap();

        assert!(matches!(Puzzle::from_spec(&spec), Err(PuzzleError::UnknownConstraint(kind)) if kind == "sparkles"));
    }

    /// Row 1 of a 5x3 grid: a source at x = 1 flowing east to the perimeter.
    fn stream(extra: impl IntoIterator<Item = FlowTile>) -> FlowPuzzle {
        let mut builder = PuzzleBuilder::with_dims(dims(5, 3));
        builder
            .id("stream")
            .add_island(Island::new("n", Location(2, 0)))
            .add_island(Island::new("s", Location(2, 2)))
            .add_bridge_type(BridgeType::new("wood"), 1);

        let extra: Vec<FlowTile> = extra.into_iter().collect();
        for x in 1..=4 {
            if extra.iter().any(|t| t.location == Location(x, 1)) {
                continue;
            }
            let tile = FlowTile::new(Location(x, 1));
            builder.add_flow_tile(match x {
                1 => tile.source().flowing([Direction::East]),
                4 => tile,
                _ => tile.flowing([Direction::East]),
            });
        }
        for tile in extra {
            builder.add_flow_tile(tile);
        }
        builder.build_flow().unwrap()
    }

    #[test]
    fn single_stream_reaches_the_edge() {
        let flow = stream([]);
        assert_eq!(flow.edge_outputs(), &BTreeSet::from([Location(4, 1)]));
        assert_eq!(flow.watered_tiles().count(), 4);
        assert!(!flow.has_water(Location(0, 1)));
    }

    #[test]
    fn obstacle_cuts_off_downstream() {
        let flow = stream([FlowTile::new(Location(3, 1)).obstacle().flowing([Direction::East])]);
        assert!(flow.has_water(Location(2, 1)));
        assert!(!flow.has_water(Location(3, 1)));
        assert!(!flow.has_water(Location(4, 1)));
        assert!(flow.edge_outputs().is_empty());
    }

    #[test]
    fn rocky_tile_holds_water_without_passing_it_on() {
        let flow = stream([FlowTile::new(Location(3, 1)).rocky().flowing([Direction::East])]);
        assert!(flow.has_water(Location(3, 1)));
        assert!(!flow.has_water(Location(4, 1)));
        assert!(flow.edge_outputs().is_empty());
    }

    #[test]
    fn bridge_blocks_water_until_removed() {
        let mut flow = stream([]);
        let before: Vec<Location> = flow.watered_tiles().collect();

        assert!(flow.could_place_bridge_of_type("n", "s", Some("wood")));
        let id = flow.connect("n", "s", "wood").unwrap().unwrap();
        assert!(!flow.has_water(Location(2, 1)));
        assert!(!flow.has_water(Location(4, 1)));
        assert!(flow.edge_outputs().is_empty());
        assert_eq!(flow.connectivity()[[1, 2]], Connectivity::PassableHigh);

        flow.remove_bridge(&id).unwrap();
        assert_eq!(flow.watered_tiles().collect::<Vec<_>>(), before);
        assert_eq!(flow.puzzle().available_counts()["wood"], 1);
        assert_eq!(flow.connectivity()[[1, 2]], Connectivity::Blocked);
    }

    #[test]
    fn flow_placement_rules() {
        let mut builder = PuzzleBuilder::with_dims(dims(3, 3));
        builder
            .add_island(Island::new("a", Location(0, 0)))
            .add_island(Island::new("b", Location(2, 0)))
            .add_island(Island::new("c", Location(2, 2)))
            .add_island(Island::new("d", Location(0, 2)))
            .add_bridge_type(BridgeType::new("wood"), 2)
            .add_flow_tile(FlowTile::new(Location(1, 0)).obstacle());
        let flow = builder.build_flow().unwrap();

        assert!(!flow.could_place_bridge_of_type("a", "b", Some("wood")));
        assert!(flow.could_place_bridge_of_type("b", "c", Some("wood")));
        // the base model allows it; flow puzzles reject diagonals outright
        assert!(flow.puzzle().could_place_bridge_of_type("a", "c", None));
        assert!(!flow.could_place_bridge_of_type("a", "c", None));
        assert!(flow.could_place_bridge_of_type("a", "d", None));
    }

    #[test]
    fn edge_inputs_feed_the_grid() {
        let mut flow = stream([FlowTile::new(Location(1, 1)).flowing([Direction::East])]);
        assert!(flow.watered_tiles().next().is_none());

        flow.set_edge_inputs([Location(1, 1), Location(9, 9)]);
        assert_eq!(flow.edge_inputs(), &BTreeSet::from([Location(1, 1)]));
        assert_eq!(flow.edge_outputs(), &BTreeSet::from([Location(4, 1)]));

        flow.set_edge_inputs([]);
        assert!(flow.edge_outputs().is_empty());
    }

    #[test]
    fn must_have_water() {
        let mut builder = PuzzleBuilder::with_dims(dims(5, 3));
        builder
            .add_island(Island::new("n", Location(2, 0)))
            .add_island(Island::new("s", Location(2, 2)))
            .add_bridge_type(BridgeType::new("wood"), 1)
            .add_constraint(Constraint::MustHaveWater { location: Location(4, 1) })
            .add_flow_tile(FlowTile::new(Location(1, 1)).source().flowing([Direction::East]))
            .add_flow_tile(FlowTile::new(Location(2, 1)).flowing([Direction::East]))
            .add_flow_tile(FlowTile::new(Location(3, 1)).flowing([Direction::East]))
            .add_flow_tile(FlowTile::new(Location(4, 1)));
        let mut flow = builder.build_flow().unwrap();
        assert!(flow.is_solved());

        flow.connect("n", "s", "wood").unwrap().unwrap();
        let report = flow.validate_all();
        assert!(!report.all_satisfied);
        assert_eq!(report.results[0].result.affected, vec![ElementId::Tile(Location(4, 1))]);

        // the plain puzzle has no water to look at
        assert!(!builder.build().unwrap().is_solved());
    }

    #[test]
    fn flow_spec_from_json() {
        let spec: FlowPuzzleSpec = serde_json::from_value(json!({
            "id": "spring",
            "width": 3,
            "height": 3,
            "islands": [],
            "bridge_types": [{"id": "wood"}],
            "constraints": [{"type": "must_have_water", "params": {"x": 2, "y": 1}}],
            "tiles": [
                {"location": [0, 1], "outflow": ["E"], "is_source": true},
                {"location": [1, 1], "outflow": ["E", "S"]},
                {"location": [2, 1], "pontoon": true},
                {"location": [1, 2], "rocky": true}
            ]
        }))
        .unwrap();

        let flow = FlowPuzzle::from_spec(&spec).unwrap();
        assert!(flow.is_solved());
        assert_eq!(flow.edge_outputs(), &BTreeSet::from([Location(0, 1), Location(1, 2), Location(2, 1)]));
        assert_eq!(flow.puzzle().available_counts()["wood"], 1);

        let grid = flow.connectivity();
        assert_eq!(grid[[1, 2]], Connectivity::PassableHigh);
        assert_eq!(grid[[2, 1]], Connectivity::Blocked);
        assert_eq!(grid[[1, 0]], Connectivity::Blocked);
        assert_eq!(grid[[0, 0]], Connectivity::PassableLow);
    }

    fn a_to_b() -> RiverChannel {
        RiverChannel {
            id: 0,
            tiles: BTreeSet::from([Location(4, 0), Location(5, 0), Location(6, 0)]),
            source: ChannelEnd { puzzle_id: "a".into(), local: Location(3, 0), world: Location(3, 0) },
            target: ChannelEnd { puzzle_id: "b".into(), local: Location(0, 0), world: Location(7, 0) },
        }
    }

    #[test]
    fn propagation_floods_then_drains() {
        let bounds = Bounds::new(Location(0, 0), 4, 1);
        let mut network = WaterNetwork::new(vec![a_to_b()]);

        let flooded = network.compute_propagation("a", &BTreeSet::from([Location(3, 0)]), &bounds);
        assert_eq!(flooded.newly_flooded, a_to_b().tiles);
        assert!(flooded.newly_drained.is_empty());
        assert_eq!(flooded.downstream_inputs, BTreeMap::from([("b".to_owned(), BTreeSet::from([Location(0, 0)]))]));
        assert_eq!(flooded.affected_puzzles, BTreeSet::from(["b".to_owned()]));
        assert!(network.is_flooded(Location(5, 0)));
        assert_eq!(network.edge_inputs_for("b"), BTreeSet::from([Location(0, 0)]));

        // unchanged outputs change nothing on the map
        let again = network.compute_propagation("a", &BTreeSet::from([Location(3, 0)]), &bounds);
        assert!(again.newly_flooded.is_empty());
        assert!(again.affected_puzzles.is_empty());
        assert_eq!(again.downstream_inputs.len(), 1);

        let drained = network.compute_propagation("a", &BTreeSet::new(), &bounds);
        assert_eq!(drained.newly_drained, a_to_b().tiles);
        assert!(drained.newly_flooded.is_empty());
        assert!(drained.downstream_inputs.is_empty());
        assert_eq!(drained.affected_puzzles, BTreeSet::from(["b".to_owned()]));
        assert!(network.flooded_tiles().is_empty());
    }

    #[test]
    fn shared_tiles_stay_wet_while_any_channel_flows() {
        let mut c_to_b = a_to_b();
        c_to_b.id = 1;
        c_to_b.source = ChannelEnd { puzzle_id: "c".into(), local: Location(0, 0), world: Location(5, 1) };
        c_to_b.tiles = BTreeSet::from([Location(5, 0), Location(6, 0)]);

        let mut network = WaterNetwork::new(vec![a_to_b(), c_to_b]);
        let a_bounds = Bounds::new(Location(0, 0), 4, 1);
        let c_bounds = Bounds::new(Location(5, 1), 2, 1);

        network.compute_propagation("a", &BTreeSet::from([Location(3, 0)]), &a_bounds);
        let c = network.compute_propagation("c", &BTreeSet::from([Location(0, 0)]), &c_bounds);
        assert!(c.newly_flooded.is_empty());
        assert_eq!(c.downstream_inputs["b"], BTreeSet::from([Location(0, 0)]));

        let a = network.compute_propagation("a", &BTreeSet::new(), &a_bounds);
        assert_eq!(a.newly_drained, BTreeSet::from([Location(4, 0)]));
        assert!(network.is_flooded(Location(5, 0)));
        assert_eq!(network.channels_from("c").count(), 1);

        network.reset();
        assert!(network.flooded_tiles().is_empty());
    }

    proptest! {
        #[test]
        fn pair_limit_holds(attempts in prop::collection::vec((0usize..6, 0usize..6), 0..40)) {
            let locations = [Location(0, 0), Location(2, 0), Location(4, 0), Location(0, 2), Location(2, 2), Location(4, 2)];
            let mut builder = PuzzleBuilder::with_dims(dims(5, 3));
            for (i, location) in locations.iter().enumerate() {
                builder.add_island(Island::new(format!("i{i}"), *location));
            }
            builder.add_bridge_type(BridgeType::new("wood"), 30);
            let mut puzzle = builder.build().unwrap();

            for (a, b) in attempts {
                let before = puzzle.available_counts();
                let could = puzzle.could_place_bridge_of_type(&format!("i{a}"), &format!("i{b}"), Some("wood"));
                prop_assert_eq!(puzzle.available_counts(), before);

                let placed = puzzle.connect(&format!("i{a}"), &format!("i{b}"), "wood").unwrap();
                prop_assert_eq!(placed.is_some(), could);

                for x in locations {
                    for y in locations {
                        prop_assert!(puzzle.bridges_between(x, y) <= puzzle.max_num_bridges());
                    }
                }
            }
        }

        #[test]
        fn place_then_remove_restores_water(
            masks in prop::collection::vec(0u8..16, 25),
            sources in prop::collection::vec(any::<bool>(), 25),
            pair in (0usize..4, 1usize..4),
        ) {
            let islands = [Location(0, 2), Location(4, 2), Location(2, 0), Location(2, 4)];
            let mut builder = PuzzleBuilder::with_dims(dims(5, 5));
            for (i, location) in islands.iter().enumerate() {
                builder.add_island(Island::new(format!("i{i}"), *location));
            }
            builder.add_bridge_type(BridgeType::new("wood"), 1);
            for (index, (mask, source)) in masks.iter().zip(&sources).enumerate() {
                let directions = Direction::VARIANTS.iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, dir)| *dir);
                let mut tile = FlowTile::new(Location(index % 5, index / 5)).flowing(directions);
                if *source {
                    tile = tile.source();
                }
                builder.add_flow_tile(tile);
            }
            let mut flow = builder.build_flow().unwrap();

            let water: Vec<Location> = flow.watered_tiles().collect();
            let outputs = flow.edge_outputs().clone();
            let counts = flow.puzzle().available_counts();

            flow.place_bridge("wood-1", islands[pair.0], islands[(pair.0 + pair.1) % 4]).unwrap();
            flow.remove_bridge("wood-1").unwrap();

            prop_assert_eq!(flow.watered_tiles().collect::<Vec<_>>(), water);
            prop_assert_eq!(flow.edge_outputs(), &outputs);
            prop_assert_eq!(flow.puzzle().available_counts(), counts);
        }
    }
}

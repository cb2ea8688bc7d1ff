//! Integration tests covering full world generation, themed dungeons,
//! settlement layout, and location transitions.

use emberfell::{
    Actor, DungeonStyle, DungeonTile, GenerationConfig, LocationKind, OverworldTile, Position,
    SettlementCategory, ThematicWfcGenerator, Theme, TransitionResult, World, WorldSnapshot,
};
use rand::{rngs::StdRng, SeedableRng};

fn world_with_style(seed: u64, style: DungeonStyle) -> World {
    let mut config = GenerationConfig::for_testing(seed);
    config.dungeon_style = style;
    World::generate(config)
}

/// A temple-themed collapse dungeon must contain sacred features, and every
/// entrance must sit on stairs inside the single walkable region.
#[test]
fn test_temple_wfc_dungeon_has_reachable_sacred_features() {
    let mut rng = StdRng::seed_from_u64(4242);
    let sites = [Position::new(12, 7), Position::new(30, 22)];
    let level = ThematicWfcGenerator::new(Theme::AncientTemple).generate(40, 30, &sites, &mut rng);

    assert_eq!(level.tiles.width(), 40);
    assert_eq!(level.tiles.height(), 30);

    let sacred = level.tiles.count_matching(|t| {
        matches!(
            t,
            DungeonTile::Altar | DungeonTile::Shrine | DungeonTile::SacredPillar
        )
    });
    assert!(sacred >= 1, "temple generated without sacred features");

    let regions = level.tiles.connected_regions(|t| t.is_walkable());
    assert_eq!(regions.len(), 1, "walkable area is fragmented");

    assert_eq!(level.entrances.len(), sites.len());
    for link in &level.entrances {
        assert_eq!(level.tiles.get(link.dungeon), Some(&DungeonTile::StairsUp));
        assert!(regions[0].contains(&link.dungeon));
    }
}

/// Classic generation through the full world facade: rooms stay disjoint,
/// room centers are walkable, and the level is connected.
#[test]
fn test_classic_dungeon_through_world_facade() {
    let world = world_with_style(77, DungeonStyle::Classic(Theme::ClassicDungeon));
    let dungeon = world.dungeon();

    assert!(!dungeon.rooms.is_empty());
    for (i, a) in dungeon.rooms.iter().enumerate() {
        for b in dungeon.rooms.iter().skip(i + 1) {
            assert!(!a.bounds.intersects(&b.bounds), "rooms overlap");
        }
    }
    for room in &dungeon.rooms {
        let center = dungeon.tiles.get(room.center()).copied().unwrap();
        assert!(center.is_walkable());
    }
    let regions = dungeon.tiles.connected_regions(|t| t.is_walkable());
    assert_eq!(regions.len(), 1);
}

/// Every generated world links each overworld entrance tile to stairs in
/// the dungeon, in both styles.
#[test]
fn test_entrances_link_overworld_to_dungeon() {
    for style in [
        DungeonStyle::Classic(Theme::ClassicDungeon),
        DungeonStyle::Wfc(Theme::NaturalCaves),
    ] {
        let world = world_with_style(9, style);
        let dungeon = world.dungeon();
        assert!(!dungeon.entrances.is_empty());
        for link in &dungeon.entrances {
            assert_eq!(
                world.terrain().get(link.overworld),
                Some(&OverworldTile::DungeonEntrance)
            );
            assert_eq!(dungeon.tiles.get(link.dungeon), Some(&DungeonTile::StairsUp));
        }
    }
}

/// Settlement building counts stay within the category manifests, and every
/// placed building has a door stamped on the terrain.
#[test]
fn test_settlement_manifests_and_doors() {
    let world = World::generate(GenerationConfig::new(314));

    assert!(!world.settlements().is_empty());
    for settlement in world.settlements() {
        let cap = match settlement.category {
            SettlementCategory::Town => 13,
            SettlementCategory::Village => 9,
            SettlementCategory::Hamlet => 5,
        };
        assert!(!settlement.buildings.is_empty());
        assert!(
            settlement.buildings.len() <= cap,
            "{} holds {} buildings, cap {}",
            settlement.category.name(),
            settlement.buildings.len(),
            cap
        );

        for &id in &settlement.buildings {
            let building = world.buildings().get(id).expect("registered building");
            assert!(matches!(
                world.terrain().get(building.door),
                Some(OverworldTile::Door(_))
            ));
        }
    }
}

/// Entering a building and exiting again returns the actor to the exact
/// door tile it departed from.
#[test]
fn test_building_enter_exit_round_trip() {
    let mut world = World::generate(GenerationConfig::new(58));

    let door = world
        .terrain()
        .positions()
        .find(|&p| matches!(world.terrain().get(p), Some(OverworldTile::Door(_))))
        .expect("world has at least one building door");
    let mut actor = Actor::new(door);

    let entered = world.handle_actor_interaction(&mut actor).unwrap();
    let id = match entered {
        TransitionResult::EnteredBuilding(id) => id,
        other => panic!("expected to enter a building, got {other:?}"),
    };
    assert_eq!(world.current_location(), LocationKind::BuildingInterior(id));

    let building = world.buildings().get(id).unwrap();
    assert_eq!(actor.position, building.entrance_point);

    // Step onto the interior door and leave.
    let interior_door = building
        .interior
        .positions()
        .find(|&p| building.interior.get(p) == Some(&emberfell::InteriorTile::Door))
        .expect("interior has a door");
    actor.position = interior_door;

    let exited = world.handle_actor_interaction(&mut actor).unwrap();
    assert_eq!(exited, TransitionResult::ExitedBuilding);
    assert_eq!(world.current_location(), LocationKind::Overworld);
    assert_eq!(actor.position, door);
}

/// Descending into the dungeon and climbing back restores the overworld
/// position; interacting on a plain tile is a no-op.
#[test]
fn test_dungeon_enter_exit_round_trip() {
    let mut world = world_with_style(21, DungeonStyle::Classic(Theme::Crypts));

    let entrance = world.dungeon().entrances[0];
    let mut actor = Actor::new(entrance.overworld);

    let entered = world.handle_actor_interaction(&mut actor).unwrap();
    assert_eq!(entered, TransitionResult::EnteredDungeon);
    assert_eq!(world.current_location(), LocationKind::Dungeon);
    assert_eq!(actor.position, entrance.dungeon);

    let exited = world.handle_actor_interaction(&mut actor).unwrap();
    assert_eq!(exited, TransitionResult::ExitedDungeon);
    assert_eq!(world.current_location(), LocationKind::Overworld);
    assert_eq!(actor.position, entrance.overworld);

    actor.position = world.start_position();
    let nothing = world.handle_actor_interaction(&mut actor).unwrap();
    assert_eq!(nothing, TransitionResult::NoTransition);
}

/// Looting removes the chest record and reverts the tile to floor.
#[test]
fn test_chest_looting() {
    // Scan seeds until a generated dungeon holds a chest.
    let mut world = None;
    for seed in 0..32 {
        let candidate = world_with_style(seed, DungeonStyle::Classic(Theme::ClassicDungeon));
        if !candidate.dungeon().chests.is_empty() {
            world = Some(candidate);
            break;
        }
    }
    let mut world = world.expect("no seed in 0..32 produced a chest");

    let pos = world.dungeon().chests[0].position;
    let before = world.dungeon().chests.len();
    let item = world.loot_chest(pos.x, pos.y).expect("chest yields an item");
    assert!(!item.name.is_empty());
    assert_eq!(world.dungeon().chests.len(), before - 1);
    assert_eq!(world.dungeon().tiles.get(pos), Some(&DungeonTile::Floor));

    assert!(world.loot_chest(pos.x, pos.y).is_none());
}

/// The same seed always produces the same world.
#[test]
fn test_generation_is_deterministic() {
    let a = world_with_style(1234, DungeonStyle::Wfc(Theme::UndergroundCity));
    let b = world_with_style(1234, DungeonStyle::Wfc(Theme::UndergroundCity));

    let snap_a = serde_json::to_string(&a.snapshot()).unwrap();
    let snap_b = serde_json::to_string(&b.snapshot()).unwrap();
    assert_eq!(snap_a, snap_b);
}

/// Snapshots survive a JSON round trip with location state intact.
#[test]
fn test_snapshot_round_trip() {
    let mut world = World::generate(GenerationConfig::for_testing(99));
    let entrance = world.dungeon().entrances[0];
    let mut actor = Actor::new(entrance.overworld);
    world.handle_actor_interaction(&mut actor).unwrap();

    let json = serde_json::to_string(&world.snapshot()).unwrap();
    let restored: WorldSnapshot = serde_json::from_str(&json).unwrap();
    let restored = World::from_snapshot(restored);

    assert_eq!(restored.current_location(), LocationKind::Dungeon);
    assert_eq!(restored.config().seed, 99);
    assert_eq!(
        restored.dungeon().entrances[0].dungeon,
        entrance.dungeon
    );

    // The restored world exits the dungeon exactly like the original.
    let mut restored = restored;
    let exited = restored.handle_actor_interaction(&mut actor).unwrap();
    assert_eq!(exited, TransitionResult::ExitedDungeon);
    assert_eq!(actor.position, entrance.overworld);
}

/// The start position lands on ground an actor can stand on.
#[test]
fn test_start_position_is_walkable() {
    for seed in [0, 7, 1001] {
        let world = World::generate(GenerationConfig::for_testing(seed));
        let start = world.start_position();
        assert!(
            !world.is_solid(start.x, start.y, LocationKind::Overworld),
            "seed {seed} start position is solid"
        );
    }
}

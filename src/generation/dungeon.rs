//! # Classic Dungeon Generator
//!
//! Room-and-corridor generation: scatter non-overlapping rectangular rooms,
//! chain each to the previous with an L-shaped tunnel, then place entrance
//! stairs and treasure. The chained tunnels make the level connected by
//! construction.

use crate::generation::items::random_item;
use crate::generation::themes::Theme;
use crate::generation::GenerationConfig;
use crate::world::map::{DungeonLevel, EntranceLink, Room, TreasureChest};
use crate::world::tiles::DungeonTile;
use crate::world::{Grid, Position, Rect};
use rand::rngs::StdRng;
use rand::Rng;

/// Chance for any room to hold a treasure chest.
const CHEST_CHANCE: f64 = 0.25;

/// Classic room-corridor dungeon generation with themed room flavor.
pub struct ClassicDungeonGenerator {
    width: u32,
    height: u32,
    theme: Theme,
}

impl ClassicDungeonGenerator {
    pub fn new(width: u32, height: u32, theme: Theme) -> Self {
        Self {
            width,
            height,
            theme,
        }
    }

    /// Generates a level linked to the given overworld entrance sites.
    ///
    /// Stairs go at the centers of the first rooms, one per site; surplus
    /// sites are dropped when fewer rooms fit.
    pub fn generate(
        &self,
        config: &GenerationConfig,
        entrance_sites: &[Position],
        rng: &mut StdRng,
    ) -> DungeonLevel {
        let mut tiles = Grid::new(self.width, self.height, DungeonTile::Wall);
        let mut rooms: Vec<Room> = Vec::new();
        let flavor = self.theme.room_flavor();

        for _ in 0..config.max_rooms {
            let w = rng.gen_range(config.min_room_size..=config.max_room_size);
            let h = rng.gen_range(config.min_room_size..=config.max_room_size);
            if self.width < w + 3 || self.height < h + 3 {
                continue;
            }
            let x = rng.gen_range(1..=(self.width - w - 2)) as i32;
            let y = rng.gen_range(1..=(self.height - h - 2)) as i32;
            let bounds = Rect::new(x, y, w, h);

            if rooms.iter().any(|r| r.bounds.intersects(&bounds)) {
                continue;
            }

            for ry in bounds.y..bounds.bottom() {
                for rx in bounds.x..bounds.right() {
                    tiles.set(Position::new(rx, ry), DungeonTile::Floor);
                }
            }

            if let Some(previous) = rooms.last() {
                carve_l_tunnel(&mut tiles, previous.center(), bounds.center(), rng);
            }

            let description = flavor[rng.gen_range(0..flavor.len())].to_string();
            rooms.push(Room::new(bounds, description));
        }

        log::debug!(
            "classic dungeon: {} rooms in {}x{}",
            rooms.len(),
            self.width,
            self.height
        );

        // Entrance stairs first so chests never land on them.
        let mut entrances = Vec::new();
        for (room, &site) in rooms.iter().zip(entrance_sites) {
            let stairs = room.center();
            tiles.set(stairs, DungeonTile::StairsUp);
            entrances.push(EntranceLink {
                overworld: site,
                dungeon: stairs,
            });
        }
        if entrances.len() < entrance_sites.len() {
            log::warn!(
                "only {} of {} dungeon entrances placed",
                entrances.len(),
                entrance_sites.len()
            );
        }

        let mut chests = Vec::new();
        for room in &rooms {
            if rng.gen::<f64>() >= CHEST_CHANCE {
                continue;
            }
            let pos = Position::new(
                rng.gen_range(room.bounds.x + 1..room.bounds.right() - 1),
                rng.gen_range(room.bounds.y + 1..room.bounds.bottom() - 1),
            );
            if tiles.get(pos) == Some(&DungeonTile::Floor) {
                tiles.set(pos, DungeonTile::TreasureChest);
                chests.push(TreasureChest {
                    position: pos,
                    item: random_item(rng),
                });
            }
        }

        DungeonLevel {
            tiles,
            rooms,
            chests,
            entrances,
            theme: self.theme,
        }
    }
}

/// Carves an L-shaped floor tunnel between two points, horizontal-first or
/// vertical-first at random.
pub(crate) fn carve_l_tunnel(
    tiles: &mut Grid<DungeonTile>,
    from: Position,
    to: Position,
    rng: &mut StdRng,
) {
    let carve = |tiles: &mut Grid<DungeonTile>, pos: Position| {
        if tiles.get(pos) == Some(&DungeonTile::Wall) {
            tiles.set(pos, DungeonTile::Floor);
        }
    };

    if rng.gen_bool(0.5) {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            carve(tiles, Position::new(x, from.y));
        }
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            carve(tiles, Position::new(to.x, y));
        }
    } else {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            carve(tiles, Position::new(from.x, y));
        }
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            carve(tiles, Position::new(x, to.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils;

    fn generate(seed: u64) -> DungeonLevel {
        let mut config = GenerationConfig::for_testing(seed);
        config.max_rooms = 30;
        config.min_room_size = 5;
        config.max_room_size = 12;
        let mut rng = utils::create_rng(&config);
        let sites = [Position::new(10, 10), Position::new(40, 40)];
        ClassicDungeonGenerator::new(50, 50, Theme::ClassicDungeon)
            .generate(&config, &sites, &mut rng)
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        let level = generate(17);
        assert!(!level.rooms.is_empty());
        for (i, a) in level.rooms.iter().enumerate() {
            for b in level.rooms.iter().skip(i + 1) {
                assert!(!a.bounds.intersects(&b.bounds));
            }
        }
    }

    #[test]
    fn test_room_centers_are_walkable() {
        let level = generate(23);
        for room in &level.rooms {
            let tile = level.tiles.get(room.center()).copied().unwrap();
            assert!(tile.is_walkable());
        }
    }

    #[test]
    fn test_level_is_fully_connected() {
        let level = generate(31);
        let regions = level.tiles.connected_regions(|t| t.is_walkable());
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_entrances_sit_on_stairs() {
        let level = generate(5);
        assert!(!level.entrances.is_empty());
        for link in &level.entrances {
            assert_eq!(
                level.tiles.get(link.dungeon),
                Some(&DungeonTile::StairsUp)
            );
        }
    }

    #[test]
    fn test_chests_sit_on_chest_tiles() {
        for seed in 0..6 {
            let level = generate(seed);
            for chest in &level.chests {
                assert_eq!(
                    level.tiles.get(chest.position),
                    Some(&DungeonTile::TreasureChest)
                );
            }
        }
    }

    #[test]
    fn test_rooms_have_flavor_text() {
        let level = generate(9);
        for room in &level.rooms {
            assert!(!room.description.is_empty());
        }
    }
}

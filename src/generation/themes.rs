//! # Dungeon Themes
//!
//! Five themed variants for generated dungeons. A theme supplies the 3x3
//! example patterns the collapse engine learns its adjacency rules from,
//! the flavor text pool for room descriptions, and a decoration pass that
//! runs on the concrete tile grid before connectivity repair.

use crate::generation::wfc::{bounding_rect, finalize_level, Pattern, WfcDungeonGenerator};
use crate::world::map::DungeonLevel;
use crate::world::tiles::DungeonTile;
use crate::world::{Grid, Position};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Dungeon theme. Controls patterns, decoration, and room flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    ClassicDungeon,
    NaturalCaves,
    AncientTemple,
    UndergroundCity,
    Crypts,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::ClassicDungeon,
        Theme::NaturalCaves,
        Theme::AncientTemple,
        Theme::UndergroundCity,
        Theme::Crypts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::ClassicDungeon => "classic dungeon",
            Theme::NaturalCaves => "natural caves",
            Theme::AncientTemple => "ancient temple",
            Theme::UndergroundCity => "underground city",
            Theme::Crypts => "crypts",
        }
    }

    /// Draws a theme uniformly at random.
    pub fn random(rng: &mut StdRng) -> Theme {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Flavor text pool for room descriptions.
    pub fn room_flavor(self) -> &'static [&'static str] {
        match self {
            Theme::ClassicDungeon => &[
                "Dust and decay fill this ancient chamber.",
                "Strange scratching noises echo from the walls.",
                "Phosphorescent moss provides an eerie glow.",
                "Water drips steadily from the cracked ceiling.",
                "Crude symbols are carved into the stone walls.",
                "This chamber feels unnaturally cold.",
                "The air is thick with the smell of rot.",
                "Cobwebs hang like curtains in the corners.",
            ],
            Theme::NaturalCaves => &[
                "Water drips from limestone formations above.",
                "The cavern walls glisten with mineral deposits.",
                "Strange rock formations create eerie shadows.",
                "You hear the distant sound of flowing water.",
                "Stalactites hang like ancient teeth from the ceiling.",
                "The air is cool and damp with cave moisture.",
            ],
            Theme::AncientTemple => &[
                "Sacred symbols are carved into every surface.",
                "Ancient murals depict long-forgotten rituals.",
                "The air hums with residual divine energy.",
                "Ceremonial braziers stand cold and empty.",
                "Holy texts in dead languages cover the walls.",
                "This chamber once echoed with sacred chants.",
            ],
            Theme::UndergroundCity => &[
                "Abandoned market stalls line the thoroughfare.",
                "Street lamps stand dark and forgotten.",
                "The remnants of a once-thriving community.",
                "Building facades show signs of hasty evacuation.",
                "A central plaza opens before you.",
                "The architecture speaks of better times.",
            ],
            Theme::Crypts => &[
                "Burial niches line the walls like silent sentries.",
                "The musty scent of ages-old incense lingers.",
                "Carved epitaphs tell stories of the departed.",
                "Funeral urns rest undisturbed on stone shelves.",
                "The weight of countless souls presses down.",
                "Bone fragments crunch softly underfoot.",
            ],
        }
    }

    /// Example patterns the collapse engine learns this theme from.
    pub fn pattern_set(self) -> Vec<Pattern> {
        use crate::generation::wfc::WfcTile::*;
        match self {
            Theme::ClassicDungeon => vec![
                // Small room with a single door
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Wall, RoomFloor, Wall],
                    [Wall, Door, Wall],
                ]),
                // Large room corner, tiles into bigger spaces
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Wall, RoomFloor, RoomFloor],
                    [Wall, RoomFloor, RoomFloor],
                ]),
                // Corridor T-junction
                Pattern::new([
                    [Wall, Corridor, Wall],
                    [Corridor, Corridor, Corridor],
                    [Wall, Corridor, Wall],
                ]),
                // Straight corridor
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Corridor, Corridor, Corridor],
                    [Wall, Wall, Wall],
                ]),
                // Room with a pillar
                Pattern::new([
                    [RoomFloor, RoomFloor, RoomFloor],
                    [RoomFloor, Pillar, RoomFloor],
                    [RoomFloor, RoomFloor, RoomFloor],
                ]),
                // Guard room with a door
                Pattern::new([
                    [Wall, Door, Wall],
                    [RoomFloor, RoomFloor, RoomFloor],
                    [Wall, Wall, Wall],
                ]),
                // Secret passage
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Wall, Secret, Wall],
                    [Wall, Wall, Wall],
                ]),
                // Treasure room
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Door, Treasure, Wall],
                    [Wall, Wall, Wall],
                ]),
            ],
            Theme::NaturalCaves => vec![
                // Cave chamber
                Pattern::new([
                    [Wall, CaveFloor, Wall],
                    [CaveFloor, CaveFloor, CaveFloor],
                    [Wall, CaveFloor, Wall],
                ]),
                // Underground stream
                Pattern::new([
                    [CaveFloor, CaveFloor, CaveFloor],
                    [Water, Water, Water],
                    [CaveFloor, CaveFloor, CaveFloor],
                ]),
                // Stalactite formation
                Pattern::new([
                    [CaveFloor, CaveFloor, CaveFloor],
                    [CaveFloor, Stalactite, CaveFloor],
                    [CaveFloor, CaveFloor, CaveFloor],
                ]),
                // Cave tunnel
                Pattern::new([
                    [Wall, CaveFloor, Wall],
                    [Wall, CaveFloor, Wall],
                    [Wall, CaveFloor, Wall],
                ]),
                // Cavern opening
                Pattern::new([
                    [Wall, Wall, CaveFloor],
                    [Wall, CaveFloor, CaveFloor],
                    [CaveFloor, CaveFloor, CaveFloor],
                ]),
                // Underground lake edge
                Pattern::new([
                    [CaveFloor, CaveFloor, CaveFloor],
                    [CaveFloor, Water, Water],
                    [CaveFloor, Water, Water],
                ]),
            ],
            Theme::AncientTemple => vec![
                // Chamber with an altar
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Wall, Altar, Wall],
                    [TempleFloor, TempleFloor, TempleFloor],
                ]),
                // Ceremonial hall
                Pattern::new([
                    [TempleFloor, TempleFloor, TempleFloor],
                    [TempleFloor, TempleFloor, TempleFloor],
                    [TempleFloor, TempleFloor, TempleFloor],
                ]),
                // Sacred pillar
                Pattern::new([
                    [TempleFloor, TempleFloor, TempleFloor],
                    [TempleFloor, SacredPillar, TempleFloor],
                    [TempleFloor, TempleFloor, TempleFloor],
                ]),
                // Temple entrance
                Pattern::new([
                    [Wall, TempleDoor, Wall],
                    [TempleFloor, TempleFloor, TempleFloor],
                    [TempleFloor, TempleFloor, TempleFloor],
                ]),
                // Shrine alcove
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Wall, Shrine, Wall],
                    [Wall, TempleDoor, Wall],
                ]),
                // Corridor lined with murals
                Pattern::new([
                    [Mural, Mural, Mural],
                    [TempleFloor, TempleFloor, TempleFloor],
                    [Mural, Mural, Mural],
                ]),
            ],
            Theme::UndergroundCity => vec![
                // City street
                Pattern::new([
                    [Building, Building, Building],
                    [Street, Street, Street],
                    [Building, Building, Building],
                ]),
                // City plaza
                Pattern::new([
                    [Street, Street, Street],
                    [Street, Plaza, Street],
                    [Street, Street, Street],
                ]),
                // Building entrance
                Pattern::new([
                    [Building, Building, Building],
                    [Building, CityDoor, Building],
                    [Street, Street, Street],
                ]),
                // Intersection
                Pattern::new([
                    [Street, Street, Street],
                    [Street, Street, Street],
                    [Street, Street, Street],
                ]),
                // Market stall
                Pattern::new([
                    [Building, Building, Building],
                    [Street, Stall, Street],
                    [Street, Street, Street],
                ]),
                // Fountain square
                Pattern::new([
                    [Plaza, Plaza, Plaza],
                    [Plaza, Fountain, Plaza],
                    [Plaza, Plaza, Plaza],
                ]),
            ],
            Theme::Crypts => vec![
                // Burial chamber
                Pattern::new([
                    [Wall, Wall, Wall],
                    [Wall, Sarcophagus, Wall],
                    [CryptFloor, CryptFloor, CryptFloor],
                ]),
                // Crypt corridor
                Pattern::new([
                    [TombWall, TombWall, TombWall],
                    [CryptFloor, CryptFloor, CryptFloor],
                    [TombWall, TombWall, TombWall],
                ]),
                // Ossuary wall
                Pattern::new([
                    [Bones, Bones, Bones],
                    [CryptFloor, CryptFloor, CryptFloor],
                    [Bones, Bones, Bones],
                ]),
                // Tomb entrance
                Pattern::new([
                    [Wall, CryptDoor, Wall],
                    [CryptFloor, CryptFloor, CryptFloor],
                    [Wall, Wall, Wall],
                ]),
                // Memorial hall
                Pattern::new([
                    [CryptFloor, CryptFloor, CryptFloor],
                    [CryptFloor, Memorial, CryptFloor],
                    [CryptFloor, CryptFloor, CryptFloor],
                ]),
                // Catacomb tunnel
                Pattern::new([
                    [Bones, CryptFloor, Bones],
                    [Bones, CryptFloor, Bones],
                    [Bones, CryptFloor, Bones],
                ]),
            ],
        }
    }
}

/// Themed collapse generator: runs the engine with the theme's patterns,
/// decorates the result, then hands off to the shared post-pass.
pub struct ThematicWfcGenerator {
    theme: Theme,
}

impl ThematicWfcGenerator {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn generate(
        &self,
        width: u32,
        height: u32,
        entrance_sites: &[Position],
        rng: &mut StdRng,
    ) -> DungeonLevel {
        log::info!(
            "generating {} dungeon ({}x{}, {} entrances)",
            self.theme.name(),
            width,
            height,
            entrance_sites.len()
        );
        let engine = WfcDungeonGenerator::new(width, height, &self.theme.pattern_set());
        let mut tiles = engine.collapse(rng);
        self.decorate(&mut tiles, rng);
        // Decoration may carve or block tiles, so connectivity repair runs
        // after it and covers both.
        finalize_level(tiles, entrance_sites, self.theme, rng)
    }

    fn decorate(&self, tiles: &mut Grid<DungeonTile>, rng: &mut StdRng) {
        match self.theme {
            Theme::ClassicDungeon => {}
            Theme::NaturalCaves => extend_streams(tiles, rng),
            Theme::AncientTemple => add_sacred_chambers(tiles, rng),
            Theme::UndergroundCity => promote_plazas(tiles),
            Theme::Crypts => add_burial_features(tiles, rng),
        }
    }
}

const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Extends each water tile into a short stream with 30% probability,
/// flooding floor along a random cardinal direction.
fn extend_streams(tiles: &mut Grid<DungeonTile>, rng: &mut StdRng) {
    let sources: Vec<Position> = tiles
        .positions()
        .filter(|&p| tiles.get(p) == Some(&DungeonTile::Water))
        .collect();
    for source in sources {
        if rng.gen::<f64>() >= 0.3 {
            continue;
        }
        let (dx, dy) = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
        let length = rng.gen_range(2..=5);
        for step in 0..length {
            let pos = Position::new(source.x + dx * step, source.y + dy * step);
            if tiles.get(pos) == Some(&DungeonTile::Floor) {
                tiles.set(pos, DungeonTile::Water);
            }
        }
    }
}

/// Hides one to three small sacred chambers behind the east walls of
/// existing chambers, each holding an altar and reached through a secret
/// passage.
fn add_sacred_chambers(tiles: &mut Grid<DungeonTile>, rng: &mut StdRng) {
    let regions = tiles.connected_regions(|t| t.is_walkable());
    let rooms: Vec<_> = regions
        .iter()
        .filter(|r| r.len() >= crate::config::MIN_ROOM_AREA)
        .map(|r| bounding_rect(r))
        .collect();
    if rooms.is_empty() {
        return;
    }

    for _ in 0..rng.gen_range(1..=3) {
        let room = rooms[rng.gen_range(0..rooms.len())];
        let chamber_x = room.right() + 2;
        if chamber_x + 3 >= tiles.width() as i32 || tiles.height() < 6 {
            continue;
        }
        // Rows chamber_y-1..=chamber_y+1 must stay off the border.
        let chamber_y = room.center().y.clamp(2, tiles.height() as i32 - 3);
        for dx in 0..3 {
            for dy in -1..=1 {
                let pos = Position::new(chamber_x + dx, chamber_y + dy);
                if tiles.get(pos).is_none() {
                    continue;
                }
                let tile = if dx == 1 && dy == 0 {
                    DungeonTile::Altar
                } else {
                    DungeonTile::Floor
                };
                tiles.set(pos, tile);
            }
        }
        tiles.set(
            Position::new(chamber_x - 1, chamber_y),
            DungeonTile::SecretPassage,
        );
    }
}

/// Promotes street tiles at the heart of large open areas to plaza: a
/// street whose 5x5 neighborhood holds 15 or more street or plaza tiles
/// becomes plaza.
fn promote_plazas(tiles: &mut Grid<DungeonTile>) {
    for y in 1..tiles.height() as i32 - 1 {
        for x in 1..tiles.width() as i32 - 1 {
            let pos = Position::new(x, y);
            if tiles.get(pos) != Some(&DungeonTile::Street) {
                continue;
            }
            let mut open = 0;
            for dx in -2..=2 {
                for dy in -2..=2 {
                    match tiles.get(Position::new(x + dx, y + dy)) {
                        Some(DungeonTile::Street) | Some(DungeonTile::Plaza) => open += 1,
                        _ => {}
                    }
                }
            }
            if open >= 15 {
                tiles.set(pos, DungeonTile::Plaza);
            }
        }
    }
}

/// Turns 20% of walls bordering crypt floor into bone walls.
fn add_burial_features(tiles: &mut Grid<DungeonTile>, rng: &mut StdRng) {
    let candidates: Vec<Position> = tiles
        .positions()
        .filter(|&p| {
            tiles.get(p) == Some(&DungeonTile::Wall)
                && p.cardinal_adjacent_positions()
                    .iter()
                    .any(|&n| tiles.get(n) == Some(&DungeonTile::Floor))
        })
        .collect();
    for pos in candidates {
        if rng.gen::<f64>() < 0.2 {
            tiles.set(pos, DungeonTile::BoneWall);
        }
    }
}

//! # Wave Function Collapse Engine
//!
//! Constraint-solving dungeon generator. Each cell starts as a superposition
//! of the theme's tile types; the solver repeatedly collapses the cell with
//! the fewest remaining options (weighted by tile frequency) and propagates
//! adjacency constraints learned from 3x3 example patterns. Cells left
//! ambiguous when the iteration ceiling hits resolve to wall.
//!
//! The raw collapsed grid then goes through a mandatory post-pass that
//! repairs connectivity, derives rooms, and places entrance stairs and
//! treasure. Themed decoration runs between conversion and repair so the
//! repair also covers anything decoration carved or blocked.

use crate::generation::items::random_item;
use crate::generation::themes::Theme;
use crate::generation::utils;
use crate::world::map::{DungeonLevel, EntranceLink, Room, TreasureChest};
use crate::world::tiles::DungeonTile;
use crate::world::{Grid, Position, Rect};
use rand::rngs::StdRng;
use rand::Rng;

/// Tile alphabet for the collapse grid, across all themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WfcTile {
    // Shared
    Wall,
    Floor,
    Door,
    Corridor,
    RoomFloor,
    Pillar,
    StairsUp,
    Treasure,
    Secret,
    // Caves
    CaveFloor,
    Water,
    Stalactite,
    // Temples
    TempleFloor,
    Altar,
    SacredPillar,
    TempleDoor,
    Shrine,
    Mural,
    // Underground cities
    Building,
    Street,
    Plaza,
    CityDoor,
    Stall,
    Fountain,
    // Crypts
    CryptFloor,
    Sarcophagus,
    TombWall,
    Bones,
    CryptDoor,
    Memorial,
}

impl WfcTile {
    pub const COUNT: usize = 30;

    const ALL: [WfcTile; Self::COUNT] = [
        WfcTile::Wall,
        WfcTile::Floor,
        WfcTile::Door,
        WfcTile::Corridor,
        WfcTile::RoomFloor,
        WfcTile::Pillar,
        WfcTile::StairsUp,
        WfcTile::Treasure,
        WfcTile::Secret,
        WfcTile::CaveFloor,
        WfcTile::Water,
        WfcTile::Stalactite,
        WfcTile::TempleFloor,
        WfcTile::Altar,
        WfcTile::SacredPillar,
        WfcTile::TempleDoor,
        WfcTile::Shrine,
        WfcTile::Mural,
        WfcTile::Building,
        WfcTile::Street,
        WfcTile::Plaza,
        WfcTile::CityDoor,
        WfcTile::Stall,
        WfcTile::Fountain,
        WfcTile::CryptFloor,
        WfcTile::Sarcophagus,
        WfcTile::TombWall,
        WfcTile::Bones,
        WfcTile::CryptDoor,
        WfcTile::Memorial,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Relative pick frequency during collapse. Rare features sit around
    /// 0.01 to 0.05, common floors at 0.6 to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            WfcTile::Wall => 0.3,
            WfcTile::Floor => 1.0,
            WfcTile::Door => 0.1,
            WfcTile::Corridor => 0.8,
            WfcTile::RoomFloor => 0.9,
            WfcTile::Pillar => 0.05,
            WfcTile::StairsUp => 0.01,
            WfcTile::Treasure => 0.02,
            WfcTile::Secret => 0.005,
            WfcTile::CaveFloor => 0.7,
            WfcTile::Water => 0.1,
            WfcTile::Stalactite => 0.02,
            WfcTile::TempleFloor => 0.8,
            WfcTile::Altar => 0.01,
            WfcTile::SacredPillar => 0.02,
            WfcTile::TempleDoor => 0.05,
            WfcTile::Shrine => 0.01,
            WfcTile::Mural => 0.1,
            WfcTile::Building => 0.4,
            WfcTile::Street => 0.6,
            WfcTile::Plaza => 0.2,
            WfcTile::CityDoor => 0.05,
            WfcTile::Stall => 0.02,
            WfcTile::Fountain => 0.01,
            WfcTile::CryptFloor => 0.7,
            WfcTile::Sarcophagus => 0.02,
            WfcTile::TombWall => 0.3,
            WfcTile::Bones => 0.1,
            WfcTile::CryptDoor => 0.03,
            WfcTile::Memorial => 0.01,
        }
    }

    /// Concrete dungeon tile this collapses to. Themed feature tiles keep
    /// their identity so decoration passes and queries can find them; only
    /// the various floor and door flavors flatten to plain floor.
    pub fn to_dungeon_tile(self) -> DungeonTile {
        match self {
            WfcTile::Wall | WfcTile::Building => DungeonTile::Wall,
            WfcTile::Floor
            | WfcTile::Door
            | WfcTile::Corridor
            | WfcTile::RoomFloor
            | WfcTile::CaveFloor
            | WfcTile::TempleFloor
            | WfcTile::TempleDoor
            | WfcTile::CryptFloor
            | WfcTile::CryptDoor => DungeonTile::Floor,
            WfcTile::Pillar => DungeonTile::Pillar,
            WfcTile::StairsUp => DungeonTile::StairsUp,
            WfcTile::Treasure => DungeonTile::TreasureChest,
            WfcTile::Secret => DungeonTile::SecretPassage,
            WfcTile::Water => DungeonTile::Water,
            WfcTile::Stalactite => DungeonTile::Stalactite,
            WfcTile::Altar => DungeonTile::Altar,
            WfcTile::SacredPillar => DungeonTile::SacredPillar,
            WfcTile::Shrine => DungeonTile::Shrine,
            WfcTile::Mural => DungeonTile::Mural,
            WfcTile::Street | WfcTile::CityDoor => DungeonTile::Street,
            WfcTile::Plaza => DungeonTile::Plaza,
            WfcTile::Stall => DungeonTile::Stall,
            WfcTile::Fountain => DungeonTile::Fountain,
            WfcTile::Sarcophagus => DungeonTile::Sarcophagus,
            WfcTile::TombWall => DungeonTile::TombWall,
            WfcTile::Bones => DungeonTile::BoneWall,
            WfcTile::Memorial => DungeonTile::Memorial,
        }
    }
}

/// Superposition of tile types as a bitmask. Sets only ever shrink during
/// propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSet(u64);

impl TileSet {
    pub const EMPTY: TileSet = TileSet(0);

    pub fn singleton(tile: WfcTile) -> Self {
        TileSet(1 << tile.index())
    }

    pub fn from_tiles(tiles: &[WfcTile]) -> Self {
        let mut set = TileSet::EMPTY;
        for &tile in tiles {
            set.insert(tile);
        }
        set
    }

    pub fn insert(&mut self, tile: WfcTile) {
        self.0 |= 1 << tile.index();
    }

    pub fn contains(self, tile: WfcTile) -> bool {
        self.0 & (1 << tile.index()) != 0
    }

    pub fn union(self, other: TileSet) -> TileSet {
        TileSet(self.0 | other.0)
    }

    pub fn intersection(self, other: TileSet) -> TileSet {
        TileSet(self.0 & other.0)
    }

    /// Number of tiles still possible; the cell's entropy.
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The single remaining tile, if fully collapsed.
    pub fn only(self) -> Option<WfcTile> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    pub fn iter(self) -> impl Iterator<Item = WfcTile> {
        WfcTile::ALL
            .into_iter()
            .filter(move |tile| self.contains(*tile))
    }
}

/// A 3x3 example pattern. Adjacency rules are learned from the orthogonal
/// neighbor pairs of these patterns and their rotations.
#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub tiles: [[WfcTile; 3]; 3],
}

impl Pattern {
    pub const fn new(tiles: [[WfcTile; 3]; 3]) -> Self {
        Self { tiles }
    }

    /// 90-degree clockwise rotation.
    fn rotated(&self) -> Pattern {
        let mut tiles = self.tiles;
        for (i, row) in self.tiles.iter().enumerate() {
            for (j, &tile) in row.iter().enumerate() {
                tiles[j][2 - i] = tile;
            }
        }
        Pattern { tiles }
    }

    fn rotations(&self) -> [Pattern; 4] {
        let r1 = self.rotated();
        let r2 = r1.rotated();
        let r3 = r2.rotated();
        [*self, r1, r2, r3]
    }
}

/// Chance for any derived room to hold a treasure chest.
const CHEST_CHANCE: f64 = 0.3;

/// The collapse engine for one pattern set.
pub struct WfcDungeonGenerator {
    width: u32,
    height: u32,
    /// Tiles that appear in the pattern set; the cell universe.
    universe: TileSet,
    /// Allowed orthogonal neighbors per tile, direction-agnostic.
    adjacency: [TileSet; WfcTile::COUNT],
}

impl WfcDungeonGenerator {
    /// Builds the engine from a pattern set. All four rotations of every
    /// pattern contribute adjacency pairs.
    pub fn new(width: u32, height: u32, patterns: &[Pattern]) -> Self {
        let mut universe = TileSet::singleton(WfcTile::Wall);
        let mut adjacency = [TileSet::EMPTY; WfcTile::COUNT];

        for pattern in patterns {
            for rotation in pattern.rotations() {
                for i in 0..3 {
                    for j in 0..3usize {
                        let center = rotation.tiles[i][j];
                        universe.insert(center);
                        for (di, dj) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
                            let ni = i as i32 + di;
                            let nj = j as i32 + dj;
                            if (0..3).contains(&ni) && (0..3).contains(&nj) {
                                adjacency[center.index()]
                                    .insert(rotation.tiles[ni as usize][nj as usize]);
                            }
                        }
                    }
                }
            }
        }

        Self {
            width,
            height,
            universe,
            adjacency,
        }
    }

    /// Runs the collapse and concretizes the result. Border cells are fixed
    /// to wall; cells still ambiguous at the iteration ceiling fall back to
    /// wall.
    pub fn collapse(&self, rng: &mut StdRng) -> Grid<DungeonTile> {
        let mut cells = Grid::new(self.width, self.height, self.universe);
        for pos in cells.positions().collect::<Vec<_>>() {
            if pos.x == 0
                || pos.y == 0
                || pos.x == self.width as i32 - 1
                || pos.y == self.height as i32 - 1
            {
                cells.set(pos, TileSet::singleton(WfcTile::Wall));
            }
        }

        let ceiling = (self.width * self.height) as usize;
        for _step in 0..ceiling {
            let Some(target) = self.min_entropy_cell(&cells, rng) else {
                break;
            };
            let set = *cells.get(target).expect("candidate in bounds");
            let options: Vec<WfcTile> = set.iter().collect();
            let weights: Vec<f64> = options.iter().map(|t| t.weight()).collect();
            let chosen = options[utils::weighted_pick(&weights, rng)];
            cells.set(target, TileSet::singleton(chosen));
            self.propagate(&mut cells, target);
        }

        let mut ambiguous = 0usize;
        let mut tiles = Grid::new(self.width, self.height, DungeonTile::Wall);
        for pos in cells.positions().collect::<Vec<_>>() {
            let set = *cells.get(pos).expect("in bounds");
            match set.only() {
                Some(tile) => tiles.set(pos, tile.to_dungeon_tile()),
                None => {
                    ambiguous += 1;
                    tiles.set(pos, DungeonTile::Wall);
                }
            }
        }
        if ambiguous > 0 {
            log::debug!("collapse left {ambiguous} ambiguous cells, resolved to wall");
        }
        tiles
    }

    /// Cell with the smallest entropy above 1; ties break uniformly.
    fn min_entropy_cell(&self, cells: &Grid<TileSet>, rng: &mut StdRng) -> Option<Position> {
        let mut min = u32::MAX;
        let mut candidates: Vec<Position> = Vec::new();
        for (pos, set) in cells.iter() {
            let entropy = set.len();
            if entropy <= 1 {
                continue;
            }
            if entropy < min {
                min = entropy;
                candidates.clear();
                candidates.push(pos);
            } else if entropy == min {
                candidates.push(pos);
            }
        }
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }

    /// Stack-based constraint propagation: each neighbor's set intersects
    /// with the union of neighbors allowed by the current cell's tiles.
    /// Shrunk cells are pushed for further propagation; a contradiction
    /// (empty set) stays and resolves to wall at concretization.
    fn propagate(&self, cells: &mut Grid<TileSet>, start: Position) {
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            let current = *cells.get(pos).expect("propagation stays in bounds");
            let mut allowed = TileSet::EMPTY;
            for tile in current.iter() {
                allowed = allowed.union(self.adjacency[tile.index()]);
            }

            for neighbor in pos.cardinal_adjacent_positions() {
                let Some(&neighbor_set) = cells.get(neighbor) else {
                    continue;
                };
                let reduced = neighbor_set.intersection(allowed);
                if reduced != neighbor_set {
                    cells.set(neighbor, reduced);
                    if !reduced.is_empty() {
                        stack.push(neighbor);
                    }
                }
            }
        }
    }
}

/// Shared WFC post-pass: repairs connectivity, derives rooms from floor
/// regions, places one guaranteed stairs tile per entrance site, and rolls
/// treasure per room.
pub(crate) fn finalize_level(
    mut tiles: Grid<DungeonTile>,
    entrance_sites: &[Position],
    theme: Theme,
    rng: &mut StdRng,
) -> DungeonLevel {
    connect_regions(&mut tiles, rng);

    let regions = tiles.connected_regions(|t| t.is_walkable());
    let flavor = theme.room_flavor();
    let mut rooms: Vec<Room> = regions
        .iter()
        .filter(|region| region.len() >= crate::config::MIN_ROOM_AREA)
        .map(|region| {
            let bounds = bounding_rect(region);
            let description = flavor[rng.gen_range(0..flavor.len())].to_string();
            Room::new(bounds, description)
        })
        .collect();

    if rooms.is_empty() {
        // Degenerate collapse. Carve a fallback chamber so entrances always
        // have somewhere to land.
        let center = Position::new(tiles.width() as i32 / 2, tiles.height() as i32 / 2);
        let bounds = Rect::new(center.x - 2, center.y - 2, 5, 5);
        for y in bounds.y..bounds.bottom() {
            for x in bounds.x..bounds.right() {
                tiles.set(Position::new(x, y), DungeonTile::Floor);
            }
        }
        log::warn!("collapse produced no rooms, carved fallback chamber");
        rooms.push(Room::new(
            bounds,
            flavor[rng.gen_range(0..flavor.len())].to_string(),
        ));
    }

    let mut entrances = Vec::new();
    for &site in entrance_sites {
        let stairs = place_stairs(&mut tiles, &rooms, rng);
        entrances.push(EntranceLink {
            overworld: site,
            dungeon: stairs,
        });
    }

    let mut chests = Vec::new();
    for room in &rooms {
        if rng.gen::<f64>() >= CHEST_CHANCE {
            continue;
        }
        let pos = Position::new(
            rng.gen_range(room.bounds.x..room.bounds.right()),
            rng.gen_range(room.bounds.y..room.bounds.bottom()),
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
        theme,
    }
}

/// Joins every non-largest walkable region to the largest with an L-shaped
/// floor corridor.
fn connect_regions(tiles: &mut Grid<DungeonTile>, rng: &mut StdRng) {
    let regions = tiles.connected_regions(|t| t.is_walkable());
    if regions.len() <= 1 {
        return;
    }
    let largest = regions
        .iter()
        .enumerate()
        .max_by_key(|(_, r)| r.len())
        .map(|(i, _)| i)
        .expect("at least two regions");

    let repairs = regions.len() - 1;
    for (i, region) in regions.iter().enumerate() {
        if i == largest {
            continue;
        }
        let from = region[rng.gen_range(0..region.len())];
        let to = regions[largest][rng.gen_range(0..regions[largest].len())];
        carve_straight_corridor(tiles, from, to);
    }
    log::debug!("connectivity repair joined {repairs} regions");
}

/// Horizontal-then-vertical corridor that overwrites whatever is in the way.
fn carve_straight_corridor(tiles: &mut Grid<DungeonTile>, from: Position, to: Position) {
    let mut current = from;
    while current.x != to.x {
        current.x += (to.x - current.x).signum();
        tiles.set(current, DungeonTile::Floor);
    }
    while current.y != to.y {
        current.y += (to.y - current.y).signum();
        tiles.set(current, DungeonTile::Floor);
    }
}

/// Places one stairs tile on a guaranteed floor cell: random cells in a
/// random room first, then a row-major scan, then a carved cell as the last
/// resort.
fn place_stairs(tiles: &mut Grid<DungeonTile>, rooms: &[Room], rng: &mut StdRng) -> Position {
    let room = &rooms[rng.gen_range(0..rooms.len())];
    for _ in 0..20 {
        let pos = Position::new(
            rng.gen_range(room.bounds.x..room.bounds.right()),
            rng.gen_range(room.bounds.y..room.bounds.bottom()),
        );
        if tiles.get(pos) == Some(&DungeonTile::Floor) {
            tiles.set(pos, DungeonTile::StairsUp);
            return pos;
        }
    }
    let fallback = tiles
        .positions()
        .find(|&p| tiles.get(p) == Some(&DungeonTile::Floor));
    if let Some(pos) = fallback {
        tiles.set(pos, DungeonTile::StairsUp);
        return pos;
    }
    let center = room.center();
    tiles.set(center, DungeonTile::StairsUp);
    center
}

pub(crate) fn bounding_rect(region: &[Position]) -> Rect {
    let min_x = region.iter().map(|p| p.x).min().unwrap_or(0);
    let max_x = region.iter().map(|p| p.x).max().unwrap_or(0);
    let min_y = region.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = region.iter().map(|p| p.y).max().unwrap_or(0);
    Rect::new(
        min_x,
        min_y,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationConfig;

    fn rng(seed: u64) -> StdRng {
        utils::create_rng(&GenerationConfig::for_testing(seed))
    }

    #[test]
    fn test_tileset_operations() {
        let mut set = TileSet::EMPTY;
        assert!(set.is_empty());
        set.insert(WfcTile::Floor);
        set.insert(WfcTile::Wall);
        assert_eq!(set.len(), 2);
        assert!(set.contains(WfcTile::Floor));
        assert!(!set.contains(WfcTile::Altar));
        assert_eq!(set.only(), None);
        let collapsed = set.intersection(TileSet::singleton(WfcTile::Wall));
        assert_eq!(collapsed.only(), Some(WfcTile::Wall));
    }

    #[test]
    fn test_pattern_rotation_cycles() {
        let pattern = Pattern::new([
            [WfcTile::Wall, WfcTile::Wall, WfcTile::Wall],
            [WfcTile::Wall, WfcTile::RoomFloor, WfcTile::Door],
            [WfcTile::Wall, WfcTile::Wall, WfcTile::Wall],
        ]);
        let rotations = pattern.rotations();
        // Four 90-degree turns come back to the start.
        let full_turn = rotations[3].rotated();
        assert_eq!(full_turn.tiles, pattern.tiles);
        // One turn moves the east door to the south.
        assert_eq!(rotations[1].tiles[2][1], WfcTile::Door);
    }

    #[test]
    fn test_adjacency_learned_from_patterns() {
        let pattern = Pattern::new([
            [WfcTile::Wall, WfcTile::Wall, WfcTile::Wall],
            [WfcTile::Wall, WfcTile::RoomFloor, WfcTile::RoomFloor],
            [WfcTile::Wall, WfcTile::RoomFloor, WfcTile::RoomFloor],
        ]);
        let engine = WfcDungeonGenerator::new(10, 10, &[pattern]);
        let allowed = engine.adjacency[WfcTile::RoomFloor.index()];
        assert!(allowed.contains(WfcTile::RoomFloor));
        assert!(allowed.contains(WfcTile::Wall));
        assert!(!allowed.contains(WfcTile::Altar));
    }

    #[test]
    fn test_collapse_fills_grid_with_known_tiles() {
        let engine = WfcDungeonGenerator::new(24, 24, &Theme::ClassicDungeon.pattern_set());
        let tiles = engine.collapse(&mut rng(12));
        assert_eq!(tiles.width(), 24);
        // Border stays wall.
        for x in 0..24 {
            assert_eq!(tiles.get(Position::new(x, 0)), Some(&DungeonTile::Wall));
            assert_eq!(tiles.get(Position::new(x, 23)), Some(&DungeonTile::Wall));
        }
    }

    #[test]
    fn test_collapse_respects_tile_weights() {
        // Universe of wall (weight 0.3) and room floor (0.9) with every
        // adjacency allowed, so the pick frequency dominates the outcome.
        let patterns = [
            Pattern::new([[WfcTile::Wall; 3]; 3]),
            Pattern::new([[WfcTile::RoomFloor; 3]; 3]),
            Pattern::new([
                [WfcTile::Wall, WfcTile::RoomFloor, WfcTile::Wall],
                [WfcTile::RoomFloor, WfcTile::Wall, WfcTile::RoomFloor],
                [WfcTile::Wall, WfcTile::RoomFloor, WfcTile::Wall],
            ]),
        ];
        let engine = WfcDungeonGenerator::new(40, 40, &patterns);
        let tiles = engine.collapse(&mut rng(5));

        let mut walls = 0usize;
        let mut floors = 0usize;
        for y in 1..39 {
            for x in 1..39 {
                match tiles.get(Position::new(x, y)) {
                    Some(DungeonTile::Wall) => walls += 1,
                    Some(DungeonTile::Floor) => floors += 1,
                    _ => {}
                }
            }
        }
        assert!(
            floors > walls,
            "floor weight 0.9 should beat wall 0.3 ({floors} vs {walls})"
        );
    }

    #[test]
    fn test_finalize_guarantees_every_entrance() {
        let engine = WfcDungeonGenerator::new(30, 30, &Theme::ClassicDungeon.pattern_set());
        let mut r = rng(3);
        let tiles = engine.collapse(&mut r);
        let sites: Vec<Position> = (0..5).map(|i| Position::new(i * 10, 5)).collect();
        let level = finalize_level(tiles, &sites, Theme::ClassicDungeon, &mut r);
        assert_eq!(level.entrances.len(), sites.len());
        for link in &level.entrances {
            assert_eq!(level.tiles.get(link.dungeon), Some(&DungeonTile::StairsUp));
        }
    }

    #[test]
    fn test_finalize_connects_all_floor() {
        for seed in 0..4 {
            let engine = WfcDungeonGenerator::new(32, 32, &Theme::ClassicDungeon.pattern_set());
            let mut r = rng(seed);
            let tiles = engine.collapse(&mut r);
            let level = finalize_level(tiles, &[Position::new(1, 1)], Theme::ClassicDungeon, &mut r);
            let regions = level.tiles.connected_regions(|t| t.is_walkable());
            assert_eq!(regions.len(), 1, "seed {seed} left disconnected regions");
        }
    }
}

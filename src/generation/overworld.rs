//! # Overworld Generator
//!
//! Builds the overworld terrain from three noise fields (elevation,
//! moisture, temperature), classifies biomes through an ordered rule table,
//! applies latitude climate adjustments, carves rivers from mountain
//! sources, stamps ancient-ruin landmarks, and answers site queries for
//! settlement and dungeon placement.

use crate::generation::noise::NoiseMap;
use crate::world::tiles::OverworldTile;
use crate::world::{Grid, Position};
use rand::rngs::StdRng;
use rand::Rng;

/// One row of the biome classification table.
///
/// Rows are evaluated top to bottom; the first row whose elevation band and
/// optional moisture/temperature windows all match wins. Bounds are
/// exclusive on both ends.
struct BiomeRule {
    min_elevation: f64,
    max_elevation: f64,
    moisture: Option<(f64, f64)>,
    temperature: Option<(f64, f64)>,
    biome: OverworldTile,
}

const INF: f64 = f64::INFINITY;

const BIOME_RULES: &[BiomeRule] = &[
    // Water band
    BiomeRule { min_elevation: -INF, max_elevation: 0.2, moisture: Some((0.7, INF)), temperature: None, biome: OverworldTile::Ocean },
    BiomeRule { min_elevation: -INF, max_elevation: 0.2, moisture: Some((0.4, INF)), temperature: None, biome: OverworldTile::Lake },
    BiomeRule { min_elevation: -INF, max_elevation: 0.2, moisture: None, temperature: None, biome: OverworldTile::River },
    // Mountains
    BiomeRule { min_elevation: 0.9, max_elevation: INF, moisture: None, temperature: None, biome: OverworldTile::HighMountains },
    BiomeRule { min_elevation: 0.8, max_elevation: INF, moisture: None, temperature: None, biome: OverworldTile::Mountains },
    // Hill band
    BiomeRule { min_elevation: 0.65, max_elevation: INF, moisture: Some((0.6, INF)), temperature: Some((0.4, INF)), biome: OverworldTile::ForestedHills },
    BiomeRule { min_elevation: 0.65, max_elevation: INF, moisture: Some((0.4, INF)), temperature: None, biome: OverworldTile::GrassyHills },
    BiomeRule { min_elevation: 0.65, max_elevation: INF, moisture: Some((-INF, 0.2)), temperature: Some((0.7, INF)), biome: OverworldTile::HighDesert },
    BiomeRule { min_elevation: 0.65, max_elevation: INF, moisture: Some((-INF, 0.3)), temperature: None, biome: OverworldTile::RockyHills },
    BiomeRule { min_elevation: 0.65, max_elevation: INF, moisture: None, temperature: None, biome: OverworldTile::Hills },
    // Elevated band
    BiomeRule { min_elevation: 0.5, max_elevation: INF, moisture: Some((-INF, 0.3)), temperature: Some((0.7, INF)), biome: OverworldTile::SandyDesert },
    BiomeRule { min_elevation: 0.5, max_elevation: INF, moisture: Some((0.7, INF)), temperature: Some((0.6, INF)), biome: OverworldTile::DenseJungle },
    BiomeRule { min_elevation: 0.5, max_elevation: INF, moisture: Some((0.5, INF)), temperature: Some((0.3, INF)), biome: OverworldTile::ConiferousForest },
    BiomeRule { min_elevation: 0.5, max_elevation: INF, moisture: Some((-INF, 0.3)), temperature: None, biome: OverworldTile::Wasteland },
    BiomeRule { min_elevation: 0.5, max_elevation: INF, moisture: None, temperature: None, biome: OverworldTile::DenseGrasslands },
    // Mid band
    BiomeRule { min_elevation: 0.3, max_elevation: INF, moisture: Some((-INF, 0.3)), temperature: Some((0.7, INF)), biome: OverworldTile::Desert },
    BiomeRule { min_elevation: 0.3, max_elevation: INF, moisture: Some((0.7, INF)), temperature: Some((0.6, INF)), biome: OverworldTile::Jungle },
    BiomeRule { min_elevation: 0.3, max_elevation: INF, moisture: Some((0.5, INF)), temperature: Some((0.3, 0.7)), biome: OverworldTile::DeciduousForest },
    BiomeRule { min_elevation: 0.3, max_elevation: INF, moisture: Some((0.3, INF)), temperature: None, biome: OverworldTile::Grasslands },
    BiomeRule { min_elevation: 0.3, max_elevation: INF, moisture: None, temperature: None, biome: OverworldTile::Barren },
    // Lowland band
    BiomeRule { min_elevation: -INF, max_elevation: INF, moisture: Some((0.8, INF)), temperature: None, biome: OverworldTile::Swamp },
    BiomeRule { min_elevation: -INF, max_elevation: INF, moisture: Some((0.4, INF)), temperature: None, biome: OverworldTile::Grasslands },
    BiomeRule { min_elevation: -INF, max_elevation: INF, moisture: None, temperature: None, biome: OverworldTile::Barren },
];

fn in_window(value: f64, window: Option<(f64, f64)>) -> bool {
    match window {
        Some((lo, hi)) => value > lo && value < hi,
        None => true,
    }
}

/// Six river-flow directions: the four cardinals plus southeast and
/// southwest, which biases rivers downhill on the map.
const RIVER_DIRECTIONS: [(i32, i32); 6] = [(0, 1), (1, 0), (0, -1), (-1, 0), (1, 1), (-1, 1)];

/// Generates overworld terrain and answers placement queries against it.
pub struct OverworldGenerator {
    width: u32,
    height: u32,
}

impl OverworldGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Produces the full terrain grid: biomes, climate zones, rivers, ruins.
    pub fn generate_terrain(&self, rng: &mut StdRng) -> Grid<OverworldTile> {
        let elevation = NoiseMap::generate(self.width, self.height, 20, 3, rng);
        let moisture = NoiseMap::generate(self.width, self.height, 16, 2, rng);
        let temperature = NoiseMap::generate(self.width, self.height, 24, 2, rng);

        let mut terrain = Grid::new(self.width, self.height, OverworldTile::Barren);
        for pos in terrain.positions().collect::<Vec<_>>() {
            let biome = classify_biome(
                elevation.value(pos),
                moisture.value(pos),
                temperature.value(pos),
                rng,
            );
            terrain.set(pos, biome);
        }

        self.apply_climate_zones(&mut terrain, rng);
        self.generate_rivers(&mut terrain, rng);
        self.place_ruins(&mut terrain, rng);

        log::debug!(
            "terrain generated: {} water tiles, {} mountain tiles",
            terrain.count_matching(|t| t.is_water()),
            terrain.count_matching(|t| t.is_mountain())
        );
        terrain
    }

    /// Northern fifth loses deserts and jungles; southern fifth may turn
    /// barren ground into desert.
    fn apply_climate_zones(&self, terrain: &mut Grid<OverworldTile>, rng: &mut StdRng) {
        for pos in terrain.positions().collect::<Vec<_>>() {
            let latitude = pos.y as f64 / self.height as f64;
            let Some(&tile) = terrain.get(pos) else { continue };

            if latitude < 0.2 {
                match tile {
                    OverworldTile::Desert | OverworldTile::SandyDesert | OverworldTile::HighDesert => {
                        let cold = if rng.gen::<f64>() > 0.5 {
                            OverworldTile::Barren
                        } else {
                            OverworldTile::Wasteland
                        };
                        terrain.set(pos, cold);
                    }
                    OverworldTile::Jungle | OverworldTile::DenseJungle => {
                        let forest = if rng.gen::<f64>() > 0.5 {
                            OverworldTile::DeciduousForest
                        } else {
                            OverworldTile::ConiferousForest
                        };
                        terrain.set(pos, forest);
                    }
                    _ => {}
                }
            } else if latitude > 0.8
                && matches!(tile, OverworldTile::Barren | OverworldTile::Wasteland)
                && rng.gen::<f64>() < 0.3
            {
                let hot = if rng.gen::<f64>() > 0.5 {
                    OverworldTile::Desert
                } else {
                    OverworldTile::SandyDesert
                };
                terrain.set(pos, hot);
            }
        }
    }

    /// Roughly a tenth of mountain tiles seed a river: a 10 to 30 step
    /// random walk that converts passable terrain to river tiles.
    fn generate_rivers(&self, terrain: &mut Grid<OverworldTile>, rng: &mut StdRng) {
        let sources: Vec<Position> = terrain
            .iter()
            .filter(|(_, t)| t.is_mountain())
            .map(|(pos, _)| pos)
            .collect::<Vec<_>>()
            .into_iter()
            .filter(|_| rng.gen::<f64>() < 0.1)
            .collect();

        for source in sources {
            let mut current = source;
            let length = rng.gen_range(10..=30);
            for _ in 0..length {
                let (dx, dy) = RIVER_DIRECTIONS[rng.gen_range(0..RIVER_DIRECTIONS.len())];
                let next = current + Position::new(dx, dy);
                let Some(&tile) = terrain.get(next) else { break };
                if !tile.blocks_river() {
                    terrain.set(next, OverworldTile::River);
                }
                current = next;
            }
        }
    }

    /// Stamps 2 to 5 cross-shaped ancient-ruin patches on forest or
    /// wasteland ground. Each patch gets a bounded number of site attempts.
    fn place_ruins(&self, terrain: &mut Grid<OverworldTile>, rng: &mut StdRng) {
        if self.width <= 10 || self.height <= 10 {
            return;
        }
        let count = rng.gen_range(2..=5);
        for _ in 0..count {
            for _attempt in 0..50 {
                let pos = Position::new(
                    rng.gen_range(5..self.width as i32 - 5),
                    rng.gen_range(5..self.height as i32 - 5),
                );
                let site = matches!(
                    terrain.get(pos),
                    Some(
                        OverworldTile::DeciduousForest
                            | OverworldTile::ConiferousForest
                            | OverworldTile::Wasteland
                            | OverworldTile::Barren
                    )
                );
                if site {
                    for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
                        terrain.set(pos + Position::new(dx, dy), OverworldTile::Barren);
                    }
                    break;
                }
            }
        }
    }

    /// Finds up to `count` settlement sites: suitable biome, 25-tile
    /// separation, and no water or mountains within 2 tiles of the center.
    /// Exhausting the attempt budget yields a shorter list.
    pub fn suitable_settlement_sites(
        &self,
        terrain: &Grid<OverworldTile>,
        count: usize,
        rng: &mut StdRng,
    ) -> Vec<Position> {
        let mut sites: Vec<Position> = Vec::new();
        let margin = 10;
        if self.width <= margin * 2 || self.height <= margin * 2 {
            return sites;
        }

        for _attempt in 0..crate::config::SITE_SEARCH_ATTEMPTS {
            if sites.len() >= count {
                break;
            }
            let pos = Position::new(
                rng.gen_range(margin as i32..(self.width - margin) as i32),
                rng.gen_range(margin as i32..(self.height - margin) as i32),
            );
            if !terrain.get(pos).is_some_and(|t| t.is_settlement_site()) {
                continue;
            }
            if sites.iter().any(|s| chebyshev(*s, pos) < 25) {
                continue;
            }

            let mut area_clear = true;
            'area: for dx in -2i32..=2 {
                for dy in -2i32..=2 {
                    if dx.abs() + dy.abs() > 2 {
                        continue;
                    }
                    let check = pos + Position::new(dx, dy);
                    if terrain
                        .get(check)
                        .is_some_and(|t| t.is_water() || t.is_mountain())
                    {
                        area_clear = false;
                        break 'area;
                    }
                }
            }
            if area_clear {
                sites.push(pos);
            }
        }

        if sites.len() < count {
            log::warn!(
                "settlement site search exhausted: found {} of {}",
                sites.len(),
                count
            );
        }
        sites
    }

    /// Finds up to `count` dungeon entrance sites in forest, hill, mountain,
    /// or swamp biomes with 15-tile separation.
    pub fn suitable_dungeon_sites(
        &self,
        terrain: &Grid<OverworldTile>,
        count: usize,
        rng: &mut StdRng,
    ) -> Vec<Position> {
        let mut sites: Vec<Position> = Vec::new();
        let margin = 5;
        if self.width <= margin * 2 || self.height <= margin * 2 {
            return sites;
        }

        for _attempt in 0..crate::config::SITE_SEARCH_ATTEMPTS {
            if sites.len() >= count {
                break;
            }
            let pos = Position::new(
                rng.gen_range(margin as i32..(self.width - margin) as i32),
                rng.gen_range(margin as i32..(self.height - margin) as i32),
            );
            if !terrain.get(pos).is_some_and(|t| t.is_dungeon_site()) {
                continue;
            }
            if sites.iter().any(|s| chebyshev(*s, pos) < 15) {
                continue;
            }
            sites.push(pos);
        }

        if sites.len() < count {
            log::warn!(
                "dungeon site search exhausted: found {} of {}",
                sites.len(),
                count
            );
        }
        sites
    }

    /// Expanding-radius scan near `anchor` for a road, settled-land, or
    /// grasslands tile. Falls back to the map center.
    pub fn find_start_position(
        &self,
        terrain: &Grid<OverworldTile>,
        anchor: Position,
    ) -> Position {
        for radius in 2i32..8 {
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    let pos = anchor + Position::new(dx, dy);
                    if matches!(
                        terrain.get(pos),
                        Some(
                            OverworldTile::Road
                                | OverworldTile::SettledLand
                                | OverworldTile::Grasslands
                        )
                    ) {
                        return pos;
                    }
                }
            }
        }
        Position::new(self.width as i32 / 2, self.height as i32 / 2)
    }
}

fn chebyshev(a: Position, b: Position) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Classifies one tile through the biome rule table. The swamp row is the
/// only random one: lowland swamps are deep about a third of the time.
fn classify_biome(
    elevation: f64,
    moisture: f64,
    temperature: f64,
    rng: &mut StdRng,
) -> OverworldTile {
    for rule in BIOME_RULES {
        if elevation > rule.min_elevation
            && elevation < rule.max_elevation
            && in_window(moisture, rule.moisture)
            && in_window(temperature, rule.temperature)
        {
            if rule.biome == OverworldTile::Swamp && rng.gen::<f64>() <= 0.3 {
                return OverworldTile::DeepSwamp;
            }
            return rule.biome;
        }
    }
    OverworldTile::Barren
}

//! # Generation Module
//!
//! All procedural generators: noise terrain, biome classification, rivers,
//! settlements with buildings and roads, building interiors, classic
//! room-corridor dungeons, and the Wave Function Collapse dungeon engine with
//! its themed pattern libraries.
//!
//! Every generator draws from a single seeded rng created by
//! [`utils::create_rng`], in a fixed order, so a config's seed fully
//! determines the world.

pub mod dungeon;
pub mod interior;
pub mod items;
pub mod noise;
pub mod overworld;
pub mod settlement;
pub mod themes;
pub mod wfc;

pub use dungeon::ClassicDungeonGenerator;
pub use interior::{InteriorGenerator, InteriorLayout};
pub use items::{random_item, Item, ItemKind};
pub use noise::NoiseMap;
pub use overworld::OverworldGenerator;
pub use settlement::SettlementGenerator;
pub use themes::{Theme, ThematicWfcGenerator};
pub use wfc::{WfcDungeonGenerator, WfcTile};

use serde::{Deserialize, Serialize};

/// Which dungeon generator the world uses, and with what theme flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DungeonStyle {
    /// Room-and-corridor generator with themed room flavor.
    Classic(Theme),
    /// Wave Function Collapse over the theme's pattern set.
    Wfc(Theme),
}

/// Configuration parameters for world generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Seed for deterministic generation.
    pub seed: u64,
    /// Overworld dimensions in tiles.
    pub world_width: u32,
    pub world_height: u32,
    /// Dungeon level dimensions in tiles.
    pub dungeon_width: u32,
    pub dungeon_height: u32,
    /// Upper bound on founded settlements.
    pub max_settlements: usize,
    /// Room size range for the classic dungeon generator.
    pub min_room_size: u32,
    pub max_room_size: u32,
    /// Placement attempts for the classic dungeon generator.
    pub max_rooms: usize,
    pub dungeon_style: DungeonStyle,
}

impl GenerationConfig {
    /// Default parameters with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            world_width: crate::config::DEFAULT_WORLD_WIDTH,
            world_height: crate::config::DEFAULT_WORLD_HEIGHT,
            dungeon_width: 50,
            dungeon_height: 50,
            max_settlements: 4,
            min_room_size: 5,
            max_room_size: 12,
            max_rooms: 30,
            dungeon_style: DungeonStyle::Classic(Theme::ClassicDungeon),
        }
    }

    /// Small dimensions for fast tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            world_width: 48,
            world_height: 48,
            dungeon_width: 30,
            dungeon_height: 30,
            max_settlements: 2,
            min_room_size: 4,
            max_room_size: 8,
            max_rooms: 10,
            dungeon_style: DungeonStyle::Classic(Theme::ClassicDungeon),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Shared generation helpers.
pub mod utils {
    use super::GenerationConfig;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Creates the seeded rng every generator draws from.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Picks an index in proportion to the given weights.
    ///
    /// Zero or negative total weight falls back to the last index, so the
    /// pick is total for non-empty slices.
    pub fn weighted_pick(weights: &[f64], rng: &mut StdRng) -> usize {
        debug_assert!(!weights.is_empty());
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return weights.len() - 1;
        }
        let mut roll = rng.gen::<f64>() * total;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            roll -= w;
            if roll <= 0.0 {
                return i;
            }
        }
        weights.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.world_width, 150);
        assert!(config.min_room_size < config.max_room_size);
    }

    #[test]
    fn test_create_rng_is_deterministic() {
        use rand::Rng;
        let config = GenerationConfig::for_testing(7);
        let mut a = utils::create_rng(&config);
        let mut b = utils::create_rng(&config);
        let xs: Vec<u32> = (0..8).map(|_| a.gen()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_weighted_pick_respects_zero_weights() {
        let config = GenerationConfig::for_testing(1);
        let mut rng = utils::create_rng(&config);
        for _ in 0..100 {
            let idx = utils::weighted_pick(&[0.0, 1.0, 0.0], &mut rng);
            assert_eq!(idx, 1);
        }
    }

    #[test]
    fn test_weighted_pick_frequency() {
        let config = GenerationConfig::for_testing(2);
        let mut rng = utils::create_rng(&config);
        let weights = [0.1, 0.9];
        let mut counts = [0usize; 2];
        for _ in 0..2000 {
            counts[utils::weighted_pick(&weights, &mut rng)] += 1;
        }
        assert!(counts[1] > counts[0] * 4);
    }
}

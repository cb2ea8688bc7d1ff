//! Property-based tests for the generation layer: noise normalization and
//! totality of the world query surface.

use emberfell::{GenerationConfig, LocationKind, NoiseMap, Position, World};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::OnceLock;

/// One shared world so each property case does not regenerate from scratch.
fn shared_world() -> &'static World {
    static WORLD: OnceLock<World> = OnceLock::new();
    WORLD.get_or_init(|| World::generate(GenerationConfig::for_testing(2024)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Noise maps are min-max normalized: all values in [0, 1], and the
    /// extremes are actually reached.
    #[test]
    fn noise_spans_unit_interval(seed in any::<u64>(), feature_size in 4u32..32) {
        let mut rng = StdRng::seed_from_u64(seed);
        let map = NoiseMap::generate(40, 40, feature_size, 3, &mut rng);

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for y in 0..40 {
            for x in 0..40 {
                let v = map.value(Position::new(x, y));
                prop_assert!((0.0..=1.0).contains(&v));
                min = min.min(v);
                max = max.max(v);
            }
        }
        prop_assert!(min.abs() < 1e-9);
        prop_assert!((max - 1.0).abs() < 1e-9);
    }

    /// Every query is total: any coordinate in any location answers without
    /// panicking, out of bounds included.
    #[test]
    fn world_queries_are_total(x in -100i32..200, y in -100i32..200) {
        let world = shared_world();
        for location in [LocationKind::Overworld, LocationKind::Dungeon] {
            let info = world.tile_render_info(x, y, location);
            prop_assert!(!info.name.is_empty());
            let _ = world.is_solid(x, y, location);
            prop_assert!(!world.biome(x, y, location).is_empty());
            let _ = world.description(x, y, location);
            let _ = world.action_prompt(x, y, location);
        }
    }

    /// Out-of-bounds tiles are solid in every location.
    #[test]
    fn out_of_bounds_is_solid(offset in 1i32..50) {
        let world = shared_world();
        let x = world.terrain().width() as i32 + offset;
        prop_assert!(world.is_solid(x, 0, LocationKind::Overworld));
        prop_assert!(world.is_solid(-offset, 0, LocationKind::Overworld));
        prop_assert!(world.is_solid(x, 0, LocationKind::Dungeon));
    }

    /// Repeated queries against an unchanged world agree with themselves.
    #[test]
    fn queries_are_idempotent(x in 0i32..48, y in 0i32..48) {
        let world = shared_world();
        let first = world.tile_render_info(x, y, LocationKind::Overworld);
        let second = world.tile_render_info(x, y, LocationKind::Overworld);
        prop_assert_eq!(first, second);
    }
}

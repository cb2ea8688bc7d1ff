//! # Value Noise
//!
//! Multi-octave value noise used for elevation, moisture, and temperature
//! fields. Each octave lays down a coarse random lattice and bilinearly
//! upsamples it; octaves halve in amplitude as their lattice spacing doubles.
//! The summed field is min-max normalized, so every map spans [0, 1] exactly
//! and biome thresholds stay meaningful at any world size.

use crate::world::{Grid, Position};
use rand::rngs::StdRng;
use rand::Rng;

/// A normalized 2D noise field.
#[derive(Debug, Clone)]
pub struct NoiseMap {
    values: Grid<f64>,
}

impl NoiseMap {
    /// Generates a noise map.
    ///
    /// `feature_size` is the base lattice spacing in tiles; each further
    /// octave doubles the spacing and halves the amplitude.
    pub fn generate(
        width: u32,
        height: u32,
        feature_size: u32,
        octaves: u32,
        rng: &mut StdRng,
    ) -> Self {
        let mut values = Grid::new(width, height, 0.0f64);

        for octave in 0..octaves {
            let octave_size = (feature_size * (1 << octave)).max(1);
            let amplitude = 1.0 / (1 << octave) as f64;

            let low_w = (width / octave_size + 2) as usize;
            let low_h = (height / octave_size + 2) as usize;
            let lattice: Vec<Vec<f64>> = (0..low_h)
                .map(|_| (0..low_w).map(|_| rng.gen::<f64>()).collect())
                .collect();

            for y in 0..height {
                for x in 0..width {
                    let map_x = x as f64 / octave_size as f64;
                    let map_y = y as f64 / octave_size as f64;
                    let x1 = map_x as usize;
                    let y1 = map_y as usize;
                    let fx = map_x - x1 as f64;
                    let fy = map_y - y1 as f64;

                    let v1 = lattice[y1][x1];
                    let v2 = lattice[y1][x1 + 1];
                    let v3 = lattice[y1 + 1][x1];
                    let v4 = lattice[y1 + 1][x1 + 1];

                    let top = v1 * (1.0 - fx) + v2 * fx;
                    let bottom = v3 * (1.0 - fx) + v4 * fx;
                    let value = top * (1.0 - fy) + bottom * fy;

                    let pos = Position::new(x as i32, y as i32);
                    if let Some(cell) = values.get_mut(pos) {
                        *cell += value * amplitude;
                    }
                }
            }
        }

        normalize(&mut values);
        Self { values }
    }

    pub fn width(&self) -> u32 {
        self.values.width()
    }

    pub fn height(&self) -> u32 {
        self.values.height()
    }

    /// Value at a position; out of bounds reads 0.0.
    pub fn value(&self, pos: Position) -> f64 {
        self.values.get(pos).copied().unwrap_or(0.0)
    }
}

/// Rescales all cells so the minimum maps to 0.0 and the maximum to 1.0.
/// A constant field is left untouched.
fn normalize(values: &mut Grid<f64>) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, &v) in values.iter() {
        min = min.min(v);
        max = max.max(v);
    }
    if max <= min {
        return;
    }
    let range = max - min;
    let positions: Vec<Position> = values.positions().collect();
    for pos in positions {
        if let Some(cell) = values.get_mut(pos) {
            *cell = (*cell - min) / range;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{utils, GenerationConfig};

    #[test]
    fn test_noise_is_normalized() {
        let mut rng = utils::create_rng(&GenerationConfig::for_testing(3));
        let noise = NoiseMap::generate(64, 64, 16, 2, &mut rng);

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for y in 0..64 {
            for x in 0..64 {
                let v = noise.value(Position::new(x, y));
                assert!((0.0..=1.0).contains(&v));
                min = min.min(v);
                max = max.max(v);
            }
        }
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_noise_is_deterministic() {
        let config = GenerationConfig::for_testing(9);
        let mut rng_a = utils::create_rng(&config);
        let mut rng_b = utils::create_rng(&config);
        let a = NoiseMap::generate(32, 32, 8, 3, &mut rng_a);
        let b = NoiseMap::generate(32, 32, 8, 3, &mut rng_b);
        for y in 0..32 {
            for x in 0..32 {
                let pos = Position::new(x, y);
                assert_eq!(a.value(pos), b.value(pos));
            }
        }
    }

    #[test]
    fn test_out_of_bounds_reads_zero() {
        let mut rng = utils::create_rng(&GenerationConfig::for_testing(1));
        let noise = NoiseMap::generate(8, 8, 4, 1, &mut rng);
        assert_eq!(noise.value(Position::new(-1, 0)), 0.0);
        assert_eq!(noise.value(Position::new(8, 8)), 0.0);
    }
}

//! Seeded 3D gradient noise.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of distinct lattice hashes. Lattice coordinates wrap modulo this value.
const TABLE_SIZE: usize = 256;

/// Smooth, seed-deterministic gradient (Perlin) noise over unbounded 3D coordinates.
///
/// Each instance owns its permutation table, so fields built from different seeds
/// are fully independent and can be shared read-only across threads.
///
/// The table is derived from the seed with a Fisher–Yates shuffle of `0..=255`,
/// walking from index 255 down to 1 and swapping with `next_u64() % (i + 1)` drawn from
/// [`ChaCha8Rng::seed_from_u64`] with the seed widened to `u64`. ChaCha output is stable
/// across `rand_chacha` releases, so a seed always yields the same table. The 256 entries
/// are then repeated once so corner lookups never need a modulo.
#[derive(Clone)]
pub struct NoiseField {
    seed: u32,
    perm: [u8; TABLE_SIZE * 2],
}

impl NoiseField {
    /// Builds the permutation table for `seed`.
    pub fn new(seed: u32) -> Self {
        let mut table: [u8; TABLE_SIZE] = std::array::from_fn(|i| i as u8);
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
        for i in (1..TABLE_SIZE).rev() {
            let j = (rng.next_u64() % (i as u64 + 1)) as usize;
            table.swap(i, j);
        }

        let perm = std::array::from_fn(|i| table[i % TABLE_SIZE]);
        Self { seed, perm }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Samples the field at `(x, y, z)`.
    ///
    /// Output is roughly within [-1, 1] and is exactly 0 on integer lattice points.
    /// The field repeats every 256 units along each axis.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let (xi, yi, zi) = (lattice(xf), lattice(yf), lattice(zf));

        let (x, y, z) = (x - xf, y - yf, z - zf);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(u, grad(p[ab], x, y - 1.0, z), grad(p[bb], x - 1.0, y - 1.0, z)),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }

    #[cfg(test)]
    fn table(&self) -> &[u8] {
        &self.perm
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

/// Lattice cell index wrapped into the permutation table.
///
/// `rem_euclid` on the float is exact for every finite value, including magnitudes an
/// integer cast would saturate.
fn lattice(floored: f64) -> usize {
    floored.rem_euclid(TABLE_SIZE as f64) as usize
}

/// Quintic fade `6t^5 - 15t^4 + 10t^3`.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of `(x, y, z)` with one of the 12 cube-edge gradients picked by `hash`.
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_permutation_is_bijection() {
        for seed in [0, 1, 42, 237, u32::MAX] {
            let field = NoiseField::new(seed);
            let mut seen = [false; TABLE_SIZE];
            for &entry in &field.table()[..TABLE_SIZE] {
                assert!(!seen[entry as usize], "seed {seed} repeats {entry}");
                seen[entry as usize] = true;
            }
            assert_eq!(&field.table()[..TABLE_SIZE], &field.table()[TABLE_SIZE..]);
        }
    }

    #[test]
    fn test_known_permutation_prefix() {
        let field = NoiseField::new(237);
        assert_eq!(
            &field.table()[..8],
            &[72, 15, 27, 47, 32, 210, 123, 187]
        );
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = NoiseField::new(237);
        let b = NoiseField::new(237);
        for &(x, y, z) in &[(0.5, 0.25, 0.8), (1.7, -3.2, 12.25), (-1e6 + 0.3, 7.1, 0.8)] {
            assert_eq!(a.sample(x, y, z).to_bits(), a.sample(x, y, z).to_bits());
            assert_eq!(a.sample(x, y, z).to_bits(), b.sample(x, y, z).to_bits());
        }
    }

    #[test]
    fn test_reference_values() {
        let field = NoiseField::new(237);
        assert_eq!(field.sample(0.5, 0.25, 0.8), -0.49577637499999994);
        assert_eq!(field.sample(1.7, -3.2, 12.25), -0.1352655621037501);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..32).any(|i| {
            let x = i as f64 * 0.37 + 0.1;
            a.sample(x, 0.5, 0.8) != b.sample(x, 0.5, 0.8)
        });
        assert!(differs);
    }

    #[test]
    fn test_zero_on_lattice_points() {
        let field = NoiseField::new(237);
        for &(x, y, z) in &[(0.0, 0.0, 0.0), (3.0, 4.0, 5.0), (-12.0, 255.0, 256.0)] {
            assert_eq!(field.sample(x, y, z), 0.0);
        }
    }

    #[test]
    fn test_bounded_output() {
        let field = NoiseField::new(237);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50_000 {
            let x = rng.gen_range(-1.0e4..1.0e4);
            let y = rng.gen_range(-1.0e4..1.0e4);
            let z = rng.gen_range(-1.0e4..1.0e4);
            let value = field.sample(x, y, z);
            assert!((-1.2..=1.2).contains(&value), "{value} at ({x}, {y}, {z})");
        }
    }

    #[test]
    fn test_difference_shrinks_with_epsilon() {
        let field = NoiseField::new(237);
        for &(x, y, z) in &[(0.3, 0.7, 0.8), (12.41, -3.3, 0.8), (-7.9, 2.2, 5.5)] {
            let base = field.sample(x, y, z);
            let diffs: Vec<f64> = [1e-3, 1e-4, 1e-5, 1e-6]
                .iter()
                .map(|eps| (field.sample(x + eps, y, z) - base).abs())
                .collect();
            for pair in diffs.windows(2) {
                assert!(pair[1] < pair[0], "{diffs:?} at ({x}, {y}, {z})");
            }
        }
    }

    #[test]
    fn test_continuous_across_cell_boundaries() {
        let field = NoiseField::new(237);
        let d = 1e-9;
        for k in [1.0, 2.0, -3.0, 255.0, 256.0] {
            assert!((field.sample(k - d, 0.4, 0.8) - field.sample(k + d, 0.4, 0.8)).abs() < 1e-6);
            assert!((field.sample(0.3, k - d, 0.8) - field.sample(0.3, k + d, 0.8)).abs() < 1e-6);
            assert!((field.sample(0.3, 0.6, k - d) - field.sample(0.3, 0.6, k + d)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_large_coordinates_wrap() {
        let field = NoiseField::new(237);
        let base = field.sample(1.25, 2.5, 0.8);
        assert_eq!(base, field.sample(1.25 + 256.0, 2.5, 0.8));
        assert_eq!(base, field.sample(1.25 + 256.0e6, 2.5, 0.8));
        assert_eq!(base, field.sample(1.25 - 512.0, 2.5, 0.8));
    }

    #[test]
    fn test_huge_coordinates_hash_by_modulo() {
        let field = NoiseField::new(237);
        let origin = field.sample(0.0, 0.3, 0.7);
        assert_eq!(origin, -0.3875609136);
        // Multiples of 256 at or beyond the edge of the i64 range.
        for x in [1.0e20, -1.0e20, 2f64.powi(70), -(2f64.powi(63))] {
            assert_eq!(field.sample(x, 0.3, 0.7), origin, "x = {x}");
        }
        assert_eq!(field.sample(0.3, 1.0e20, 0.7), field.sample(0.3, 0.0, 0.7));
        assert_eq!(field.sample(0.3, 0.7, -1.0e20), field.sample(0.3, 0.7, 0.0));
    }

    #[test]
    fn test_lattice_wraps_negative_cells() {
        assert_eq!(lattice(-1.0), 255);
        assert_eq!(lattice(-256.0), 0);
        assert_eq!(lattice(-3.0), 253);
        assert_eq!(lattice(511.0), 255);
        assert_eq!(lattice(1.0e20), 0);
    }
}

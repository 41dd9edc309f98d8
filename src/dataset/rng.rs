//! Seeded pseudo-random source for the dataset generators.
//!
//! A 64-bit linear congruential generator (Knuth's MMIX constants). It is not meant to
//! be statistically strong, only cheap and bit-reproducible: the same seed always
//! yields the same sequence on every platform.

use rand::rand_core::{impls, RngCore};

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1_442_695_040_888_963_407;

/// Deterministic uniform/Gaussian source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn advance(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform draw in `[0, 1)`.
    ///
    /// Uses the top 53 bits of the state; the low bits of an LCG have short periods.
    pub fn uniform(&mut self) -> f64 {
        (self.advance() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform draw in `[low, high)`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.uniform() * (high - low)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.uniform() * len as f64) as usize).min(len - 1)
    }

    /// Normal draw via the Box-Muller transform on two uniform draws.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // u1 == 0 would send ln() to -inf.
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z0 * std_dev + mean
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.advance() >> 32;
        let lo = self.advance() >> 32;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(1001);
        let mut b = SeededRng::new(1001);
        for _ in 0..100 {
            assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRng::new(1001);
        let mut b = SeededRng::new(1002);
        let xs: Vec<f64> = (0..8).map(|_| a.uniform()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.uniform()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn uniform_stays_in_unit_interval() {
        let mut rng = SeededRng::new(7);
        for _ in 0..10_000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn index_in_bounds() {
        let mut rng = SeededRng::new(3);
        for _ in 0..1000 {
            assert!(rng.index(4) < 4);
        }
    }

    #[test]
    fn gaussian_mean_is_close() {
        let mut rng = SeededRng::new(11);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.gaussian(50.0, 10.0)).sum::<f64>() / n as f64;
        assert!((mean - 50.0).abs() < 0.5, "mean = {mean}");
    }
}

//! Seeded Gaussian sample source
//!
//! Uses Box-Muller transform for Gaussian samples.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Map a user seed to an RNG seed; negative values draw from system entropy.
pub fn resolve_seed(seed: i64) -> u64 {
    if seed < 0 {
        rand::thread_rng().gen()
    } else {
        seed as u64
    }
}

/// Unit-variance, zero-mean Gaussian generator
pub struct GaussianSource {
    rng: ChaCha8Rng,

    /// Cached second sample from Box-Muller
    cached: Option<f64>,
}

impl GaussianSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            cached: None,
        }
    }

    /// Restart the stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.cached = None;
    }

    /// Generate next standard normal sample using Box-Muller transform
    pub fn next_sample(&mut self) -> f32 {
        if let Some(cached) = self.cached.take() {
            return cached as f32;
        }

        let u1: f64 = self.rng.gen();
        let u2: f64 = self.rng.gen();

        // Avoid log(0)
        let u1 = u1.max(1e-10);

        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;

        self.cached = Some(r * theta.sin());
        (r * theta.cos()) as f32
    }
}

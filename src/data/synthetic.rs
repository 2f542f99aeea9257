// ============================================================
// Layer 4 — Synthetic Sample Source
// ============================================================
// Generates a small, linearly separable classification problem so a
// fresh project can exercise the whole pipeline before real data
// is wired in.
//
// Class k puts a bump of height 1.0 on every feature j where
// j % num_classes == k, then uniform noise is added:
//
//   x_j = [j % C == k] + U(-noise, noise)

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::sample::ClassificationSample;
use crate::domain::traits::SampleSource;

const DEFAULT_NOISE: f32 = 0.3;

pub struct SyntheticSource {
    samples:      usize,
    num_features: usize,
    num_classes:  usize,
    noise:        f32,
    seed:         u64,
}

impl SyntheticSource {
    pub fn new(samples: usize, num_features: usize, num_classes: usize, seed: u64) -> Self {
        Self { samples, num_features, num_classes, noise: DEFAULT_NOISE, seed }
    }
}

impl SampleSource for SyntheticSource {
    fn load_all(&self) -> Result<Vec<ClassificationSample>> {
        ensure!(self.num_classes > 0, "synthetic data needs at least one class");

        let mut rng = StdRng::seed_from_u64(self.seed);

        let samples = (0..self.samples)
            .map(|i| {
                let label = i % self.num_classes;
                let features = (0..self.num_features)
                    .map(|j| {
                        let bump: f32 = if j % self.num_classes == label { 1.0 } else { 0.0 };
                        let jitter = if self.noise > 0.0 {
                            rng.gen_range(-self.noise..self.noise)
                        } else {
                            0.0
                        };
                        bump + jitter
                    })
                    .collect();
                ClassificationSample::new(features, label)
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "Generated {} synthetic samples ({} features, {} classes)",
            samples.len(),
            self.num_features,
            self.num_classes
        );
        Ok(samples)
    }

    fn describe(&self) -> String {
        format!("synthetic blobs (n={}, seed={})", self.samples, self.seed)
    }
}

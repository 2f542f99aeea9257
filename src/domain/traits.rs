// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so a project
// can plug in its own data pipeline without touching the training
// loop.

use anyhow::Result;
use crate::domain::sample::ClassificationSample;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled training samples.
///
/// Implementations:
///   - CsvSampleLoader → rows of `label,f1,...,fN` from a file
///   - SyntheticSource → seeded, class-separable blobs
pub trait SampleSource {
    /// Load every available sample from this source.
    fn load_all(&self) -> Result<Vec<ClassificationSample>>;

    /// Short human-readable description used in logs
    fn describe(&self) -> String;
}

// ─── ScalarSink ───────────────────────────────────────────────────────────────
/// Anything that records scalar time series (loss, accuracy) per step.
pub trait ScalarSink {
    fn add_scalar(&mut self, tag: &str, value: f64, step: usize) -> Result<()>;
}

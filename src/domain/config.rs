// ============================================================
// Layer 3 — Project Configuration
// ============================================================
// Mirrors the layout of config.yaml:
//
//   project:  { name }
//   training: { batch_size, epochs, learning_rate, seed, checkpoint_every }
//   model:    { input_size, hidden_size, num_classes }
//   data:     { source, ..., val_fraction, num_workers }
//   output:   { models_dir, runs_dir }
//   device:   auto | cpu | gpu
//
// Only the three training keys (batch_size, epochs, learning_rate)
// are required. Every other section falls back to its Default impl
// through #[serde(default)].

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::device::DeviceKind;

/// Everything a training run needs to know, as loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,

    pub training: TrainingSection,

    #[serde(default)]
    pub model: ModelSection,

    #[serde(default)]
    pub data: DataSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub device: DeviceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Shown in the start-up banner
    pub name: String,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self { name: "experiment".to_string() }
    }
}

/// Optimisation hyperparameters. The first three fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSection {
    pub batch_size:    usize,
    pub epochs:        usize,
    pub learning_rate: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// A checkpoint is written whenever `epoch % checkpoint_every == 0`
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,
}

fn default_seed() -> u64 {
    42
}

fn default_checkpoint_every() -> usize {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub input_size:  usize,
    pub hidden_size: usize,
    pub num_classes: usize,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self { input_size: 784, hidden_size: 256, num_classes: 10 }
    }
}

/// Where training samples come from.
///
/// `none` keeps the scaffold runnable before any data is wired in:
/// epochs tick over, checkpoints are written, but no batches run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    None,
    Csv {
        path: PathBuf,
        #[serde(default)]
        has_headers: bool,
    },
    Synthetic {
        #[serde(default = "default_synthetic_samples")]
        samples: usize,
    },
}

fn default_synthetic_samples() -> usize {
    1024
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataSection")]
pub struct DataSection {
    #[serde(flatten)]
    pub source: DataSource,

    /// Fraction of samples held out for validation; 0 disables validation
    pub val_fraction: f64,

    pub num_workers: usize,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SourceKind {
    #[default]
    None,
    Csv,
    Synthetic,
}

/// `data:` as written in YAML. A missing `source` means `none`.
#[derive(Deserialize)]
struct RawDataSection {
    #[serde(default)]
    source: SourceKind,
    path: Option<PathBuf>,
    #[serde(default)]
    has_headers: bool,
    #[serde(default = "default_synthetic_samples")]
    samples: usize,
    #[serde(default)]
    val_fraction: f64,
    #[serde(default = "default_num_workers")]
    num_workers: usize,
}

impl TryFrom<RawDataSection> for DataSection {
    type Error = String;

    fn try_from(raw: RawDataSection) -> std::result::Result<Self, Self::Error> {
        let source = match raw.source {
            SourceKind::None => DataSource::None,
            SourceKind::Csv => DataSource::Csv {
                path: raw.path.ok_or("data.path is required when source is csv")?,
                has_headers: raw.has_headers,
            },
            SourceKind::Synthetic => DataSource::Synthetic { samples: raw.samples },
        };
        Ok(Self { source, val_fraction: raw.val_fraction, num_workers: raw.num_workers })
    }
}

fn default_num_workers() -> usize {
    1
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            source:       DataSource::None,
            val_fraction: 0.0,
            num_workers:  default_num_workers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub models_dir: PathBuf,
    pub runs_dir:   PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            runs_dir:   PathBuf::from("runs/experiment_1"),
        }
    }
}

/// Command-line values that take precedence over the YAML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub epochs:        Option<usize>,
    pub batch_size:    Option<usize>,
    pub learning_rate: Option<f64>,
    pub device:        Option<DeviceKind>,
    pub models_dir:    Option<PathBuf>,
    pub runs_dir:      Option<PathBuf>,
}

impl ProjectConfig {
    /// Reject values that would make the training loop meaningless.
    pub fn validate(&self) -> Result<()> {
        let t = &self.training;
        ensure!(t.batch_size > 0, "training.batch_size must be greater than 0");
        ensure!(t.epochs > 0, "training.epochs must be greater than 0");
        ensure!(
            t.learning_rate.is_finite() && t.learning_rate > 0.0,
            "training.learning_rate must be a positive number, got {}",
            t.learning_rate
        );
        ensure!(
            t.checkpoint_every > 0,
            "training.checkpoint_every must be greater than 0"
        );

        let m = &self.model;
        ensure!(
            m.input_size > 0 && m.hidden_size > 0 && m.num_classes > 0,
            "model dimensions must all be greater than 0 (got {}/{}/{})",
            m.input_size,
            m.hidden_size,
            m.num_classes
        );

        let d = &self.data;
        ensure!(
            (0.0..1.0).contains(&d.val_fraction),
            "data.val_fraction must be in [0, 1), got {}",
            d.val_fraction
        );
        if let DataSource::Synthetic { samples } = d.source {
            ensure!(samples > 0, "data.samples must be greater than 0");
        }

        Ok(())
    }

    /// Fold command-line overrides into this config.
    pub fn apply_overrides(&mut self, o: ConfigOverrides) {
        if let Some(v) = o.epochs        { self.training.epochs = v; }
        if let Some(v) = o.batch_size    { self.training.batch_size = v; }
        if let Some(v) = o.learning_rate { self.training.learning_rate = v; }
        if let Some(v) = o.device        { self.device = v; }
        if let Some(v) = o.models_dir    { self.output.models_dir = v; }
        if let Some(v) = o.runs_dir      { self.output.runs_dir = v; }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ProjectConfig {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    const MINIMAL: &str = "
training:
  batch_size: 64
  epochs: 20
  learning_rate: 0.001
";

    #[test]
    fn test_minimal_config_gets_defaults() {
        let cfg = parse(MINIMAL);
        assert_eq!(cfg.training.batch_size, 64);
        assert_eq!(cfg.training.epochs, 20);
        assert_eq!(cfg.training.seed, 42);
        assert_eq!(cfg.training.checkpoint_every, 10);
        assert_eq!(cfg.model, ModelSection::default());
        assert_eq!(cfg.data.source, DataSource::None);
        assert_eq!(cfg.output.models_dir, PathBuf::from("models"));
        assert_eq!(cfg.output.runs_dir, PathBuf::from("runs/experiment_1"));
        assert_eq!(cfg.device, DeviceKind::Auto);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_missing_training_key_is_an_error() {
        let yaml = "training:\n  batch_size: 64\n  epochs: 20\n";
        let err = serde_yaml::from_str::<ProjectConfig>(yaml).unwrap_err();
        assert!(err.to_string().contains("learning_rate"));
    }

    #[test]
    fn test_csv_source_is_tagged() {
        let cfg = parse(&format!(
            "{MINIMAL}data:\n  source: csv\n  path: data/train.csv\n  val_fraction: 0.2\n"
        ));
        assert_eq!(
            cfg.data.source,
            DataSource::Csv { path: PathBuf::from("data/train.csv"), has_headers: false }
        );
        assert_eq!(cfg.data.val_fraction, 0.2);
        assert_eq!(cfg.data.num_workers, 1);
    }

    #[test]
    fn test_synthetic_source_default_samples() {
        let cfg = parse(&format!("{MINIMAL}data:\n  source: synthetic\n"));
        assert_eq!(cfg.data.source, DataSource::Synthetic { samples: 1024 });
    }

    #[test]
    fn test_data_block_without_source_means_none() {
        let cfg = parse(&format!("{MINIMAL}data:\n  val_fraction: 0.2\n  num_workers: 4\n"));
        assert_eq!(cfg.data.source, DataSource::None);
        assert_eq!(cfg.data.val_fraction, 0.2);
        assert_eq!(cfg.data.num_workers, 4);
    }

    #[test]
    fn test_csv_source_requires_path() {
        let yaml = format!("{MINIMAL}data:\n  source: csv\n");
        let err = serde_yaml::from_str::<ProjectConfig>(&yaml).unwrap_err();
        assert!(err.to_string().contains("data.path"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut cfg = parse(MINIMAL);
        cfg.training.batch_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_non_positive_learning_rate_rejected() {
        let mut cfg = parse(MINIMAL);
        cfg.training.learning_rate = 0.0;
        assert!(cfg.validate().is_err());
        cfg.training.learning_rate = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_val_fraction_must_leave_training_data() {
        let mut cfg = parse(MINIMAL);
        cfg.data.val_fraction = 1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut cfg = parse(MINIMAL);
        cfg.apply_overrides(ConfigOverrides {
            epochs: Some(3),
            learning_rate: Some(0.1),
            device: Some(DeviceKind::Cpu),
            ..Default::default()
        });
        assert_eq!(cfg.training.epochs, 3);
        assert_eq!(cfg.training.batch_size, 64);
        assert_eq!(cfg.training.learning_rate, 0.1);
        assert_eq!(cfg.device, DeviceKind::Cpu);
    }
}

// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run:
//
//   Step 1: Load + validate config.yaml      (Layer 6 - infra)
//   Step 2: Apply command-line overrides     (Layer 3 - domain)
//   Step 3: Resolve the compute device       (Layer 3 - domain)
//   Step 4: Load samples, split train/val    (Layer 4 - data)
//   Step 5: Open checkpoint dir + event log  (Layer 6 - infra)
//   Step 6: Run the epoch loop on a backend  (Layer 5 - ml)

use anyhow::{bail, Result};
use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use std::path::PathBuf;

use crate::data::{
    dataset::ClassificationDataset,
    loader::CsvSampleLoader,
    splitter::split_train_val,
    synthetic::SyntheticSource,
};
use crate::domain::{
    config::{ConfigOverrides, DataSource, ProjectConfig},
    device::ResolvedDevice,
    traits::SampleSource,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    config_loader::load_config,
    event_writer::ScalarWriter,
};
use crate::ml::trainer::{run_training, TrainingInputs, TrainingSummary};

/// What the `train` command asked for.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub config_path: PathBuf,
    pub overrides:   ConfigOverrides,
    pub resume:      bool,
}

pub struct TrainUseCase {
    options: TrainOptions,
}

impl TrainUseCase {
    pub fn new(options: TrainOptions) -> Self {
        Self { options }
    }

    /// Load the config file and fold in command-line overrides.
    pub fn resolve_config(&self) -> Result<ProjectConfig> {
        let mut cfg = load_config(&self.options.config_path)?;
        cfg.apply_overrides(self.options.overrides.clone());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingSummary> {
        let cfg = self.resolve_config()?;

        println!("{}", "=".repeat(50));
        println!("Training {}", cfg.project.name);
        println!("{}", "=".repeat(50));

        let device = cfg.device.resolve()?;
        println!("Using device: {device}");
        tracing::info!("Requested device {:?}, running on {}", cfg.device, device);

        let (train, valid) = load_datasets(&cfg)?;

        let checkpoint = CheckpointManager::new(&cfg.output.models_dir)?;
        let mut events = ScalarWriter::new(&cfg.output.runs_dir)?;

        let inputs = TrainingInputs {
            cfg:        &cfg,
            train,
            valid,
            checkpoint: &checkpoint,
            events:     &mut events,
            resume:     self.options.resume,
        };

        let summary = match device {
            ResolvedDevice::Cpu => {
                run_training::<Autodiff<NdArray>>(inputs, NdArrayDevice::default())?
            }
            #[cfg(feature = "gpu")]
            ResolvedDevice::Gpu => {
                use burn::backend::{wgpu::WgpuDevice, Wgpu};
                run_training::<Autodiff<Wgpu>>(inputs, WgpuDevice::default())?
            }
            #[cfg(not(feature = "gpu"))]
            ResolvedDevice::Gpu => bail!("this build has no GPU backend"),
        };

        events.close()?;
        tracing::info!(
            "Event log written to '{}'",
            cfg.output.runs_dir.join("scalars.csv").display()
        );

        println!("\nTraining complete!");
        Ok(summary)
    }
}

/// Pick the sample source named by `data.source`, if any.
pub fn sample_source(cfg: &ProjectConfig) -> Option<Box<dyn SampleSource>> {
    let m = &cfg.model;
    match &cfg.data.source {
        DataSource::None => None,
        DataSource::Csv { path, has_headers } => Some(Box::new(CsvSampleLoader::new(
            path.clone(),
            *has_headers,
            m.input_size,
            m.num_classes,
        ))),
        DataSource::Synthetic { samples } => Some(Box::new(SyntheticSource::new(
            *samples,
            m.input_size,
            m.num_classes,
            cfg.training.seed,
        ))),
    }
}

/// Load samples and split off a validation set when val_fraction > 0.
pub fn load_datasets(
    cfg: &ProjectConfig,
) -> Result<(Option<ClassificationDataset>, Option<ClassificationDataset>)> {
    let Some(source) = sample_source(cfg) else {
        return Ok((None, None));
    };

    tracing::info!("Loading samples from {}", source.describe());
    let samples = source.load_all()?;
    if samples.is_empty() {
        bail!("{} produced no samples", source.describe());
    }

    if cfg.data.val_fraction <= 0.0 {
        return Ok((Some(ClassificationDataset::new(samples)), None));
    }

    let (train, valid) = split_train_val(samples, 1.0 - cfg.data.val_fraction, cfg.training.seed);
    tracing::info!("Split: {} train, {} validation", train.len(), valid.len());

    if train.is_empty() {
        bail!("data.val_fraction {} leaves no training samples", cfg.data.val_fraction);
    }

    let valid = (!valid.is_empty()).then(|| ClassificationDataset::new(valid));
    Ok((Some(ClassificationDataset::new(train)), valid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::DeviceKind;
    use std::fs;

    fn config(extra: &str) -> ProjectConfig {
        serde_yaml::from_str(&format!(
            "training:\n  batch_size: 4\n  epochs: 1\n  learning_rate: 0.01\n\
             model:\n  input_size: 4\n  hidden_size: 4\n  num_classes: 2\n{extra}"
        ))
        .unwrap()
    }

    #[test]
    fn test_no_source_means_no_datasets() {
        let (train, valid) = load_datasets(&config("")).unwrap();
        assert!(train.is_none() && valid.is_none());
    }

    #[test]
    fn test_synthetic_split() {
        let cfg = config("data:\n  source: synthetic\n  samples: 40\n  val_fraction: 0.25\n");
        let (train, valid) = load_datasets(&cfg).unwrap();
        assert_eq!(train.unwrap().sample_count(), 30);
        assert_eq!(valid.unwrap().sample_count(), 10);
    }

    #[test]
    fn test_empty_csv_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        let cfg = config(&format!("data:\n  source: csv\n  path: {}\n", path.display()));
        assert!(load_datasets(&cfg).is_err());
    }

    #[test]
    fn test_execute_end_to_end_on_cpu() {
        let dir    = tempfile::tempdir().unwrap();
        let models = dir.path().join("models");
        let runs   = dir.path().join("runs/experiment_1");
        let path   = dir.path().join("config.yaml");
        fs::write(
            &path,
            "project:\n  name: smoke\n\
             training:\n  batch_size: 8\n  epochs: 10\n  learning_rate: 0.01\n\
             model:\n  input_size: 4\n  hidden_size: 8\n  num_classes: 2\n\
             data:\n  source: synthetic\n  samples: 32\n",
        )
        .unwrap();

        let use_case = TrainUseCase::new(TrainOptions {
            config_path: path,
            overrides: ConfigOverrides {
                device:     Some(DeviceKind::Cpu),
                models_dir: Some(models.clone()),
                runs_dir:   Some(runs.clone()),
                ..Default::default()
            },
            resume: false,
        });

        let summary = use_case.execute().unwrap();
        assert_eq!(summary.last_epoch, 10);
        assert!(summary.last_train.is_some());
        assert!(models.join("checkpoint_epoch_10.json").exists());
        assert!(runs.join("scalars.csv").exists());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "training:\n  batch_size: 8\n  epochs: 1\n  learning_rate: 0.01\n").unwrap();

        let use_case = TrainUseCase::new(TrainOptions {
            config_path: path,
            overrides: ConfigOverrides { batch_size: Some(0), ..Default::default() },
            resume: false,
        });
        assert!(use_case.resolve_config().is_err());
    }
}

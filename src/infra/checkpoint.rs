// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores training state using Burn's CompactRecorder.
//
// What gets saved per checkpoint:
//   1. Model weights      — checkpoint_epoch_{N}_model.mpk
//   2. Optimizer state    — checkpoint_epoch_{N}_optim.mpk
//   3. Metadata           — checkpoint_epoch_{N}.json
//                           (epoch, model dimensions, last train stats)
//   4. latest_checkpoint.json — epoch number of the newest checkpoint,
//                               used by --resume
//
// File naming convention:
//   models/
//     checkpoint_epoch_10_model.mpk
//     checkpoint_epoch_10_optim.mpk
//     checkpoint_epoch_10.json
//     checkpoint_epoch_20_model.mpk
//     ...
//     latest_checkpoint.json
//
// The recorder appends its own file extension.

use anyhow::{bail, Context, Result};
use burn::{
    module::Module,
    optim::Optimizer,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::config::ModelSection;
use crate::domain::sample::EpochStats;
use crate::ml::model::SimpleModel;

const LATEST_POINTER: &str = "latest_checkpoint.json";

/// Sidecar JSON written next to each checkpoint's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub epoch:       usize,
    pub model:       ModelSection,
    pub train_stats: Option<EpochStats>,
}

/// True when `epoch` (1-based) lands on the checkpoint interval.
pub fn should_checkpoint(epoch: usize, every: usize) -> bool {
    every > 0 && epoch % every == 0
}

/// Base name shared by every file of one checkpoint.
pub fn checkpoint_name(epoch: usize) -> String {
    format!("checkpoint_epoch_{epoch}")
}

/// Manages saving and loading of checkpoints inside one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn model_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("{}_model", checkpoint_name(epoch)))
    }

    fn optim_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("{}_optim", checkpoint_name(epoch)))
    }

    fn meta_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("{}.json", checkpoint_name(epoch)))
    }

    /// Write model weights, optimizer state and metadata for `epoch`,
    /// then move the latest pointer to it. Returns the metadata path.
    pub fn save<B, O>(
        &self,
        epoch:       usize,
        model:       &SimpleModel<B>,
        optim:       &O,
        model_cfg:   &ModelSection,
        train_stats: Option<EpochStats>,
    ) -> Result<PathBuf>
    where
        B: AutodiffBackend,
        O: Optimizer<SimpleModel<B>, B>,
    {
        let recorder = CompactRecorder::new();

        let model_path = self.model_path(epoch);
        model
            .clone()
            .save_file(model_path.clone(), &recorder)
            .with_context(|| format!("Failed to save model weights to '{}'", model_path.display()))?;

        let optim_path = self.optim_path(epoch);
        Recorder::<B>::record(&recorder, optim.to_record(), optim_path.clone())
            .with_context(|| format!("Failed to save optimizer state to '{}'", optim_path.display()))?;

        let meta = CheckpointMeta { epoch, model: *model_cfg, train_stats };
        let meta_path = self.meta_path(epoch);
        fs::write(&meta_path, serde_json::to_string_pretty(&meta)?)
            .with_context(|| format!("Failed to write '{}'", meta_path.display()))?;

        let latest = self.dir.join(LATEST_POINTER);
        fs::write(&latest, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", latest.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(meta_path)
    }

    /// Epoch of the newest checkpoint, or None if nothing was saved yet.
    pub fn latest_epoch(&self) -> Result<Option<usize>> {
        let path = self.dir.join(LATEST_POINTER);
        if !path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        let epoch = serde_json::from_str::<usize>(s.trim())
            .with_context(|| format!("'{}' does not contain an epoch number", path.display()))?;
        Ok(Some(epoch))
    }

    pub fn load_meta(&self, epoch: usize) -> Result<CheckpointMeta> {
        let path = self.meta_path(epoch);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read checkpoint metadata '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Restore model and optimizer from the checkpoint at `epoch`.
    ///
    /// Fails if the checkpoint was written for different model dimensions.
    pub fn load<B, O>(
        &self,
        epoch:    usize,
        model:    SimpleModel<B>,
        optim:    O,
        expected: &ModelSection,
        device:   &B::Device,
    ) -> Result<(SimpleModel<B>, O, CheckpointMeta)>
    where
        B: AutodiffBackend,
        O: Optimizer<SimpleModel<B>, B>,
    {
        let meta = self.load_meta(epoch)?;
        if meta.model != *expected {
            bail!(
                "Checkpoint at epoch {} was trained with model {:?}, but the config asks for {:?}",
                epoch,
                meta.model,
                expected
            );
        }

        let recorder = CompactRecorder::new();

        let model_path = self.model_path(epoch);
        let model = model
            .load_file(model_path.clone(), &recorder, device)
            .with_context(|| format!("Cannot load model weights '{}'", model_path.display()))?;

        let optim_path = self.optim_path(epoch);
        let record = Recorder::<B>::load(&recorder, optim_path.clone(), device)
            .with_context(|| format!("Cannot load optimizer state '{}'", optim_path.display()))?;
        let optim = optim.load_record(record);

        tracing::info!("Restored checkpoint from epoch {}", epoch);
        Ok((model, optim, meta))
    }
}

// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over Burn's DataLoader with Adam.
//
//   - Training runs on B (an AutodiffBackend) so loss.backward() works
//   - model.valid() returns the model on B::InnerBackend for validation
//   - Validation batches are built directly on the inner backend
//   - Checkpoints land every `checkpoint_every` epochs
//
// With no training data configured the loop still ticks through the
// epochs and writes checkpoints, so a fresh project can be run end to
// end before its dataset exists.

use anyhow::Result;
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::{path::PathBuf, sync::Arc};

use crate::data::{
    batcher::{ClassificationBatch, ClassificationBatcher},
    dataset::ClassificationDataset,
};
use crate::domain::{config::ProjectConfig, sample::EpochStats, traits::ScalarSink};
use crate::infra::{
    checkpoint::{should_checkpoint, CheckpointManager},
    progress::EpochProgress,
};
use crate::ml::model::{count_correct, format_count, SimpleModel, SimpleModelConfig};

type Loader<B> = Arc<dyn DataLoader<B, ClassificationBatch<B>>>;

/// What a finished run produced.
#[derive(Debug, Clone, Default)]
pub struct TrainingSummary {
    pub first_epoch: usize,
    pub last_epoch:  usize,
    pub last_train:  Option<EpochStats>,
    pub last_valid:  Option<EpochStats>,
    pub checkpoints: Vec<PathBuf>,
}

/// Everything the loop reads besides the backend device.
pub struct TrainingInputs<'a> {
    pub cfg:        &'a ProjectConfig,
    pub train:      Option<ClassificationDataset>,
    pub valid:      Option<ClassificationDataset>,
    pub checkpoint: &'a CheckpointManager,
    pub events:     &'a mut dyn ScalarSink,
    pub resume:     bool,
}

fn build_loader<B: Backend>(
    dataset:     ClassificationDataset,
    batch_size:  usize,
    num_workers: usize,
    shuffle:     Option<u64>,
    device:      &B::Device,
) -> Loader<B> {
    let builder = DataLoaderBuilder::<B, _, _>::new(ClassificationBatcher::new())
        .batch_size(batch_size)
        .num_workers(num_workers.max(1))
        .set_device(device.clone());
    match shuffle {
        Some(seed) => builder.shuffle(seed).build(dataset),
        None       => builder.build(dataset),
    }
}

fn num_batches(items: usize, batch_size: usize) -> usize {
    items.div_ceil(batch_size.max(1))
}

/// Train for one epoch: forward, cross-entropy, backward, Adam step.
///
/// Returns the updated model and
///   loss     = sum of batch losses / number of batches
///   accuracy = 100 * correct / total
pub fn train_epoch<B, O>(
    mut model:  SimpleModel<B>,
    optim:      &mut O,
    loader:     &Loader<B>,
    lr:         f64,
    epoch:      usize,
    batch_size: usize,
) -> (SimpleModel<B>, EpochStats)
where
    B: AutodiffBackend,
    O: Optimizer<SimpleModel<B>, B>,
{
    let mut progress = EpochProgress::new(
        format!("Epoch {epoch}"),
        num_batches(loader.num_items(), batch_size),
    );

    let mut running_loss = 0.0f64;
    let mut batches      = 0usize;
    let mut correct      = 0usize;
    let mut total        = 0usize;

    for (batch_idx, batch) in loader.iter().enumerate() {
        let (loss, logits) = model.forward_classification(batch.inputs, batch.targets.clone());

        running_loss += loss.clone().into_scalar().elem::<f64>();
        batches      += 1;
        total        += batch.targets.dims()[0];
        correct      += count_correct(logits.detach(), batch.targets);

        // Backward pass + Adam update
        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(lr, model, grads);

        progress.update(format!(
            "loss={:.3}, acc={:.2}%",
            running_loss / (batch_idx + 1) as f64,
            100.0 * correct as f64 / total.max(1) as f64,
        ));
    }
    progress.finish();

    let epoch_loss = if batches > 0 { running_loss / batches as f64 } else { f64::NAN };
    let epoch_acc  = if total   > 0 { 100.0 * correct as f64 / total as f64 } else { 0.0 };

    (model, EpochStats::new(epoch_loss, epoch_acc, total))
}

/// Loss and accuracy over a loader without updating the model.
pub fn evaluate<B: Backend>(model: &SimpleModel<B>, loader: &Loader<B>) -> EpochStats {
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut correct  = 0usize;
    let mut total    = 0usize;

    for batch in loader.iter() {
        let (loss, logits) = model.forward_classification(batch.inputs, batch.targets.clone());
        loss_sum += loss.into_scalar().elem::<f64>();
        batches  += 1;
        total    += batch.targets.dims()[0];
        correct  += count_correct(logits, batch.targets);
    }

    let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    let accuracy = if total   > 0 { 100.0 * correct as f64 / total as f64 } else { 0.0 };
    EpochStats::new(avg_loss, accuracy, total)
}

/// Full epoch loop on backend `B`.
pub fn run_training<B: AutodiffBackend>(
    inputs: TrainingInputs<'_>,
    device: B::Device,
) -> Result<TrainingSummary> {
    let TrainingInputs { cfg, train, valid, checkpoint, events, resume } = inputs;
    let t = &cfg.training;

    B::seed(&device, t.seed);

    // ── Build model + Adam ────────────────────────────────────────────────────
    let model_cfg = SimpleModelConfig::from(&cfg.model);
    let mut model: SimpleModel<B> = model_cfg.init(&device);
    let mut optim = AdamConfig::new().init::<B, SimpleModel<B>>();

    println!("\nModel: SimpleModel");
    println!("Parameters: {}", format_count(model.num_params()));
    println!("Device: {:?}\n", device);

    // ── Resume ────────────────────────────────────────────────────────────────
    let mut first_epoch = 1;
    if resume {
        match checkpoint.latest_epoch()? {
            Some(epoch) => {
                let (m, o, meta) = checkpoint.load(epoch, model, optim, &cfg.model, &device)?;
                model       = m;
                optim       = o;
                first_epoch = meta.epoch + 1;
                match meta.train_stats {
                    Some(s) => println!("Resuming after epoch {} (train_loss={:.4})", meta.epoch, s.loss),
                    None    => println!("Resuming after epoch {}", meta.epoch),
                }
            }
            None => tracing::warn!(
                "--resume given but '{}' holds no checkpoint; starting from scratch",
                checkpoint.dir().display()
            ),
        }
    }

    // ── Data loaders ──────────────────────────────────────────────────────────
    let workers = cfg.data.num_workers;
    if let Some(ds) = &train {
        tracing::info!("Training on {} samples", ds.sample_count());
    }
    if let Some(ds) = &valid {
        tracing::info!("Validating on {} samples", ds.sample_count());
    }
    let train_loader: Option<Loader<B>> = train
        .map(|ds| build_loader::<B>(ds, t.batch_size, workers, Some(t.seed), &device));
    let valid_loader: Option<Loader<B::InnerBackend>> = valid
        .map(|ds| build_loader::<B::InnerBackend>(ds, t.batch_size, workers, None, &device));

    if train_loader.is_none() {
        tracing::warn!("No training data configured (data.source: none); epochs will run without batches");
    }

    let mut best_val_loss = f64::INFINITY;
    let mut summary = TrainingSummary {
        first_epoch,
        last_epoch: first_epoch.saturating_sub(1),
        ..Default::default()
    };

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in first_epoch..=t.epochs {
        let mut train_stats = None;

        match &train_loader {
            Some(loader) => {
                let (m, stats) = train_epoch(model, &mut optim, loader, t.learning_rate, epoch, t.batch_size);
                model = m;
                events.add_scalar("Loss/train", stats.loss, epoch)?;
                events.add_scalar("Accuracy/train", stats.accuracy, epoch)?;
                train_stats = Some(stats);
            }
            None => {
                println!("Epoch {}/{}", epoch, t.epochs);
                println!("No training data: set data.source in the config to train");
            }
        }

        let valid_stats = match &valid_loader {
            Some(loader) => {
                let stats = evaluate(&model.valid(), loader);
                events.add_scalar("Loss/val", stats.loss, epoch)?;
                events.add_scalar("Accuracy/val", stats.accuracy, epoch)?;
                if stats.is_improvement(best_val_loss) {
                    tracing::info!("Validation loss improved to {:.4} at epoch {}", stats.loss, epoch);
                    best_val_loss = stats.loss;
                }
                Some(stats)
            }
            None => None,
        };

        if let Some(tr) = train_stats {
            match valid_stats {
                Some(va) => println!(
                    "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.2}% | val_loss={:.4} | val_acc={:.2}%",
                    epoch, t.epochs, tr.loss, tr.accuracy, va.loss, va.accuracy,
                ),
                None => println!(
                    "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.2}%",
                    epoch, t.epochs, tr.loss, tr.accuracy,
                ),
            }
        }

        if should_checkpoint(epoch, t.checkpoint_every) {
            let path = checkpoint.save(epoch, &model, &optim, &cfg.model, train_stats)?;
            println!("Saved checkpoint: {}", path.display());
            summary.checkpoints.push(path);
        }

        summary.last_epoch = epoch;
        summary.last_train = train_stats.or(summary.last_train);
        summary.last_valid = valid_stats.or(summary.last_valid);
    }

    Ok(summary)
}

// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and hands off to the
// application layer. Two commands are supported:
//   1. `train`       — run the training loop from config.yaml
//   2. `init-config` — write a starter config.yaml

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InitConfigArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "mlp-train",
    version,
    about = "Train a small classifier from a YAML config, with checkpoints and scalar event logs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. The CLI layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)      => run_train(args),
            Commands::InitConfig(args) => run_init_config(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training with config: {}", args.config.display());

    let use_case = TrainUseCase::new(args.into());
    let summary  = use_case.execute()?;

    tracing::info!(
        "Ran epochs {}..={}, {} checkpoint(s) written",
        summary.first_epoch,
        summary.last_epoch,
        summary.checkpoints.len()
    );
    if let Some(s) = summary.last_train {
        println!("Final train: loss={:.4} acc={:.2}%", s.loss, s.accuracy);
    }
    if let Some(s) = summary.last_valid {
        println!("Final valid: loss={:.4} acc={:.2}%", s.loss, s.accuracy);
    }
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    crate::infra::config_loader::write_default_config(&args.path, args.force)?;
    println!("Wrote {}", args.path.display());
    Ok(())
}

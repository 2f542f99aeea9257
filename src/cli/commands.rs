// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `train` and `init-config` and their flags.
// Values given here override the matching keys in config.yaml.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::train_use_case::TrainOptions;
use crate::domain::{config::ConfigOverrides, device::DeviceKind};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the model described by a YAML config
    Train(TrainArgs),

    /// Write a starter config.yaml
    InitConfig(InitConfigArgs),
}

/// Compute device, mirrors the `device` key of the config
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceArg {
    Auto,
    Cpu,
    Gpu,
}

impl From<DeviceArg> for DeviceKind {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Auto => DeviceKind::Auto,
            DeviceArg::Cpu  => DeviceKind::Cpu,
            DeviceArg::Gpu  => DeviceKind::Gpu,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// YAML configuration file
    #[arg(long, short, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Override `device` from the config
    #[arg(long, value_enum)]
    pub device: Option<DeviceArg>,

    /// Override training.epochs
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Override training.batch_size
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Override training.learning_rate
    #[arg(long)]
    pub lr: Option<f64>,

    /// Override output.models_dir
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Override output.runs_dir
    #[arg(long)]
    pub runs_dir: Option<PathBuf>,

    /// Continue from the newest checkpoint in the models directory
    #[arg(long)]
    pub resume: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainOptions.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainOptions {
    fn from(a: TrainArgs) -> Self {
        TrainOptions {
            config_path: a.config,
            overrides: ConfigOverrides {
                epochs:        a.epochs,
                batch_size:    a.batch_size,
                learning_rate: a.lr,
                device:        a.device.map(DeviceKind::from),
                models_dir:    a.models_dir,
                runs_dir:      a.runs_dir,
            },
            resume: a.resume,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the starter config
    #[arg(long, default_value = "config.yaml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

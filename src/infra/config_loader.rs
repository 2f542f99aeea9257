// ============================================================
// Layer 6 — Config Loader
// ============================================================
// Reads config.yaml into a ProjectConfig, and writes a starter file
// for new projects.

use anyhow::{bail, Context, Result};
use std::{fs, path::Path};

use crate::domain::config::ProjectConfig;

/// Starter configuration written by `init-config`.
pub const DEFAULT_CONFIG_YAML: &str = r#"# Training configuration
project:
  name: my-project

training:
  batch_size: 64
  epochs: 20
  learning_rate: 0.001
  seed: 42
  # write models/checkpoint_epoch_{N} every N epochs
  checkpoint_every: 10

model:
  input_size: 784
  hidden_size: 256
  num_classes: 10

data:
  # none      - no data yet, epochs run without batches
  # csv       - rows of label,f1,...,fN (set `path`, optional `has_headers`)
  # synthetic - generated blobs for smoke runs (optional `samples`)
  source: none
  val_fraction: 0.0
  num_workers: 1

output:
  models_dir: models
  runs_dir: runs/experiment_1

# auto | cpu | gpu
device: auto
"#;

/// Read and parse a YAML config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = path.as_ref();

    let yaml = fs::read_to_string(path).with_context(|| {
        format!(
            "Cannot read config file '{}'. Run `init-config` to create one.",
            path.display()
        )
    })?;

    let cfg: ProjectConfig = serde_yaml::from_str(&yaml)
        .with_context(|| format!("Failed to parse YAML config '{}'", path.display()))?;

    tracing::debug!("Loaded config from '{}'", path.display());
    Ok(cfg)
}

/// Write the starter config. Refuses to overwrite unless `force` is set.
pub fn write_default_config(path: impl AsRef<Path>, force: bool) -> Result<()> {
    let path = path.as_ref();
    if path.exists() && !force {
        bail!(
            "'{}' already exists; pass --force to overwrite it",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_YAML)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::info!("Wrote starter config to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::DataSource;

    #[test]
    fn test_starter_config_is_valid() {
        let cfg: ProjectConfig = serde_yaml::from_str(DEFAULT_CONFIG_YAML).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.project.name, "my-project");
        assert_eq!(cfg.training.checkpoint_every, 10);
        assert_eq!(cfg.data.source, DataSource::None);
    }

    #[test]
    fn test_write_then_load() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        write_default_config(&path, false).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.training.batch_size, 64);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "keep me").unwrap();

        assert!(write_default_config(&path, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
        write_default_config(&path, true).unwrap();
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = load_config("does/not/exist.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.yaml"));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "training: [1, 2").unwrap();
        assert!(load_config(&path).is_err());
    }
}

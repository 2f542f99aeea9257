// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem or the terminal:
//
//   config_loader.rs — reads config.yaml, writes a starter file
//   checkpoint.rs    — model + optimizer records under models/
//   event_writer.rs  — scalar event log under runs/
//   progress.rs      — per-epoch progress bar on stderr

/// YAML configuration loading
pub mod config_loader;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Scalar event log for learning curves
pub mod event_writer;

/// Terminal progress bar
pub mod progress;

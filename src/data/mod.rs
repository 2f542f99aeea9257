// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between "where do samples come from" and
// "device-ready tensor batches":
//
//   CsvSampleLoader / SyntheticSource   → Vec<ClassificationSample>
//       │
//       ▼
//   split_train_val                     → train / validation
//       │
//       ▼
//   ClassificationDataset               → Burn Dataset
//       │
//       ▼
//   ClassificationBatcher               → ClassificationBatch tensors
//       │
//       ▼
//   DataLoader                          → feeds the training loop

/// Reads labelled rows from a CSV file
pub mod loader;

/// Seeded synthetic classification data
pub mod synthetic;

/// Implements Burn's Dataset trait for classification samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;

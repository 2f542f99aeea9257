// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
//   model.rs   — SimpleModel: Linear → ReLU → Linear classifier
//   trainer.rs — epoch loop: forward, loss, backward, Adam step,
//                validation, scalar logging, checkpointing

/// Two-layer perceptron classifier
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

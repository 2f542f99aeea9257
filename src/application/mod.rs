// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish a command.
//
// Rules for this layer:
//   - No ML math or model code here
//   - Only workflow coordination

// The training workflow
pub mod train_use_case;

// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing a training
// project: its configuration, the device it asks for, and the
// labelled samples it trains on.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// Project configuration as read from config.yaml
pub mod config;

// Requested compute device and how it resolves
pub mod device;

// A single labelled feature vector
pub mod sample;

// Core abstractions (traits) that other layers implement
pub mod traits;

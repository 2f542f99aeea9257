// ============================================================
// Layer 3 — Device Selection
// ============================================================
// The config asks for a device kind; resolution turns it into the
// backend that will actually run:
//
//   auto → GPU (wgpu) when built with the `gpu` feature, else CPU
//   cpu  → ndarray backend
//   gpu  → wgpu backend, error if the feature is compiled out

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Auto,
    Cpu,
    Gpu,
}

/// The backend a run will be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDevice {
    Cpu,
    Gpu,
}

impl fmt::Display for ResolvedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedDevice::Cpu => f.write_str("cpu"),
            ResolvedDevice::Gpu => f.write_str("gpu"),
        }
    }
}

impl DeviceKind {
    pub fn resolve(self) -> Result<ResolvedDevice> {
        resolve_with(self, gpu_compiled_in())
    }
}

pub const fn gpu_compiled_in() -> bool {
    cfg!(feature = "gpu")
}

fn resolve_with(kind: DeviceKind, gpu_available: bool) -> Result<ResolvedDevice> {
    match (kind, gpu_available) {
        (DeviceKind::Cpu, _)      => Ok(ResolvedDevice::Cpu),
        (DeviceKind::Auto, true)  => Ok(ResolvedDevice::Gpu),
        (DeviceKind::Auto, false) => Ok(ResolvedDevice::Cpu),
        (DeviceKind::Gpu, true)   => Ok(ResolvedDevice::Gpu),
        (DeviceKind::Gpu, false)  => bail!(
            "device 'gpu' requested but this build has no GPU backend; \
             rebuild with `--features gpu` or set `device: cpu`"
        ),
    }
}

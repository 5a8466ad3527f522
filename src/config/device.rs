//! Compute device preference and resolution

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Requested compute device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Probe CUDA, then Metal, else CPU
    #[default]
    Auto,
    Cpu,
    Cuda,
    Metal,
}

/// Device the models are bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Cpu,
    Cuda,
    Metal,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
            Self::Metal => "metal",
        }
    }

    /// Instantiate the candle device (ordinal 0 for accelerators)
    pub fn to_candle(self) -> candle_core::Result<candle_core::Device> {
        match self {
            Self::Cpu => Ok(candle_core::Device::Cpu),
            Self::Cuda => candle_core::Device::new_cuda(0),
            Self::Metal => candle_core::Device::new_metal(0),
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accelerator availability
#[derive(Debug, Clone, Copy)]
pub struct Accelerators {
    pub cuda: bool,
    pub metal: bool,
}

impl Accelerators {
    pub fn probe() -> Self {
        Self {
            cuda: candle_core::utils::cuda_is_available(),
            metal: candle_core::utils::metal_is_available(),
        }
    }
}

impl DevicePreference {
    /// Resolve against the accelerators present in this build and host
    pub fn resolve(self) -> DeviceKind {
        self.resolve_with(Accelerators::probe())
    }

    pub fn resolve_with(self, available: Accelerators) -> DeviceKind {
        match self {
            Self::Auto if available.cuda => DeviceKind::Cuda,
            Self::Auto if available.metal => DeviceKind::Metal,
            Self::Auto | Self::Cpu => DeviceKind::Cpu,
            Self::Cuda if available.cuda => DeviceKind::Cuda,
            Self::Metal if available.metal => DeviceKind::Metal,
            Self::Cuda | Self::Metal => {
                warn!(requested = ?self, "Requested accelerator unavailable, falling back to cpu");
                DeviceKind::Cpu
            }
        }
    }
}

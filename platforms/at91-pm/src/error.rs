// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error types of the power management subsystem.

use core::fmt;

/// Failures raised while bringing up power management.
///
/// Only [`PmError::is_fatal`] errors stop the boot; the rest disable an
/// optional capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmError {
    /// No device-tree node matches a supported RAM controller.
    NoRamController,
    /// The register window of RAM controller `index` could not be mapped.
    RamcMapFailed(usize),
    /// No `mmio-sram` node has a bound platform device.
    SramNotFound,
    /// The SRAM device exposes no memory pool.
    SramPoolUnavailable,
    /// The SRAM pool cannot hold the suspend routine.
    SramExhausted,
    /// The SRAM block has no physical address.
    SramNoPhysAddr,
    /// The SRAM block could not be mapped executable.
    SramMapFailed,
    /// The mapped SRAM block is not suitably aligned for code.
    SramMisaligned,
}

impl PmError {
    /// Stable error message for display/logging.
    pub const fn message(&self) -> &'static str {
        match self {
            PmError::NoRamController => "unable to find compatible ram controller node in dtb",
            PmError::RamcMapFailed(_) => "unable to map ram controller registers",
            PmError::SramNotFound => "failed to find sram device",
            PmError::SramPoolUnavailable => "sram pool unavailable",
            PmError::SramExhausted => "unable to alloc sram",
            PmError::SramNoPhysAddr => "sram block has no physical address",
            PmError::SramMapFailed => "could not map sram",
            PmError::SramMisaligned => "sram block misaligned for code",
        }
    }

    /// Whether the system must not continue after this error.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, PmError::NoRamController | PmError::RamcMapFailed(_))
    }
}

impl fmt::Display for PmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PmError::RamcMapFailed(idx) => write!(f, "{} (ramc[{idx}])", self.message()),
            _ => f.write_str(self.message()),
        }
    }
}

/// A specialized `Result` type for power management operations.
pub type PmResult<T = ()> = Result<T, PmError>;

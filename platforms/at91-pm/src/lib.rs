// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Suspend-to-RAM and standby for Atmel/Microchip AT91 and SAMA5 SoCs.
//!
//! At boot, one of the per-SoC initializers in [`soc`] discovers the RAM
//! controllers, copies the low-power routine into on-chip SRAM and registers
//! an [`At91Pm`] with the suspend framework. During a transition the framework
//! drives it through [`PlatformSuspendOps`].
//!
//! Suspend-to-RAM puts the SoC in slow clock mode: DRAM enters self-refresh,
//! the master clock falls back to the 32 kHz oscillator and the main
//! oscillator and PLLs stop. Drivers can ask [`suspend_entering_slow_clock`]
//! whether that is about to happen.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate log;

pub mod clock;
pub mod desc;
mod error;
pub mod platform;
pub mod profile;
pub mod ramc;
pub mod soc;
pub mod sram;
pub mod state;
pub mod suspend;

pub use error::{PmError, PmResult};
pub use platform::{PmPlatform, PmPlatformIf, SuspendHooks};
pub use soc::{
    Soc, at91rm9200_pm_init, at91sam9260_pm_init, at91sam9g45_pm_init, at91sam9x5_pm_init, pm_init,
    sama5d3_pm_init, sama5d4_pm_init, suspend_entering_slow_clock,
};
pub use state::SuspendState;
pub use suspend::{At91Pm, PlatformSuspendOps};

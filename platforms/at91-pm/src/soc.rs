// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Per-SoC bring-up.

use alloc::boxed::Box;

use at91_peripherals::{
    PmcAccess, SysClk,
    sdramc::{AT91RM9200_SDRAMC_LPR, ramc_write},
};
use lazyinit::LazyInit;

use crate::{
    PmResult,
    desc::DescTree,
    platform::{PmPlatform, SuspendHooks},
    profile::{MemCtrlKind, PmProfile},
    ramc,
    sram::{self, SramRoutine, SuspendImage},
    state::TargetState,
    suspend::At91Pm,
};

/// SAMA5D3 MPDDRC peripheral id.
pub const SAMA5D3_ID_MPDDRC: u8 = 13;
/// SAMA5D4 MPDDRC peripheral id.
pub const SAMA5D4_ID_MPDDRC: u8 = 16;

const SAM926X_USB: SysClk = SysClk::SAM926X_UHP.union(SysClk::SAM926X_UDP);

/// Supported SoC families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Soc {
    At91rm9200,
    At91sam9260,
    At91sam9g45,
    At91sam9x5,
    Sama5d3,
    Sama5d4,
}

impl Soc {
    pub const fn profile(self) -> PmProfile {
        let (uhp_udp_mask, memctrl, ddrc_pid, is_sama5d4) = match self {
            Soc::At91rm9200 => (
                SysClk::RM9200_UHP.union(SysClk::RM9200_UDP),
                MemCtrlKind::Sdram,
                0,
                false,
            ),
            Soc::At91sam9260 => (SAM926X_USB, MemCtrlKind::Sdramc, 0, false),
            // The G45 has no USB device port on the system clock register.
            Soc::At91sam9g45 => (SysClk::SAM926X_UHP, MemCtrlKind::Ddrsdr, 0, false),
            Soc::At91sam9x5 => (SAM926X_USB, MemCtrlKind::Ddrsdr, 0, false),
            Soc::Sama5d3 => (SAM926X_USB, MemCtrlKind::Ddrsdr, SAMA5D3_ID_MPDDRC, false),
            Soc::Sama5d4 => (SAM926X_USB, MemCtrlKind::Ddrsdr, SAMA5D4_ID_MPDDRC, true),
        };
        PmProfile {
            uhp_udp_mask,
            memctrl,
            ddrc_pid,
            is_sama5d4,
        }
    }
}

static SLOW_CLOCK_TARGET: LazyInit<&'static TargetState> = LazyInit::new();

/// Whether the transition in progress is suspend-to-RAM.
///
/// Drivers whose wakeup logic needs a PLL clock check this from their suspend
/// callback. Always false until power management has been registered.
pub fn suspend_entering_slow_clock() -> bool {
    SLOW_CLOCK_TARGET.is_inited() && SLOW_CLOCK_TARGET.entering_slow_clock()
}

/// Brings up power management for `soc`.
///
/// Returns the registered instance, or `None` when no SRAM routine could be
/// set up and suspend is left unsupported. Errors are fatal to the boot.
pub fn pm_init<T, PL, P, H>(
    soc: Soc,
    tree: &T,
    plat: &mut PL,
    image: &SuspendImage,
    pmc: P,
    hooks: H,
) -> PmResult<Option<&'static At91Pm<P, SramRoutine, H>>>
where
    T: DescTree + ?Sized,
    PL: PmPlatform,
    P: PmcAccess + 'static,
    H: SuspendHooks + 'static,
{
    let profile = soc.profile();
    let ramc::RamcInfo { bases, standby } = ramc::discover(tree, plat)?;

    if soc == Soc::At91rm9200
        && let Some(base) = bases.get(0)
    {
        // SAFETY: `base` maps the SDRAMC window discovery just probed.
        // Low-power mode cannot be combined with self-refresh here.
        unsafe { ramc_write(base, AT91RM9200_SDRAMC_LPR, 0) };
    }

    let routine = sram::relocate(tree, plat, image);

    if let Some(standby) = standby {
        plat.register_cpuidle_device(standby);
    }

    let Some(routine) = routine else {
        info!("AT91: PM not supported, due to no SRAM allocated");
        return Ok(None);
    };

    let pm: &'static At91Pm<P, SramRoutine, H> =
        Box::leak(Box::new(At91Pm::new(profile, pmc, bases, routine, hooks)));
    plat.set_suspend_ops(pm);
    if SLOW_CLOCK_TARGET.is_inited() {
        warn!("AT91: PM - registered more than once, query keeps the first instance");
    } else {
        SLOW_CLOCK_TARGET.init_once(pm.target());
    }
    info!("AT91: PM registered for {soc:?}");
    Ok(Some(pm))
}

macro_rules! soc_pm_init {
    ($($(#[$doc:meta])* $name:ident => $soc:expr;)*) => {$(
        $(#[$doc])*
        pub fn $name<T, PL, P, H>(
            tree: &T,
            plat: &mut PL,
            image: &SuspendImage,
            pmc: P,
            hooks: H,
        ) -> PmResult<Option<&'static At91Pm<P, SramRoutine, H>>>
        where
            T: DescTree + ?Sized,
            PL: PmPlatform,
            P: PmcAccess + 'static,
            H: SuspendHooks + 'static,
        {
            pm_init($soc, tree, plat, image, pmc, hooks)
        }
    )*};
}

soc_pm_init! {
    /// AT91RM9200: SDRAM on the memory controller, LPR cleared at boot.
    at91rm9200_pm_init => Soc::At91rm9200;
    at91sam9260_pm_init => Soc::At91sam9260;
    at91sam9g45_pm_init => Soc::At91sam9g45;
    at91sam9x5_pm_init => Soc::At91sam9x5;
    sama5d3_pm_init => Soc::Sama5d3;
    /// SAMA5D4: as SAMA5D3 plus the SAMA5D4 flag in the mode word.
    sama5d4_pm_init => Soc::Sama5d4;
}

/// Boot entry: sets up power management with the kernel's own routine and
/// hooks, halting on a missing RAM controller.
#[cfg(target_os = "none")]
pub fn at91_pm_boot<T, PL>(soc: Soc, tree: &T, plat: &mut PL, pmc_base: memory_addr::VirtAddr)
where
    T: DescTree + ?Sized,
    PL: PmPlatform,
{
    // SAFETY: the clock driver mapped the PMC window before any PM init.
    let pmc = unsafe { at91_peripherals::MmioPmc::new(pmc_base) };
    let image = SuspendImage::builtin();
    if let Err(e) = pm_init(soc, tree, plat, &image, pmc, crate::platform::KernelHooks) {
        panic!("AT91: PM - {e}");
    }
}

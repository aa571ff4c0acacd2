// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Platform suspend operations.

use at91_peripherals::PmcAccess;

use crate::{
    PmResult,
    clock::verify_clocks,
    platform::SuspendHooks,
    profile::PmProfile,
    ramc::RamcBases,
    sram::{SuspendArgs, SuspendRoutine},
    state::{SuspendState, TargetState},
};

/// Callbacks invoked by the generic suspend framework, in the order
/// `valid`, `begin`, `enter`, `end`.
pub trait PlatformSuspendOps: Send + Sync {
    /// Whether the platform supports `state`.
    fn valid(&self, state: SuspendState) -> bool;

    /// Called after processes are frozen, before devices are suspended.
    fn begin(&self, state: SuspendState) -> PmResult;

    /// Performs the transition and returns after wakeup.
    fn enter(&self, state: SuspendState) -> PmResult;

    /// Called right before processes are thawed.
    fn end(&self);
}

/// Power management of one AT91/SAMA5 system.
///
/// Built once at boot with everything discovered there; only the target
/// state changes afterwards.
pub struct At91Pm<P, R, H> {
    profile: PmProfile,
    pmc: P,
    ramc: RamcBases,
    routine: R,
    hooks: H,
    target: TargetState,
}

impl<P, R, H> At91Pm<P, R, H>
where
    P: PmcAccess,
    R: SuspendRoutine,
    H: SuspendHooks,
{
    pub fn new(profile: PmProfile, pmc: P, ramc: RamcBases, routine: R, hooks: H) -> Self {
        Self {
            profile,
            pmc,
            ramc,
            routine,
            hooks,
            target: TargetState::new(),
        }
    }

    pub fn profile(&self) -> &PmProfile {
        &self.profile
    }

    pub fn ramc_bases(&self) -> &RamcBases {
        &self.ramc
    }

    pub fn routine(&self) -> &R {
        &self.routine
    }

    pub fn target(&self) -> &TargetState {
        &self.target
    }

    /// Whether the pending transition is suspend-to-RAM.
    ///
    /// Drivers call this from their suspend path: slow clock mode removes the
    /// PLL clocks some of them need to act as wakeup sources.
    pub fn entering_slow_clock(&self) -> bool {
        self.target.entering_slow_clock()
    }

    fn suspend(&self, state: SuspendState) {
        let args = SuspendArgs {
            pmc: self.pmc.base(),
            ramc0: self.ramc.routine_arg(0),
            ramc1: self.ramc.routine_arg(1),
            mode: self.profile.mode_word(state),
        };
        trace!("AT91: PM - {state:?}, mode {:#x}", args.mode);

        self.hooks.flush_cache_all();
        self.hooks.outer_disable();
        // SAFETY: caches are flushed and the outer cache is off; the framework
        // has parked other cores and quiesced interrupts.
        unsafe { self.routine.run(args) };
        self.hooks.outer_resume();
    }
}

impl<P, R, H> PlatformSuspendOps for At91Pm<P, R, H>
where
    P: PmcAccess,
    R: SuspendRoutine,
    H: SuspendHooks,
{
    fn valid(&self, state: SuspendState) -> bool {
        matches!(
            state,
            SuspendState::On | SuspendState::Standby | SuspendState::Mem
        )
    }

    fn begin(&self, state: SuspendState) -> PmResult {
        self.target.set(state);
        Ok(())
    }

    /// Always reports success: a refused suspend-to-RAM is only visible in
    /// the log.
    fn enter(&self, state: SuspendState) -> PmResult {
        self.hooks.gpio_suspend();

        match state {
            // Suspend-to-RAM is standby plus slow clock mode: the master
            // clock switches to the 32k clock and the main oscillator stops.
            SuspendState::Mem => {
                if verify_clocks(&self.pmc, &self.profile).is_ok() {
                    self.suspend(state);
                }
            }
            // All drivers are suspended and DRAM power is reduced, but main
            // and CPU clocks stay as they are.
            SuspendState::Standby => self.suspend(state),
            SuspendState::On => self.hooks.cpu_do_idle(),
            _ => debug!("AT91: PM - bogus suspend state {state:?}"),
        }

        self.target.reset();
        self.hooks.gpio_resume();
        Ok(())
    }

    fn end(&self) {
        self.target.reset();
    }
}

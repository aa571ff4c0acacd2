// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! System sleep states and the pending-transition cell.

use core::sync::atomic::{AtomicU8, Ordering};

/// Sleep states passed in by the generic suspend framework.
///
/// The numbering follows the framework's raw `suspend_state_t` values.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendState {
    /// Running; no transition in progress.
    On = 0,
    /// Suspend-to-idle, handled by the framework without platform help.
    Freeze = 1,
    /// Shallow standby: drivers quiesced, clocks untouched.
    Standby = 2,
    /// Suspend-to-RAM: slow clock mode with DRAM in self-refresh.
    Mem = 3,
}

impl TryFrom<u32> for SuspendState {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(SuspendState::On),
            1 => Ok(SuspendState::Freeze),
            2 => Ok(SuspendState::Standby),
            3 => Ok(SuspendState::Mem),
            _ => Err(raw),
        }
    }
}

/// The state a transition in progress is heading to.
///
/// Always [`SuspendState::On`] outside of a `begin`..`end` window.
pub struct TargetState(AtomicU8);

impl TargetState {
    pub const fn new() -> Self {
        Self(AtomicU8::new(SuspendState::On as u8))
    }

    pub fn get(&self) -> SuspendState {
        // Only valid discriminants are ever stored.
        match SuspendState::try_from(self.0.load(Ordering::Acquire) as u32) {
            Ok(state) => state,
            Err(_) => SuspendState::On,
        }
    }

    pub fn set(&self, state: SuspendState) {
        self.0.store(state as u8, Ordering::Release);
    }

    pub fn reset(&self) {
        self.set(SuspendState::On);
    }

    /// Whether the pending transition gates the main clock.
    pub fn entering_slow_clock(&self) -> bool {
        self.get() == SuspendState::Mem
    }
}

impl Default for TargetState {
    fn default() -> Self {
        Self::new()
    }
}

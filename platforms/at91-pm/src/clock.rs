// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Clock preconditions of slow clock mode.
//!
//! Slow clock mode stops the main oscillator and the PLLs. Any consumer still
//! running from them would hang the system for good, so drivers are expected
//! to have quiesced their clocks before suspend-to-RAM, and this check refuses
//! the transition when they did not.

use core::fmt;

use at91_peripherals::{
    PmcAccess, SysClk,
    pmc::{CKGR_UCKR, PCKR, SR},
};

use crate::profile::PmProfile;

/// Programmable clock outputs checked before slow clock mode.
pub const CHECKED_PCKS: usize = 4;

/// A violated slow clock mode precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// USB host or device clock still enabled.
    UsbActive,
    /// Programmable clock `index` enabled on a source other than the slow
    /// clock.
    PckNotSlow { index: usize, css: u32 },
    UsbPllRunning,
    PllBRunning,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::UsbActive => f.write_str("Suspend-to-RAM with USB still active"),
            ClockError::PckNotSlow { index, css } => {
                write!(f, "Suspend-to-RAM with PCK{index} src {css}")
            }
            ClockError::UsbPllRunning => f.write_str("Suspend-to-RAM with USB PLL running"),
            ClockError::PllBRunning => f.write_str("Suspend-to-RAM with PLL B running"),
        }
    }
}

fn check(pmc: &impl PmcAccess, profile: &PmProfile) -> Result<(), ClockError> {
    let scsr = pmc.system_clocks();

    if scsr.intersects(profile.uhp_udp_mask) {
        return Err(ClockError::UsbActive);
    }

    for index in 0..CHECKED_PCKS {
        if !scsr.contains(SysClk::pck(index)) {
            continue;
        }
        let css = pmc.programmable_clock(index).read(PCKR::CSS);
        if css != PCKR::CSS::Value::Slow as u32 {
            return Err(ClockError::PckNotSlow { index, css });
        }
    }

    if pmc.usb_pll().is_set(CKGR_UCKR::UPLLEN) {
        return Err(ClockError::UsbPllRunning);
    }

    if pmc.status().is_set(SR::LOCKB) {
        return Err(ClockError::PllBRunning);
    }

    Ok(())
}

/// Checks, in order, that USB is off PLL B, enabled PCK0..PCK3 run from the
/// slow clock, the USB PLL is disabled and PLL B is unlocked.
pub fn verify_clocks(pmc: &impl PmcAccess, profile: &PmProfile) -> Result<(), ClockError> {
    check(pmc, profile).inspect_err(|e| error!("AT91: PM - {e}"))
}

#[cfg(test)]
mod tests {
    use at91_peripherals::PmcReg;
    use memory_addr::VirtAddr;

    use super::*;
    use crate::profile::MemCtrlKind;

    #[derive(Default)]
    struct Regs {
        scsr: u32,
        pckr: [u32; CHECKED_PCKS],
        uckr: u32,
        sr: u32,
    }

    impl PmcAccess for Regs {
        fn base(&self) -> VirtAddr {
            VirtAddr::from_usize(0xffff_fc00)
        }

        fn read(&self, reg: PmcReg) -> u32 {
            match reg {
                PmcReg::Scsr => self.scsr,
                PmcReg::Pckr(n) => self.pckr[n],
                PmcReg::Uckr => self.uckr,
                PmcReg::Sr => self.sr,
            }
        }
    }

    const SAM9: PmProfile = PmProfile {
        uhp_udp_mask: SysClk::SAM926X_UHP.union(SysClk::SAM926X_UDP),
        memctrl: MemCtrlKind::Ddrsdr,
        ddrc_pid: 0,
        is_sama5d4: false,
    };

    #[test]
    fn quiet_clocks_pass() {
        let regs = Regs {
            scsr: SysClk::PCK.bits(),
            // enabled state is taken from SCSR only
            pckr: [PCKR::CSS::Value::PllB as u32; CHECKED_PCKS],
            ..Default::default()
        };
        assert_eq!(verify_clocks(&regs, &SAM9), Ok(()));
    }

    #[test]
    fn usb_clock_uses_profile_mask() {
        let regs = Regs {
            scsr: SysClk::SAM926X_UDP.bits(),
            ..Default::default()
        };
        assert_eq!(verify_clocks(&regs, &SAM9), Err(ClockError::UsbActive));

        let rm9200 = PmProfile {
            uhp_udp_mask: SysClk::RM9200_UHP | SysClk::RM9200_UDP,
            memctrl: MemCtrlKind::Sdram,
            ..SAM9
        };
        assert_eq!(verify_clocks(&regs, &rm9200), Ok(()));
    }

    #[test]
    fn enabled_pck_must_run_from_slow_clock() {
        let mut regs = Regs {
            scsr: (SysClk::PCK0 | SysClk::PCK2).bits(),
            ..Default::default()
        };
        regs.pckr[2] = PCKR::CSS::Value::Main as u32;
        assert_eq!(
            verify_clocks(&regs, &SAM9),
            Err(ClockError::PckNotSlow { index: 2, css: 1 })
        );

        regs.pckr[2] = PCKR::CSS::Value::Slow as u32 | (3 << 4);
        assert_eq!(verify_clocks(&regs, &SAM9), Ok(()));
    }

    #[test]
    fn pck4_and_above_are_not_checked() {
        let regs = Regs {
            scsr: SysClk::PCK4.bits(),
            ..Default::default()
        };
        assert_eq!(verify_clocks(&regs, &SAM9), Ok(()));
    }

    #[test]
    fn plls_checked_in_order() {
        let mut regs = Regs {
            uckr: 1 << 16,
            sr: 1 << 2,
            ..Default::default()
        };
        assert_eq!(verify_clocks(&regs, &SAM9), Err(ClockError::UsbPllRunning));
        regs.uckr = 0;
        assert_eq!(verify_clocks(&regs, &SAM9), Err(ClockError::PllBRunning));
        regs.sr = 1 << 1;
        assert_eq!(verify_clocks(&regs, &SAM9), Ok(()));
    }

    #[test]
    fn usb_failure_short_circuits() {
        let regs = Regs {
            scsr: (SysClk::SAM926X_UHP | SysClk::PCK0).bits(),
            pckr: [PCKR::CSS::Value::PllA as u32; CHECKED_PCKS],
            uckr: 1 << 16,
            sr: 1 << 2,
        };
        assert_eq!(verify_clocks(&regs, &SAM9), Err(ClockError::UsbActive));
    }
}

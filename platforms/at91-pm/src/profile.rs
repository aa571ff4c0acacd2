// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Per-SoC power management profile and the mode word handed to the SRAM
//! routine.

use at91_peripherals::SysClk;
use tock_registers::{LocalRegisterCopy, register_bitfields};

use crate::state::SuspendState;

register_bitfields![u32,
    /// Mode word passed as the fourth argument of the SRAM routine.
    pub PM_MODE [
        /// Switch the master clock to the slow clock and gate the main
        /// oscillator and PLLs.
        SLOW_CLOCK OFFSET(0) NUMBITS(1) [],
        MEMCTRL OFFSET(1) NUMBITS(2) [
            Sdram = 0,
            Sdramc = 1,
            Ddrsdr = 2
        ],
        /// Peripheral id of the DDR controller, used to gate its clock.
        DDRC_PID OFFSET(3) NUMBITS(8) [],
        SAMA5D4 OFFSET(11) NUMBITS(1) []
    ]
];

/// RAM controller generation driven by the SRAM routine.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemCtrlKind {
    /// AT91RM9200 memory controller with its SDRAM interface.
    Sdram = 0,
    /// SAM9 SDRAM controller.
    Sdramc = 1,
    /// DDR/SDR controller (SAM9G45, SAM9X5, SAMA5).
    Ddrsdr = 2,
}

/// Process-wide power management parameters of one SoC family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmProfile {
    /// USB host/device clocks that must be off before slow clock mode.
    pub uhp_udp_mask: SysClk,
    pub memctrl: MemCtrlKind,
    /// DDR controller peripheral id, 0 where the routine does not gate it.
    pub ddrc_pid: u8,
    pub is_sama5d4: bool,
}

impl PmProfile {
    /// Packs the routine's mode word for a transition to `state`.
    pub fn mode_word(&self, state: SuspendState) -> u32 {
        let mut mode = LocalRegisterCopy::<u32, PM_MODE::Register>::new(0);
        mode.modify(
            PM_MODE::MEMCTRL.val(self.memctrl as u32)
                + PM_MODE::DDRC_PID.val(self.ddrc_pid as u32)
                + PM_MODE::SLOW_CLOCK.val((state == SuspendState::Mem) as u32)
                + PM_MODE::SAMA5D4.val(self.is_sama5d4 as u32),
        );
        mode.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDR_PID5: PmProfile = PmProfile {
        uhp_udp_mask: SysClk::SAM926X_UHP.union(SysClk::SAM926X_UDP),
        memctrl: MemCtrlKind::Ddrsdr,
        ddrc_pid: 5,
        is_sama5d4: false,
    };

    fn fields(word: u32) -> LocalRegisterCopy<u32, PM_MODE::Register> {
        LocalRegisterCopy::new(word)
    }

    #[test]
    fn slow_clock_bit_only_for_mem() {
        for state in [
            SuspendState::On,
            SuspendState::Freeze,
            SuspendState::Standby,
            SuspendState::Mem,
        ] {
            let mode = fields(DDR_PID5.mode_word(state));
            assert_eq!(mode.is_set(PM_MODE::SLOW_CLOCK), state == SuspendState::Mem);
        }
    }

    #[test]
    fn ddrsdr_pid5_layout() {
        let word = DDR_PID5.mode_word(SuspendState::Mem);
        let mode = fields(word);
        assert_eq!(word & 1, 1);
        assert_eq!(mode.read(PM_MODE::DDRC_PID), 5);
        assert_eq!(
            mode.read_as_enum(PM_MODE::MEMCTRL),
            Some(PM_MODE::MEMCTRL::Value::Ddrsdr)
        );
        assert!(!mode.is_set(PM_MODE::SAMA5D4));
        assert_eq!(word, 1 | (2 << 1) | (5 << 3));
    }

    #[test]
    fn sama5d4_flag_is_packed() {
        let profile = PmProfile {
            ddrc_pid: 16,
            is_sama5d4: true,
            ..DDR_PID5
        };
        let mode = fields(profile.mode_word(SuspendState::Standby));
        assert!(mode.is_set(PM_MODE::SAMA5D4));
        assert!(!mode.is_set(PM_MODE::SLOW_CLOCK));
        assert_eq!(mode.read(PM_MODE::DDRC_PID), 16);
    }

    #[test]
    fn sdram_kind_leaves_memctrl_zero() {
        let profile = PmProfile {
            uhp_udp_mask: SysClk::RM9200_UHP | SysClk::RM9200_UDP,
            memctrl: MemCtrlKind::Sdram,
            ddrc_pid: 0,
            is_sama5d4: false,
        };
        assert_eq!(profile.mode_word(SuspendState::Standby), 0);
        assert_eq!(profile.mode_word(SuspendState::Mem), 1);
    }
}

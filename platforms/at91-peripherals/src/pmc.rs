// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Power Management Controller (PMC).

use bitflags::bitflags;
use memory_addr::VirtAddr;
use tock_registers::{
    LocalRegisterCopy,
    interfaces::Readable,
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite},
};

/// Number of programmable clock outputs described by the register block.
pub const PMC_PCK_COUNT: usize = 8;

bitflags! {
    /// System clock bits shared by `PMC_SCER`, `PMC_SCDR` and `PMC_SCSR`.
    ///
    /// The USB bits moved between the AT91RM9200 and the SAM926x generation,
    /// so both layouts are listed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SysClk: u32 {
        /// Processor clock.
        const PCK = 1 << 0;
        /// AT91RM9200 USB device clock.
        const RM9200_UDP = 1 << 1;
        /// AT91RM9200 USB device port master clock.
        const RM9200_MCKUDP = 1 << 2;
        /// AT91RM9200 USB host clock.
        const RM9200_UHP = 1 << 4;
        /// SAM926x and later USB host clock.
        const SAM926X_UHP = 1 << 6;
        /// SAM926x and later USB device clock.
        const SAM926X_UDP = 1 << 7;
        const PCK0 = 1 << 8;
        const PCK1 = 1 << 9;
        const PCK2 = 1 << 10;
        const PCK3 = 1 << 11;
        const PCK4 = 1 << 12;
        const PCK5 = 1 << 13;
        const PCK6 = 1 << 14;
        const PCK7 = 1 << 15;
    }
}

impl SysClk {
    /// Enable bit of programmable clock `index`.
    pub const fn pck(index: usize) -> Self {
        Self::from_bits_retain(Self::PCK0.bits() << index)
    }
}

register_bitfields![u32,
    /// `PMC_PCKRx`: programmable clock configuration.
    pub PCKR [
        /// Clock source selection.
        CSS OFFSET(0) NUMBITS(3) [
            Slow = 0,
            Main = 1,
            PllA = 2,
            PllB = 3,
            Master = 4
        ],
        PRES OFFSET(4) NUMBITS(3) []
    ],
    /// `CKGR_UCKR`: UTMI/USB PLL control.
    pub CKGR_UCKR [
        UPLLEN OFFSET(16) NUMBITS(1) [],
        UPLLCOUNT OFFSET(20) NUMBITS(4) [],
        BIASEN OFFSET(24) NUMBITS(1) []
    ],
    /// `PMC_SR`: status.
    pub SR [
        MOSCS OFFSET(0) NUMBITS(1) [],
        LOCKA OFFSET(1) NUMBITS(1) [],
        LOCKB OFFSET(2) NUMBITS(1) [],
        MCKRDY OFFSET(3) NUMBITS(1) [],
        LOCKU OFFSET(6) NUMBITS(1) []
    ]
];

register_structs! {
    /// The part of the PMC register window read by the suspend path.
    PmcRegisters {
        (0x00 => _reserved0),
        (0x08 => scsr: ReadOnly<u32>),
        (0x0c => _reserved1),
        (0x1c => ckgr_uckr: ReadWrite<u32, CKGR_UCKR::Register>),
        (0x20 => _reserved2),
        (0x40 => pckr: [ReadWrite<u32, PCKR::Register>; PMC_PCK_COUNT]),
        (0x60 => _reserved3),
        (0x68 => sr: ReadOnly<u32, SR::Register>),
        (0x6c => _reserved4),
        (0x70 => @END),
    }
}

/// Size of the PMC register window covered by [`MmioPmc`].
pub const PMC_WINDOW_SIZE: usize = 0x70;

/// PMC registers reachable through [`PmcAccess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmcReg {
    /// `PMC_SCSR`, system clock status.
    Scsr,
    /// `PMC_PCKRx`, programmable clock `x` configuration.
    Pckr(usize),
    /// `CKGR_UCKR`, USB PLL control.
    Uckr,
    /// `PMC_SR`, status.
    Sr,
}

/// Read access to the PMC.
///
/// Implemented by [`MmioPmc`] on hardware and by simulated register files in
/// tests.
pub trait PmcAccess: Send + Sync {
    /// Mapped base of the PMC window, handed to the SRAM routine.
    fn base(&self) -> VirtAddr;

    /// Reads the raw value of `reg`.
    fn read(&self, reg: PmcReg) -> u32;

    /// Currently enabled system clocks.
    fn system_clocks(&self) -> SysClk {
        SysClk::from_bits_retain(self.read(PmcReg::Scsr))
    }

    /// Configuration of programmable clock `index`.
    fn programmable_clock(&self, index: usize) -> LocalRegisterCopy<u32, PCKR::Register> {
        LocalRegisterCopy::new(self.read(PmcReg::Pckr(index)))
    }

    fn usb_pll(&self) -> LocalRegisterCopy<u32, CKGR_UCKR::Register> {
        LocalRegisterCopy::new(self.read(PmcReg::Uckr))
    }

    fn status(&self) -> LocalRegisterCopy<u32, SR::Register> {
        LocalRegisterCopy::new(self.read(PmcReg::Sr))
    }
}

/// Memory-mapped PMC.
pub struct MmioPmc {
    base: VirtAddr,
}

impl MmioPmc {
    /// Wraps an already mapped PMC window.
    ///
    /// # Safety
    ///
    /// `base` must point to at least [`PMC_WINDOW_SIZE`] bytes of mapped PMC
    /// registers for as long as the returned value is used.
    pub const unsafe fn new(base: VirtAddr) -> Self {
        Self { base }
    }

    fn regs(&self) -> &PmcRegisters {
        // SAFETY: guaranteed by the contract of `MmioPmc::new`.
        unsafe { &*(self.base.as_usize() as *const PmcRegisters) }
    }
}

impl PmcAccess for MmioPmc {
    fn base(&self) -> VirtAddr {
        self.base
    }

    fn read(&self, reg: PmcReg) -> u32 {
        let regs = self.regs();
        match reg {
            PmcReg::Scsr => regs.scsr.get(),
            PmcReg::Pckr(n) => regs.pckr[n].get(),
            PmcReg::Uckr => regs.ckgr_uckr.get(),
            PmcReg::Sr => regs.sr.get(),
        }
    }
}

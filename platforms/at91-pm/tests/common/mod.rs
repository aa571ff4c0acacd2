// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

#![allow(dead_code)]

use at91_peripherals::{PmcAccess, PmcReg};
use at91_pm::{
    PlatformSuspendOps, SuspendHooks,
    desc::DescNode,
    platform::PmPlatform,
    ramc::StandbyRoutine,
    sram::{BuddySramPool, SuspendImage},
};
use memory_addr::{PhysAddr, VirtAddr, pa};

pub const PMC_BASE: usize = 0xfeff_fc00;
pub const SRAM_PBASE: PhysAddr = pa!(0x30_0000);
/// Fill pattern of freshly mapped register windows.
pub const POISON: u32 = 0xdead_beef;

pub static ROUTINE_CODE: [u8; 40] = [0x5a; 40];

pub fn thumb_image() -> SuspendImage {
    unsafe { SuspendImage::from_raw(ROUTINE_CODE.as_ptr() as usize | 1, ROUTINE_CODE.len()) }
}

/// A node without register windows.
pub const fn node(path: &'static str, compatible: &'static [&'static str]) -> DescNode {
    DescNode {
        path,
        compatible,
        reg: None,
    }
}

/// A node with a 512-byte register window at `base`.
pub const fn mmio(
    path: &'static str,
    compatible: &'static [&'static str],
    base: usize,
) -> DescNode {
    DescNode {
        path,
        compatible,
        reg: Some((PhysAddr::from_usize(base), 0x200)),
    }
}

pub struct SimPmc {
    pub scsr: u32,
}

impl PmcAccess for SimPmc {
    fn base(&self) -> VirtAddr {
        VirtAddr::from_usize(PMC_BASE)
    }

    fn read(&self, reg: PmcReg) -> u32 {
        match reg {
            PmcReg::Scsr => self.scsr,
            _ => 0,
        }
    }
}

pub struct NoHooks;

impl SuspendHooks for NoHooks {
    fn gpio_suspend(&self) {}
    fn gpio_resume(&self) {}
    fn flush_cache_all(&self) {}
    fn outer_disable(&self) {}
    fn outer_resume(&self) {}
    fn cpu_do_idle(&self) {}
}

struct Sram {
    path: &'static str,
    vbase: VirtAddr,
    pool: BuddySramPool,
}

/// Boot services over host memory.
#[derive(Default)]
pub struct FakePlatform {
    /// Register windows handed out by `iomap`, in mapping order.
    pub mapped: Vec<(&'static str, VirtAddr)>,
    /// Paths with a probed platform device.
    pub bound: Vec<&'static str>,
    sram: Option<Sram>,
    /// Refuse executable mappings.
    pub no_exec_map: bool,
    pub icache_flushes: Vec<(VirtAddr, usize)>,
    pub cpuidle: Vec<StandbyRoutine>,
    pub suspend_ops: Option<&'static dyn PlatformSuspendOps>,
}

impl FakePlatform {
    /// Backs the device bound to `path` with a pool of `size` bytes.
    pub fn with_sram(mut self, path: &'static str, size: usize) -> Self {
        let buf: &'static mut [u64] = Vec::leak(vec![0u64; size.div_ceil(8)]);
        let vbase = VirtAddr::from_usize(buf.as_mut_ptr() as usize);
        let pool = unsafe { BuddySramPool::new(vbase, SRAM_PBASE, size) };
        self.bound.push(path);
        self.sram = Some(Sram { path, vbase, pool });
        self
    }

    /// Binds a device to `path` that exports no memory pool.
    pub fn with_poolless_sram(mut self, path: &'static str) -> Self {
        self.bound.push(path);
        self
    }

    pub fn window(&self, path: &str) -> Option<VirtAddr> {
        self.mapped.iter().find(|(p, _)| *p == path).map(|(_, va)| *va)
    }
}

impl PmPlatform for FakePlatform {
    type Pool = BuddySramPool;

    fn iomap(&mut self, node: &DescNode, index: usize) -> Option<VirtAddr> {
        let (_, size) = node.reg.filter(|_| index == 0)?;
        let regs: &'static mut [u32] = Vec::leak(vec![POISON; size / 4]);
        let va = VirtAddr::from_usize(regs.as_mut_ptr() as usize);
        self.mapped.push((node.path, va));
        Some(va)
    }

    fn device_bound(&self, node: &DescNode) -> bool {
        self.bound.contains(&node.path)
    }

    fn sram_pool(&mut self, node: &DescNode) -> Option<&mut BuddySramPool> {
        self.sram
            .as_mut()
            .filter(|s| s.path == node.path)
            .map(|s| &mut s.pool)
    }

    fn ioremap_exec(&mut self, paddr: PhysAddr, _size: usize) -> Option<VirtAddr> {
        if self.no_exec_map {
            return None;
        }
        let sram = self.sram.as_ref()?;
        let offset = paddr.as_usize().checked_sub(SRAM_PBASE.as_usize())?;
        Some(VirtAddr::from_usize(sram.vbase.as_usize() + offset))
    }

    fn flush_icache_range(&mut self, start: VirtAddr, size: usize) {
        self.icache_flushes.push((start, size));
    }

    fn register_cpuidle_device(&mut self, standby: StandbyRoutine) {
        self.cpuidle.push(standby);
    }

    fn set_suspend_ops(&mut self, ops: &'static dyn PlatformSuspendOps) {
        self.suspend_ops = Some(ops);
    }
}

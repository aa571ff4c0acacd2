// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Services this subsystem borrows from the rest of the kernel.

use memory_addr::{PhysAddr, VirtAddr};

use crate::{desc::DescNode, ramc::StandbyRoutine, sram::SramPool, suspend::PlatformSuspendOps};

/// Boot-time services: register mapping, on-chip SRAM pools and device
/// registration.
pub trait PmPlatform {
    /// Allocator type backing `mmio-sram` devices.
    type Pool: SramPool;

    /// Maps register window `index` of `node` into the kernel.
    fn iomap(&mut self, node: &DescNode, index: usize) -> Option<VirtAddr>;

    /// Whether a platform device was probed for `node`.
    fn device_bound(&self, node: &DescNode) -> bool;

    /// Memory pool exported by the device bound to `node`.
    fn sram_pool(&mut self, node: &DescNode) -> Option<&mut Self::Pool>;

    /// Maps `size` bytes at `paddr` executable for privileged code.
    fn ioremap_exec(&mut self, paddr: PhysAddr, size: usize) -> Option<VirtAddr>;

    /// Makes freshly written code at `start` visible to instruction fetch.
    fn flush_icache_range(&mut self, start: VirtAddr, size: usize);

    /// Registers the `cpuidle-at91` device carrying `standby` as its data.
    fn register_cpuidle_device(&mut self, standby: StandbyRoutine);

    /// Installs the platform suspend operations.
    fn set_suspend_ops(&mut self, ops: &'static dyn PlatformSuspendOps);
}

/// CPU and pin-control actions bracketing a transition.
pub trait SuspendHooks: Send + Sync {
    /// Saves GPIO wakeup configuration before suspending.
    fn gpio_suspend(&self);
    fn gpio_resume(&self);
    /// Cleans and invalidates every CPU cache level.
    fn flush_cache_all(&self);
    fn outer_disable(&self);
    fn outer_resume(&self);
    /// Waits for an interrupt with clocks untouched.
    fn cpu_do_idle(&self);
}

/// Hooks provided by the pin-control driver and the architecture layer.
#[crate_interface::def_interface]
pub trait PmPlatformIf {
    fn gpio_suspend();
    fn gpio_resume();
    fn flush_cache_all();
    fn outer_disable();
    fn outer_resume();
    fn cpu_do_idle();
}

/// [`SuspendHooks`] backed by whoever implements [`PmPlatformIf`].
#[cfg(target_os = "none")]
pub struct KernelHooks;

#[cfg(target_os = "none")]
impl SuspendHooks for KernelHooks {
    fn gpio_suspend(&self) {
        crate_interface::call_interface!(PmPlatformIf::gpio_suspend)
    }

    fn gpio_resume(&self) {
        crate_interface::call_interface!(PmPlatformIf::gpio_resume)
    }

    fn flush_cache_all(&self) {
        crate_interface::call_interface!(PmPlatformIf::flush_cache_all)
    }

    fn outer_disable(&self) {
        crate_interface::call_interface!(PmPlatformIf::outer_disable)
    }

    fn outer_resume(&self) {
        crate_interface::call_interface!(PmPlatformIf::outer_resume)
    }

    fn cpu_do_idle(&self) {
        crate_interface::call_interface!(PmPlatformIf::cpu_do_idle)
    }
}

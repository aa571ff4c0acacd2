// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Relocation of the suspend routine into always-on SRAM.
//!
//! While DRAM sits in self-refresh nothing may be fetched from it, so the
//! routine that gates the clocks is copied once at boot into on-chip SRAM and
//! always called from there.

use core::{alloc::Layout, ptr::NonNull};

use buddy_system_allocator::Heap;
use memory_addr::{PhysAddr, VirtAddr};

use crate::{
    PmError, PmResult,
    desc::DescTree,
    platform::PmPlatform,
};

/// `compatible` of the on-chip SRAM node.
pub const MMIO_SRAM_COMPAT: &str = "mmio-sram";

/// Alignment required for the relocated copy.
pub const FNCPY_ALIGN: usize = 8;

/// Interworking bit of an ARM code address: set for Thumb entry points.
const THUMB_BIT: usize = 1;

/// Signature of the routine once relocated.
pub type SuspendFn = unsafe extern "C" fn(pmc: usize, ramc0: usize, ramc1: usize, mode: u32);

/// Allocator over an on-chip SRAM window.
pub trait SramPool {
    /// Allocates `size` bytes aligned to [`FNCPY_ALIGN`].
    fn alloc(&mut self, size: usize) -> Option<VirtAddr>;

    /// Physical address backing `vaddr`, if it belongs to the pool.
    fn virt_to_phys(&self, vaddr: VirtAddr) -> Option<PhysAddr>;
}

/// An [`SramPool`] backed by a buddy allocator.
pub struct BuddySramPool {
    heap: Heap<32>,
    vbase: VirtAddr,
    pbase: PhysAddr,
    size: usize,
}

impl BuddySramPool {
    /// Creates a pool managing `size` bytes mapped at `vbase`.
    ///
    /// # Safety
    ///
    /// `[vbase, vbase + size)` must be mapped, unused memory backed by
    /// `[pbase, pbase + size)`, owned by the pool from now on.
    pub unsafe fn new(vbase: VirtAddr, pbase: PhysAddr, size: usize) -> Self {
        let mut heap = Heap::<32>::new();
        unsafe { heap.init(vbase.as_usize(), size) };
        Self {
            heap,
            vbase,
            pbase,
            size,
        }
    }
}

impl SramPool for BuddySramPool {
    fn alloc(&mut self, size: usize) -> Option<VirtAddr> {
        let layout = Layout::from_size_align(size, FNCPY_ALIGN).ok()?;
        self.heap
            .alloc(layout)
            .ok()
            .map(|ptr: NonNull<u8>| VirtAddr::from_usize(ptr.as_ptr() as usize))
    }

    fn virt_to_phys(&self, vaddr: VirtAddr) -> Option<PhysAddr> {
        let offset = vaddr.as_usize().checked_sub(self.vbase.as_usize())?;
        (offset < self.size).then(|| PhysAddr::from_usize(self.pbase.as_usize() + offset))
    }
}

/// A position-independent code image with its entry point.
#[derive(Debug, Clone, Copy)]
pub struct SuspendImage {
    entry: usize,
    size: usize,
}

impl SuspendImage {
    /// Describes `size` bytes of code starting at `entry`.
    ///
    /// # Safety
    ///
    /// `entry` without its Thumb bit must point to `size` readable bytes of
    /// position-independent code that stay valid for `'static`.
    pub const unsafe fn from_raw(entry: usize, size: usize) -> Self {
        Self { entry, size }
    }

    /// The assembly routine linked into the kernel image.
    #[cfg(target_os = "none")]
    pub fn builtin() -> Self {
        unsafe extern "C" {
            fn at91_pm_suspend_in_sram(pmc: usize, ramc0: usize, ramc1: usize, mode: u32);
            static at91_pm_suspend_in_sram_sz: u32;
        }
        // SAFETY: both symbols are emitted by the routine's assembly source.
        unsafe {
            Self::from_raw(
                at91_pm_suspend_in_sram as *const () as usize,
                at91_pm_suspend_in_sram_sz as usize,
            )
        }
    }

    pub const fn entry(&self) -> usize {
        self.entry
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    fn code(&self) -> &[u8] {
        // SAFETY: guaranteed by the contract of `SuspendImage::from_raw`.
        unsafe { core::slice::from_raw_parts((self.entry & !THUMB_BIT) as *const u8, self.size) }
    }
}

/// Arguments of one routine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspendArgs {
    pub pmc: VirtAddr,
    pub ramc0: VirtAddr,
    pub ramc1: VirtAddr,
    pub mode: u32,
}

/// The code that performs the actual low-power sequence.
pub trait SuspendRoutine: Send + Sync {
    /// Runs the sequence and returns once clocks are restored.
    ///
    /// # Safety
    ///
    /// Caches must be flushed, the outer cache disabled, other cores parked
    /// and interrupts quiesced. `args` must carry mapped register bases.
    unsafe fn run(&self, args: SuspendArgs);
}

/// Handle to the routine copied into SRAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SramRoutine {
    entry: usize,
}

impl SramRoutine {
    /// Entry address inside SRAM, Thumb bit included.
    pub const fn entry(&self) -> usize {
        self.entry
    }
}

impl SuspendRoutine for SramRoutine {
    unsafe fn run(&self, args: SuspendArgs) {
        // SAFETY: `entry` points to the relocated copy, mapped executable for
        // the lifetime of the kernel.
        let f = unsafe { core::mem::transmute::<usize, SuspendFn>(self.entry) };
        unsafe {
            f(
                args.pmc.as_usize(),
                args.ramc0.as_usize(),
                args.ramc1.as_usize(),
                args.mode,
            )
        }
    }
}

/// Copies `image` to `dest` and returns the relocated entry.
///
/// # Safety
///
/// `dest` must be writable for `image.size()` bytes.
unsafe fn fncpy(dest: VirtAddr, image: &SuspendImage) -> PmResult<usize> {
    if dest.as_usize() % FNCPY_ALIGN != 0 {
        return Err(PmError::SramMisaligned);
    }
    let code = image.code();
    unsafe {
        core::ptr::copy_nonoverlapping(code.as_ptr(), dest.as_usize() as *mut u8, code.len());
    }
    Ok(dest.as_usize() | (image.entry & THUMB_BIT))
}

/// Relocates `image` into the first usable SRAM device.
pub fn try_relocate<T, PL>(tree: &T, plat: &mut PL, image: &SuspendImage) -> PmResult<SramRoutine>
where
    T: DescTree + ?Sized,
    PL: PmPlatform,
{
    let node = tree
        .compatible_nodes(MMIO_SRAM_COMPAT)
        .find(|n| plat.device_bound(n))
        .ok_or(PmError::SramNotFound)?;

    let paddr = {
        let pool = plat.sram_pool(&node).ok_or(PmError::SramPoolUnavailable)?;
        let vaddr = pool.alloc(image.size()).ok_or(PmError::SramExhausted)?;
        pool.virt_to_phys(vaddr).ok_or(PmError::SramNoPhysAddr)?
    };

    let exec = plat
        .ioremap_exec(paddr, image.size())
        .ok_or(PmError::SramMapFailed)?;
    // SAFETY: `exec` maps the block just allocated for exactly this size.
    let entry = unsafe { fncpy(exec, image)? };
    plat.flush_icache_range(exec, image.size());

    debug!(
        "sram: suspend routine ({} bytes) at {:#x} from {}",
        image.size(),
        entry,
        node.path
    );
    Ok(SramRoutine { entry })
}

/// Like [`try_relocate`], but failures only disable suspend support.
pub fn relocate<T, PL>(tree: &T, plat: &mut PL, image: &SuspendImage) -> Option<SramRoutine>
where
    T: DescTree + ?Sized,
    PL: PmPlatform,
{
    try_relocate(tree, plat, image)
        .inspect_err(|e| warn!("sram: {e}"))
        .ok()
}

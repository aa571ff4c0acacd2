// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! SDRAM/DDR controller registers touched outside the SRAM routine.

use memory_addr::VirtAddr;

/// AT91RM9200 SDRAMC low-power register.
pub const AT91RM9200_SDRAMC_LPR: usize = 0x1c;

/// Writes `value` to the 32-bit register at `offset` of a RAM controller.
///
/// # Safety
///
/// `base + offset` must be a mapped, 4-byte aligned register of the RAM
/// controller.
pub unsafe fn ramc_write(base: VirtAddr, offset: usize, value: u32) {
    let reg = (base.as_usize() + offset) as *mut u32;
    unsafe { reg.write_volatile(value) }
}

/// Reads the 32-bit register at `offset` of a RAM controller.
///
/// # Safety
///
/// Same requirements as [`ramc_write`].
pub unsafe fn ramc_read(base: VirtAddr, offset: usize) -> u32 {
    let reg = (base.as_usize() + offset) as *const u32;
    unsafe { reg.read_volatile() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lpr_access_hits_expected_word() {
        let mut window = [0xffff_ffffu32; 16];
        let base = VirtAddr::from_usize(window.as_mut_ptr() as usize);
        unsafe {
            assert_eq!(ramc_read(base, AT91RM9200_SDRAMC_LPR), 0xffff_ffff);
            ramc_write(base, AT91RM9200_SDRAMC_LPR, 0);
        }
        assert_eq!(window[AT91RM9200_SDRAMC_LPR / 4], 0);
        assert_eq!(window[AT91RM9200_SDRAMC_LPR / 4 - 1], 0xffff_ffff);
    }
}

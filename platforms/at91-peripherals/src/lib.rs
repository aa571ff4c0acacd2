// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Register-level support for the AT91/SAMA5 power management controller
//! (PMC) and the SDRAM/DDR controllers sharing its lineage.
//!
//! Only the registers the suspend path inspects or touches are described
//! here. Everything is exposed through [`pmc::PmcAccess`] so higher layers can
//! run against a simulated register file.

#![cfg_attr(not(test), no_std)]

pub mod pmc;
pub mod sdramc;

pub use pmc::{MmioPmc, PmcAccess, PmcReg, SysClk};

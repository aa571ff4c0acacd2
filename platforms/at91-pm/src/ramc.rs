// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! RAM controller registry and discovery.

use memory_addr::VirtAddr;
use strum::{EnumIter, IntoStaticStr};

use crate::{
    PmError, PmResult,
    desc::{DescNode, DescTree},
    platform::PmPlatform,
};

/// Most controllers the SRAM routine can drive (dual-bank parts use two).
pub const MAX_RAMC: usize = 2;

/// Supported RAM controller designs, named by their `compatible` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum RamcFlavor {
    #[strum(serialize = "atmel,at91rm9200-sdramc")]
    At91rm9200Sdramc,
    #[strum(serialize = "atmel,at91sam9260-sdramc")]
    At91sam9260Sdramc,
    #[strum(serialize = "atmel,at91sam9g45-ddramc")]
    At91sam9g45Ddramc,
    #[strum(serialize = "atmel,sama5d3-ddramc")]
    Sama5d3Ddramc,
}

impl RamcFlavor {
    pub fn compatible(self) -> &'static str {
        self.into()
    }
}

/// Standby sequences used by the `cpuidle-at91` driver.
///
/// The value is opaque configuration data for that driver; each variant
/// names the routine matching one RAM controller generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandbyRoutine {
    /// AT91RM9200: SDRAMC self-refresh around the idle wait.
    At91rm9200,
    /// SAM9 SDRAMC low-power mode around the idle wait.
    Sam9Sdram,
    /// DDR/SDR controller low-power mode around the idle wait.
    Ddr,
}

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamcMatch {
    pub flavor: RamcFlavor,
    pub standby: Option<StandbyRoutine>,
}

/// The built-in registry, in match priority order.
pub static RAMC_IDS: &[RamcMatch] = &[
    RamcMatch {
        flavor: RamcFlavor::At91rm9200Sdramc,
        standby: Some(StandbyRoutine::At91rm9200),
    },
    RamcMatch {
        flavor: RamcFlavor::At91sam9260Sdramc,
        standby: Some(StandbyRoutine::Sam9Sdram),
    },
    RamcMatch {
        flavor: RamcFlavor::At91sam9g45Ddramc,
        standby: Some(StandbyRoutine::Ddr),
    },
    RamcMatch {
        flavor: RamcFlavor::Sama5d3Ddramc,
        standby: Some(StandbyRoutine::Ddr),
    },
];

/// Mapped bases of the discovered RAM controllers, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RamcBases(heapless::Vec<VirtAddr, MAX_RAMC>);

impl RamcBases {
    /// Builds a set directly from already mapped bases.
    ///
    /// Bases beyond [`MAX_RAMC`] are dropped.
    pub fn from_bases(bases: &[VirtAddr]) -> Self {
        Self(bases.iter().take(MAX_RAMC).copied().collect())
    }

    pub fn get(&self, index: usize) -> Option<VirtAddr> {
        self.0.get(index).copied()
    }

    /// Routine argument for controller `index`; null when absent.
    pub fn routine_arg(&self, index: usize) -> VirtAddr {
        self.get(index).unwrap_or(VirtAddr::from_usize(0))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of RAM controller discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamcInfo {
    pub bases: RamcBases,
    /// First standby routine resolved from the matched flavors.
    pub standby: Option<StandbyRoutine>,
}

/// Returns the `table` entry for the most specific `compatible` of `node`.
///
/// The node's own `compatible` order decides, not the table order.
pub fn match_node<'t>(table: &'t [RamcMatch], node: &DescNode) -> Option<&'t RamcMatch> {
    node.compatible
        .iter()
        .find_map(|compat| table.iter().find(|m| m.flavor.compatible() == *compat))
}

/// Discovers RAM controllers using the built-in registry.
pub fn discover<T, PL>(tree: &T, plat: &mut PL) -> PmResult<RamcInfo>
where
    T: DescTree + ?Sized,
    PL: PmPlatform,
{
    discover_with(RAMC_IDS, tree, plat)
}

/// Maps every node matching `table` and picks the standby routine.
///
/// Finding no controller, or failing to map one, is fatal: memory cannot be
/// idled safely without knowing how to drive it.
pub fn discover_with<T, PL>(table: &[RamcMatch], tree: &T, plat: &mut PL) -> PmResult<RamcInfo>
where
    T: DescTree + ?Sized,
    PL: PmPlatform,
{
    let mut bases = heapless::Vec::<VirtAddr, MAX_RAMC>::new();
    let mut standby = None;

    for node in tree.nodes() {
        let Some(id) = match_node(table, &node) else {
            continue;
        };
        let idx = bases.len();
        if bases.is_full() {
            warn!("ramc: ignoring {}, only {MAX_RAMC} controllers supported", node.path);
            continue;
        }
        let base = plat.iomap(&node, 0).ok_or(PmError::RamcMapFailed(idx))?;
        if bases.push(base).is_err() {
            warn!("ramc: ignoring {}, only {MAX_RAMC} controllers supported", node.path);
            continue;
        }
        debug!(
            "ramc[{idx}]: {} ({}) mapped at {:#x}",
            node.path,
            id.flavor.compatible(),
            base.as_usize()
        );
        if standby.is_none() {
            standby = id.standby;
        }
    }

    if bases.is_empty() {
        return Err(PmError::NoRamController);
    }
    if standby.is_none() {
        warn!("ramc no standby function available");
    }

    Ok(RamcInfo {
        bases: RamcBases(bases),
        standby,
    })
}

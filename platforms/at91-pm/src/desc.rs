// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Device description data consumed at boot.

use memory_addr::PhysAddr;

/// A device node as seen by this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescNode {
    /// Full node path, e.g. `/ahb/apb/ramc@ffffe800`.
    pub path: &'static str,
    /// Entries of the `compatible` property, most specific first.
    pub compatible: &'static [&'static str],
    /// First `reg` window.
    pub reg: Option<(PhysAddr, usize)>,
}

impl DescNode {
    pub fn is_compatible(&self, compat: &str) -> bool {
        self.compatible.iter().any(|c| *c == compat)
    }
}

/// Source of device nodes, typically the flattened device tree.
pub trait DescTree {
    /// All nodes in tree order.
    fn nodes(&self) -> impl Iterator<Item = DescNode> + '_;

    /// Nodes whose `compatible` list contains `compat`, in tree order.
    fn compatible_nodes<'a>(&'a self, compat: &'a str) -> impl Iterator<Item = DescNode> + 'a {
        self.nodes().filter(move |n| n.is_compatible(compat))
    }
}

/// Boards without a device tree describe their nodes in a static table.
impl DescTree for [DescNode] {
    fn nodes(&self) -> impl Iterator<Item = DescNode> + '_ {
        self.iter().copied()
    }
}

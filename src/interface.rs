//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

/// Operational status of an interface, as probed by the surrounding router.
/// Admin-up/down handling and the probing itself are out of scope for the
/// core (§1); the engine only ever reads the latest snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InterfaceStatus {
    Up,
    Down,
}

impl InterfaceStatus {
    pub fn is_up(self) -> bool {
        matches!(self, InterfaceStatus::Up)
    }
}

/// A read-only snapshot of one of the surrounding router's interfaces
/// (§3). Owned and enumerated by the platform; the engine never mutates
/// or outlives these values past a single tick or receive callback.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interface {
    pub name: String,
    pub hw_addr: [u8; 6],
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub status: InterfaceStatus,
}

impl Interface {
    /// Computes the subnet this interface is attached to: `ip & mask`.
    pub fn subnet(&self) -> Ipv4Addr {
        let ip = u32::from(self.ip);
        let mask = u32::from(self.mask);
        Ipv4Addr::from(ip & mask)
    }
}

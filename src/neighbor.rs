//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use tracing::info;

/// Time without a Hello after which a neighbor is considered down (§5).
pub const DEAD_INTERVAL: Duration = Duration::from_secs(20);

/// Soft cap on the number of neighbors tracked by a single instance (§6).
/// Unenforced in this profile, mirroring the source (§5, known
/// limitation): exceeding it only means more memory is used, nothing is
/// rejected.
pub const MAX_NEIGHBORS: usize = 10;

/// One entry in the neighbor table (§3). Entries are never deleted once
/// created: a down neighbor may later be revived by a fresh Hello.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Neighbor {
    pub router_id: u32,
    pub src_addr: Ipv4Addr,
    pub iface: String,
    pub last_hello: Instant,
    pub alive: bool,
}

/// Neighbor table (§4.2): at most one entry per router-id (I1), keyed by
/// router-id rather than the source's intrusive linked list (§9 design
/// note).
#[derive(Debug, Default)]
pub struct NeighborTable {
    neighbors: HashMap<u32, Neighbor>,
}

impl NeighborTable {
    pub fn new() -> NeighborTable {
        NeighborTable::default()
    }

    pub fn find(&self, router_id: u32) -> Option<&Neighbor> {
        self.neighbors.get(&router_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.neighbors.values()
    }

    /// Applies a received Hello (§4.2): creates the entry on first contact
    /// from an unknown router-id, otherwise refreshes liveness in place.
    /// The interface a neighbor was first learned on is retained across
    /// revivals even if a later Hello arrives on a different interface
    /// (§4.2, §9 open question (b)): this profile does not migrate
    /// neighbors between interfaces.
    pub fn upsert_on_hello(
        &mut self,
        router_id: u32,
        src_addr: Ipv4Addr,
        iface: &str,
        now: Instant,
    ) {
        match self.neighbors.get_mut(&router_id) {
            Some(nbr) => {
                let was_alive = nbr.alive;
                nbr.src_addr = src_addr;
                nbr.last_hello = now;
                nbr.alive = true;
                if !was_alive {
                    info!(router_id = %Ipv4Addr::from(router_id), "neighbor up");
                }
            }
            None => {
                info!(router_id = %Ipv4Addr::from(router_id), %iface, "neighbor up");
                self.neighbors.insert(
                    router_id,
                    Neighbor {
                        router_id,
                        src_addr,
                        iface: iface.to_owned(),
                        last_hello: now,
                        alive: true,
                    },
                );
            }
        }
    }

    /// Marks neighbors down whose last Hello is older than
    /// [`DEAD_INTERVAL`] (§4.2). Entries are never removed, only flagged
    /// (B4: last_hello == now - DEAD_INTERVAL is still alive; only
    /// strictly greater marks it down).
    pub fn sweep(&mut self, now: Instant) {
        for nbr in self.neighbors.values_mut() {
            if nbr.alive && now.duration_since(nbr.last_hello) > DEAD_INTERVAL {
                nbr.alive = false;
                info!(router_id = %Ipv4Addr::from(nbr.router_id), "neighbor down");
            }
        }
    }
}

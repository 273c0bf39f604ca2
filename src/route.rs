//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Instant;

/// Sentinel metric denoting an invalidated route (§3). A metric of zero
/// denotes a directly connected route; one denotes a route learned one
/// hop away via a neighbor.
pub const METRIC_INFINITY: u32 = u32::MAX;
pub const METRIC_DIRECT: u32 = 0;
pub const METRIC_LEARNED: u32 = 1;

/// One entry in the routing table (§3). This type, and the table that
/// holds it, are owned by the surrounding router; the core only mutates
/// it through the [`RoutingTable`] trait (§1, §6).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteEntry {
    pub destination: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub iface: String,
    pub metric: u32,
    pub updated: Instant,
}

/// A routing-table handle held for the duration of the reconcile phase
/// (§4.6, §4.7). Acquired once by [`crate::spf::reconcile`] inside the
/// engine lock and released when the phase completes.
pub trait RoutingTableGuard {
    fn find(&self, destination: Ipv4Addr, mask: Ipv4Addr) -> Option<RouteEntry>;
    fn insert(&mut self, entry: RouteEntry);
    fn update(
        &mut self,
        destination: Ipv4Addr,
        mask: Ipv4Addr,
        f: &mut dyn FnMut(&mut RouteEntry),
    );
    fn entries(&self) -> Vec<RouteEntry>;
}

/// The external routing-table collaborator (§1, §6): a lookup, insertion,
/// in-place update, and mutation-locking surface owned by the surrounding
/// router. Out of scope for the core itself (§1); this crate ships an
/// in-memory implementation so the reconciler is independently testable.
pub trait RoutingTable: Send + Sync {
    fn lock(&self) -> Box<dyn RoutingTableGuard + '_>;
}

/// Reference implementation of [`RoutingTable`] backed by a single mutex.
/// Production deployments would instead bridge to the surrounding
/// router's own FIB/RIB container.
#[derive(Debug, Default)]
pub struct InMemoryRoutingTable {
    inner: Mutex<HashMap<(Ipv4Addr, Ipv4Addr), RouteEntry>>,
}

impl InMemoryRoutingTable {
    pub fn new() -> InMemoryRoutingTable {
        InMemoryRoutingTable::default()
    }
}

impl RoutingTable for InMemoryRoutingTable {
    fn lock(&self) -> Box<dyn RoutingTableGuard + '_> {
        Box::new(InMemoryGuard(self.inner.lock().expect("routing table lock poisoned")))
    }
}

struct InMemoryGuard<'a>(
    std::sync::MutexGuard<'a, HashMap<(Ipv4Addr, Ipv4Addr), RouteEntry>>,
);

impl RoutingTableGuard for InMemoryGuard<'_> {
    fn find(&self, destination: Ipv4Addr, mask: Ipv4Addr) -> Option<RouteEntry> {
        self.0.get(&(destination, mask)).cloned()
    }

    fn insert(&mut self, entry: RouteEntry) {
        self.0.insert((entry.destination, entry.mask), entry);
    }

    fn update(
        &mut self,
        destination: Ipv4Addr,
        mask: Ipv4Addr,
        f: &mut dyn FnMut(&mut RouteEntry),
    ) {
        if let Some(entry) = self.0.get_mut(&(destination, mask)) {
            f(entry);
        }
    }

    fn entries(&self) -> Vec<RouteEntry> {
        self.0.values().cloned().collect()
    }
}

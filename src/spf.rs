//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::time::Instant;

use tracing::info;

use crate::interface::Interface;
use crate::lsdb::Lsdb;
use crate::neighbor::NeighborTable;
use crate::route::{
    METRIC_DIRECT, METRIC_INFINITY, METRIC_LEARNED, RouteEntry, RoutingTable, RoutingTableGuard,
};

/// Derives the forwarding table from the neighbor table and LSDB (§4.6).
///
/// This profile's "SPF" is degenerate: every LSA not originated by `self`
/// is reachable in exactly one hop via the neighbor whose router-id
/// matches the LSA's originator. There is no multi-hop path computation.
///
/// Acquires the routing-table lock for the whole three-pass reconcile and
/// releases it on return (§4.6, §4.7); the caller is expected to already
/// hold the engine lock.
pub fn reconcile(
    router_id: u32,
    interfaces: &[Interface],
    neighbors: &NeighborTable,
    lsdb: &Lsdb,
    table: &dyn RoutingTable,
    now: Instant,
) {
    let mut guard = table.lock();

    // Pass 1: directly connected routes.
    for iface in interfaces.iter().filter(|iface| iface.status.is_up()) {
        let dest = iface.subnet();
        let mask = iface.mask;
        match guard.find(dest, mask) {
            Some(_) => {
                guard.update(dest, mask, &mut |entry| {
                    entry.metric = METRIC_DIRECT;
                    entry.gateway = Ipv4Addr::UNSPECIFIED;
                    entry.iface = iface.name.clone();
                    entry.updated = now;
                });
            }
            None => {
                guard.insert(RouteEntry {
                    destination: dest,
                    mask,
                    gateway: Ipv4Addr::UNSPECIFIED,
                    iface: iface.name.clone(),
                    metric: METRIC_DIRECT,
                    updated: now,
                });
            }
        }
    }

    // Pass 2: learned routes, one hop via the advertising neighbor.
    for entry in lsdb.iter().filter(|entry| entry.router_id != router_id) {
        let Some(nbr) = neighbors.find(entry.router_id) else {
            continue;
        };
        if !nbr.alive {
            continue;
        }

        let dest = entry.subnet;
        let mask = entry.mask;
        match guard.find(dest, mask) {
            Some(existing) => {
                // §4.6: the new metric (always 1 here) must be strictly
                // better, with an existing metric of 0 also treated as
                // replaceable — a known quirk inherited from the source
                // (§9 open question (a)). In practice the directly
                // connected pass above always refreshes metric-0 entries
                // first each tick, so this never fires in steady state.
                if METRIC_LEARNED < existing.metric || existing.metric == METRIC_DIRECT
                {
                    guard.update(dest, mask, &mut |route| {
                        route.gateway = nbr.src_addr;
                        route.metric = METRIC_LEARNED;
                        route.iface = nbr.iface.clone();
                        route.updated = now;
                    });
                }
            }
            None => {
                guard.insert(RouteEntry {
                    destination: dest,
                    mask,
                    gateway: nbr.src_addr,
                    iface: nbr.iface.clone(),
                    metric: METRIC_LEARNED,
                    updated: now,
                });
            }
        }
    }

    // Pass 3: invalidate routes whose gateway is no longer an alive
    // neighbor. Entries are never removed, only marked (§4.6).
    for route in guard.entries() {
        if route.metric == METRIC_DIRECT || route.metric == METRIC_INFINITY {
            continue;
        }
        let gateway_alive = neighbors
            .iter()
            .any(|nbr| nbr.alive && nbr.src_addr == route.gateway);
        if !gateway_alive {
            info!(
                destination = %route.destination,
                gateway = %route.gateway,
                "route invalidated",
            );
            guard.update(route.destination, route.mask, &mut |entry| {
                entry.metric = METRIC_INFINITY;
            });
        }
    }
}

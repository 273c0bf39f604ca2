//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use crate::lsdb::Lsdb;
use crate::neighbor::NeighborTable;
use crate::route::{METRIC_INFINITY, RoutingTable, RoutingTableGuard};

/// Prints the neighbor table to standard output (§6, §7). Diagnostic
/// only: the core has no structured log format for user-visible state,
/// only `tracing` events for operational transitions.
pub fn print_neighbors(neighbors: &NeighborTable) {
    println!("{:<15} {:<10} {:<8} {:<8}", "Router-ID", "Interface", "State", "Address");
    for nbr in neighbors.iter() {
        println!(
            "{:<15} {:<10} {:<8} {:<8}",
            Ipv4Addr::from(nbr.router_id),
            nbr.iface,
            if nbr.alive { "Full" } else { "Down" },
            nbr.src_addr,
        );
    }
}

/// Prints the link-state database to standard output (§6).
pub fn print_lsdb(lsdb: &Lsdb) {
    println!(
        "{:<15} {:<18} {:<10} {:<5}",
        "Adv Router", "Subnet", "Seq#", "Age"
    );
    for entry in lsdb.iter() {
        println!(
            "{:<15} {:<18} {:<10} {:<5}",
            Ipv4Addr::from(entry.router_id),
            format!("{}/{}", entry.subnet, entry.mask),
            entry.sequence,
            entry.age.as_secs(),
        );
    }
}

/// Prints the routing table to standard output (§4.4 "optionally print
/// routing table"). Non-mutating: takes its own lock on the
/// routing-table handle like any other reader.
pub fn print_routes(table: &dyn RoutingTable) {
    let guard = table.lock();
    println!(
        "{:<15} {:<18} {:<15} {:<8} {:<8}",
        "Destination", "Mask", "Gateway", "Metric", "Iface"
    );
    for route in guard.entries() {
        let metric = if route.metric == METRIC_INFINITY {
            "inf".to_owned()
        } else {
            route.metric.to_string()
        };
        println!(
            "{:<15} {:<18} {:<15} {:<8} {:<8}",
            route.destination, route.mask, route.gateway, metric, route.iface
        );
    }
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug_span, info, instrument};

use crate::debug;
use crate::error::{Error, Result};
use crate::lsdb::Lsdb;
use crate::neighbor::NeighborTable;
use crate::packet::hello::Hello;
use crate::packet::lsa::{LsaRecord, LsUpdate, MAX_ENTRIES};
use crate::packet::Packet;
use crate::platform::{encapsulate, Platform};
use crate::route::RoutingTable;
use crate::spf;

/// Backbone area (§3): the only area this profile supports.
pub const AREA_BACKBONE: u32 = 0;

/// Mutable engine state guarded by the single engine-wide mutex (§3, §4.7):
/// the neighbor table, LSDB, and the per-instance LSA sequence counter.
pub struct InstanceState {
    pub sequence: u32,
    pub neighbors: NeighborTable,
    pub lsdb: Lsdb,
}

/// A running OSPF instance (§6 `init`/`destroy`).
///
/// `router_id` is set once at [`Instance::init`] and never mutated
/// afterwards, so it lives outside the lock; every other piece of engine
/// state lives in [`InstanceState`] behind a single mutex, acquired at
/// the top of every public entry point (tick, receive-hello, receive-lsu)
/// and released at return (§4.7).
pub struct Instance {
    pub router_id: u32,
    area_id: u32,
    platform: Arc<dyn Platform>,
    routing_table: Arc<dyn RoutingTable>,
    state: Mutex<InstanceState>,
}

impl Instance {
    /// Initializes a new instance (§6 `init`): the router-id is set to
    /// the IPv4 address of the first enumerated interface, and the
    /// sequence counter is seeded to 1.
    pub fn init(
        platform: Arc<dyn Platform>,
        routing_table: Arc<dyn RoutingTable>,
    ) -> Result<Arc<Instance>> {
        let interfaces = platform.interfaces();
        let first = interfaces
            .first()
            .ok_or_else(|| Error::InterfaceNotFound("<none enumerated>".to_owned()))?;
        let router_id = u32::from(first.ip);

        info!(router_id = %Ipv4Addr::from(router_id), "OSPF instance initialized");

        Ok(Arc::new(Instance {
            router_id,
            area_id: AREA_BACKBONE,
            platform,
            routing_table,
            state: Mutex::new(InstanceState {
                sequence: 1,
                neighbors: NeighborTable::new(),
                lsdb: Lsdb::new(),
            }),
        }))
    }

    /// Runs one timer tick (§4.4), in this exact order under the engine
    /// lock: emit Hellos, sweep neighbor liveness, age the LSDB,
    /// originate local LSAs, flood the LSDB, run SPF/reconcile, and
    /// finally print the routing table.
    #[instrument(skip_all, fields(router_id = %Ipv4Addr::from(self.router_id)))]
    pub fn tick(&self, now: Instant) {
        let interfaces = self.platform.interfaces();
        let mut state = self.state.lock().expect("engine lock poisoned");

        self.emit_hellos(&interfaces);
        state.neighbors.sweep(now);
        state.lsdb.age(now);
        self.originate_local_lsas(&mut state, &interfaces, now);
        self.flood(&state, &interfaces);
        spf::reconcile(
            self.router_id,
            &interfaces,
            &state.neighbors,
            &state.lsdb,
            self.routing_table.as_ref(),
            now,
        );
        debug::print_routes(self.routing_table.as_ref());
    }

    fn emit_hellos(&self, interfaces: &[crate::interface::Interface]) {
        for iface in interfaces.iter().filter(|iface| iface.status.is_up()) {
            let hello = Hello::generate(
                self.router_id,
                self.area_id,
                iface.mask,
                crate::tasks::HELLO_INTERVAL.as_secs() as u16,
                crate::neighbor::DEAD_INTERVAL.as_secs() as u32,
            );
            self.send(iface, hello.encode());
        }
    }

    /// Re-originates a fresh LSA for every up interface, each tick, with
    /// a strictly increasing sequence number — guaranteeing the
    /// instance's own LSAs always win arbitration against stale copies
    /// still circulating the network (§4.3).
    fn originate_local_lsas(
        &self,
        state: &mut InstanceState,
        interfaces: &[crate::interface::Interface],
        now: Instant,
    ) {
        for iface in interfaces.iter().filter(|iface| iface.status.is_up()) {
            let seq = state.sequence;
            state.sequence = state.sequence.wrapping_add(1);
            let lsa = LsaRecord {
                router_id: self.router_id,
                subnet: iface.subnet(),
                mask: iface.mask,
                sequence: seq,
                age: 0,
                num_links: 0,
            };
            state.lsdb.apply(&lsa, now);
        }
    }

    fn flood(&self, state: &InstanceState, interfaces: &[crate::interface::Interface]) {
        let lsas: Vec<LsaRecord> = state
            .lsdb
            .iter()
            .map(|entry| LsaRecord {
                router_id: entry.router_id,
                subnet: entry.subnet,
                mask: entry.mask,
                sequence: entry.sequence,
                age: entry.age.as_secs().min(u16::MAX as u64) as u16,
                num_links: 0,
            })
            .collect();

        for iface in interfaces.iter().filter(|iface| iface.status.is_up()) {
            for chunk in lsas.chunks(MAX_ENTRIES) {
                let lsu =
                    LsUpdate::generate(self.router_id, self.area_id, chunk.to_vec());
                self.send(iface, lsu.encode());
            }
        }
    }

    fn send(&self, iface: &crate::interface::Interface, payload: Bytes) {
        let frame = encapsulate(iface, payload);
        self.platform.send_packet(&iface.name, &frame);
    }

    /// Receive handler for Hello packets (§4.5): extracts the OSPF-header
    /// router-id and the caller-supplied IPv4 source address, then
    /// upserts the neighbor table. Malformed packets are dropped
    /// silently (§7).
    pub fn receive_hello(&self, payload: Bytes, src_addr: Ipv4Addr, iface: &str, now: Instant) {
        let span = debug_span!("receive", %iface, r#type = "hello");
        let _guard = span.enter();

        let packet = match Packet::decode(payload) {
            Ok(packet) => packet,
            Err(error) => {
                Error::from(error).log();
                return;
            }
        };
        let Packet::Hello(hello) = packet else {
            return;
        };

        let mut state = self.state.lock().expect("engine lock poisoned");
        state
            .neighbors
            .upsert_on_hello(hello.hdr.router_id, src_addr, iface, now);
    }

    /// Receive handler for LS Update packets (§4.5): applies every LSA
    /// record carried in the packet (already clamped to
    /// [`MAX_ENTRIES`] by the codec) to the LSDB. No checksum
    /// enforcement, version check, or self-origin filtering is performed
    /// on receipt — the LSDB's own sequence-number arbitration handles
    /// self-originated LSAs trivially since locally originated sequences
    /// are always higher by construction (§4.5).
    pub fn receive_lsu(&self, payload: Bytes, iface: &str, now: Instant) {
        let span = debug_span!("receive", %iface, r#type = "ls_update");
        let _guard = span.enter();

        let packet = match Packet::decode(payload) {
            Ok(packet) => packet,
            Err(error) => {
                Error::from(error).log();
                return;
            }
        };
        let Packet::LsUpdate(lsu) = packet else {
            return;
        };

        let mut state = self.state.lock().expect("engine lock poisoned");
        for lsa in &lsu.lsas {
            state.lsdb.apply(lsa, now);
        }
    }

    /// Diagnostic, non-mutating (§6).
    pub fn print_neighbors(&self) {
        let state = self.state.lock().expect("engine lock poisoned");
        debug::print_neighbors(&state.neighbors);
    }

    /// Diagnostic, non-mutating (§6).
    pub fn print_lsdb(&self) {
        let state = self.state.lock().expect("engine lock poisoned");
        debug::print_lsdb(&state.lsdb);
    }

    /// Returns whether the LSDB currently holds an entry with the given
    /// identity. Diagnostic, non-mutating; used by callers (and tests)
    /// that need to observe expiry without reaching into engine-private
    /// state.
    pub fn lsdb_contains(&self, router_id: u32, subnet: Ipv4Addr) -> bool {
        let state = self.state.lock().expect("engine lock poisoned");
        state.lsdb.find(router_id, subnet).is_some()
    }
}

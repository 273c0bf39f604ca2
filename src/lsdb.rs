//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::packet::lsa::LsaRecord;

/// Seconds after which an LSDB entry is expired (§4.3, §5). Also the
/// ceiling `age` is clamped to during the aging pass.
pub const LSA_MAXAGE: Duration = Duration::from_secs(20);

/// Soft cap on the number of LSDB entries (§6). Unenforced in this
/// profile, mirroring the source (known limitation, §5/§9).
pub const MAX_LSA: usize = 50;

/// Identity of an LSDB entry: the originating router plus the advertised
/// subnet (§3). At most one entry exists per identity (I2).
pub type LsdbKey = (u32, Ipv4Addr);

/// One entry in the link-state database (§3).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LsdbEntry {
    pub router_id: u32,
    pub subnet: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub sequence: u32,
    pub timestamp: Instant,
    pub age: Duration,
}

impl LsdbEntry {
    pub fn key(&self) -> LsdbKey {
        (self.router_id, self.subnet)
    }
}

/// Link-state database (§4.3), keyed by (router-id, subnet) rather than
/// the source's intrusive linked list (§9 design note).
#[derive(Debug, Default)]
pub struct Lsdb {
    entries: HashMap<LsdbKey, LsdbEntry>,
}

impl Lsdb {
    pub fn new() -> Lsdb {
        Lsdb::default()
    }

    pub fn find(&self, router_id: u32, subnet: Ipv4Addr) -> Option<&LsdbEntry> {
        self.entries.get(&(router_id, subnet))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LsdbEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies an incoming LSA record (§4.3): creates the entry if its
    /// identity is unseen, otherwise updates mask/sequence/timestamp/age
    /// only when the incoming sequence number is strictly greater than
    /// the one stored (I4, B1, B2). The comparison is plain unsigned `>`;
    /// sequence-number wraparound is not handled (§9 open question (c)).
    pub fn apply(&mut self, incoming: &LsaRecord, now: Instant) {
        let key = (incoming.router_id, incoming.subnet);
        match self.entries.get_mut(&key) {
            Some(entry) => {
                if incoming.sequence > entry.sequence {
                    entry.mask = incoming.mask;
                    entry.sequence = incoming.sequence;
                    entry.timestamp = now;
                    entry.age = Duration::ZERO;
                }
            }
            None => {
                debug!(
                    router_id = %Ipv4Addr::from(incoming.router_id),
                    subnet = %incoming.subnet,
                    "new LSA",
                );
                self.entries.insert(
                    key,
                    LsdbEntry {
                        router_id: incoming.router_id,
                        subnet: incoming.subnet,
                        mask: incoming.mask,
                        sequence: incoming.sequence,
                        timestamp: now,
                        age: Duration::ZERO,
                    },
                );
            }
        }
    }

    /// Ages every entry and removes those that have reached
    /// [`LSA_MAXAGE`] (§4.3, I3).
    pub fn age(&mut self, now: Instant) {
        self.entries.retain(|_, entry| {
            entry.age = now.duration_since(entry.timestamp).min(LSA_MAXAGE);
            let expired = entry.age >= LSA_MAXAGE;
            if expired {
                info!(
                    router_id = %Ipv4Addr::from(entry.router_id),
                    subnet = %entry.subnet,
                    "LSA expired",
                );
            }
            !expired
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lsa(router_id: u32, seq: u32) -> LsaRecord {
        LsaRecord {
            router_id,
            subnet: Ipv4Addr::new(192, 168, 1, 0),
            mask: Ipv4Addr::new(255, 255, 255, 0),
            sequence: seq,
            age: 0,
            num_links: 0,
        }
    }

    #[test]
    fn sequence_arbitration() {
        let mut lsdb = Lsdb::new();
        let t0 = Instant::now();
        lsdb.apply(&lsa(1, 5), t0);
        assert_eq!(lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).unwrap().sequence, 5);

        // B2: lower sequence is a no-op.
        lsdb.apply(&lsa(1, 4), t0 + Duration::from_secs(1));
        assert_eq!(lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).unwrap().sequence, 5);

        // B1: equal sequence is a no-op.
        lsdb.apply(&lsa(1, 5), t0 + Duration::from_secs(1));
        assert_eq!(lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).unwrap().sequence, 5);

        // Strictly greater sequence updates the entry.
        let t2 = t0 + Duration::from_secs(2);
        lsdb.apply(&lsa(1, 6), t2);
        let entry = lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).unwrap();
        assert_eq!(entry.sequence, 6);
        assert_eq!(entry.timestamp, t2);
    }

    #[test]
    fn idempotent_apply() {
        let mut lsdb = Lsdb::new();
        let t0 = Instant::now();
        lsdb.apply(&lsa(1, 5), t0);
        let before = lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).cloned();
        lsdb.apply(&lsa(1, 5), t0 + Duration::from_secs(1));
        let after = lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).cloned();
        assert_eq!(before, after);
    }

    #[test]
    fn aging_expires_entry() {
        let mut lsdb = Lsdb::new();
        let t0 = Instant::now();
        lsdb.apply(&lsa(1, 5), t0);
        lsdb.age(t0 + Duration::from_secs(10));
        assert!(lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).is_some());
        assert_eq!(
            lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).unwrap().age,
            Duration::from_secs(10)
        );

        lsdb.age(t0 + LSA_MAXAGE);
        assert!(lsdb.find(1, Ipv4Addr::new(192, 168, 1, 0)).is_none());
    }
}

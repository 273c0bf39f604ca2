//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};
use internet_checksum::Checksum;

use crate::interface::Interface;

/// AllSPFRouters, the multicast group Hello and LSU packets are addressed
/// to (§4.1, §6, GLOSSARY).
pub const ALL_SPF_ROUTERS: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 5);

/// IPv4 protocol number for OSPF (§4.1).
pub const IPPROTO_OSPF: u8 = 89;

/// Ethernet broadcast address, used as the destination MAC since the
/// source router has no multicast MAC resolution (§4.1).
pub const ETH_BROADCAST: [u8; 6] = [0xff; 6];

const ETH_TYPE_IPV4: u16 = 0x0800;

/// Platform services the core consumes (§6): best-effort transmission and
/// a read-only view of the router's interfaces. Everything else named in
/// the spec — ARP, ICMP, Ethernet/IP receive demultiplexing, interface
/// enumeration and admin probing — lives on the other side of this trait
/// and is out of scope for the core (§1).
pub trait Platform: Send + Sync {
    /// Transmits a fully formed Ethernet frame on the named interface.
    /// Best-effort: the return value is ignored by the core, and send
    /// failures are absorbed by skipping the interface for this tick
    /// (§7).
    fn send_packet(&self, iface: &str, frame: &[u8]);

    /// Read-only snapshot of the router's interfaces (§3, §6).
    fn interfaces(&self) -> Vec<Interface>;
}

/// Wraps an OSPF payload in IPv4 and Ethernet headers addressed to
/// AllSPFRouters, bit-exact per §4.1 and §6: IPv4 destination
/// 224.0.0.5, protocol 89, TTL 1; Ethernet destination broadcast; IPv4
/// and Ethernet source taken from the egress interface.
pub fn encapsulate(iface: &Interface, ospf_payload: Bytes) -> Bytes {
    let ip_total_len = 20 + ospf_payload.len();
    let mut ip_hdr = BytesMut::with_capacity(20);
    ip_hdr.put_u8(0x45); // version 4, IHL 5
    ip_hdr.put_u8(0x00); // DSCP/ECN
    ip_hdr.put_u16(ip_total_len as u16);
    ip_hdr.put_u16(0); // identification
    ip_hdr.put_u16(0); // flags/fragment offset
    ip_hdr.put_u8(1); // TTL
    ip_hdr.put_u8(IPPROTO_OSPF);
    ip_hdr.put_u16(0); // checksum, patched below
    ip_hdr.put_u32(u32::from(iface.ip));
    ip_hdr.put_u32(u32::from(ALL_SPF_ROUTERS));

    let mut cksum = Checksum::new();
    cksum.add_bytes(&ip_hdr);
    ip_hdr[10..12].copy_from_slice(&cksum.checksum());

    let mut frame = BytesMut::with_capacity(14 + ip_hdr.len() + ospf_payload.len());
    frame.put_slice(&ETH_BROADCAST);
    frame.put_slice(&iface.hw_addr);
    frame.put_u16(ETH_TYPE_IPV4);
    frame.put_slice(&ip_hdr);
    frame.put_slice(&ospf_payload);
    frame.freeze()
}

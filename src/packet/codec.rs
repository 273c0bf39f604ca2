//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use internet_checksum::Checksum;

/// Type alias used throughout the codec for fallible decode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors produced while decoding an OSPF packet from the wire.
///
/// Per the receive-path error taxonomy, every one of these causes the
/// packet to be dropped silently by the caller; none of them surface above
/// the engine.
#[derive(Debug)]
pub enum DecodeError {
    IncompletePacket,
    InvalidVersion(u8),
    UnknownPacketType(u8),
    InvalidLength(u16),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::IncompletePacket => {
                write!(f, "packet shorter than its declared length")
            }
            DecodeError::InvalidVersion(version) => {
                write!(f, "invalid OSPF version: {}", version)
            }
            DecodeError::UnknownPacketType(pkt_type) => {
                write!(f, "unknown OSPF packet type: {}", pkt_type)
            }
            DecodeError::InvalidLength(pkt_len) => {
                write!(f, "invalid packet length: {}", pkt_len)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// OSPF packet type (§4.1). Only the two types this profile speaks are
/// represented; any other value observed on the wire is dropped by the
/// receive dispatcher as an unknown type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PacketType {
    Hello = 1,
    LsUpdate = 4,
}

impl PacketType {
    pub fn from_u8(value: u8) -> Option<PacketType> {
        match value {
            1 => Some(PacketType::Hello),
            4 => Some(PacketType::LsUpdate),
            _ => None,
        }
    }
}

/// Common OSPF packet header (§4.1), 24 bytes, all multi-byte fields in
/// network byte order:
///
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   Version #   |     Type      |         Packet length         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Router ID                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Area ID                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Checksum            |             AuType            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Authentication                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Authentication                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PacketHdr {
    pub pkt_type: PacketType,
    pub length: u16,
    pub router_id: u32,
    pub area_id: u32,
}

impl PacketHdr {
    pub const VERSION: u8 = 2;
    pub const LENGTH: u16 = 24;
    pub const CKSUM_RANGE: std::ops::Range<usize> = 12..14;

    pub fn decode(buf: &mut Bytes) -> DecodeResult<PacketHdr> {
        if buf.remaining() < Self::LENGTH as usize {
            return Err(DecodeError::IncompletePacket);
        }

        let version = buf.get_u8();
        if version != Self::VERSION {
            return Err(DecodeError::InvalidVersion(version));
        }

        let pkt_type = buf.get_u8();
        let Some(pkt_type) = PacketType::from_u8(pkt_type) else {
            return Err(DecodeError::UnknownPacketType(pkt_type));
        };

        let length = buf.get_u16();
        if length < Self::LENGTH {
            return Err(DecodeError::InvalidLength(length));
        }

        let router_id = buf.get_u32();
        let area_id = buf.get_u32();
        // Checksum: this profile accepts regardless (§4.1, §9 open question).
        let _cksum = buf.get_u16();
        // AuType: always 0 in this profile.
        let _autype = buf.get_u16();
        // Authentication: always 0 in this profile.
        let _auth = buf.get_u64();

        Ok(PacketHdr {
            pkt_type,
            length,
            router_id,
            area_id,
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(Self::VERSION);
        buf.put_u8(self.pkt_type as u8);
        // Patched in by `finish_packet` once the body has been written.
        buf.put_u16(0);
        buf.put_u32(self.router_id);
        buf.put_u32(self.area_id);
        // Patched in by `finish_packet`.
        buf.put_u16(0);
        buf.put_u16(0);
        buf.put_u64(0);
    }
}

/// Finalizes an encoded packet: patches in the total length, then computes
/// and patches in the checksum over the whole buffer with the checksum
/// field zeroed, per the IPv4 one's-complement algorithm (§4.1, §6).
pub fn finish_packet(buf: &mut BytesMut) -> Bytes {
    let pkt_len = buf.len() as u16;
    buf[2..4].copy_from_slice(&pkt_len.to_be_bytes());

    let mut cksum = Checksum::new();
    cksum.add_bytes(buf);
    buf[PacketHdr::CKSUM_RANGE].copy_from_slice(&cksum.checksum());

    buf.clone().freeze()
}

pub(crate) fn get_ipv4(buf: &mut Bytes) -> Ipv4Addr {
    Ipv4Addr::from(buf.get_u32())
}

pub(crate) fn put_ipv4(buf: &mut BytesMut, addr: Ipv4Addr) {
    buf.put_u32(u32::from(addr));
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::packet::codec::{
    DecodeError, DecodeResult, PacketHdr, PacketType, finish_packet, get_ipv4,
    put_ipv4,
};

/// Maximum number of LSA records carried inline by a single LS Update
/// packet (§4.1, §6). Packets longer than this must not be produced; on
/// receipt, records past this count are ignored (B3).
pub const MAX_ENTRIES: usize = 25;

/// A single LSA record as it appears on the wire (§4.1), 20 bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LsaRecord {
    pub router_id: u32,
    pub subnet: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub sequence: u32,
    pub age: u16,
    pub num_links: u16,
}

impl LsaRecord {
    pub const LENGTH: u16 = 20;

    pub fn decode(buf: &mut Bytes) -> DecodeResult<LsaRecord> {
        if buf.remaining() < Self::LENGTH as usize {
            return Err(DecodeError::IncompletePacket);
        }

        let router_id = buf.get_u32();
        let subnet = get_ipv4(buf);
        let mask = get_ipv4(buf);
        let sequence = buf.get_u32();
        let age = buf.get_u16();
        let num_links = buf.get_u16();

        Ok(LsaRecord {
            router_id,
            subnet,
            mask,
            sequence,
            age,
            num_links,
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.router_id);
        put_ipv4(buf, self.subnet);
        put_ipv4(buf, self.mask);
        buf.put_u32(self.sequence);
        buf.put_u16(self.age);
        buf.put_u16(self.num_links);
    }
}

/// OSPF Link State Update packet (§4.1): common header followed by a
/// 32-bit LSA count and up to [`MAX_ENTRIES`] LSA records inline.
///
/// Encoding format (packet body):
///
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            # LSAs                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                              LSAs                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LsUpdate {
    pub hdr: PacketHdr,
    pub lsas: Vec<LsaRecord>,
}

impl LsUpdate {
    pub const BASE_LENGTH: u16 = 4;

    pub fn generate(router_id: u32, area_id: u32, lsas: Vec<LsaRecord>) -> LsUpdate {
        debug_assert!(lsas.len() <= MAX_ENTRIES);
        let length = PacketHdr::LENGTH
            + Self::BASE_LENGTH
            + lsas.len() as u16 * LsaRecord::LENGTH;
        LsUpdate {
            hdr: PacketHdr {
                pkt_type: PacketType::LsUpdate,
                length,
                router_id,
                area_id,
            },
            lsas,
        }
    }

    pub fn decode(buf: &mut Bytes) -> DecodeResult<LsUpdate> {
        let hdr = PacketHdr::decode(buf)?;
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::IncompletePacket);
        }

        let num_lsas = buf.get_u32() as usize;
        // Clamp to MAX_ENTRIES regardless of the declared count: records
        // past that cap are ignored on receipt (B3).
        let num_lsas = num_lsas.min(MAX_ENTRIES);
        let mut lsas = Vec::with_capacity(num_lsas);
        for _ in 0..num_lsas {
            if buf.remaining() < LsaRecord::LENGTH as usize {
                break;
            }
            lsas.push(LsaRecord::decode(buf)?);
        }

        Ok(LsUpdate { hdr, lsas })
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.hdr.length as usize);
        self.hdr.encode(&mut buf);
        buf.put_u32(self.lsas.len() as u32);
        for lsa in &self.lsas {
            lsa.encode(&mut buf);
        }
        finish_packet(&mut buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lsa(router_id: u32, seq: u32) -> LsaRecord {
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
    fn lsu_round_trip() {
        let lsu = LsUpdate::generate(
            0xc0a80101,
            0,
            vec![sample_lsa(0xc0a80101, 1), sample_lsa(0xc0a80102, 7)],
        );
        let encoded = lsu.encode();
        let mut buf = encoded.clone();
        let decoded = LsUpdate::decode(&mut buf).unwrap();
        assert_eq!(lsu, decoded);

        let re_encoded = decoded.encode();
        let mut a = BytesMut::from(&encoded[..]);
        let mut b = BytesMut::from(&re_encoded[..]);
        a[PacketHdr::CKSUM_RANGE].copy_from_slice(&[0, 0]);
        b[PacketHdr::CKSUM_RANGE].copy_from_slice(&[0, 0]);
        assert_eq!(a, b);
    }

    #[test]
    fn lsu_cap_at_max_entries() {
        // Construct an LSU claiming 30 LSAs but only supplying 30 records;
        // decode must stop after MAX_ENTRIES (B3, scenario 6).
        let lsas: Vec<LsaRecord> =
            (0..30).map(|i| sample_lsa(0xc0a80100 + i, 1)).collect();
        let mut buf = BytesMut::new();
        let hdr = PacketHdr {
            pkt_type: PacketType::LsUpdate,
            length: 0,
            router_id: 0xc0a80101,
            area_id: 0,
        };
        hdr.encode(&mut buf);
        buf.put_u32(30);
        for lsa in &lsas {
            lsa.encode(&mut buf);
        }
        let encoded = finish_packet(&mut buf);

        let mut decode_buf = encoded.clone();
        let decoded = LsUpdate::decode(&mut decode_buf).unwrap();
        assert_eq!(decoded.lsas.len(), MAX_ENTRIES);
        assert_eq!(decoded.lsas, lsas[..MAX_ENTRIES]);
    }
}

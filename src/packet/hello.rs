//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::packet::codec::{
    DecodeError, DecodeResult, PacketHdr, PacketType, finish_packet, get_ipv4,
    put_ipv4,
};

bitflags! {
    /// OSPF Options field (§4.1). Only the External routing capability
    /// bit is meaningful here — this profile has no stub areas, no
    /// multicast extensions, and no opaque LSAs — but the field is kept
    /// bit-exact on the wire for compatibility with real OSPFv2 captures.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Options: u8 {
        const E = 0x02;
    }
}

/// OSPF Hello packet (§4.1): common header followed by the fields below.
/// The `designated_router`/`backup_router`/`neighbor` fields are carried
/// on the wire for byte-compatibility but are always zero in this
/// profile — there is no DR/BDR election and no multi-neighbor Hello list
/// (single-slot simplification, §2 Non-goals).
///
/// Encoding format (packet body):
///
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Network Mask                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         HelloInterval         |    Options    |    Rtr Pri    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                     RouterDeadInterval                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Designated Router                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   Backup Designated Router                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Neighbor                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hello {
    pub hdr: PacketHdr,
    pub network_mask: Ipv4Addr,
    pub hello_interval: u16,
    pub options: Options,
    pub priority: u8,
    pub dead_interval: u32,
}

impl Hello {
    pub const BODY_LENGTH: u16 = 24;

    pub fn generate(
        router_id: u32,
        area_id: u32,
        network_mask: Ipv4Addr,
        hello_interval: u16,
        dead_interval: u32,
    ) -> Hello {
        Hello {
            hdr: PacketHdr {
                pkt_type: PacketType::Hello,
                length: PacketHdr::LENGTH + Self::BODY_LENGTH,
                router_id,
                area_id,
            },
            network_mask,
            hello_interval,
            options: Options::E,
            priority: 0,
            dead_interval,
        }
    }

    pub fn decode(buf: &mut Bytes) -> DecodeResult<Hello> {
        let hdr = PacketHdr::decode(buf)?;
        if buf.remaining() < Self::BODY_LENGTH as usize {
            return Err(DecodeError::IncompletePacket);
        }

        let network_mask = get_ipv4(buf);
        let hello_interval = buf.get_u16();
        // Ignore unknown options.
        let options = Options::from_bits_truncate(buf.get_u8());
        let priority = buf.get_u8();
        let dead_interval = buf.get_u32();
        // Designated Router, Backup Designated Router, Neighbor: ignored on
        // receipt, always zero on the wire (§4.1).
        let _dr = buf.get_u32();
        let _bdr = buf.get_u32();
        let _nbr = buf.get_u32();

        Ok(Hello {
            hdr,
            network_mask,
            hello_interval,
            options,
            priority,
            dead_interval,
        })
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.hdr.length as usize);
        self.hdr.encode(&mut buf);
        put_ipv4(&mut buf, self.network_mask);
        buf.put_u16(self.hello_interval);
        buf.put_u8(self.options.bits());
        buf.put_u8(self.priority);
        buf.put_u32(self.dead_interval);
        buf.put_u32(0);
        buf.put_u32(0);
        buf.put_u32(0);
        finish_packet(&mut buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trip() {
        let hello = Hello::generate(
            0xc0a80101,
            0,
            Ipv4Addr::new(255, 255, 255, 0),
            5,
            20,
        );
        let encoded = hello.encode();
        let mut buf = encoded.clone();
        let decoded = Hello::decode(&mut buf).unwrap();
        assert_eq!(hello, decoded);

        // Re-encoding must be byte-for-byte identical after zeroing the
        // checksum field (§8 round-trip property).
        let re_encoded = decoded.encode();
        let mut a = BytesMut::from(&encoded[..]);
        let mut b = BytesMut::from(&re_encoded[..]);
        a[PacketHdr::CKSUM_RANGE].copy_from_slice(&[0, 0]);
        b[PacketHdr::CKSUM_RANGE].copy_from_slice(&[0, 0]);
        assert_eq!(a, b);
    }
}

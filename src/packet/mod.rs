//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod codec;
pub mod hello;
pub mod lsa;

use bytes::Bytes;

pub use codec::{DecodeError, DecodeResult, PacketHdr, PacketType};
pub use hello::Hello;
pub use lsa::{LsUpdate, LsaRecord, MAX_ENTRIES};

/// A decoded OSPF packet, dispatched on [`PacketType`] by the receive
/// handlers (§4.5).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Packet {
    Hello(Hello),
    LsUpdate(LsUpdate),
}

impl Packet {
    /// Decodes an OSPF packet from its payload bytes (the OSPF header
    /// onward, with any IPv4/Ethernet framing already stripped).
    pub fn decode(mut buf: Bytes) -> DecodeResult<Packet> {
        // Peek the type field without consuming the header, so we can
        // dispatch to the right body decoder (which re-decodes the header
        // itself to keep each packet type self-contained).
        if buf.len() < PacketHdr::LENGTH as usize {
            return Err(DecodeError::IncompletePacket);
        }
        let pkt_type = buf[1];
        let Some(pkt_type) = PacketType::from_u8(pkt_type) else {
            return Err(DecodeError::UnknownPacketType(pkt_type));
        };

        match pkt_type {
            PacketType::Hello => Ok(Packet::Hello(Hello::decode(&mut buf)?)),
            PacketType::LsUpdate => {
                Ok(Packet::LsUpdate(LsUpdate::decode(&mut buf)?))
            }
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            Packet::Hello(pkt) => pkt.encode(),
            Packet::LsUpdate(pkt) => pkt.encode(),
        }
    }
}

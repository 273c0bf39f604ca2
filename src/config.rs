//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::interface::{Interface, InterfaceStatus};

/// Parses a single `--interface` argument of the form
/// `name:a.b.c.d/prefixlen`, e.g. `eth0:192.168.1.1/24`.
///
/// Interface enumeration and admin/operational status probing are owned
/// by the surrounding router and out of scope for the core (§1); this is
/// a stand-in used only by the demo binary to hand the engine a static
/// snapshot at startup.
pub fn parse_interface(spec: &str, hw_addr: [u8; 6]) -> Result<Interface, String> {
    let (name, addr) = spec
        .split_once(':')
        .ok_or_else(|| format!("expected name:addr/prefixlen, got {spec:?}"))?;
    let (ip, prefixlen) = addr
        .split_once('/')
        .ok_or_else(|| format!("expected addr/prefixlen, got {addr:?}"))?;

    let ip = Ipv4Addr::from_str(ip).map_err(|e| e.to_string())?;
    let prefixlen: u32 = prefixlen.parse().map_err(|_| {
        format!("invalid prefix length: {prefixlen:?}")
    })?;
    if prefixlen > 32 {
        return Err(format!("prefix length out of range: {prefixlen}"));
    }
    let mask = if prefixlen == 0 {
        0
    } else {
        u32::MAX << (32 - prefixlen)
    };

    Ok(Interface {
        name: name.to_owned(),
        hw_addr,
        ip,
        mask: Ipv4Addr::from(mask),
        status: InterfaceStatus::Up,
    })
}

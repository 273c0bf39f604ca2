//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;

use clap::Parser;
use ospf_engine::config::parse_interface;
use ospf_engine::instance::Instance;
use ospf_engine::interface::Interface;
use ospf_engine::platform::Platform;
use ospf_engine::route::InMemoryRoutingTable;
use ospf_engine::tasks::TimerHandle;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ospfd", about = "Teaching-grade OSPFv2 routing engine")]
struct Args {
    /// One or more interfaces as name:addr/prefixlen, e.g. eth0:192.168.1.1/24.
    #[arg(long = "interface", required = true)]
    interfaces: Vec<String>,
}

/// Stand-in for the surrounding router's packet-forwarding fast path and
/// interface table (§1, §6). Transmission here is logging only: the core
/// never has direct NIC access in this profile, and wiring it up to a raw
/// socket is left to the embedding router, not the control plane covered
/// by this crate.
struct LoggingPlatform {
    interfaces: Vec<Interface>,
}

impl Platform for LoggingPlatform {
    fn send_packet(&self, iface: &str, frame: &[u8]) {
        tracing::trace!(%iface, bytes = frame.len(), "send_packet");
    }

    fn interfaces(&self) -> Vec<Interface> {
        self.interfaces.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let interfaces = args
        .interfaces
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let mut hw_addr = [0x02, 0x00, 0x00, 0x00, 0x00, 0x00];
            hw_addr[5] = i as u8;
            parse_interface(spec, hw_addr)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let platform = Arc::new(LoggingPlatform { interfaces });
    let routing_table = Arc::new(InMemoryRoutingTable::new());
    let instance = Instance::init(platform, routing_table)?;

    let timer = TimerHandle::spawn(Arc::clone(&instance));

    tokio::signal::ctrl_c().await?;
    timer.shutdown().await;

    Ok(())
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! A teaching-grade link-state intra-domain routing engine modeled on
//! OSPFv2. Discovers directly connected peer routers over each local
//! interface, floods topology information to them, maintains a
//! replicated topology database, and derives an IPv4 forwarding table
//! from that database. Interoperates only with itself: no DR/BDR
//! election, no areas beyond the backbone, no authentication
//! verification, no fragmentation.

pub mod config;
pub mod debug;
pub mod error;
pub mod instance;
pub mod interface;
pub mod lsdb;
pub mod neighbor;
pub mod packet;
pub mod platform;
pub mod route;
pub mod spf;
pub mod tasks;

pub use error::{Error, Result};
pub use instance::Instance;

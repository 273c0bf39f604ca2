//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

use crate::packet::codec::DecodeError;

/// Errors produced while processing an inbound OSPF packet or while
/// initializing an instance. None of these propagate out of the engine's
/// public entry points: a decode error causes the offending packet to be
/// dropped (§7); `InterfaceNotFound` can only occur at `init` time, where
/// the caller is expected to retry once interfaces are enumerated.
#[derive(Debug)]
pub enum Error {
    PacketDecodeError(DecodeError),
    InterfaceNotFound(String),
}

impl Error {
    pub(crate) fn log(&self) {
        match self {
            Error::PacketDecodeError(error) => {
                warn!(%error, "dropping packet");
            }
            Error::InterfaceNotFound(name) => {
                warn!(%name, "interface not found");
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::PacketDecodeError(..) => write!(f, "failed to decode packet"),
            Error::InterfaceNotFound(name) => {
                write!(f, "interface not found: {}", name)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::PacketDecodeError(error) => Some(error),
            Error::InterfaceNotFound(..) => None,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Error {
        Error::PacketDecodeError(error)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

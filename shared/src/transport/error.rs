use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur while moving packets through a transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// `io_load()` has not been called yet
    #[error("Transport is not loaded. Must call `io_load()` before sending or receiving packets")]
    NotLoaded,

    /// The other end of the transport is gone
    #[error("Transport has been disconnected")]
    Disconnected,

    /// No route to the given address
    #[error("Cannot send packet to unknown address {address}")]
    UnknownAddress { address: SocketAddr },
}

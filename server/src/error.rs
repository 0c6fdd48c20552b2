use std::net::SocketAddr;

use thiserror::Error;

use uiclass_shared::{ClassError, ProtocolError, TransportError};

/// Errors surfaced by the Server through `Events`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// Packet transport failed
    #[error("Server transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol could not be locked or used
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A sync request could not be answered
    #[error(transparent)]
    Class(#[from] ClassError),

    /// A Connect was refused because `max_observers` was reached
    #[error("Refused connection from {address}, the observer limit has been reached")]
    ObserverLimitReached { address: SocketAddr },
}

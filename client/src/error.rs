use thiserror::Error;

use uiclass_shared::{ChannelKind, ClassError, InstanceId, ProtocolError, SerdeErr, TransportError};

/// Errors surfaced by the Client through `Events`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Packet transport failed
    #[error("Client transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol could not be locked or used
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A received value could not be applied
    #[error(transparent)]
    Class(#[from] ClassError),

    /// A packet from the authority could not be decoded and was dropped
    #[error("Dropped malformed packet from the authority: {reason}")]
    MalformedPacket { reason: SerdeErr },

    /// A value push carried a value this build doesn't understand
    #[error("Skipped unsupported value for instance {instance_id} on {channel:?}: {reason}")]
    UnsupportedValue {
        channel: ChannelKind,
        instance_id: InstanceId,
        reason: SerdeErr,
    },
}
